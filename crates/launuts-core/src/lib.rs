//! SKOS graph assembly for German NUTS regions and LAU municipalities.
//!
//! Provides the region descriptors ([`region`]), the concept graph model
//! ([`graph::ConceptGraph`]), the three-phase [`builder::GraphBuilder`], Turtle
//! serialization with a provenance header, and a JSON source bundle loader.

pub mod builder;
pub mod config;
pub mod graph;
pub mod region;
pub mod sources;
pub mod storage;
pub mod turtle;
pub mod vocab;
