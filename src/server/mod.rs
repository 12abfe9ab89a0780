//! Server module for building the HTTP server
//!
//! `ServerBuilder` wires the record accessors into entity descriptors,
//! registers them, and exposes the result over REST.

pub mod builder;
pub mod entity_registry;
pub mod exposure;

pub use builder::ServerBuilder;
pub use entity_registry::{EntityDescriptor, EntityRegistry};
