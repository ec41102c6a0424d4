//! OpenAPI 3.0 document model shared by the papyra synthesis engine.
//!
//! Pure serde data types: schemas and reusable components ([`schema`]),
//! operation-level structures ([`route`]), and the document root
//! ([`openapi`]). Synthesis logic lives in the `papyra` crate.

pub mod openapi;
pub mod route;
pub mod schema;

pub use schema::{Reference, Schema, SchemaRef};
