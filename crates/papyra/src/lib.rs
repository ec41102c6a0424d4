//! Schema synthesis for `OpenAPI` 3.0 documents.
//!
//! Model types describe themselves as [`Shape`] values with annotated
//! fields; a [`Synthesizer`] walks those shapes and derives the document
//! fragments a route needs: named component schemas, parameter lists,
//! request bodies, response tables and security requirements. Named types
//! land in `components/schemas` exactly once and are referenced by `$ref`
//! everywhere else, which keeps recursive models finite.
//!
//! ```
//! use papyra::{
//!     FieldShape, HttpMethod, ResponseSpec, RouteSpec, Shape, StructShape, Synthesizer,
//! };
//! use papyra::shape::Primitive;
//!
//! let user = Shape::Struct(StructShape::new(
//!     "api::User",
//!     vec![
//!         FieldShape::new("id", r#"json:"id" validate:"required""#, || {
//!             Shape::Primitive(Primitive::U64)
//!         }),
//!         FieldShape::new("name", r#"json:"name""#, || {
//!             Shape::Primitive(Primitive::Str)
//!         }),
//!     ],
//! ));
//!
//! let mut synthesizer = Synthesizer::new();
//! let mut route = RouteSpec::new(HttpMethod::Get, "/user/:id");
//! route.responses.push(ResponseSpec::new(200, "the user", Some(user)));
//! let operation = synthesizer.operation(&route);
//!
//! assert!(operation.responses.contains_key("200"));
//! assert!(synthesizer.registry().contains("User"));
//! ```

pub mod enums;
pub mod naming;
pub mod params;
pub mod paths;
pub mod registry;
pub mod security;
pub mod shape;
pub mod synth;
pub mod tag;

pub use enums::{CoercionError, CoercionRegistry, EnumProvider, EnumShape, EnumValue};
pub use naming::{canonical_title, schema_reference};
pub use paths::{rewrite_path, ResponseSpec, RouteSpec, DEFAULT_CONTENT_TYPE};
pub use registry::ComponentRegistry;
pub use security::{ApiKeyAuth, ApiKeyLocation, BearerAuth, SecurityProvider};
pub use shape::{ApiModel, Bytes, FieldShape, Shape, StructShape, Upload};
pub use synth::{Direction, Synthesizer};
pub use tag::{FieldTags, TagValue};

pub use papyra_core::route::HttpMethod;
pub use papyra_core::{openapi, route, schema};
