//! The recursive value/type walker and the document-build session.
//!
//! A [`Synthesizer`] owns all state of one synthesis pass: the component
//! registry, the security-scheme table and the enum coercion rules. The
//! walk is a single-threaded, depth-first descent over a shape graph,
//! bounded by the registry's existence check on named types.

use std::collections::BTreeMap;

use papyra_core::schema::{
    AdditionalProperties, Components, Reference, Schema, SchemaRef, SchemaType, SecurityScheme,
};
use serde_json::Value;

use crate::enums::{self, CoercionRegistry, EnumShape};
use crate::naming::canonical_title;
use crate::registry::ComponentRegistry;
use crate::shape::{ApiModel, Shape, StructShape};
use crate::tag::{self, FieldTags};

/// Traversal direction: request-shaped or response-shaped field selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Inbound: only fields bearing the body-binding annotation participate,
    /// keyed by that annotation's name
    Request,
    /// Outbound: fields participate keyed by their serialized-name
    /// annotation, skipped when it is absent
    Response,
}

impl Direction {
    /// Tag category that selects participating fields and names them.
    const fn name_key(self) -> &'static str {
        match self {
            Self::Request => tag::FORM,
            Self::Response => tag::JSON,
        }
    }
}

/// One document-build session.
#[derive(Debug, Default)]
pub struct Synthesizer {
    pub(crate) registry: ComponentRegistry,
    pub(crate) security_schemes: BTreeMap<String, SecurityScheme>,
    pub(crate) coercions: CoercionRegistry,
    pub(crate) default_content_type: Option<String>,
}

impl Synthesizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the content type used when a route requests none.
    #[must_use]
    pub fn with_default_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.default_content_type = Some(content_type.into());
        self
    }

    /// Schema for a model type; see [`Self::schema_for_shape`].
    pub fn schema_for_model<M: ApiModel>(&mut self, direction: Direction) -> (Option<String>, Schema) {
        self.schema_for_shape(&M::shape(), direction)
    }

    /// Walk one shape into `(reference pointer, inline schema)`.
    ///
    /// Named shapes (structures, enums) are registered as a side effect and
    /// return their document-relative pointer alongside the inline schema;
    /// anonymous shapes return `None` for the pointer.
    pub fn schema_for_shape(
        &mut self,
        shape: &Shape,
        direction: Direction,
    ) -> (Option<String>, Schema) {
        match shape {
            Shape::Primitive(primitive) => (None, primitive.schema()),
            Shape::Bytes => (None, formatted_string("byte")),
            Shape::Upload => (None, formatted_string("binary")),
            Shape::DateTime => (None, formatted_string("date-time")),
            Shape::Dynamic => (None, open_object()),
            Shape::Optional(inner) => self.schema_for_shape(inner, direction),
            Shape::Enum(shape) => {
                let (title, schema) = self.register_enum(shape);
                (Some(Reference::schema(&title).ref_path), schema)
            }
            Shape::Sequence(element) => (None, self.sequence_schema(element.deref(), direction)),
            Shape::Mapping(value) => (None, self.mapping_schema(value.deref(), direction)),
            Shape::Struct(shape) => {
                let title = self.register_struct(shape, direction);
                let schema = self
                    .registry
                    .get(&title)
                    .cloned()
                    .unwrap_or_else(Schema::object);
                (Some(Reference::schema(&title).ref_path), schema)
            }
        }
    }

    /// Register the named component(s) reachable from a model shape.
    ///
    /// Structures and enums register under their canonical title;
    /// sequences descend into their element; anonymous shapes are a no-op.
    pub fn synthesize_component(&mut self, shape: &Shape, direction: Direction) {
        match shape.deref() {
            Shape::Struct(shape) => {
                self.register_struct(shape, direction);
            }
            Shape::Enum(shape) => {
                self.register_enum(shape);
            }
            Shape::Sequence(element) => self.synthesize_component(element, direction),
            _ => tracing::trace!("model shape has no named component"),
        }
    }

    /// Registered components view.
    #[must_use]
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Enum acceptance rules for the external binding layer.
    #[must_use]
    pub fn coercions(&self) -> &CoercionRegistry {
        &self.coercions
    }

    /// Consume the session into the document's components section.
    #[must_use]
    pub fn into_components(self) -> Components {
        Components {
            schemas: (!self.registry.is_empty()).then(|| self.registry.into_schemas()),
            security_schemes: (!self.security_schemes.is_empty()).then_some(self.security_schemes),
        }
    }

    /// Derive and register a structure component, overwriting any previous
    /// entry under the same title. A placeholder is inserted before the
    /// field walk so a cyclic field reaching this type again sees it as
    /// present and emits a reference instead of descending without bound.
    pub(crate) fn register_struct(&mut self, shape: &StructShape, direction: Direction) -> String {
        let title = canonical_title(&shape.name);
        self.registry.insert(title.clone(), Schema::object());
        let schema = self.struct_schema(shape, direction, &title);
        self.registry.insert(title.clone(), schema);
        title
    }

    /// Derive and register an enum component together with its coercion
    /// rule; the schema and the runtime acceptance rule must never diverge.
    pub(crate) fn register_enum(&mut self, shape: &EnumShape) -> (String, Schema) {
        let title = canonical_title(&shape.name);
        let schema = enums::derive_schema(shape, &title);
        self.registry.insert(title.clone(), schema.clone());
        self.coercions.register(
            &title,
            shape.variants.iter().map(|(_, value)| value.clone()).collect(),
        );
        (title, schema)
    }

    /// Register a structure only if its title is not yet present — the
    /// existence check that breaks cycles.
    fn ensure_struct(&mut self, shape: &StructShape, direction: Direction) -> String {
        let title = canonical_title(&shape.name);
        if !self.registry.contains(&title) {
            self.register_struct(shape, direction);
        }
        title
    }

    fn struct_schema(&mut self, shape: &StructShape, direction: Direction, title: &str) -> Schema {
        let mut properties = BTreeMap::new();
        let mut required = Vec::new();
        for field in &shape.fields {
            let tags = FieldTags::parse(field.tag);
            let Some(binding) = tags.get(direction.name_key()) else {
                continue;
            };
            let name = if binding.name.is_empty() {
                field.ident.to_string()
            } else {
                binding.name.clone()
            };
            tracing::trace!(field = field.ident, property = %name, "walking field");
            let field_shape = (field.shape)();
            let property = self.property_schema(field_shape.deref(), direction, &tags);
            if tags.is_required() {
                required.push(name.clone());
            }
            properties.insert(name, property);
        }
        let mut schema = Schema::object();
        schema.title = Some(title.to_string());
        schema.properties = Some(properties);
        // `required` must be a non-empty array when present
        schema.required = (!required.is_empty()).then_some(required);
        schema
    }

    /// Schema for one participating field, with description/default
    /// overrides applied to inline schemas. Named shapes become references;
    /// a reference carries no overrides (a `$ref` cannot have siblings).
    fn property_schema(
        &mut self,
        shape: &Shape,
        direction: Direction,
        tags: &FieldTags,
    ) -> SchemaRef {
        match shape {
            Shape::Struct(nested) => {
                let title = self.ensure_struct(nested, direction);
                SchemaRef::Ref(Reference::schema(&title))
            }
            Shape::Enum(nested) => {
                let (title, _) = self.register_enum(nested);
                SchemaRef::Ref(Reference::schema(&title))
            }
            other => {
                let (_, mut schema) = self.schema_for_shape(other, direction);
                apply_overrides(&mut schema, tags);
                SchemaRef::Inline(Box::new(schema))
            }
        }
    }

    fn sequence_schema(&mut self, element: &Shape, direction: Direction) -> Schema {
        let items = match element {
            Shape::Struct(nested) => {
                let title = self.ensure_struct(nested, direction);
                SchemaRef::Ref(Reference::schema(&title))
            }
            Shape::Enum(nested) => {
                let (title, _) = self.register_enum(nested);
                SchemaRef::Ref(Reference::schema(&title))
            }
            other => SchemaRef::Inline(Box::new(self.schema_for_shape(other, direction).1)),
        };
        Schema::array(items)
    }

    /// Dictionary representation: object schema constrained through
    /// `additionalProperties`.
    fn mapping_schema(&mut self, value: &Shape, direction: Direction) -> Schema {
        let constraint = match value {
            Shape::Dynamic => AdditionalProperties::Any(true),
            Shape::Struct(nested) => {
                let title = self.ensure_struct(nested, direction);
                AdditionalProperties::Schema(Box::new(SchemaRef::Ref(Reference::schema(&title))))
            }
            Shape::Enum(nested) => {
                let (title, _) = self.register_enum(nested);
                AdditionalProperties::Schema(Box::new(SchemaRef::Ref(Reference::schema(&title))))
            }
            other => AdditionalProperties::Schema(Box::new(SchemaRef::Inline(Box::new(
                self.schema_for_shape(other, direction).1,
            )))),
        };
        let mut schema = Schema::new(SchemaType::Object);
        schema.additional_properties = Some(constraint);
        schema
    }
}

/// Overwrite description/default attributes from field annotations.
pub(crate) fn apply_overrides(schema: &mut Schema, tags: &FieldTags) {
    if let Some(description) = tags.get(tag::DESCRIPTION) {
        schema.description = Some(description.name.clone());
    }
    if let Some(default) = tags.get(tag::DEFAULT) {
        schema.default = Some(Value::String(default.name.clone()));
    }
}

fn formatted_string(format: &str) -> Schema {
    Schema {
        format: Some(format.to_string()),
        ..Schema::string()
    }
}

fn open_object() -> Schema {
    Schema {
        additional_properties: Some(AdditionalProperties::Any(true)),
        ..Schema::new(SchemaType::Object)
    }
}
