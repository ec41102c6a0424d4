//! Parameter extraction: non-body operation inputs from a model's fields.
//!
//! Each field contributes at most one parameter; when several location
//! annotations are present the highest-priority one wins, in the fixed
//! order query, path, header, cookie.

use papyra_core::route::{Parameter, ParameterLocation};
use papyra_core::schema::{Reference, SchemaRef};

use crate::shape::{Shape, StructShape};
use crate::synth::{self, Direction, Synthesizer};
use crate::tag::{self, FieldTags};

const LOCATIONS: [(&str, ParameterLocation); 4] = [
    (tag::QUERY, ParameterLocation::Query),
    (tag::PATH, ParameterLocation::Path),
    (tag::HEADER, ParameterLocation::Header),
    (tag::COOKIE, ParameterLocation::Cookie),
];

impl Synthesizer {
    /// Extract the parameter list of a request model, in field declaration
    /// order. `None` means the route takes no parameters.
    pub fn parameters_for_model(&mut self, model: Option<&Shape>) -> Vec<Parameter> {
        let Some(model) = model else {
            return Vec::new();
        };
        match model.deref() {
            Shape::Struct(shape) => self.struct_parameters(shape),
            _ => Vec::new(),
        }
    }

    fn struct_parameters(&mut self, shape: &StructShape) -> Vec<Parameter> {
        let mut parameters = Vec::new();
        for field in &shape.fields {
            let tags = FieldTags::parse(field.tag);
            let Some((binding, location)) = LOCATIONS
                .iter()
                .find_map(|(key, location)| tags.get(key).map(|tag| (tag, *location)))
            else {
                continue;
            };
            let name = if binding.name.is_empty() {
                field.ident.to_string()
            } else {
                binding.name.clone()
            };
            let field_shape = (field.shape)();
            let (reference, mut schema) =
                self.schema_for_shape(field_shape.deref(), Direction::Request);
            let schema = match reference {
                Some(pointer) => SchemaRef::Ref(Reference { ref_path: pointer }),
                None => {
                    synth::apply_overrides(&mut schema, &tags);
                    SchemaRef::Inline(Box::new(schema))
                }
            };
            parameters.push(Parameter {
                name,
                r#in: location,
                description: tags.get(tag::DESCRIPTION).map(|tag| tag.name.clone()),
                required: tags.is_required().then_some(true),
                schema: Some(schema),
            });
        }
        parameters
    }
}
