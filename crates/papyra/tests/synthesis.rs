//! End-to-end synthesis coverage: a small API surface walked into a full
//! document fragment, plus the behavioral properties the engine guarantees.

use papyra::enums::{EnumProvider, EnumShape, EnumValue};
use papyra::openapi::{Info, OpenApi};
use papyra::schema::{AdditionalProperties, SchemaRef, SchemaType};
use papyra::shape::Primitive;
use papyra::{
    Direction, FieldShape, HttpMethod, ResponseSpec, RouteSpec, Shape, StructShape, Synthesizer,
    rewrite_path,
};
use serde_json::json;

enum Status {}

impl EnumProvider for Status {
    fn enum_name() -> &'static str {
        "api::Status"
    }

    fn variants() -> Vec<(&'static str, EnumValue)> {
        vec![("A", EnumValue::Int(1)), ("B", EnumValue::Int(2))]
    }
}

fn user_shape() -> Shape {
    Shape::Struct(StructShape::new(
        "api::User",
        vec![
            FieldShape::new("id", r#"json:"id" form:"id" validate:"required""#, || {
                Shape::Primitive(Primitive::U64)
            }),
            FieldShape::new("name", r#"json:"name" form:"name""#, || {
                Shape::Primitive(Primitive::Str)
            }),
            FieldShape::new("status", r#"json:"status""#, || {
                Shape::Enum(EnumShape::of::<Status>())
            }),
            FieldShape::new("friends", r#"json:"friends""#, || {
                Shape::Sequence(Box::new(Shape::Optional(Box::new(user_shape()))))
            }),
            FieldShape::new("extra", r#"json:"extra""#, || {
                Shape::Mapping(Box::new(Shape::Dynamic))
            }),
        ],
    ))
}

#[test]
fn synthesis_is_idempotent() {
    let render = || {
        let mut synthesizer = Synthesizer::new();
        synthesizer.synthesize_component(&user_shape(), Direction::Response);
        serde_json::to_string(&synthesizer.into_components()).unwrap()
    };
    assert_eq!(render(), render());
}

#[test]
fn self_referential_structure_terminates_with_one_entry() {
    let mut synthesizer = Synthesizer::new();
    synthesizer.synthesize_component(&user_shape(), Direction::Response);

    let user = synthesizer.registry().get("User").expect("registered").clone();
    assert_eq!(synthesizer.registry().len(), 2, "User and Status only");

    let friends = &user.properties.as_ref().unwrap()["friends"];
    let SchemaRef::Inline(friends) = friends else {
        panic!("sequence property is anonymous, so it stays inline");
    };
    let items = friends.items.as_ref().expect("array items");
    let SchemaRef::Ref(reference) = items.as_ref() else {
        panic!("recursive element must be a reference, not an inline expansion");
    };
    assert_eq!(reference.ref_path, "#/components/schemas/User");
}

#[test]
fn mutually_referential_structures_terminate() {
    fn author() -> Shape {
        Shape::Struct(StructShape::new(
            "api::Author",
            vec![FieldShape::new("posts", r#"json:"posts""#, || {
                Shape::Sequence(Box::new(post()))
            })],
        ))
    }
    fn post() -> Shape {
        Shape::Struct(StructShape::new(
            "api::Post",
            vec![FieldShape::new("author", r#"json:"author""#, || {
                Shape::Optional(Box::new(author()))
            })],
        ))
    }

    let mut synthesizer = Synthesizer::new();
    synthesizer.synthesize_component(&author(), Direction::Response);

    assert!(synthesizer.registry().contains("Author"));
    assert!(synthesizer.registry().contains("Post"));
    assert_eq!(synthesizer.registry().len(), 2);
}

#[test]
fn primitive_fields_map_per_width_and_signedness() {
    let shape = Shape::Struct(StructShape::new(
        "api::Metrics",
        vec![
            FieldShape::new("count", r#"json:"count""#, || {
                Shape::Primitive(Primitive::U8)
            }),
            FieldShape::new("offset", r#"json:"offset""#, || {
                Shape::Primitive(Primitive::I64)
            }),
            FieldShape::new("ratio", r#"json:"ratio""#, || {
                Shape::Primitive(Primitive::F32)
            }),
        ],
    ));
    let mut synthesizer = Synthesizer::new();
    let (_, schema) = synthesizer.schema_for_shape(&shape, Direction::Response);
    let properties = schema.properties.as_ref().unwrap();

    let SchemaRef::Inline(count) = &properties["count"] else {
        panic!("inline")
    };
    assert_eq!(count.schema_type, Some(SchemaType::Integer));
    assert_eq!(count.minimum, Some(0.0));

    let SchemaRef::Inline(offset) = &properties["offset"] else {
        panic!("inline")
    };
    assert_eq!(offset.schema_type, Some(SchemaType::Integer));
    assert_eq!(offset.format.as_deref(), Some("int64"));
    assert_eq!(offset.minimum, None);

    let SchemaRef::Inline(ratio) = &properties["ratio"] else {
        panic!("inline")
    };
    assert_eq!(ratio.schema_type, Some(SchemaType::Number));
    assert_eq!(ratio.format.as_deref(), Some("float"));
}

#[test]
fn enum_schema_and_coercion_stay_in_lockstep() {
    let mut synthesizer = Synthesizer::new();
    synthesizer.synthesize_component(
        &Shape::Enum(EnumShape::of::<Status>()),
        Direction::Response,
    );

    let schema = synthesizer.registry().get("Status").expect("registered");
    let values = schema.r#enum.clone().expect("value list");
    assert_eq!(values.len(), 2);
    assert!(values.contains(&json!(1)));
    assert!(values.contains(&json!(2)));

    assert!(synthesizer.coercions().coerce("Status", &json!(1)).is_ok());
    assert!(synthesizer.coercions().coerce("Status", &json!(3)).is_err());
}

#[test]
fn required_field_listed_once_under_binding_name() {
    let mut synthesizer = Synthesizer::new();
    let (_, schema) = synthesizer.schema_for_shape(&user_shape(), Direction::Response);
    let required = schema.required.expect("required list");
    assert_eq!(
        required.iter().filter(|name| *name == "id").count(),
        1
    );
    assert_eq!(required, vec!["id".to_string()]);
}

#[test]
fn colon_segments_rewrite_to_templates() {
    assert_eq!(
        rewrite_path("/user/:id/post/:postId"),
        "/user/{id}/post/{postId}"
    );
}

#[test]
fn query_wins_over_header_and_emits_once() {
    let shape = Shape::Struct(StructShape::new(
        "api::Probe",
        vec![FieldShape::new("token", r#"query:"token" header:"X-Token""#, || {
            Shape::Primitive(Primitive::Str)
        })],
    ));
    let mut synthesizer = Synthesizer::new();
    let parameters = synthesizer.parameters_for_model(Some(&shape));

    assert_eq!(parameters.len(), 1);
    assert_eq!(parameters[0].name, "token");
    assert_eq!(
        parameters[0].r#in,
        papyra::route::ParameterLocation::Query
    );
}

#[test]
fn dynamic_valued_mapping_property_is_unconstrained() {
    let mut synthesizer = Synthesizer::new();
    let (_, schema) = synthesizer.schema_for_shape(&user_shape(), Direction::Response);
    let SchemaRef::Inline(extra) = &schema.properties.as_ref().unwrap()["extra"] else {
        panic!("mapping property is anonymous, so it stays inline");
    };
    assert_eq!(extra.schema_type, Some(SchemaType::Object));
    assert!(matches!(
        extra.additional_properties,
        Some(AdditionalProperties::Any(true))
    ));
}

#[test]
fn full_route_renders_a_coherent_document_fragment() {
    let login = Shape::Struct(StructShape::new(
        "api::LoginRequest",
        vec![
            FieldShape::new("username", r#"form:"username" validate:"required""#, || {
                Shape::Primitive(Primitive::Str)
            }),
            FieldShape::new("captcha", r#"query:"captcha""#, || {
                Shape::Primitive(Primitive::Str)
            }),
        ],
    ));

    let mut route = RouteSpec::new(HttpMethod::Post, "/login/:tenant");
    route.operation_id = Some("login".to_string());
    route.tags = vec!["auth".to_string()];
    route.model = Some(login);
    route
        .responses
        .push(ResponseSpec::new(200, "session", Some(user_shape())));
    route.responses.push(ResponseSpec::new(401, "denied", None));

    let mut synthesizer = Synthesizer::new();
    let mut document = OpenApi::new(Info::new("Demo", "1.0.0"));
    synthesizer.apply_route(&mut document, &route);
    document.components = Some(synthesizer.into_components());

    let rendered = serde_json::to_value(&document).unwrap();
    assert_eq!(rendered["paths"]["/login/{tenant}"]["post"]["operationId"], json!("login"));
    assert_eq!(
        rendered["paths"]["/login/{tenant}"]["post"]["requestBody"]["content"]
            ["application/json"]["schema"]["$ref"],
        json!("#/components/schemas/LoginRequest")
    );
    assert_eq!(
        rendered["paths"]["/login/{tenant}"]["post"]["responses"]["200"]["content"]
            ["application/json"]["schema"]["$ref"],
        json!("#/components/schemas/User")
    );
    assert!(rendered["components"]["schemas"]["LoginRequest"].is_object());
    assert!(rendered["components"]["schemas"]["User"].is_object());
    assert!(rendered["components"]["schemas"]["Status"]["x-enum-varnames"].is_array());
    assert_eq!(
        rendered["paths"]["/login/{tenant}"]["post"]["parameters"][0]["name"],
        json!("captcha")
    );
}
