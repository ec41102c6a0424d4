//! Route assembly: template rewriting and per-operation document fragments.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use papyra_core::openapi::OpenApi;
use papyra_core::route::{Header, HttpMethod, MediaType, Operation, RequestBody, Response};
use papyra_core::schema::{Reference, SchemaRef};
use regex::Regex;

use crate::naming::canonical_title;
use crate::security::SecurityProvider;
use crate::shape::Shape;
use crate::synth::{Direction, Synthesizer};

/// Content type used when neither the route nor the session overrides it.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

static PATH_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/:([0-9a-zA-Z]+)").expect("path parameter pattern"));

/// Rewrite colon-prefixed router path segments into template form:
/// `/user/:id/post/:postId` becomes `/user/{id}/post/{postId}`.
#[must_use]
pub fn rewrite_path(path: &str) -> String {
    PATH_PARAM.replace_all(path, "/{$1}").into_owned()
}

/// One declared response of a route.
pub struct ResponseSpec {
    pub status: u16,
    pub description: String,
    /// `None` means the response carries no body
    pub model: Option<Shape>,
    pub headers: Option<HashMap<String, Header>>,
}

impl ResponseSpec {
    #[must_use]
    pub fn new(status: u16, description: impl Into<String>, model: Option<Shape>) -> Self {
        Self {
            status,
            description: description.into(),
            model,
            headers: None,
        }
    }
}

/// Declarative description of one route, from which an [`Operation`] and its
/// referenced components are synthesized.
pub struct RouteSpec {
    pub method: HttpMethod,
    pub path: String,
    pub operation_id: Option<String>,
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
    /// Request model: parameters always, request body on body-bearing methods
    pub model: Option<Shape>,
    pub responses: Vec<ResponseSpec>,
    pub request_content_type: Option<String>,
    pub response_content_type: Option<String>,
    pub securities: Vec<Box<dyn SecurityProvider>>,
}

impl RouteSpec {
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            operation_id: None,
            tags: Vec::new(),
            summary: None,
            description: None,
            deprecated: false,
            model: None,
            responses: Vec::new(),
            request_content_type: None,
            response_content_type: None,
            securities: Vec::new(),
        }
    }
}

impl Synthesizer {
    /// Request body referencing a registered component by its declared type
    /// name. The component itself must be registered separately.
    #[must_use]
    pub fn request_body_ref(&self, type_name: &str, content_type: Option<&str>) -> RequestBody {
        let title = canonical_title(type_name);
        let mut content = BTreeMap::new();
        content.insert(
            self.resolve_content_type(content_type),
            MediaType::with_schema(SchemaRef::Ref(Reference::schema(&title))),
        );
        RequestBody {
            description: None,
            required: Some(true),
            content,
        }
    }

    /// Response table keyed by status code. Bodiless responses carry no
    /// content section; structure models are referenced, anonymous shapes
    /// inlined.
    pub fn responses_ref(
        &mut self,
        responses: &[ResponseSpec],
        content_type: Option<&str>,
    ) -> BTreeMap<String, Response> {
        let mut table = BTreeMap::new();
        for spec in responses {
            let content = spec.model.as_ref().map(|model| {
                let (reference, schema) = self.schema_for_shape(model.deref(), Direction::Response);
                let schema = match reference {
                    Some(pointer) => SchemaRef::Ref(Reference::new(pointer)),
                    None => SchemaRef::Inline(Box::new(schema)),
                };
                BTreeMap::from([(
                    self.resolve_content_type(content_type),
                    MediaType::with_schema(schema),
                )])
            });
            table.insert(
                spec.status.to_string(),
                Response {
                    description: spec.description.clone(),
                    headers: spec.headers.clone(),
                    content,
                },
            );
        }
        table
    }

    /// Synthesize one route into an operation, registering every component
    /// it references along the way.
    pub fn operation(&mut self, route: &RouteSpec) -> Operation {
        tracing::debug!(method = %route.method, path = %route.path, "synthesizing operation");
        if let Some(model) = &route.model {
            self.synthesize_component(model, Direction::Request);
        }
        let parameters = self.parameters_for_model(route.model.as_ref());
        let request_body = route
            .method
            .has_request_body()
            .then(|| {
                route.model.as_ref().and_then(|model| match model.deref() {
                    Shape::Struct(shape) => Some(
                        self.request_body_ref(&shape.name, route.request_content_type.as_deref()),
                    ),
                    _ => None,
                })
            })
            .flatten();
        let responses = self.responses_ref(&route.responses, route.response_content_type.as_deref());
        let security = self.security_requirements(&route.securities);

        Operation {
            operation_id: route.operation_id.clone(),
            tags: (!route.tags.is_empty()).then(|| route.tags.clone()),
            summary: route.summary.clone(),
            description: route.description.clone(),
            deprecated: route.deprecated.then_some(true),
            parameters: (!parameters.is_empty()).then_some(parameters),
            request_body,
            responses,
            security: (!security.is_empty()).then_some(security),
        }
    }

    /// Synthesize a route and mount it on the document under its rewritten
    /// path template.
    pub fn apply_route(&mut self, document: &mut OpenApi, route: &RouteSpec) {
        let operation = self.operation(route);
        let path = rewrite_path(&route.path);
        document
            .paths
            .entry(path)
            .or_default()
            .set_operation(route.method, operation);
    }

    fn resolve_content_type(&self, content_type: Option<&str>) -> String {
        content_type
            .or(self.default_content_type.as_deref())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{FieldShape, Primitive, StructShape};
    use rstest::rstest;

    #[rstest]
    #[case("/user/:id/post/:postId", "/user/{id}/post/{postId}")]
    #[case("/user/:id", "/user/{id}")]
    #[case("/health", "/health")]
    #[case("/:a/:b/:c", "/{a}/{b}/{c}")]
    #[case("/", "/")]
    fn rewrites_colon_segments(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(rewrite_path(input), expected);
    }

    fn login_shape() -> Shape {
        Shape::Struct(StructShape::new(
            "demo::Login",
            vec![
                FieldShape::new("username", r#"form:"username" validate:"required""#, || {
                    Shape::Primitive(Primitive::Str)
                }),
                FieldShape::new("password", r#"form:"password" validate:"required""#, || {
                    Shape::Primitive(Primitive::Str)
                }),
            ],
        ))
    }

    fn session_shape() -> Shape {
        Shape::Struct(StructShape::new(
            "demo::Session",
            vec![FieldShape::new("token", r#"json:"token""#, || {
                Shape::Primitive(Primitive::Str)
            })],
        ))
    }

    #[test]
    fn request_body_references_component_by_canonical_title() {
        let synthesizer = Synthesizer::new();
        let body = synthesizer.request_body_ref("demo::Login", None);

        assert_eq!(body.required, Some(true));
        let media = &body.content[DEFAULT_CONTENT_TYPE];
        let Some(SchemaRef::Ref(reference)) = &media.schema else {
            panic!("request body must reference the component");
        };
        assert_eq!(reference.ref_path, "#/components/schemas/Login");
    }

    #[test]
    fn explicit_content_type_overrides_default() {
        let synthesizer = Synthesizer::new();
        let body = synthesizer.request_body_ref("Login", Some("multipart/form-data"));
        assert!(body.content.contains_key("multipart/form-data"));
        assert!(!body.content.contains_key(DEFAULT_CONTENT_TYPE));
    }

    #[test]
    fn session_default_content_type_applies_when_route_gives_none() {
        let synthesizer = Synthesizer::new().with_default_content_type("application/xml");
        let body = synthesizer.request_body_ref("Login", None);
        assert!(body.content.contains_key("application/xml"));
    }

    #[test]
    fn bodiless_response_has_no_content_section() {
        let mut synthesizer = Synthesizer::new();
        let responses = synthesizer.responses_ref(
            &[ResponseSpec::new(204, "deleted", None)],
            None,
        );
        assert!(responses["204"].content.is_none());
        assert_eq!(responses["204"].description, "deleted");
    }

    #[test]
    fn structure_response_is_referenced_and_registered() {
        let mut synthesizer = Synthesizer::new();
        let responses = synthesizer.responses_ref(
            &[ResponseSpec::new(200, "ok", Some(session_shape()))],
            None,
        );
        let content = responses["200"].content.as_ref().expect("content");
        let Some(SchemaRef::Ref(reference)) = &content[DEFAULT_CONTENT_TYPE].schema else {
            panic!("structure response must be referenced");
        };
        assert_eq!(reference.ref_path, "#/components/schemas/Session");
        assert!(synthesizer.registry().contains("Session"));
    }

    #[test]
    fn anonymous_response_shape_is_inlined() {
        let mut synthesizer = Synthesizer::new();
        let responses = synthesizer.responses_ref(
            &[ResponseSpec::new(
                200,
                "ok",
                Some(Shape::Primitive(Primitive::Str)),
            )],
            None,
        );
        let content = responses["200"].content.as_ref().expect("content");
        assert!(matches!(
            content[DEFAULT_CONTENT_TYPE].schema,
            Some(SchemaRef::Inline(_))
        ));
    }

    #[test]
    fn post_route_gets_request_body_get_route_does_not() {
        let mut post = RouteSpec::new(HttpMethod::Post, "/login");
        post.model = Some(login_shape());
        post.responses
            .push(ResponseSpec::new(200, "ok", Some(session_shape())));

        let mut synthesizer = Synthesizer::new();
        let operation = synthesizer.operation(&post);
        assert!(operation.request_body.is_some());

        let mut get = RouteSpec::new(HttpMethod::Get, "/session");
        get.model = Some(login_shape());
        let operation = synthesizer.operation(&get);
        assert!(operation.request_body.is_none());
    }

    #[test]
    fn operation_registers_request_and_response_components() {
        let mut route = RouteSpec::new(HttpMethod::Post, "/login");
        route.model = Some(login_shape());
        route
            .responses
            .push(ResponseSpec::new(200, "ok", Some(session_shape())));

        let mut synthesizer = Synthesizer::new();
        let _ = synthesizer.operation(&route);
        assert!(synthesizer.registry().contains("Login"));
        assert!(synthesizer.registry().contains("Session"));
    }

    #[test]
    fn apply_route_mounts_on_rewritten_template() {
        let mut route = RouteSpec::new(HttpMethod::Get, "/user/:id");
        route.responses.push(ResponseSpec::new(200, "ok", None));

        let mut synthesizer = Synthesizer::new();
        let mut document = OpenApi::new(papyra_core::openapi::Info::new("Demo", "0.1.0"));
        synthesizer.apply_route(&mut document, &route);

        let item = &document.paths["/user/{id}"];
        assert!(item.get.is_some());
    }
}
