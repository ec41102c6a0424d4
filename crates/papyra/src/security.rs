//! Security scheme registration and per-operation requirements.

use std::collections::HashMap;

use papyra_core::schema::{SecurityScheme, SecuritySchemeType};

use crate::synth::Synthesizer;

/// Capability of an authentication mechanism to describe itself as an
/// `OpenAPI` security scheme.
pub trait SecurityProvider {
    /// Stable name the scheme is registered and referenced under
    fn provider_name(&self) -> &str;
    /// Scheme definition for the components section
    fn scheme(&self) -> SecurityScheme;
}

/// Where an API key is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyLocation {
    Query,
    Header,
    Cookie,
}

impl ApiKeyLocation {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
        }
    }
}

/// API-key authentication carried in a query parameter, header or cookie.
#[derive(Debug, Clone)]
pub struct ApiKeyAuth {
    pub name: String,
    pub key: String,
    pub location: ApiKeyLocation,
    pub description: Option<String>,
}

impl ApiKeyAuth {
    #[must_use]
    pub fn new(name: impl Into<String>, key: impl Into<String>, location: ApiKeyLocation) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            location,
            description: None,
        }
    }
}

impl SecurityProvider for ApiKeyAuth {
    fn provider_name(&self) -> &str {
        &self.name
    }

    fn scheme(&self) -> SecurityScheme {
        SecurityScheme {
            r#type: SecuritySchemeType::ApiKey,
            description: self.description.clone(),
            name: Some(self.key.clone()),
            r#in: Some(self.location.as_str().to_string()),
            scheme: None,
            bearer_format: None,
        }
    }
}

/// HTTP bearer-token authentication.
#[derive(Debug, Clone, Default)]
pub struct BearerAuth {
    pub bearer_format: Option<String>,
    pub description: Option<String>,
}

impl SecurityProvider for BearerAuth {
    fn provider_name(&self) -> &str {
        "bearerAuth"
    }

    fn scheme(&self) -> SecurityScheme {
        SecurityScheme {
            r#type: SecuritySchemeType::Http,
            description: self.description.clone(),
            name: None,
            r#in: None,
            scheme: Some("bearer".to_string()),
            bearer_format: self.bearer_format.clone(),
        }
    }
}

impl Synthesizer {
    /// Register every provider's scheme and return the operation-level
    /// requirement list referencing them by name.
    pub fn security_requirements(
        &mut self,
        providers: &[Box<dyn SecurityProvider>],
    ) -> Vec<HashMap<String, Vec<String>>> {
        providers
            .iter()
            .map(|provider| {
                let name = provider.provider_name().to_string();
                tracing::debug!(scheme = %name, "registering security scheme");
                self.security_schemes.insert(name.clone(), provider.scheme());
                HashMap::from([(name, Vec::new())])
            })
            .collect()
    }
}
