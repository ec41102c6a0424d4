//! Enumerable capability: schema derivation and runtime coercion rules.
//!
//! A type opts in by implementing [`EnumProvider`], exposing its declared
//! name and an ordered name→value list. Derivation produces a named,
//! reusable schema (with an `x-enum-varnames` sidecar) and registers the
//! value set as a coercion rule in the same call, so the documented value
//! list and the runtime acceptance rule can never diverge.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use crate::shape::Primitive;
use papyra_core::schema::Schema;

/// Capability of a type to expose its own set of named constant values.
pub trait EnumProvider {
    /// Declared type name; may be path-qualified
    fn enum_name() -> &'static str;
    /// Ordered variant name → value pairs
    fn variants() -> Vec<(&'static str, EnumValue)>;
}

/// Underlying value of one enum variant.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumValue {
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(&'static str),
    Bool(bool),
}

impl EnumValue {
    /// Base primitive kind of the underlying representation.
    #[must_use]
    pub const fn primitive(&self) -> Primitive {
        match self {
            Self::Int(_) => Primitive::I64,
            Self::Uint(_) => Primitive::U64,
            Self::Float(_) => Primitive::F64,
            Self::Str(_) => Primitive::Str,
            Self::Bool(_) => Primitive::Bool,
        }
    }

    /// JSON rendering used in the schema's value list.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Int(v) => Value::from(*v),
            Self::Uint(v) => Value::from(*v),
            Self::Float(v) => Value::from(*v),
            Self::Str(v) => Value::from(*v),
            Self::Bool(v) => Value::from(*v),
        }
    }

    /// Whether a raw incoming value matches this declared value.
    #[must_use]
    pub fn matches(&self, raw: &Value) -> bool {
        match self {
            Self::Int(v) => raw.as_i64() == Some(*v),
            Self::Uint(v) => raw.as_u64() == Some(*v),
            Self::Float(v) => raw.as_f64() == Some(*v),
            Self::Str(v) => raw.as_str() == Some(v),
            Self::Bool(v) => raw.as_bool() == Some(*v),
        }
    }
}

/// Shape-level view of an enumerable type.
#[derive(Debug, Clone)]
pub struct EnumShape {
    pub name: String,
    pub variants: Vec<(&'static str, EnumValue)>,
}

impl EnumShape {
    /// Capture the shape of an [`EnumProvider`] implementation.
    #[must_use]
    pub fn of<E: EnumProvider>() -> Self {
        Self {
            name: E::enum_name().to_string(),
            variants: E::variants(),
        }
    }
}

/// Build the named enum schema: base primitive kind from a representative
/// value, ordered value list, variant-name sidecar.
///
/// # Panics
/// An enum declaring no variants is a fatal configuration error.
#[must_use]
pub(crate) fn derive_schema(shape: &EnumShape, title: &str) -> Schema {
    let Some((_, representative)) = shape.variants.first() else {
        panic!("enum '{}' declares no variants", shape.name);
    };
    let mut schema = representative.primitive().schema();
    schema.title = Some(title.to_string());
    schema.r#enum = Some(shape.variants.iter().map(|(_, v)| v.to_json()).collect());
    schema.enum_varnames = Some(
        shape
            .variants
            .iter()
            .map(|(name, _)| (*name).to_string())
            .collect(),
    );
    schema
}

/// Rejection of an inbound value by the enum acceptance rule.
///
/// Reported to the external binding layer as a request-validation failure;
/// synthesis itself never produces this.
#[derive(Debug, Error)]
pub enum CoercionError {
    #[error("no enum registered under title '{0}'")]
    UnknownEnum(String),
    #[error("enum '{title}' does not accept value {value}")]
    InvalidValue { title: String, value: Value },
}

/// Runtime acceptance rules for registered enums, keyed by canonical title.
///
/// Owned by the build session and handed to the binding layer; a raw
/// incoming value matching one of the declared underlying values is
/// converted to the typed representation, anything else is rejected.
#[derive(Debug, Default)]
pub struct CoercionRegistry {
    rules: HashMap<String, Vec<EnumValue>>,
}

impl CoercionRegistry {
    pub(crate) fn register(&mut self, title: &str, values: Vec<EnumValue>) {
        self.rules.insert(title.to_string(), values);
    }

    /// Whether a coercion rule exists for the title.
    #[must_use]
    pub fn contains(&self, title: &str) -> bool {
        self.rules.contains_key(title)
    }

    /// Convert a raw inbound value to the typed enum value.
    pub fn coerce(&self, title: &str, raw: &Value) -> Result<EnumValue, CoercionError> {
        let values = self
            .rules
            .get(title)
            .ok_or_else(|| CoercionError::UnknownEnum(title.to_string()))?;
        values
            .iter()
            .find(|v| v.matches(raw))
            .cloned()
            .ok_or_else(|| CoercionError::InvalidValue {
                title: title.to_string(),
                value: raw.clone(),
            })
    }
}
