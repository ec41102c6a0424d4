//! Closed description of the type shapes the synthesis engine understands.
//!
//! Instead of inspecting live values with runtime reflection, model types
//! describe themselves through [`ApiModel::shape`]. The variant set is
//! closed, so a field type the engine cannot represent is a compile error
//! rather than a synthesis-time failure.

use crate::enums::EnumShape;
use papyra_core::schema::Schema;

/// Canonical primitive kinds and their schema mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Bool,
    Str,
}

impl Primitive {
    /// Map the primitive to its schema: integer/number/string/boolean with
    /// bit-width format, unsigned kinds carrying an explicit lower bound of 0.
    #[must_use]
    pub fn schema(self) -> Schema {
        match self {
            Self::I8 | Self::I16 | Self::Isize => Schema::integer(),
            Self::U8 | Self::U16 | Self::Usize => Schema {
                minimum: Some(0.0),
                ..Schema::integer()
            },
            Self::I32 => Schema {
                format: Some("int32".to_string()),
                ..Schema::integer()
            },
            Self::U32 => Schema {
                format: Some("int32".to_string()),
                minimum: Some(0.0),
                ..Schema::integer()
            },
            Self::I64 => Schema {
                format: Some("int64".to_string()),
                ..Schema::integer()
            },
            Self::U64 => Schema {
                format: Some("int64".to_string()),
                minimum: Some(0.0),
                ..Schema::integer()
            },
            Self::F32 => Schema {
                format: Some("float".to_string()),
                ..Schema::number()
            },
            Self::F64 => Schema {
                format: Some("double".to_string()),
                ..Schema::number()
            },
            Self::Bool => Schema::boolean(),
            Self::Str => Schema::string(),
        }
    }
}

/// One field of a structure shape.
///
/// The shape is carried as a thunk so self-referential and mutually
/// referential model types can be described with finite values; the walker
/// expands one level per call and the component registry's existence check
/// bounds the descent.
#[derive(Debug, Clone, Copy)]
pub struct FieldShape {
    /// Rust field identifier, used as the fallback binding name
    pub ident: &'static str,
    /// Raw annotation text, e.g. `json:"id" query:"id" validate:"required"`
    pub tag: &'static str,
    /// Field shape, expanded on demand
    pub shape: fn() -> Shape,
}

impl FieldShape {
    #[must_use]
    pub const fn new(ident: &'static str, tag: &'static str, shape: fn() -> Shape) -> Self {
        Self { ident, tag, shape }
    }
}

/// A structure shape: declared name plus field list.
///
/// The name may be path-qualified and generic (`std::any::type_name` output
/// works); the reference namer reduces it to a canonical title.
#[derive(Debug, Clone)]
pub struct StructShape {
    pub name: String,
    pub fields: Vec<FieldShape>,
}

impl StructShape {
    #[must_use]
    pub fn new(name: impl Into<String>, fields: Vec<FieldShape>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

/// The closed set of supported type shapes.
#[derive(Debug, Clone)]
pub enum Shape {
    /// Primitive kind (integer/number/string/boolean)
    Primitive(Primitive),
    /// Byte sequence, rendered as string with `byte` format
    Bytes,
    /// Raw file upload, rendered as string with `binary` format
    Upload,
    /// Time-like marker: string with `date-time` format, never walked as a
    /// structure
    DateTime,
    /// Enumerable capability (named component plus coercion rule)
    Enum(EnumShape),
    /// Pointer/optional wrapper; dereferenced transparently
    Optional(Box<Shape>),
    /// Homogeneous sequence
    Sequence(Box<Shape>),
    /// String-keyed mapping
    Mapping(Box<Shape>),
    /// Structure with annotated fields
    Struct(StructShape),
    /// Open/dynamic value
    Dynamic,
}

impl Shape {
    /// Strip optional wrappers. The shape is a description, not a value, so
    /// dereferencing can never fail on "nil".
    #[must_use]
    pub fn deref(&self) -> &Self {
        let mut shape = self;
        while let Self::Optional(inner) = shape {
            shape = inner;
        }
        shape
    }

    /// Shape of a model type
    #[must_use]
    pub fn of<M: ApiModel>() -> Self {
        M::shape()
    }
}

impl From<StructShape> for Shape {
    fn from(value: StructShape) -> Self {
        Self::Struct(value)
    }
}

impl From<EnumShape> for Shape {
    fn from(value: EnumShape) -> Self {
        Self::Enum(value)
    }
}

/// Capability of model types to describe their own shape.
pub trait ApiModel {
    fn shape() -> Shape;
}

macro_rules! primitive_model {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(impl ApiModel for $ty {
            fn shape() -> Shape {
                Shape::Primitive(Primitive::$kind)
            }
        })*
    };
}

primitive_model! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    bool => Bool,
    String => Str,
}

impl<T: ApiModel> ApiModel for Option<T> {
    fn shape() -> Shape {
        Shape::Optional(Box::new(T::shape()))
    }
}

impl<T: ApiModel> ApiModel for Box<T> {
    fn shape() -> Shape {
        T::shape()
    }
}

impl<T: ApiModel> ApiModel for Vec<T> {
    fn shape() -> Shape {
        Shape::Sequence(Box::new(T::shape()))
    }
}

impl<V: ApiModel> ApiModel for std::collections::HashMap<String, V> {
    fn shape() -> Shape {
        Shape::Mapping(Box::new(V::shape()))
    }
}

impl<V: ApiModel> ApiModel for std::collections::BTreeMap<String, V> {
    fn shape() -> Shape {
        Shape::Mapping(Box::new(V::shape()))
    }
}

impl ApiModel for serde_json::Value {
    fn shape() -> Shape {
        Shape::Dynamic
    }
}

impl<Tz: chrono::TimeZone> ApiModel for chrono::DateTime<Tz> {
    fn shape() -> Shape {
        Shape::DateTime
    }
}

impl ApiModel for chrono::NaiveDateTime {
    fn shape() -> Shape {
        Shape::DateTime
    }
}

/// Marker for a raw byte payload field.
#[derive(Debug, Clone, Copy)]
pub struct Bytes;

impl ApiModel for Bytes {
    fn shape() -> Shape {
        Shape::Bytes
    }
}

/// Marker for a multipart file-upload field.
#[derive(Debug, Clone, Copy)]
pub struct Upload;

impl ApiModel for Upload {
    fn shape() -> Shape {
        Shape::Upload
    }
}
