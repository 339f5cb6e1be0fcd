//! Cell values and the type-erased accessor output

use std::any::Any;

use crate::descriptor::{NumericKind, ShapeRef, ValueKind};
use crate::record::Record;

/// A typed scalar cell value
///
/// Width is preserved: an `i16` property stays `I16` so equality and
/// printing keep the declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Boolean value
    Bool(bool),
    /// 8-bit signed integer
    I8(i8),
    /// 16-bit signed integer
    I16(i16),
    /// 32-bit signed integer
    I32(i32),
    /// 64-bit signed integer
    I64(i64),
    /// 32-bit IEEE float
    F32(f32),
    /// 64-bit IEEE float
    F64(f64),
    /// UTF-8 text
    Text(String),
}

impl Scalar {
    /// Numeric subkind, if this scalar is numeric
    pub fn numeric_kind(&self) -> Option<NumericKind> {
        match self {
            Scalar::I8(_) => Some(NumericKind::Int8),
            Scalar::I16(_) => Some(NumericKind::Int16),
            Scalar::I32(_) => Some(NumericKind::Int32),
            Scalar::I64(_) => Some(NumericKind::Int64),
            Scalar::F32(_) => Some(NumericKind::Float32),
            Scalar::F64(_) => Some(NumericKind::Float64),
            Scalar::Bool(_) | Scalar::Text(_) => None,
        }
    }

    /// Wire label of this scalar's kind, for schema and error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "boolean",
            Scalar::Text(_) => "text",
            Scalar::I8(_) => "int8",
            Scalar::I16(_) => "int16",
            Scalar::I32(_) => "int32",
            Scalar::I64(_) => "int64",
            Scalar::F32(_) => "float32",
            Scalar::F64(_) => "float64",
        }
    }

    /// Whether this scalar can occupy a column of the given kind
    pub fn fits(&self, kind: ValueKind) -> bool {
        match (self, kind) {
            (Scalar::Bool(_), ValueKind::Boolean) => true,
            (Scalar::Text(_), ValueKind::Text) => true,
            (s, ValueKind::Primitive(n)) | (s, ValueKind::BoxedNumeric(n)) => {
                s.numeric_kind() == Some(n)
            }
            _ => false,
        }
    }
}

/// An owned record instance erased for transport across the accessor boundary
pub struct NestedRecord {
    shape_ref: ShapeRef,
    instance: Box<dyn Any + Send + Sync>,
}

impl NestedRecord {
    /// Erase an owned record value
    pub fn new<T: Record>(value: T) -> Self {
        NestedRecord {
            shape_ref: ShapeRef::of::<T>(),
            instance: Box::new(value),
        }
    }

    /// Reference to the record type this instance was erased from
    pub fn shape_ref(&self) -> ShapeRef {
        self.shape_ref
    }

    /// The erased instance
    pub fn instance(&self) -> &dyn Any {
        self.instance.as_ref()
    }
}

impl std::fmt::Debug for NestedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NestedRecord")
            .field("type_name", &self.shape_ref.type_name())
            .finish()
    }
}

/// Value produced by a property accessor for one row
#[derive(Debug)]
pub enum RawValue {
    /// Absent value
    Null,
    /// Scalar cell
    Scalar(Scalar),
    /// Nested record instance
    Record(NestedRecord),
    /// Collection of nested record instances
    Collection(Vec<NestedRecord>),
}

impl RawValue {
    /// Erase an owned record value
    pub fn record<T: Record>(value: T) -> Self {
        RawValue::Record(NestedRecord::new(value))
    }

    /// Erase an optional record value, mapping `None` to `Null`
    pub fn nullable_record<T: Record>(value: Option<T>) -> Self {
        match value {
            Some(v) => RawValue::record(v),
            None => RawValue::Null,
        }
    }

    /// Erase an owned sequence of record values
    pub fn collection<T, I>(items: I) -> Self
    where
        T: Record,
        I: IntoIterator<Item = T>,
    {
        RawValue::Collection(items.into_iter().map(NestedRecord::new).collect())
    }

    /// Label of this value's shape, for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Scalar(s) => s.kind_name(),
            RawValue::Record(_) => "record",
            RawValue::Collection(_) => "collection",
        }
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        RawValue::Scalar(Scalar::Bool(v))
    }
}

impl From<i8> for RawValue {
    fn from(v: i8) -> Self {
        RawValue::Scalar(Scalar::I8(v))
    }
}

impl From<i16> for RawValue {
    fn from(v: i16) -> Self {
        RawValue::Scalar(Scalar::I16(v))
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        RawValue::Scalar(Scalar::I32(v))
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Scalar(Scalar::I64(v))
    }
}

impl From<f32> for RawValue {
    fn from(v: f32) -> Self {
        RawValue::Scalar(Scalar::F32(v))
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Scalar(Scalar::F64(v))
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Scalar(Scalar::Text(v))
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Scalar(Scalar::Text(v.to_string()))
    }
}

impl<T> From<Option<T>> for RawValue
where
    T: Into<RawValue>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => RawValue::Null,
        }
    }
}
