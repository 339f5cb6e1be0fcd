//! Column type descriptors

use std::any::TypeId;

use crate::record::{Record, Shape};

/// Numeric width and representation of a scalar column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    /// 8-bit signed integer
    Int8,
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 32-bit IEEE float
    Float32,
    /// 64-bit IEEE float
    Float64,
}

impl NumericKind {
    /// Wire label used in schema metadata
    pub fn name(&self) -> &'static str {
        match self {
            NumericKind::Int8 => "int8",
            NumericKind::Int16 => "int16",
            NumericKind::Int32 => "int32",
            NumericKind::Int64 => "int64",
            NumericKind::Float32 => "float32",
            NumericKind::Float64 => "float64",
        }
    }
}

/// Reference to a statically known nested record type
///
/// Carries enough to rebuild the nested [`Shape`] without an instance, which
/// is what keeps schemas complete for empty and all-null nested columns.
/// Equality and hashing compare the `TypeId` only.
#[derive(Clone, Copy)]
pub struct ShapeRef {
    type_id: TypeId,
    type_name: &'static str,
    build: fn() -> Shape,
}

impl ShapeRef {
    /// Capture a reference to the record type `T`
    pub fn of<T: Record>() -> Self {
        ShapeRef {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            build: T::shape,
        }
    }

    /// `TypeId` of the referenced record type
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Rust type name of the referenced record type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Build the shape of the referenced record type
    pub fn shape(&self) -> Shape {
        (self.build)()
    }
}

impl PartialEq for ShapeRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ShapeRef {}

impl std::hash::Hash for ShapeRef {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl std::fmt::Debug for ShapeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeRef")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Classification of a column's value representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Unboxed machine numeric, never nullable
    Primitive(NumericKind),
    /// Boxed numeric, may hold nulls
    BoxedNumeric(NumericKind),
    /// UTF-8 text
    Text,
    /// Boolean
    Boolean,
    /// Nested record, rendered as a row-aligned nested frame
    Record(ShapeRef),
    /// Collection of records, rendered as one nested frame per row
    Collection(ShapeRef),
}

impl ValueKind {
    /// Wire label used in schema metadata
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Primitive(n) | ValueKind::BoxedNumeric(n) => n.name(),
            ValueKind::Text => "text",
            ValueKind::Boolean => "boolean",
            ValueKind::Record(_) => "frame",
            ValueKind::Collection(_) => "group",
        }
    }

    /// Whether this kind can represent a null cell
    pub fn permits_null(&self) -> bool {
        !matches!(self, ValueKind::Primitive(_))
    }
}

/// Declared type of a column: a kind plus nullability
///
/// The invariant that `Primitive` is never nullable is structural: the
/// constructors and [`TypeDescriptor::with_nullable`] promote a nullable
/// primitive to [`ValueKind::BoxedNumeric`] instead of recording the
/// contradiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    kind: ValueKind,
    nullable: bool,
}

impl TypeDescriptor {
    /// Non-nullable unboxed numeric descriptor
    pub fn primitive(kind: NumericKind) -> Self {
        TypeDescriptor {
            kind: ValueKind::Primitive(kind),
            nullable: false,
        }
    }

    /// Boxed numeric descriptor
    pub fn boxed(kind: NumericKind, nullable: bool) -> Self {
        TypeDescriptor {
            kind: ValueKind::BoxedNumeric(kind),
            nullable,
        }
    }

    /// Text descriptor
    pub fn text(nullable: bool) -> Self {
        TypeDescriptor {
            kind: ValueKind::Text,
            nullable,
        }
    }

    /// Boolean descriptor
    pub fn boolean(nullable: bool) -> Self {
        TypeDescriptor {
            kind: ValueKind::Boolean,
            nullable,
        }
    }

    /// Nested record descriptor for record type `T`
    pub fn record<T: Record>(nullable: bool) -> Self {
        TypeDescriptor {
            kind: ValueKind::Record(ShapeRef::of::<T>()),
            nullable,
        }
    }

    /// Collection descriptor with element record type `T`
    pub fn collection<T: Record>(nullable: bool) -> Self {
        TypeDescriptor {
            kind: ValueKind::Collection(ShapeRef::of::<T>()),
            nullable,
        }
    }

    /// The value kind
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Whether the column may hold nulls
    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// Copy of this descriptor with the given nullability
    ///
    /// Requesting nullability on a `Primitive` widens it to `BoxedNumeric`.
    pub fn with_nullable(&self, nullable: bool) -> Self {
        let kind = match (self.kind, nullable) {
            (ValueKind::Primitive(n), true) => ValueKind::BoxedNumeric(n),
            (kind, _) => kind,
        };
        TypeDescriptor { kind, nullable }
    }

    /// Widen two descriptors of the same column into one, if compatible
    ///
    /// Same kinds merge by OR-ing nullability. A `Primitive` merges with a
    /// `BoxedNumeric` of the same numeric subkind into the boxed form.
    /// Everything else is incompatible.
    pub fn merge(&self, other: &TypeDescriptor) -> Option<TypeDescriptor> {
        let nullable = self.nullable || other.nullable;
        let kind = match (self.kind, other.kind) {
            (ValueKind::Primitive(a), ValueKind::Primitive(b)) if a == b => {
                ValueKind::Primitive(a)
            }
            (ValueKind::Primitive(a), ValueKind::BoxedNumeric(b))
            | (ValueKind::BoxedNumeric(a), ValueKind::Primitive(b))
            | (ValueKind::BoxedNumeric(a), ValueKind::BoxedNumeric(b))
                if a == b =>
            {
                ValueKind::BoxedNumeric(a)
            }
            (ValueKind::Text, ValueKind::Text) => ValueKind::Text,
            (ValueKind::Boolean, ValueKind::Boolean) => ValueKind::Boolean,
            (ValueKind::Record(a), ValueKind::Record(b)) if a == b => ValueKind::Record(a),
            (ValueKind::Collection(a), ValueKind::Collection(b)) if a == b => {
                ValueKind::Collection(a)
            }
            _ => return None,
        };
        Some(TypeDescriptor { kind, nullable }.with_nullable(nullable))
    }
}
