//! Record introspection contract

use std::any::{Any, TypeId};
use std::marker::PhantomData;

use crate::descriptor::{NumericKind, TypeDescriptor};
use crate::value::RawValue;

/// A type whose instances can be decomposed into named, typed properties
///
/// The shape must be stable: repeated calls return the same properties in
/// the same order. Associated functions and constants of the implementing
/// type are invisible here; only what the shape declares is ever read.
pub trait Record: Send + Sync + 'static {
    /// The property table describing instances of this type
    fn shape() -> Shape;
}

/// One introspectable property: a name, a declared type and an accessor
pub struct Property {
    name: String,
    descriptor: TypeDescriptor,
    accessor: Box<dyn Fn(&dyn Any) -> RawValue + Send + Sync>,
}

impl Property {
    /// Property name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type of the property
    pub fn descriptor(&self) -> TypeDescriptor {
        self.descriptor
    }

    /// Read this property from an erased instance
    ///
    /// Returns `Null` if the instance is not of the shape's record type.
    /// Conversion checks instance types before reading, so that path is
    /// unreachable through the converter.
    pub fn read(&self, instance: &dyn Any) -> RawValue {
        (self.accessor)(instance)
    }
}

impl std::fmt::Debug for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

/// Ordered property table for one record type
#[derive(Debug)]
pub struct Shape {
    name: &'static str,
    type_id: TypeId,
    properties: Vec<Property>,
}

impl Shape {
    /// Start building the shape of record type `T`
    pub fn builder<T: Record>(name: &'static str) -> ShapeBuilder<T> {
        ShapeBuilder {
            name,
            type_id: TypeId::of::<T>(),
            properties: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Human-readable record type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// `TypeId` of the record type this shape describes
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Properties in declaration order
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }
}

/// Builder accumulating properties for the shape of `T`
///
/// Property order is the call order. Typed accessors are plain functions
/// over `&T`; the builder wraps each behind a downcasting shim so shapes
/// stay object-safe for storage.
pub struct ShapeBuilder<T> {
    name: &'static str,
    type_id: TypeId,
    properties: Vec<Property>,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Record> ShapeBuilder<T> {
    /// Add a property with an explicit descriptor
    pub fn property(
        mut self,
        name: impl Into<String>,
        descriptor: TypeDescriptor,
        accessor: fn(&T) -> RawValue,
    ) -> Self {
        let shim = move |instance: &dyn Any| match instance.downcast_ref::<T>() {
            Some(typed) => accessor(typed),
            None => RawValue::Null,
        };
        self.properties.push(Property {
            name: name.into(),
            descriptor,
            accessor: Box::new(shim),
        });
        self
    }

    /// Add a non-nullable unboxed numeric property
    pub fn primitive(
        self,
        name: impl Into<String>,
        kind: NumericKind,
        accessor: fn(&T) -> RawValue,
    ) -> Self {
        self.property(name, TypeDescriptor::primitive(kind), accessor)
    }

    /// Add a boxed numeric property
    pub fn boxed(
        self,
        name: impl Into<String>,
        kind: NumericKind,
        nullable: bool,
        accessor: fn(&T) -> RawValue,
    ) -> Self {
        self.property(name, TypeDescriptor::boxed(kind, nullable), accessor)
    }

    /// Add a text property
    pub fn text(
        self,
        name: impl Into<String>,
        nullable: bool,
        accessor: fn(&T) -> RawValue,
    ) -> Self {
        self.property(name, TypeDescriptor::text(nullable), accessor)
    }

    /// Add a boolean property
    pub fn boolean(
        self,
        name: impl Into<String>,
        nullable: bool,
        accessor: fn(&T) -> RawValue,
    ) -> Self {
        self.property(name, TypeDescriptor::boolean(nullable), accessor)
    }

    /// Add a nested record property of record type `U`
    pub fn record<U: Record>(
        self,
        name: impl Into<String>,
        nullable: bool,
        accessor: fn(&T) -> RawValue,
    ) -> Self {
        self.property(name, TypeDescriptor::record::<U>(nullable), accessor)
    }

    /// Add a collection property with element record type `U`
    pub fn collection<U: Record>(
        self,
        name: impl Into<String>,
        nullable: bool,
        accessor: fn(&T) -> RawValue,
    ) -> Self {
        self.property(name, TypeDescriptor::collection::<U>(nullable), accessor)
    }

    /// Freeze the accumulated properties into a shape
    pub fn finish(self) -> Shape {
        Shape {
            name: self.name,
            type_id: self.type_id,
            properties: self.properties,
        }
    }
}
