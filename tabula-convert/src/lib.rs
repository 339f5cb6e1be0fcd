//! Tabula Convert - Conversion engines
//!
//! This crate provides the two engines at the tabula boundary:
//!
//! - Record-to-frame conversion through shape introspection
//! - Bounded JSON projection with schema metadata
//!
//! A shared [`ShapeCache`] backs introspection; converters receive it
//! explicitly so callers decide its scope.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod column;
pub mod convert;
pub mod introspect;
pub mod project;

// Re-export commonly used types
pub use tabula_frame::{
    Frame, FrameSchema, Limits, NumericKind, RawValue, Record, Result, Scalar, Shape,
    TabulaError, TypeDescriptor,
};

// Re-export our own types
pub use column::ColumnBuilder;
pub use convert::FrameConverter;
pub use introspect::ShapeCache;
pub use project::{JsonProjector, ProjectOpts, SERIALIZATION_VERSION};

/// Conversion options
#[derive(Debug, Clone)]
pub struct ConvertOpts {
    /// Property names skipped at every nesting level
    pub exclude: Vec<String>,
    /// Conversion limits
    pub limits: Limits,
}

impl Default for ConvertOpts {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            limits: Limits::default(),
        }
    }
}
