//! Tabula Frame - Core primitives for typed columnar frames
//!
//! This crate provides the data model shared by the tabula engines, with no
//! engine or I/O dependencies. It includes:
//!
//! - Column type descriptors and the numeric kind lattice
//! - Scalar cell values and the type-erased accessor output
//! - The `Record` introspection contract and shape builder
//! - Arena-backed frame structures with construction-time validation
//! - Schema metadata trees
//! - Error types
//! - Conversion limits

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod descriptor;
pub mod error;
pub mod frame;
pub mod limits;
pub mod record;
pub mod schema;
pub mod value;

// Re-export commonly used types
pub use descriptor::{NumericKind, ShapeRef, TypeDescriptor, ValueKind};
pub use error::{Result, TabulaError};
pub use frame::{Column, ColumnData, Frame, FrameArena, FrameId, FrameNode};
pub use limits::Limits;
pub use record::{Property, Record, Shape, ShapeBuilder};
pub use schema::{FrameSchema, SchemaNode};
pub use value::{NestedRecord, RawValue, Scalar};
