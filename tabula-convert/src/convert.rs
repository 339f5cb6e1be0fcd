//! Record-to-frame conversion engine

use std::any::Any;
use std::sync::Arc;

use tabula_frame::descriptor::ValueKind;
use tabula_frame::error::{Result, TabulaError};
use tabula_frame::frame::{Column, ColumnData, Frame, FrameArena, FrameId, FrameNode};
use tabula_frame::record::{Record, Shape};
use tabula_frame::value::{NestedRecord, RawValue, Scalar};

use crate::column::ColumnBuilder;
use crate::introspect::ShapeCache;
use crate::ConvertOpts;

/// Converts sequences of records into frames
///
/// Conversion runs in two phases. The collect phase walks the record shape
/// and gathers every property's values, resolving each column's final
/// descriptor; collection properties pool the elements of all rows so that
/// every row of a group column shares one schema with its template. The
/// emit phase then materializes validated arena nodes bottom-up.
pub struct FrameConverter {
    opts: ConvertOpts,
    cache: Arc<ShapeCache>,
}

/// Collected but not yet materialized frame level
struct PendingNode {
    row_count: usize,
    columns: Vec<PendingColumn>,
}

struct PendingColumn {
    name: String,
    descriptor: tabula_frame::descriptor::TypeDescriptor,
    data: PendingData,
}

enum PendingData {
    Scalars(Vec<Option<Scalar>>),
    Framed(Box<PendingNode>),
    Grouped {
        /// Element row range of parent row `i` is `offsets[i]..offsets[i + 1]`
        offsets: Vec<usize>,
        pooled: Box<PendingNode>,
    },
}

impl FrameConverter {
    /// Converter with the given options and shape cache
    pub fn new(opts: ConvertOpts, cache: Arc<ShapeCache>) -> Self {
        FrameConverter { opts, cache }
    }

    /// Converter with default options and a private cache
    pub fn with_defaults() -> Self {
        FrameConverter::new(ConvertOpts::default(), Arc::new(ShapeCache::new()))
    }

    /// The shape cache this converter reads through
    pub fn cache(&self) -> &Arc<ShapeCache> {
        &self.cache
    }

    /// Convert a sequence of records into a frame
    ///
    /// An empty sequence produces a zero-row frame that still carries the
    /// full schema of `T`, including nested schemas.
    pub fn frame_of<T: Record>(&self, records: &[T]) -> Result<Frame> {
        if records.len() > self.opts.limits.max_rows_per_frame {
            return Err(TabulaError::LimitExceeded(format!(
                "Record count {} exceeds limit {}",
                records.len(),
                self.opts.limits.max_rows_per_frame
            )));
        }

        let shape = self.cache.shape_of::<T>()?;
        let rows: Vec<Option<&dyn Any>> = records.iter().map(|r| Some(r as &dyn Any)).collect();
        let pending = self.collect_node(&shape, &rows, 1)?;

        let mut arena = FrameArena::new(self.opts.limits.clone());
        let root = emit_range(&mut arena, &pending, 0, pending.row_count)?;
        Frame::new(arena, root)
    }

    /// Gather one frame level from erased rows
    ///
    /// `None` rows stand for absent enclosing records; every property of
    /// such a row becomes null and forces its column nullable.
    fn collect_node(
        &self,
        shape: &Shape,
        rows: &[Option<&dyn Any>],
        depth: usize,
    ) -> Result<PendingNode> {
        if depth > self.opts.limits.max_schema_depth {
            return Err(TabulaError::SchemaTooDeep {
                limit: self.opts.limits.max_schema_depth,
            });
        }

        let mut columns = Vec::new();
        for property in shape.properties() {
            if self.opts.exclude.iter().any(|e| e == property.name()) {
                continue;
            }
            let column = match property.descriptor().kind() {
                ValueKind::Record(shape_ref) => {
                    self.collect_record_column(property, shape_ref, rows, depth)?
                }
                ValueKind::Collection(shape_ref) => {
                    self.collect_group_column(property, shape_ref, rows, depth)?
                }
                _ => collect_scalar_column(property, rows)?,
            };
            columns.push(column);
        }

        if columns.is_empty() {
            return Err(TabulaError::UnsupportedRecordShape {
                type_name: shape.name(),
            });
        }

        Ok(PendingNode {
            row_count: rows.len(),
            columns,
        })
    }

    fn collect_record_column(
        &self,
        property: &tabula_frame::record::Property,
        shape_ref: tabula_frame::descriptor::ShapeRef,
        rows: &[Option<&dyn Any>],
        depth: usize,
    ) -> Result<PendingColumn> {
        let mut nested: Vec<Option<NestedRecord>> = Vec::with_capacity(rows.len());
        let mut saw_null = false;
        for row in rows {
            match row {
                Some(instance) => match property.read(*instance) {
                    RawValue::Record(item) => {
                        if item.shape_ref() != shape_ref {
                            return Err(TabulaError::HeterogeneousRecordSequence {
                                expected: shape_ref.type_name(),
                                found: item.shape_ref().type_name(),
                            });
                        }
                        nested.push(Some(item));
                    }
                    RawValue::Null => {
                        saw_null = true;
                        nested.push(None);
                    }
                    other => {
                        return Err(TabulaError::MismatchedValueType {
                            column: property.name().to_string(),
                            expected: "record".to_string(),
                            found: other.kind_name().to_string(),
                        });
                    }
                },
                None => {
                    saw_null = true;
                    nested.push(None);
                }
            }
        }

        let nested_shape = self.cache.shape_for(shape_ref)?;
        let nested_rows: Vec<Option<&dyn Any>> = nested
            .iter()
            .map(|item| item.as_ref().map(|n| n.instance()))
            .collect();
        let node = self.collect_node(&nested_shape, &nested_rows, depth + 1)?;

        let descriptor = if saw_null {
            property.descriptor().with_nullable(true)
        } else {
            property.descriptor()
        };
        Ok(PendingColumn {
            name: property.name().to_string(),
            descriptor,
            data: PendingData::Framed(Box::new(node)),
        })
    }

    fn collect_group_column(
        &self,
        property: &tabula_frame::record::Property,
        shape_ref: tabula_frame::descriptor::ShapeRef,
        rows: &[Option<&dyn Any>],
        depth: usize,
    ) -> Result<PendingColumn> {
        let mut items: Vec<NestedRecord> = Vec::new();
        let mut offsets = Vec::with_capacity(rows.len() + 1);
        offsets.push(0);
        let mut saw_null = false;
        for row in rows {
            match row {
                Some(instance) => match property.read(*instance) {
                    RawValue::Collection(elements) => {
                        for element in &elements {
                            if element.shape_ref() != shape_ref {
                                return Err(TabulaError::HeterogeneousRecordSequence {
                                    expected: shape_ref.type_name(),
                                    found: element.shape_ref().type_name(),
                                });
                            }
                        }
                        items.extend(elements);
                    }
                    // A null collection becomes an empty nested frame.
                    RawValue::Null => saw_null = true,
                    other => {
                        return Err(TabulaError::MismatchedValueType {
                            column: property.name().to_string(),
                            expected: "collection".to_string(),
                            found: other.kind_name().to_string(),
                        });
                    }
                },
                None => saw_null = true,
            }
            offsets.push(items.len());
        }

        let nested_shape = self.cache.shape_for(shape_ref)?;
        let item_rows: Vec<Option<&dyn Any>> =
            items.iter().map(|n| Some(n.instance())).collect();
        // Collected even with zero elements, so the descent is type-driven
        // and recursive record types hit the depth ceiling deterministically.
        let pooled = self.collect_node(&nested_shape, &item_rows, depth + 1)?;

        let descriptor = if saw_null {
            property.descriptor().with_nullable(true)
        } else {
            property.descriptor()
        };
        Ok(PendingColumn {
            name: property.name().to_string(),
            descriptor,
            data: PendingData::Grouped {
                offsets,
                pooled: Box::new(pooled),
            },
        })
    }
}

fn collect_scalar_column(
    property: &tabula_frame::record::Property,
    rows: &[Option<&dyn Any>],
) -> Result<PendingColumn> {
    let mut builder = ColumnBuilder::new(property.name(), property.descriptor(), rows.len());
    for row in rows {
        match row {
            Some(instance) => builder.push(property.read(*instance))?,
            None => builder.push_missing(),
        }
    }
    let (descriptor, values) = builder.finish();
    Ok(PendingColumn {
        name: property.name().to_string(),
        descriptor,
        data: PendingData::Scalars(values),
    })
}

/// Materialize rows `start..end` of a collected level as an arena node
fn emit_range(
    arena: &mut FrameArena,
    node: &PendingNode,
    start: usize,
    end: usize,
) -> Result<FrameId> {
    let mut columns = Vec::with_capacity(node.columns.len());
    for column in &node.columns {
        let data = match &column.data {
            PendingData::Scalars(values) => ColumnData::Scalars(values[start..end].to_vec()),
            PendingData::Framed(nested) => {
                ColumnData::Framed(emit_range(arena, nested, start, end)?)
            }
            PendingData::Grouped { offsets, pooled } => {
                let template = emit_range(arena, pooled, 0, 0)?;
                let mut row_ids = Vec::with_capacity(end - start);
                for i in start..end {
                    row_ids.push(emit_range(arena, pooled, offsets[i], offsets[i + 1])?);
                }
                ColumnData::Grouped {
                    template,
                    rows: row_ids,
                }
            }
        };
        columns.push(Column {
            name: column.name.clone(),
            descriptor: column.descriptor,
            data,
        });
    }
    arena.insert(FrameNode {
        row_count: end - start,
        columns,
    })
}
