//! Arena-backed frame structures

use crate::descriptor::{TypeDescriptor, ValueKind};
use crate::error::{Result, TabulaError};
use crate::limits::Limits;
use crate::value::Scalar;

/// Identifier of a frame node within one arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(u32);

impl FrameId {
    /// Index into the owning arena
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Cell storage of one column
#[derive(Debug)]
pub enum ColumnData {
    /// Scalar cells, one slot per row, `None` marking null
    Scalars(Vec<Option<Scalar>>),
    /// A nested frame whose rows align 1:1 with the parent's rows
    Framed(FrameId),
    /// One nested frame per parent row, plus a zero-row template
    /// carrying the element schema
    Grouped {
        /// Zero-row frame describing the element schema
        template: FrameId,
        /// Nested frame of each parent row, in row order
        rows: Vec<FrameId>,
    },
}

impl ColumnData {
    /// Label of this storage form, for error messages
    pub fn form_name(&self) -> &'static str {
        match self {
            ColumnData::Scalars(_) => "scalars",
            ColumnData::Framed(_) => "frame",
            ColumnData::Grouped { .. } => "group",
        }
    }
}

/// A named, typed column
#[derive(Debug)]
pub struct Column {
    /// Column name, unique within its frame node
    pub name: String,
    /// Declared type of the column
    pub descriptor: TypeDescriptor,
    /// Cell storage
    pub data: ColumnData,
}

impl Column {
    /// Scalar column
    pub fn scalars(
        name: impl Into<String>,
        descriptor: TypeDescriptor,
        values: Vec<Option<Scalar>>,
    ) -> Self {
        Column {
            name: name.into(),
            descriptor,
            data: ColumnData::Scalars(values),
        }
    }

    /// Frame-valued column backed by a row-aligned nested frame
    pub fn framed(name: impl Into<String>, descriptor: TypeDescriptor, nested: FrameId) -> Self {
        Column {
            name: name.into(),
            descriptor,
            data: ColumnData::Framed(nested),
        }
    }

    /// Group-valued column with one nested frame per row
    pub fn grouped(
        name: impl Into<String>,
        descriptor: TypeDescriptor,
        template: FrameId,
        rows: Vec<FrameId>,
    ) -> Self {
        Column {
            name: name.into(),
            descriptor,
            data: ColumnData::Grouped { template, rows },
        }
    }
}

/// One level of a frame: a row count and its columns
#[derive(Debug)]
pub struct FrameNode {
    /// Number of rows at this level
    pub row_count: usize,
    /// Columns in declaration order
    pub columns: Vec<Column>,
}

/// Arena owning every node of one frame tree
///
/// Nodes are inserted bottom-up: a node may only reference nodes already
/// present, so frames are acyclic by construction and projection always
/// terminates. [`FrameArena::insert`] validates every structural invariant;
/// a frame that violates them is unconstructible.
#[derive(Debug)]
pub struct FrameArena {
    nodes: Vec<FrameNode>,
    limits: Limits,
}

impl FrameArena {
    /// Empty arena with the given limits
    pub fn new(limits: Limits) -> Self {
        FrameArena {
            nodes: Vec::new(),
            limits,
        }
    }

    /// Empty arena with default limits
    pub fn with_default_limits() -> Self {
        FrameArena::new(Limits::default())
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Limits this arena was created with
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Node by id
    ///
    /// Panics if `id` was not issued by this arena.
    pub fn node(&self, id: FrameId) -> &FrameNode {
        &self.nodes[id.index()]
    }

    /// Validate and insert a node, returning its id
    pub fn insert(&mut self, node: FrameNode) -> Result<FrameId> {
        if node.row_count > self.limits.max_rows_per_frame {
            return Err(TabulaError::LimitExceeded(format!(
                "Row count {} exceeds limit {}",
                node.row_count, self.limits.max_rows_per_frame
            )));
        }
        if node.columns.len() > self.limits.max_columns_per_frame {
            return Err(TabulaError::LimitExceeded(format!(
                "Column count {} exceeds limit {}",
                node.columns.len(),
                self.limits.max_columns_per_frame
            )));
        }

        for (i, column) in node.columns.iter().enumerate() {
            if node.columns[..i].iter().any(|c| c.name == column.name) {
                return Err(TabulaError::DuplicateColumnName {
                    name: column.name.clone(),
                });
            }
            self.check_column(&node, column)?;
        }

        let id = u32::try_from(self.nodes.len()).map_err(|_| {
            TabulaError::LimitExceeded("Arena node count exceeds u32 range".to_string())
        })?;
        self.nodes.push(node);
        Ok(FrameId(id))
    }

    fn check_column(&self, node: &FrameNode, column: &Column) -> Result<()> {
        match (column.descriptor.kind(), &column.data) {
            (ValueKind::Record(_), ColumnData::Framed(nested)) => {
                let nested = self.resolve(&column.name, *nested)?;
                if nested.row_count != node.row_count {
                    return Err(TabulaError::ColumnLengthMismatch {
                        column: column.name.clone(),
                        expected: node.row_count,
                        found: nested.row_count,
                    });
                }
            }
            (ValueKind::Collection(_), ColumnData::Grouped { template, rows }) => {
                let template_node = self.resolve(&column.name, *template)?;
                if template_node.row_count != 0 {
                    return Err(TabulaError::Internal(format!(
                        "Group template for column '{}' must have zero rows, has {}",
                        column.name, template_node.row_count
                    )));
                }
                if rows.len() != node.row_count {
                    return Err(TabulaError::ColumnLengthMismatch {
                        column: column.name.clone(),
                        expected: node.row_count,
                        found: rows.len(),
                    });
                }
                for (row, id) in rows.iter().enumerate() {
                    let row_node = self.resolve(&column.name, *id)?;
                    if !schemas_match(template_node, row_node) {
                        return Err(TabulaError::Internal(format!(
                            "Group row {} of column '{}' does not match the template schema",
                            row, column.name
                        )));
                    }
                }
            }
            (kind, ColumnData::Scalars(values)) if !nested_kind(kind) => {
                if values.len() != node.row_count {
                    return Err(TabulaError::ColumnLengthMismatch {
                        column: column.name.clone(),
                        expected: node.row_count,
                        found: values.len(),
                    });
                }
                for value in values {
                    match value {
                        Some(scalar) if !scalar.fits(kind) => {
                            return Err(TabulaError::MismatchedValueType {
                                column: column.name.clone(),
                                expected: kind.name().to_string(),
                                found: scalar.kind_name().to_string(),
                            });
                        }
                        None if !column.descriptor.nullable() => {
                            return Err(TabulaError::NullInNonNullableColumn {
                                column: column.name.clone(),
                            });
                        }
                        _ => {}
                    }
                }
            }
            (kind, data) => {
                return Err(TabulaError::MismatchedValueType {
                    column: column.name.clone(),
                    expected: kind.name().to_string(),
                    found: data.form_name().to_string(),
                });
            }
        }
        Ok(())
    }

    fn resolve(&self, column: &str, id: FrameId) -> Result<&FrameNode> {
        self.nodes.get(id.index()).ok_or_else(|| {
            TabulaError::Internal(format!(
                "Column '{}' references node {} before it was inserted",
                column,
                id.index()
            ))
        })
    }
}

fn nested_kind(kind: ValueKind) -> bool {
    matches!(kind, ValueKind::Record(_) | ValueKind::Collection(_))
}

fn schemas_match(a: &FrameNode, b: &FrameNode) -> bool {
    a.columns.len() == b.columns.len()
        && a.columns
            .iter()
            .zip(&b.columns)
            .all(|(x, y)| x.name == y.name && x.descriptor == y.descriptor)
}

/// An immutable frame: an arena plus the root node id
#[derive(Debug)]
pub struct Frame {
    arena: FrameArena,
    root: FrameId,
}

impl Frame {
    /// Wrap an arena and its root node
    pub fn new(arena: FrameArena, root: FrameId) -> Result<Self> {
        if root.index() >= arena.len() {
            return Err(TabulaError::Internal(format!(
                "Root id {} is outside the arena of {} nodes",
                root.index(),
                arena.len()
            )));
        }
        Ok(Frame { arena, root })
    }

    /// The arena owning all nodes of this frame
    pub fn arena(&self) -> &FrameArena {
        &self.arena
    }

    /// Id of the root node
    pub fn root_id(&self) -> FrameId {
        self.root
    }

    /// The root node
    pub fn root(&self) -> &FrameNode {
        self.arena.node(self.root)
    }

    /// Number of top-level rows
    pub fn row_count(&self) -> usize {
        self.root().row_count
    }

    /// Number of top-level columns
    pub fn column_count(&self) -> usize {
        self.root().columns.len()
    }
}
