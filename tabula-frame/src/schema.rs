//! Frame schema metadata

use serde::Serialize;

use crate::frame::{ColumnData, Frame, FrameArena, FrameNode};

/// Schema of one column
///
/// `children` is populated for frame-valued and group-valued columns and
/// empty for scalars. Group children come from the group's template, so the
/// schema is complete even when every group is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaNode {
    /// Column name
    pub name: String,
    /// Wire label of the column kind
    pub kind: &'static str,
    /// Whether the column may hold nulls
    pub nullable: bool,
    /// Schemas of nested columns
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SchemaNode>,
}

/// Schema of a whole frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameSchema {
    /// Top-level column schemas in declaration order
    pub columns: Vec<SchemaNode>,
}

impl Frame {
    /// Describe this frame's columns, recursively
    pub fn schema(&self) -> FrameSchema {
        FrameSchema {
            columns: node_schema(self.arena(), self.root()),
        }
    }
}

fn node_schema(arena: &FrameArena, node: &FrameNode) -> Vec<SchemaNode> {
    node.columns
        .iter()
        .map(|column| {
            let children = match &column.data {
                ColumnData::Scalars(_) => Vec::new(),
                ColumnData::Framed(nested) => node_schema(arena, arena.node(*nested)),
                ColumnData::Grouped { template, .. } => node_schema(arena, arena.node(*template)),
            };
            SchemaNode {
                name: column.name.clone(),
                kind: column.descriptor.kind().name(),
                nullable: column.descriptor.nullable(),
                children,
            }
        })
        .collect()
}
