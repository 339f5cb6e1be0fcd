//! Bounded JSON projection engine

use serde_json::{Map, Number, Value};

use tabula_frame::error::Result;
use tabula_frame::frame::{ColumnData, Frame, FrameArena, FrameNode};
use tabula_frame::schema::{FrameSchema, SchemaNode};
use tabula_frame::value::Scalar;

/// Version of the projection document format
pub const SERIALIZATION_VERSION: &str = "1.0.0";

/// Wire keys of the projection document
///
/// These names are a compatibility contract; renames require a new
/// versioned document alongside this one.
pub mod keys {
    /// Format version of the document
    pub const VERSION: &str = "$version";
    /// Schema metadata of the projected frame
    pub const SCHEMA: &str = "schema";
    /// Projected rows
    pub const DATA: &str = "data";
    /// Rows rendered at this level
    pub const ROWS_SHOWN: &str = "rowsShown";
    /// Rows the (sub)frame actually holds
    pub const ROWS_TOTAL: &str = "rowsTotal";
    /// Whether rows were cut off at this level
    pub const TRUNCATED: &str = "truncated";
}

/// Projection options
#[derive(Debug, Clone)]
pub struct ProjectOpts {
    /// Maximum rows rendered at the top level; `None` renders all rows
    pub row_limit: Option<usize>,
    /// Maximum rows rendered inside each group cell, applied uniformly at
    /// every nesting depth; `None` renders all rows
    pub nested_row_limit: Option<usize>,
    /// Pretty-print the serialized document
    pub pretty: bool,
}

impl Default for ProjectOpts {
    fn default() -> Self {
        Self {
            row_limit: None,
            nested_row_limit: None,
            pretty: false,
        }
    }
}

/// Renders frames as JSON documents with bounded row expansion
///
/// Projection never fails on a constructed frame: every structural
/// invariant it relies on is enforced at frame construction. Output is
/// deterministic, with keys in declaration order.
pub struct JsonProjector {
    opts: ProjectOpts,
}

impl JsonProjector {
    /// Projector with the given options
    pub fn new(opts: ProjectOpts) -> Self {
        JsonProjector { opts }
    }

    /// Projector rendering every row, compact
    pub fn with_defaults() -> Self {
        JsonProjector::new(ProjectOpts::default())
    }

    /// Project a frame into the versioned document with schema metadata
    ///
    /// Top-level rows are cut to `row_limit`; each group cell at any depth
    /// is cut to `nested_row_limit`. Rows of a frame-valued column are the
    /// parent's rows and follow the parent's cut.
    pub fn project(&self, frame: &Frame) -> Value {
        let root = frame.root();
        let total = root.row_count;
        let shown = applied(self.opts.row_limit, total);

        let mut data = Vec::with_capacity(shown);
        for row in 0..shown {
            data.push(row_value(frame.arena(), root, row, self.opts.nested_row_limit));
        }

        let mut doc = Map::new();
        doc.insert(
            keys::VERSION.to_string(),
            Value::String(SERIALIZATION_VERSION.to_string()),
        );
        doc.insert(keys::SCHEMA.to_string(), schema_value(&frame.schema()));
        doc.insert(keys::DATA.to_string(), Value::Array(data));
        doc.insert(keys::ROWS_SHOWN.to_string(), Value::from(shown));
        doc.insert(keys::ROWS_TOTAL.to_string(), Value::from(total));
        doc.insert(keys::TRUNCATED.to_string(), Value::Bool(shown < total));
        Value::Object(doc)
    }

    /// Project a frame as a bare row array, with no limits or envelopes
    ///
    /// For consumers that already hold the schema. Group cells render as
    /// plain arrays of row objects, frame cells as plain objects.
    pub fn project_rows(&self, frame: &Frame) -> Value {
        let root = frame.root();
        let rows = (0..root.row_count)
            .map(|row| plain_row(frame.arena(), root, row))
            .collect();
        Value::Array(rows)
    }

    /// Project and serialize, compact or pretty per the options
    ///
    /// Identical frame and options yield byte-identical output.
    pub fn to_json_string(&self, frame: &Frame) -> Result<String> {
        let doc = self.project(frame);
        let text = if self.opts.pretty {
            serde_json::to_string_pretty(&doc)?
        } else {
            serde_json::to_string(&doc)?
        };
        Ok(text)
    }
}

fn applied(limit: Option<usize>, total: usize) -> usize {
    limit.map_or(total, |l| l.min(total))
}

fn row_value(
    arena: &FrameArena,
    node: &FrameNode,
    row: usize,
    nested_limit: Option<usize>,
) -> Value {
    let mut object = Map::new();
    for column in &node.columns {
        let cell = match &column.data {
            ColumnData::Scalars(values) => scalar_value(values[row].as_ref()),
            ColumnData::Framed(nested) => {
                row_value(arena, arena.node(*nested), row, nested_limit)
            }
            ColumnData::Grouped { rows, .. } => {
                group_value(arena, arena.node(rows[row]), nested_limit)
            }
        };
        object.insert(column.name.clone(), cell);
    }
    Value::Object(object)
}

fn group_value(arena: &FrameArena, node: &FrameNode, nested_limit: Option<usize>) -> Value {
    let total = node.row_count;
    let shown = applied(nested_limit, total);

    let mut data = Vec::with_capacity(shown);
    for row in 0..shown {
        data.push(row_value(arena, node, row, nested_limit));
    }

    let mut envelope = Map::new();
    envelope.insert(keys::DATA.to_string(), Value::Array(data));
    envelope.insert(keys::ROWS_SHOWN.to_string(), Value::from(shown));
    envelope.insert(keys::ROWS_TOTAL.to_string(), Value::from(total));
    envelope.insert(keys::TRUNCATED.to_string(), Value::Bool(shown < total));
    Value::Object(envelope)
}

fn plain_row(arena: &FrameArena, node: &FrameNode, row: usize) -> Value {
    let mut object = Map::new();
    for column in &node.columns {
        let cell = match &column.data {
            ColumnData::Scalars(values) => scalar_value(values[row].as_ref()),
            ColumnData::Framed(nested) => plain_row(arena, arena.node(*nested), row),
            ColumnData::Grouped { rows, .. } => {
                let group = arena.node(rows[row]);
                Value::Array(
                    (0..group.row_count)
                        .map(|r| plain_row(arena, group, r))
                        .collect(),
                )
            }
        };
        object.insert(column.name.clone(), cell);
    }
    Value::Object(object)
}

fn scalar_value(slot: Option<&Scalar>) -> Value {
    match slot {
        None => Value::Null,
        Some(Scalar::Bool(v)) => Value::Bool(*v),
        Some(Scalar::I8(v)) => Value::from(*v),
        Some(Scalar::I16(v)) => Value::from(*v),
        Some(Scalar::I32(v)) => Value::from(*v),
        Some(Scalar::I64(v)) => Value::from(*v),
        Some(Scalar::F32(v)) => f32_value(*v),
        Some(Scalar::F64(v)) => f64_value(*v),
        Some(Scalar::Text(v)) => Value::String(v.clone()),
    }
}

fn f64_value(v: f64) -> Value {
    match Number::from_f64(v) {
        Some(n) => Value::Number(n),
        // NaN and infinities are not representable in JSON.
        None => Value::String(v.to_string()),
    }
}

fn f32_value(v: f32) -> Value {
    if !v.is_finite() {
        return Value::String(v.to_string());
    }
    // Formatting then reparsing keeps the f32's short decimal form instead
    // of the widened f64 digits.
    let widened = v.to_string().parse::<f64>().unwrap_or_else(|_| f64::from(v));
    f64_value(widened)
}

fn schema_value(schema: &FrameSchema) -> Value {
    let mut object = Map::new();
    object.insert(
        "columns".to_string(),
        Value::Array(schema.columns.iter().map(schema_node_value).collect()),
    );
    Value::Object(object)
}

fn schema_node_value(node: &SchemaNode) -> Value {
    let mut object = Map::new();
    object.insert("name".to_string(), Value::String(node.name.clone()));
    object.insert("kind".to_string(), Value::String(node.kind.to_string()));
    object.insert("nullable".to_string(), Value::Bool(node.nullable));
    if !node.children.is_empty() {
        object.insert(
            "children".to_string(),
            Value::Array(node.children.iter().map(schema_node_value).collect()),
        );
    }
    Value::Object(object)
}
