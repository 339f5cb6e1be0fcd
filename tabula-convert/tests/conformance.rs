//! End-to-end conversion and projection scenarios over the shared fixtures

use std::sync::Arc;

use serde_json::{json, Value};
use tabula_convert::project::keys;
use tabula_convert::{
    ConvertOpts, Frame, FrameConverter, JsonProjector, NumericKind, ProjectOpts, Record, Shape,
    ShapeCache, TabulaError,
};
use tabula_test_utils::{Badge, Invoice, Member, SampleData, Team, TreeNode};

fn convert<T: Record>(records: &[T]) -> Frame {
    FrameConverter::with_defaults()
        .frame_of(records)
        .expect("convert records")
}

fn project(frame: &Frame) -> Value {
    JsonProjector::with_defaults().project(frame)
}

#[test]
fn sample_scenario_serializes_exactly() {
    struct Entry {
        a: i64,
        b: &'static str,
    }
    impl Record for Entry {
        fn shape() -> Shape {
            Shape::builder::<Entry>("Entry")
                .primitive("a", NumericKind::Int64, |e| e.a.into())
                .text("b", false, |e| e.b.into())
                .finish()
        }
    }

    let frame = convert(&[Entry { a: 1, b: "x" }, Entry { a: 2, b: "y" }]);
    let projector = JsonProjector::new(ProjectOpts {
        row_limit: Some(1),
        ..ProjectOpts::default()
    });

    let text = projector.to_json_string(&frame).expect("serialize");
    assert_eq!(
        text,
        r#"{"$version":"1.0.0","schema":{"columns":[{"name":"a","kind":"int64","nullable":false},{"name":"b","kind":"text","nullable":false}]},"data":[{"a":1,"b":"x"}],"rowsShown":1,"rowsTotal":2,"truncated":true}"#
    );
}

#[test]
fn orders_cover_every_scalar_kind() {
    let frame = convert(&SampleData::orders(3));
    let doc = project(&frame);

    let columns = doc[keys::SCHEMA]["columns"].as_array().expect("columns");
    let kinds: Vec<&str> = columns
        .iter()
        .map(|c| c["kind"].as_str().expect("kind"))
        .collect();
    assert_eq!(
        kinds,
        [
            "int64", "text", "float64", "int32", "int8", "int16", "float32", "float64", "int32",
            "boolean"
        ]
    );

    let nullable: Vec<bool> = columns
        .iter()
        .map(|c| c["nullable"].as_bool().expect("nullable"))
        .collect();
    assert_eq!(
        nullable,
        [false, false, false, false, false, false, false, true, true, false]
    );

    // Order 1 has no discount and order 0 has no points.
    assert_eq!(
        doc[keys::DATA][0],
        json!({
            "id": 0,
            "customer": "customer_0",
            "total": 0.0,
            "lines": 1,
            "priority": 0,
            "warehouse": 0,
            "weight": 0.0,
            "discount": 0.0,
            "points": null,
            "shipped": true
        })
    );
    assert_eq!(doc[keys::DATA][1]["discount"], json!(null));
    assert_eq!(doc[keys::DATA][1]["points"], json!(1));
    assert_eq!(doc[keys::DATA][1]["total"], json!(9.75));
}

/// Nested records render inline per row; collections get bounded envelopes.
#[test]
fn invoices_nest_records_and_groups() {
    let frame = convert(&SampleData::invoices(4));
    let doc = project(&frame);

    assert_eq!(doc[keys::ROWS_TOTAL], json!(4));

    // Even invoices carry a shipping address, odd ones render it as nulls.
    assert_eq!(
        doc[keys::DATA][0]["customer"],
        json!({
            "name": "customer_0",
            "billing": {"street": "0 Main St", "city": "Springfield"},
            "shipping": {"street": "0 Dock Rd", "city": "Shelbyville"}
        })
    );
    assert_eq!(
        doc[keys::DATA][1]["customer"]["shipping"],
        json!({"street": null, "city": null})
    );

    // Invoice 0 has no lines; the envelope is still present and well formed.
    assert_eq!(
        doc[keys::DATA][0]["items"],
        json!({"data": [], "rowsShown": 0, "rowsTotal": 0, "truncated": false})
    );
    assert_eq!(
        doc[keys::DATA][1]["items"],
        json!({
            "data": [{"sku": "SKU-1-0", "quantity": 1, "price": 2.5}],
            "rowsShown": 1,
            "rowsTotal": 1,
            "truncated": false
        })
    );

    // Schema descends through both nesting forms.
    let columns = &doc[keys::SCHEMA]["columns"];
    assert_eq!(columns[1]["kind"], json!("frame"));
    assert_eq!(columns[1]["children"][1]["name"], json!("billing"));
    assert_eq!(
        columns[1]["children"][1]["children"],
        json!([
            {"name": "street", "kind": "text", "nullable": false},
            {"name": "city", "kind": "text", "nullable": false}
        ])
    );
    assert_eq!(columns[2]["kind"], json!("group"));
    assert_eq!(columns[2]["children"][0]["name"], json!("sku"));
}

#[test]
fn invoice_group_rows_share_one_schema() {
    let frame = convert(&SampleData::invoices(4));
    let doc = project(&frame);

    for row in 0..4 {
        let items = &doc[keys::DATA][row]["items"];
        assert_eq!(items[keys::ROWS_TOTAL], json!(row % 4));
        for item in items[keys::DATA].as_array().expect("item rows") {
            let fields: Vec<&str> = item.as_object().expect("item").keys().map(String::as_str).collect();
            assert_eq!(fields, ["sku", "quantity", "price"]);
        }
    }
}

/// One nested limit bounds group cells at every depth, not just the first.
#[test]
fn nested_limit_applies_at_every_depth() {
    let team = Team {
        name: "core".to_string(),
        members: (0..2)
            .map(|j| Member {
                name: format!("member_{}", j),
                badges: (0..3)
                    .map(|k| Badge {
                        code: format!("badge_{}_{}", j, k),
                    })
                    .collect(),
            })
            .collect(),
    };
    let frame = convert(&[team]);

    let doc = JsonProjector::new(ProjectOpts {
        nested_row_limit: Some(2),
        ..ProjectOpts::default()
    })
    .project(&frame);

    let members = &doc[keys::DATA][0]["members"];
    assert_eq!(members[keys::ROWS_SHOWN], json!(2));
    assert_eq!(members[keys::TRUNCATED], json!(false));
    let badges = &members[keys::DATA][0]["badges"];
    assert_eq!(badges[keys::ROWS_SHOWN], json!(2));
    assert_eq!(badges[keys::ROWS_TOTAL], json!(3));
    assert_eq!(badges[keys::TRUNCATED], json!(true));

    let tight = JsonProjector::new(ProjectOpts {
        nested_row_limit: Some(1),
        ..ProjectOpts::default()
    })
    .project(&frame);

    let members = &tight[keys::DATA][0]["members"];
    assert_eq!(members[keys::ROWS_SHOWN], json!(1));
    assert_eq!(members[keys::TRUNCATED], json!(true));
    assert_eq!(members[keys::DATA][0]["badges"][keys::ROWS_SHOWN], json!(1));
    assert_eq!(members[keys::DATA][0]["badges"][keys::TRUNCATED], json!(true));
}

/// Checks every group envelope under `row` against the one nested limit and
/// tallies envelopes per frame depth.
fn count_bounded_envelopes(row: &Value, depth: usize, seen: &mut [usize; 6]) {
    for cell in row.as_object().expect("row object").values() {
        if let Some(envelope) = cell.as_object() {
            if envelope.contains_key(keys::ROWS_TOTAL) {
                seen[depth] += 1;
                assert_eq!(envelope[keys::ROWS_SHOWN], json!(2));
                assert_eq!(envelope[keys::ROWS_TOTAL], json!(4));
                assert_eq!(envelope[keys::TRUNCATED], json!(true));
                for nested in envelope[keys::DATA].as_array().expect("envelope rows") {
                    count_bounded_envelopes(nested, depth + 1, seen);
                }
            }
        }
    }
}

#[test]
fn nested_limit_holds_through_depth_five() {
    // Four elements per collection level, five frame levels overall.
    let frame = convert(&[SampleData::company(4)]);
    let doc = JsonProjector::new(ProjectOpts {
        nested_row_limit: Some(2),
        ..ProjectOpts::default()
    })
    .project(&frame);

    let mut envelopes_by_depth = [0usize; 6];
    for row in doc[keys::DATA].as_array().expect("company rows") {
        count_bounded_envelopes(row, 2, &mut envelopes_by_depth);
    }
    // One divisions envelope, then the two shown rows per level fan out
    // underneath it, down to the depth-five member envelopes.
    assert_eq!(envelopes_by_depth, [0, 0, 1, 2, 4, 8]);
}

#[test]
fn empty_input_preserves_full_nested_schema() {
    let frame = convert::<Invoice>(&[]);
    let doc = project(&frame);

    assert_eq!(doc[keys::DATA], json!([]));
    assert_eq!(doc[keys::ROWS_TOTAL], json!(0));

    let columns = &doc[keys::SCHEMA]["columns"];
    assert_eq!(columns[0]["name"], json!("number"));
    assert_eq!(columns[1]["children"][2]["name"], json!("shipping"));
    assert_eq!(columns[1]["children"][2]["nullable"], json!(true));
    assert_eq!(
        columns[2]["children"][2],
        json!({"name": "price", "kind": "float64", "nullable": false})
    );
}

#[test]
fn recursive_record_type_is_refused() {
    let err = FrameConverter::with_defaults()
        .frame_of(&[SampleData::tree(2, 2)])
        .expect_err("recursive type");
    assert!(matches!(err, TabulaError::SchemaTooDeep { limit: 64 }));

    // The schema alone already diverges; data depth is irrelevant.
    let err = FrameConverter::with_defaults()
        .frame_of::<TreeNode>(&[])
        .expect_err("recursive schema");
    assert!(matches!(err, TabulaError::SchemaTooDeep { .. }));
}

#[test]
fn exclusion_applies_at_every_depth() {
    let opts = ConvertOpts {
        exclude: vec!["city".to_string()],
        ..ConvertOpts::default()
    };
    let converter = FrameConverter::new(opts, Arc::new(ShapeCache::new()));
    let frame = converter
        .frame_of(&SampleData::invoices(2))
        .expect("convert invoices");
    let doc = project(&frame);

    assert_eq!(
        doc[keys::DATA][0]["customer"]["billing"],
        json!({"street": "0 Main St"})
    );
    assert_eq!(
        doc[keys::SCHEMA]["columns"][1]["children"][1]["children"],
        json!([{"name": "street", "kind": "text", "nullable": false}])
    );
}

#[test]
fn projection_is_deterministic_across_converters() {
    let invoices = SampleData::invoices(8);
    let projector = JsonProjector::new(ProjectOpts {
        row_limit: Some(5),
        nested_row_limit: Some(2),
        ..ProjectOpts::default()
    });

    let first = projector
        .to_json_string(&convert(&invoices))
        .expect("serialize");
    let second = projector
        .to_json_string(&convert(&invoices))
        .expect("serialize");
    assert_eq!(first, second);
}

#[test]
fn plain_rows_render_groups_as_arrays() {
    let frame = convert(&SampleData::invoices(2));
    let rows = JsonProjector::with_defaults().project_rows(&frame);

    assert_eq!(
        rows[1]["items"],
        json!([{"sku": "SKU-1-0", "quantity": 1, "price": 2.5}])
    );
    assert!(rows[0]["items"].as_array().expect("empty group").is_empty());
}
