//! Property-based tests for descriptor widening and frame assembly

use proptest::prelude::*;
use tabula_frame::descriptor::{NumericKind, TypeDescriptor};
use tabula_frame::frame::{Column, Frame, FrameArena, FrameNode};
use tabula_frame::limits::Limits;
use tabula_frame::value::Scalar;
use tabula_frame::TabulaError;

const NUMERIC_KINDS: [NumericKind; 6] = [
    NumericKind::Int8,
    NumericKind::Int16,
    NumericKind::Int32,
    NumericKind::Int64,
    NumericKind::Float32,
    NumericKind::Float64,
];

fn scalar_descriptors() -> Vec<TypeDescriptor> {
    let mut all = Vec::new();
    for kind in NUMERIC_KINDS {
        all.push(TypeDescriptor::primitive(kind));
        all.push(TypeDescriptor::boxed(kind, false));
        all.push(TypeDescriptor::boxed(kind, true));
    }
    all.push(TypeDescriptor::text(false));
    all.push(TypeDescriptor::text(true));
    all.push(TypeDescriptor::boolean(false));
    all.push(TypeDescriptor::boolean(true));
    all
}

fn descriptor_strategy() -> impl Strategy<Value = TypeDescriptor> {
    prop::sample::select(scalar_descriptors())
}

fn numeric_strategy() -> impl Strategy<Value = NumericKind> {
    prop::sample::select(NUMERIC_KINDS.to_vec())
}

proptest! {
    #[test]
    fn merge_is_commutative_property(
        a in descriptor_strategy(),
        b in descriptor_strategy(),
    ) {
        prop_assert_eq!(a.merge(&b), b.merge(&a));
    }

    #[test]
    fn merge_is_idempotent_property(a in descriptor_strategy()) {
        prop_assert_eq!(a.merge(&a), Some(a));
    }

    #[test]
    fn merge_is_associative_property(
        a in descriptor_strategy(),
        b in descriptor_strategy(),
        c in descriptor_strategy(),
    ) {
        let left = a.merge(&b).and_then(|ab| ab.merge(&c));
        let right = b.merge(&c).and_then(|bc| a.merge(&bc));
        prop_assert_eq!(left, right);
    }

    #[test]
    fn merge_nullability_is_union_property(
        a in descriptor_strategy(),
        b in descriptor_strategy(),
    ) {
        if let Some(merged) = a.merge(&b) {
            prop_assert_eq!(merged.nullable(), a.nullable() || b.nullable());
        }
    }

    #[test]
    fn merge_keeps_boxed_form_property(
        kind in numeric_strategy(),
        nullable in any::<bool>(),
    ) {
        let primitive = TypeDescriptor::primitive(kind);
        let boxed = TypeDescriptor::boxed(kind, nullable);
        prop_assert_eq!(primitive.merge(&boxed), Some(boxed));
    }

    #[test]
    fn distinct_numeric_kinds_never_merge_property(
        a in numeric_strategy(),
        b in numeric_strategy(),
    ) {
        prop_assume!(a != b);
        prop_assert_eq!(
            TypeDescriptor::primitive(a).merge(&TypeDescriptor::primitive(b)),
            None
        );
        prop_assert_eq!(
            TypeDescriptor::boxed(a, true).merge(&TypeDescriptor::boxed(b, true)),
            None
        );
    }

    #[test]
    fn arena_accepts_aligned_nullable_columns_property(
        raw in prop::collection::vec(
            prop::collection::vec(prop::option::of(any::<i64>()), 0..40),
            1..6
        ),
    ) {
        // Align all columns to the shortest one.
        let rows = raw.iter().map(Vec::len).min().unwrap_or(0);
        let columns: Vec<Column> = raw
            .iter()
            .enumerate()
            .map(|(i, cells)| {
                let values = cells[..rows]
                    .iter()
                    .map(|slot| slot.map(Scalar::I64))
                    .collect();
                Column::scalars(
                    format!("c{}", i),
                    TypeDescriptor::boxed(NumericKind::Int64, true),
                    values,
                )
            })
            .collect();
        let column_count = columns.len();

        let mut arena = FrameArena::with_default_limits();
        let root = arena
            .insert(FrameNode { row_count: rows, columns })
            .expect("aligned columns insert");
        let frame = Frame::new(arena, root).expect("root is in the arena");
        prop_assert_eq!(frame.row_count(), rows);
        prop_assert_eq!(frame.column_count(), column_count);
    }

    #[test]
    fn arena_rejects_row_misalignment_property(
        rows in 1usize..40,
        extra in 1usize..5,
    ) {
        let aligned = Column::scalars(
            "ok",
            TypeDescriptor::boxed(NumericKind::Int64, true),
            vec![Some(Scalar::I64(0)); rows],
        );
        let misaligned = Column::scalars(
            "off",
            TypeDescriptor::boxed(NumericKind::Int64, true),
            vec![Some(Scalar::I64(0)); rows + extra],
        );

        let mut arena = FrameArena::with_default_limits();
        let err = arena
            .insert(FrameNode { row_count: rows, columns: vec![aligned, misaligned] })
            .expect_err("misaligned column");
        prop_assert!(
            matches!(err, TabulaError::ColumnLengthMismatch { .. }),
            "expected ColumnLengthMismatch, got {:?}",
            err
        );
    }

    #[test]
    fn arena_rejects_null_in_unboxed_column_property(
        rows in 1usize..40,
        hole in any::<prop::sample::Index>(),
    ) {
        let mut values: Vec<Option<Scalar>> = vec![Some(Scalar::I64(7)); rows];
        values[hole.index(rows)] = None;
        let column = Column::scalars(
            "n",
            TypeDescriptor::primitive(NumericKind::Int64),
            values,
        );

        let mut arena = FrameArena::with_default_limits();
        let err = arena
            .insert(FrameNode { row_count: rows, columns: vec![column] })
            .expect_err("null in unboxed column");
        prop_assert!(
            matches!(err, TabulaError::NullInNonNullableColumn { .. }),
            "expected NullInNonNullableColumn, got {:?}",
            err
        );
    }

    #[test]
    fn arena_enforces_row_limit_property(
        rows in 1usize..40,
        cap in 0usize..40,
    ) {
        prop_assume!(cap < rows);
        let limits = Limits {
            max_rows_per_frame: cap,
            ..Limits::default()
        };
        let column = Column::scalars(
            "v",
            TypeDescriptor::boolean(false),
            vec![Some(Scalar::Bool(true)); rows],
        );

        let mut arena = FrameArena::new(limits);
        let err = arena
            .insert(FrameNode { row_count: rows, columns: vec![column] })
            .expect_err("row limit");
        prop_assert!(matches!(err, TabulaError::LimitExceeded(_)));
    }
}
