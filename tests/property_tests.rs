//! Property-based tests using proptest
//!
//! Tests invariants that should hold for all inputs:
//! 1. Strictness: distinct concrete kinds never match
//! 2. Literal families: unsigned kinds take positive literals, never negative ones
//! 3. Shapes: a wrong number of indices is always a shape error
//! 4. Robustness: arbitrary text never panics the front end
//! 5. Idempotency: building a query twice gives identical results

use proptest::prelude::*;
use vnnlib::{
    build_query_str, check_query_str,
    errors::errors::{ErrorImpl, ErrorKind},
    type_checker::dtype::{same_type, unify, DType},
    BuildOptions,
};

fn concrete_dtype() -> impl Strategy<Value = DType> {
    prop::sample::select(DType::CONCRETE.to_vec())
}

fn numeric_dtype() -> impl Strategy<Value = DType> {
    prop::sample::select(
        DType::CONCRETE
            .iter()
            .copied()
            .filter(|dtype| dtype.is_numeric() && !dtype.is_complex())
            .collect::<Vec<_>>(),
    )
}

fn unsigned_dtype() -> impl Strategy<Value = DType> {
    prop::sample::select(vec![DType::U8, DType::U16, DType::U32, DType::U64])
}

fn declaration(name: &str, dtype: DType, shape: &[i64]) -> String {
    let dims: Vec<String> = shape.iter().map(|dim| dim.to_string()).collect();
    format!(
        "(vnnlib-version <2.0>)\n(declare-network N (declare-input {} {} [{}]))\n",
        name,
        dtype,
        dims.join(",")
    )
}

/// Generate a random arithmetic expression over `X[0]` and literals
fn arith_expr() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (-1000i64..1000).prop_map(|n| n.to_string()),
        (0u32..100).prop_map(|n| format!("{}.5", n)),
        Just("X[0]".to_string()),
    ];

    leaf.prop_recursive(4, 32, 3, |inner| {
        let op = prop_oneof![
            Just("+".to_string()),
            Just("-".to_string()),
            Just("*".to_string()),
        ];
        (op, prop::collection::vec(inner, 1..3))
            .prop_map(|(op, args)| format!("({} {})", op, args.join(" ")))
    })
}

proptest! {
    #[test]
    fn distinct_concrete_kinds_never_match(a in concrete_dtype(), b in concrete_dtype()) {
        prop_assume!(a != b);
        prop_assert!(!same_type(a, b));
        prop_assert_eq!(unify(a, b), None);
    }

    #[test]
    fn distinct_concrete_comparison_is_type_error(a in numeric_dtype(), b in numeric_dtype()) {
        prop_assume!(a != b);
        let source = format!(
            "(vnnlib-version <2.0>)\n(declare-network N (declare-input A {} [1]) (declare-input B {} [1]))\n(assert (== A[0] B[0]))",
            a, b
        );
        let build = build_query_str(&source, &BuildOptions::default()).unwrap();

        prop_assert_eq!(build.diagnostics.len(), 1);
        prop_assert_eq!(build.diagnostics.count_of(ErrorKind::Type), 1);
    }

    #[test]
    fn unsigned_accepts_positive_literals(dtype in unsigned_dtype(), value in 0i64..1_000_000) {
        prop_assert_eq!(unify(dtype, DType::PositiveIntConstant), Some(dtype));

        let source = format!("{}(assert (>= X[0] {}))", declaration("X", dtype, &[1]), value);
        prop_assert_eq!(check_query_str(&source).unwrap(), "");
    }

    #[test]
    fn unsigned_rejects_negative_literals(dtype in unsigned_dtype(), value in 1i64..1_000_000) {
        prop_assert_eq!(unify(dtype, DType::NegativeIntConstant), None);

        let source = format!("{}(assert (>= X[0] -{}))", declaration("X", dtype, &[1]), value);
        let build = build_query_str(&source, &BuildOptions::default()).unwrap();
        prop_assert_eq!(build.diagnostics.count_of(ErrorKind::Type), 1);
    }

    #[test]
    fn wrong_index_count_is_shape_error(
        shape in prop::collection::vec(1i64..5, 0..4),
        count in 0usize..6,
    ) {
        prop_assume!(count != shape.len());
        let indices: Vec<String> = (0..count).map(|_| "0".to_string()).collect();
        let reference = if count == 0 {
            "X".to_string()
        } else {
            format!("X[{}]", indices.join(","))
        };
        let source = format!("{}(assert (> {} 0))", declaration("X", DType::F32, &shape), reference);
        let build = build_query_str(&source, &BuildOptions::default()).unwrap();

        prop_assert_eq!(build.diagnostics.len(), 1);
        let is_rank_mismatch = matches!(
            build.diagnostics.iter().next().map(|error| error.get_impl()),
            Some(ErrorImpl::IndexRankMismatch { .. })
        );
        prop_assert!(is_rank_mismatch);
    }

    #[test]
    fn arbitrary_text_never_panics(source in "\\PC{0,200}") {
        let _ = check_query_str(&source);
    }

    #[test]
    fn arbitrary_forms_never_panic(body in "[()\\[\\]a-zA-Z0-9 ,.<>=!+*-]{0,120}") {
        let _ = check_query_str(&format!("(vnnlib-version <2.0>)\n{}", body));
    }

    #[test]
    fn build_is_idempotent(expr in arith_expr()) {
        let source = format!("{}(assert (<= {} 1))", declaration("X", DType::F64, &[1]), expr);
        let options = BuildOptions::default();
        let first = build_query_str(&source, &options).unwrap();
        let second = build_query_str(&source, &options).unwrap();

        prop_assert_eq!(first.report(), second.report());
        prop_assert_eq!(first.diagnostics, second.diagnostics);
        prop_assert_eq!(first.query, second.query);
    }
}
