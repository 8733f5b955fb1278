//! Integration tests for end-to-end builds.
//!
//! These tests drive the public entry points from source text (or a file)
//! through tokenization, parsing and type checking, and check both the
//! typed tree and the diagnostic report.

use std::{fs, path::PathBuf, thread};

use vnnlib::{
    build_query, build_query_str, check_query, check_query_str,
    errors::errors::{ErrorImpl, ErrorKind},
    parse_query, parse_query_str,
    parser::parser::MAX_NESTING,
    type_checker::{dtype::DType, typed_ast::TBoolExpr},
    BuildOptions, LiteralPolicy,
};

const NETWORK: &str = "(vnnlib-version <2.0>)
(declare-network N
  (declare-input X float32 [1,3])
  (declare-input Y int32 [2])
  (declare-output Z float32 [2]))
";

fn with_assertion(assertion: &str) -> String {
    format!("{}(assert {})\n", NETWORK, assertion)
}

fn temp_file(name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("vnnlib_tests");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_scenario_a_well_typed_comparison() {
    let source = with_assertion("(> X[0,0] 0.5)");
    let query = parse_query_str(&source).unwrap();

    assert_eq!(check_query_str(&source).unwrap(), "");
    match &query.assertions()[0].condition {
        TBoolExpr::Compare(compare) => {
            assert_eq!(compare.lhs.dtype(), DType::F32);
            assert_eq!(compare.rhs.dtype(), DType::F32);
        }
        other => panic!("expected comparison, got {:?}", other),
    }
}

#[test]
fn test_scenario_b_index_out_of_bounds() {
    let source = with_assertion("(> X[5,0] 0)");
    let build = build_query_str(&source, &BuildOptions::default()).unwrap();

    assert_eq!(build.diagnostics.len(), 1);
    let error = build.diagnostics.iter().next().unwrap();
    assert_eq!(error.kind(), ErrorKind::Shape);
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::IndexOutOfBounds {
            variable: String::from("X"),
            index: 5,
            dimension: 0,
            bound: 1,
        }
    );
    assert!(build.report().contains("Index 5 out of bound 1"));
}

#[test]
fn test_scenario_c_negative_literal_against_unsigned() {
    let source = "(vnnlib-version <2.0>)
(declare-network N (declare-input Y uint8 [1]))
(assert (== Y[0] -1))";
    let build = build_query_str(source, &BuildOptions::default()).unwrap();

    assert_eq!(build.diagnostics.count_of(ErrorKind::Type), 1);
    assert!(build.report().contains("negative-int-constant"));
    assert!(build.report().contains("uint8"));
}

#[test]
fn test_scenario_d_deferred_relation() {
    let source = "(vnnlib-version <2.0>)
(declare-network net2
  (isometric-to net1)
  (declare-input X float32 [1,3])
  (declare-output Y float32 [2]))
(declare-network net1
  (declare-input A float32 [1,3])
  (declare-output B float32 [2]))
(assert (<= (- Y[0] B[0]) 0.01))";
    let build = build_query_str(source, &BuildOptions::default()).unwrap();

    assert!(build.is_well_typed(), "{}", build.report());
    assert_eq!(
        build.query.network("net2").unwrap().isometric_to.as_deref(),
        Some("net1")
    );
}

#[test]
fn test_scenario_e_float_against_integer() {
    let source = "(vnnlib-version <2.0>)
(declare-network N (declare-input X float32 [1]) (declare-input Y int32 [1]))
(assert (> (+ X[0] 1) (+ Y[0] 2.0)))";
    let build = build_query_str(source, &BuildOptions::default()).unwrap();

    assert!(!build.is_well_typed());
    assert!(build.diagnostics.iter().all(|error| error.kind() == ErrorKind::Type));
    let report = build.report();
    assert!(report.contains("int32"), "{}", report);
    assert!(report.contains("float-constant"), "{}", report);
}

#[test]
fn test_scenario_e_with_integer_literal() {
    let source = "(vnnlib-version <2.0>)
(declare-network N (declare-input X float32 [1]) (declare-input Y int32 [1]))
(assert (> (+ X[0] 1) (+ Y[0] 2)))";
    let build = build_query_str(source, &BuildOptions::default()).unwrap();

    assert_eq!(
        build.diagnostics.iter().map(|error| error.get_impl().clone()).collect::<Vec<_>>(),
        vec![ErrorImpl::ComparisonTypeMismatch {
            lhs: String::from("float32"),
            rhs: String::from("int32"),
        }]
    );
}

#[test]
fn test_build_is_idempotent() {
    let source = with_assertion("(and (> X[0,0] 0.5) (< Y[9] 1) (== Q 2))");
    let options = BuildOptions::default();
    let first = build_query_str(&source, &options).unwrap();
    let second = build_query_str(&source, &options).unwrap();

    assert_eq!(first.query, second.query);
    assert_eq!(first.diagnostics, second.diagnostics);
    assert_eq!(first.report(), second.report());
}

#[test]
fn test_errors_follow_source_order() {
    let source = "(vnnlib-version <2.0>)
(declare-network A (isometric-to Missing) (declare-input X float32 [1]))
(declare-network B (declare-input W int8 [2]) (declare-input W int8 [2]))
(assert (> X[3] 0.0))
(assert (== W[0] -1.5))";
    let build = build_query_str(source, &BuildOptions::default()).unwrap();

    let names: Vec<&str> = build.diagnostics.iter().map(|error| error.get_error_name()).collect();
    assert_eq!(
        names,
        vec![
            "NetworkNotDeclared",
            "VariableAlreadyDeclared",
            "IndexOutOfBounds",
            "ComparisonTypeMismatch",
        ]
    );

    let positions: Vec<u32> = build.diagnostics.iter().map(|error| error.get_position().0).collect();
    let mut sorted = positions.clone();
    sorted.sort();
    assert_eq!(positions, sorted);
}

#[test]
fn test_report_snippet() {
    let source = with_assertion("(> X[0,0] Y[0])");
    let options = BuildOptions::default().with_file_name("query.vnnlib");
    let build = build_query_str(&source, &options).unwrap();
    let report = build.report();

    assert!(report.starts_with("Error: ComparisonTypeMismatch [type]"), "{}", report);
    assert!(report.contains("-> query.vnnlib:6"), "{}", report);
    assert!(report.contains("6 | (assert (> X[0,0] Y[0]))"), "{}", report);
    assert_eq!(report, check_query_str(&source).unwrap().replace("<string>", "query.vnnlib"));
}

#[test]
fn test_syntax_error_is_fatal() {
    let source = "(vnnlib-version <2.0>)\n(assert (> X[0,0] 0.5)";
    let error = check_query_str(source).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Syntax);
    assert!(parse_query_str("(vnnlib-version <2.0>) $").is_err());
}

#[test]
fn test_literal_policies() {
    let source = "(vnnlib-version <2.0>)\n(assert (< 1 2))";

    let keep = build_query_str(source, &BuildOptions::default()).unwrap();
    assert!(keep.is_well_typed());

    let reject = BuildOptions::default().with_literal_policy(LiteralPolicy::Reject);
    let reject = build_query_str(source, &reject).unwrap();
    assert_eq!(reject.diagnostics.count_of(ErrorKind::Type), 1);

    let pinned = BuildOptions::default().with_literal_policy("int64".parse().unwrap());
    let pinned = build_query_str(source, &pinned).unwrap();
    assert!(pinned.is_well_typed());
    match &pinned.query.assertions()[0].condition {
        TBoolExpr::Compare(compare) => assert_eq!(compare.lhs.dtype(), DType::I64),
        other => panic!("expected comparison, got {:?}", other),
    }
}

#[test]
fn test_build_from_file() {
    let path = temp_file("scenario_a.vnnlib", &with_assertion("(> X[0,0] 0.5)"));

    let query = parse_query(&path).unwrap();
    assert_eq!(query.networks().len(), 1);
    assert_eq!(check_query(&path).unwrap(), "");

    let build = build_query(&path, &BuildOptions::default()).unwrap();
    assert_eq!(build.file(), path.display().to_string());
}

#[test]
fn test_missing_file() {
    let error = check_query("/nonexistent/query.vnnlib").unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Io);
    assert!(matches!(error.get_impl(), ErrorImpl::FileReadError { .. }));
}

#[test]
fn test_concurrent_builds() {
    let handles: Vec<_> = (0..4)
        .map(|index| {
            thread::spawn(move || {
                let source = with_assertion(&format!("(> X[0,{}] 0.5)", index));
                build_query_str(&source, &BuildOptions::default()).unwrap()
            })
        })
        .collect();

    let builds: Vec<_> = handles.into_iter().map(|handle| handle.join().unwrap()).collect();

    assert!(builds[..3].iter().all(|build| build.is_well_typed()));
    assert_eq!(builds[3].diagnostics.count_of(ErrorKind::Shape), 1);
}

#[test]
fn test_deep_nesting() {
    let nested = |depth: usize| format!("{}X[0,0]{}", "(+ ".repeat(depth), ")".repeat(depth));

    let source = with_assertion(&format!("(> {} 0.5)", nested(MAX_NESTING - 1)));
    assert_eq!(check_query_str(&source).unwrap(), "");

    let source = with_assertion(&format!("(> {} 0.5)", nested(5000)));
    let error = check_query_str(&source).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Syntax);
}
