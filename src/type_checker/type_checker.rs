use std::collections::HashMap;

use crate::{
    ast::{
        ast::{
            Assertion, NetworkDefinition, NetworkRelation, Query, RelationKind, TensorDeclaration,
            Version,
        },
        expressions::{Expr, VarExpr},
    },
    config::{BuildOptions, LiteralPolicy},
    errors::{
        diagnostics::Diagnostics,
        errors::{Error, ErrorImpl},
    },
    Position, Span,
};

use super::{
    dtype::{same_family, unify, DType},
    symbols::{NetworkId, SymbolInfo, SymbolKind, SymbolTable},
    typed_ast::{
        TArithExpr, TAssertion, TBoolExpr, TCompare, TConnective, TDefinition, TFloat, TInt,
        TInvalid, TMinus, TNary, TNegate, TNetworkDefinition, TVarExpr, TVersion, TypedQuery,
    },
};

/// State of one build pass.
///
/// Errors are recorded into `diagnostics` and the pass carries on with
/// `Unknown`/`Invalid` stand-ins, so a single run surfaces every error.
#[derive(Debug)]
pub struct TypeChecker<'a> {
    pub symbols: SymbolTable,
    pub diagnostics: Diagnostics,
    options: &'a BuildOptions,
    /// First declaration of every network name, for relation checks
    /// against networks declared further down.
    declared_networks: HashMap<&'a str, &'a NetworkDefinition>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(query: &'a Query, options: &'a BuildOptions) -> Self {
        let mut declared_networks = HashMap::new();
        for network in &query.networks {
            declared_networks.entry(network.name.as_str()).or_insert(network);
        }

        TypeChecker {
            symbols: SymbolTable::new(),
            diagnostics: Diagnostics::new(),
            options,
            declared_networks,
        }
    }

    pub fn report(&mut self, error: Error) {
        self.diagnostics.push(error);
    }

    fn report_at(&mut self, error_impl: ErrorImpl, position: &Position) {
        self.report(Error::new(error_impl, position.clone()));
    }
}

fn invalid(expr: &Expr) -> TInvalid {
    TInvalid {
        source: expr.to_string(),
        span: expr.get_span().clone(),
    }
}

pub fn type_check_var(type_checker: &mut TypeChecker, var: &VarExpr) -> TArithExpr {
    let position = &var.span.start;

    let id = match type_checker.symbols.resolve(&var.name, position.clone()) {
        Ok(id) => id,
        Err(error) => {
            type_checker.report(error);
            return TArithExpr::Invalid(TInvalid {
                source: var.name.clone(),
                span: var.span.clone(),
            });
        }
    };

    let symbol = type_checker.symbols.get(id);
    let (kind, dtype, shape) = (symbol.kind, symbol.dtype, symbol.shape.clone());

    if kind == SymbolKind::Network {
        type_checker.report_at(
            ErrorImpl::NetworkUsedAsTensor {
                network: var.name.clone(),
            },
            position,
        );
        return TArithExpr::Invalid(TInvalid {
            source: var.name.clone(),
            span: var.span.clone(),
        });
    }

    if var.indices.len() != shape.len() {
        type_checker.report_at(
            ErrorImpl::IndexRankMismatch {
                variable: var.name.clone(),
                expected: shape.len(),
                received: var.indices.len(),
            },
            position,
        );
    } else {
        for (dimension, (&index, &bound)) in var.indices.iter().zip(shape.iter()).enumerate() {
            // Negative bounds are dimensions without a static size
            if index < 0 || (bound >= 0 && index >= bound) {
                type_checker.report_at(
                    ErrorImpl::IndexOutOfBounds {
                        variable: var.name.clone(),
                        index,
                        dimension,
                        bound,
                    },
                    position,
                );
            }
        }
    }

    TArithExpr::Var(TVarExpr {
        symbol: id,
        name: var.name.clone(),
        indices: var.indices.clone(),
        dtype,
        span: var.span.clone(),
    })
}

/// Settles the operands of an arithmetic node on one element type.
///
/// Returns `Unknown` once any operand is rejected or was already `Unknown`.
/// Otherwise every literal operand is pinned to the concrete kind, if there
/// is one.
fn unify_operands(type_checker: &mut TypeChecker, operands: &mut [TArithExpr]) -> DType {
    let mut running: Option<DType> = None;
    let mut failed = false;

    for operand in operands.iter() {
        let dtype = operand.dtype();

        if dtype != DType::Unknown && !dtype.is_numeric() {
            type_checker.report_at(
                ErrorImpl::NonNumericOperand {
                    type_: dtype.to_string(),
                    operand: operand.to_string(),
                },
                &operand.get_span().start,
            );
            failed = true;
            continue;
        }

        running = match running {
            None => Some(dtype),
            Some(current) => match unify(current, dtype) {
                Some(unified) => Some(unified),
                None => {
                    type_checker.report_at(
                        ErrorImpl::TypeMatchError {
                            expected: current.to_string(),
                            received: dtype.to_string(),
                            operand: operand.to_string(),
                        },
                        &operand.get_span().start,
                    );
                    failed = true;
                    Some(current)
                }
            },
        };
    }

    if failed || operands.iter().any(|operand| operand.dtype() == DType::Unknown) {
        return DType::Unknown;
    }

    let dtype = running.unwrap_or(DType::Unknown);
    if dtype.is_concrete() {
        operands.iter_mut().for_each(|operand| operand.pin(dtype));
    }
    dtype
}

pub fn type_check_arith(type_checker: &mut TypeChecker, expr: &Expr) -> TArithExpr {
    match expr {
        Expr::Var(var) => type_check_var(type_checker, var),
        Expr::Int(int) => TArithExpr::Int(TInt {
            lexeme: int.lexeme.clone(),
            value: int.value,
            dtype: if int.lexeme.starts_with('-') {
                DType::NegativeIntConstant
            } else {
                DType::PositiveIntConstant
            },
            span: int.span.clone(),
        }),
        Expr::Float(float) => TArithExpr::Float(TFloat {
            lexeme: float.lexeme.clone(),
            value: float.value,
            dtype: DType::FloatConstant,
            span: float.span.clone(),
        }),
        Expr::Negate(negate) => {
            let operand = type_check_arith(type_checker, &negate.expr);
            let mut operands = [operand];
            let dtype = match unify_operands(type_checker, &mut operands) {
                DType::PositiveIntConstant => DType::NegativeIntConstant,
                DType::NegativeIntConstant => DType::PositiveIntConstant,
                other => other,
            };
            let [operand] = operands;

            TArithExpr::Negate(TNegate {
                expr: Box::new(operand),
                dtype,
                span: negate.span.clone(),
            })
        }
        Expr::Plus(nary) | Expr::Multiply(nary) => {
            let mut args: Vec<TArithExpr> = nary
                .args
                .iter()
                .map(|arg| type_check_arith(type_checker, arg))
                .collect();
            let dtype = unify_operands(type_checker, &mut args);
            let typed = TNary {
                args,
                dtype,
                span: nary.span.clone(),
            };

            if let Expr::Plus(_) = expr {
                TArithExpr::Plus(typed)
            } else {
                TArithExpr::Multiply(typed)
            }
        }
        Expr::Minus(minus) => {
            let mut args: Vec<TArithExpr> = std::iter::once(&*minus.head)
                .chain(minus.rest.iter())
                .map(|arg| type_check_arith(type_checker, arg))
                .collect();
            let dtype = unify_operands(type_checker, &mut args);
            let head = args.remove(0);

            TArithExpr::Minus(TMinus {
                head: Box::new(head),
                rest: args,
                dtype,
                span: minus.span.clone(),
            })
        }
        Expr::Compare(_) | Expr::Connective(_) => {
            // Type it anyway so errors inside are still reported
            type_check_bool(type_checker, expr);
            type_checker.report_at(
                ErrorImpl::ExpectedArithmetic {
                    found: expr.to_string(),
                },
                &expr.get_span().start,
            );
            TArithExpr::Invalid(invalid(expr))
        }
    }
}

/// Applies the configured policy to a comparison of literals only.
fn apply_literal_policy(
    type_checker: &mut TypeChecker,
    lhs: &mut TArithExpr,
    rhs: &mut TArithExpr,
    dtype: DType,
    position: &Position,
) {
    match type_checker.options.literal_policy {
        LiteralPolicy::Keep => {}
        LiteralPolicy::Default(target) => {
            if same_family(target, dtype) {
                lhs.pin(target);
                rhs.pin(target);
            } else {
                type_checker.report_at(
                    ErrorImpl::TypeMatchError {
                        expected: target.to_string(),
                        received: dtype.to_string(),
                        operand: format!("{} {}", lhs, rhs),
                    },
                    position,
                );
            }
        }
        LiteralPolicy::Reject => type_checker.report_at(
            ErrorImpl::UnpinnedLiteral {
                type_: dtype.to_string(),
            },
            position,
        ),
    }
}

pub fn type_check_bool(type_checker: &mut TypeChecker, expr: &Expr) -> TBoolExpr {
    match expr {
        Expr::Compare(compare) => {
            let mut lhs = type_check_arith(type_checker, &compare.lhs);
            let mut rhs = type_check_arith(type_checker, &compare.rhs);
            let position = &compare.span.start;

            match unify(lhs.dtype(), rhs.dtype()) {
                None => type_checker.report_at(
                    ErrorImpl::ComparisonTypeMismatch {
                        lhs: lhs.dtype().to_string(),
                        rhs: rhs.dtype().to_string(),
                    },
                    position,
                ),
                Some(dtype) if dtype.is_constant() => {
                    if lhs.dtype().is_constant() && rhs.dtype().is_constant() {
                        apply_literal_policy(type_checker, &mut lhs, &mut rhs, dtype, position)
                    }
                }
                Some(dtype) => {
                    lhs.pin(dtype);
                    rhs.pin(dtype);
                }
            }

            TBoolExpr::Compare(TCompare {
                op: compare.op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span: compare.span.clone(),
            })
        }
        Expr::Connective(connective) => TBoolExpr::Connective(TConnective {
            op: connective.op,
            args: connective
                .args
                .iter()
                .map(|arg| type_check_bool(type_checker, arg))
                .collect(),
            span: connective.span.clone(),
        }),
        _ => {
            let typed = type_check_arith(type_checker, expr);
            type_checker.report_at(
                ErrorImpl::ExpectedBoolean {
                    found: expr.to_string(),
                    type_: typed.dtype().to_string(),
                },
                &expr.get_span().start,
            );
            TBoolExpr::Invalid(invalid(expr))
        }
    }
}

pub fn type_check_assertion(type_checker: &mut TypeChecker, assertion: &Assertion) -> TAssertion {
    let condition = type_check_bool(type_checker, &assertion.condition);
    tracing::debug!(assertion = %condition, "typed assertion");

    TAssertion {
        condition,
        span: assertion.span.clone(),
    }
}

/// `major.minor`, both non-negative integers. Anything else is reported and
/// read as `0.0`.
pub fn type_check_version(type_checker: &mut TypeChecker, version: &Version) -> TVersion {
    let parsed = version
        .lexeme
        .split_once('.')
        .and_then(|(major, minor)| Some((major.parse::<u32>().ok()?, minor.parse::<u32>().ok()?)));

    let (major, minor) = parsed.unwrap_or_else(|| {
        type_checker.report_at(
            ErrorImpl::InvalidVersion {
                version: version.lexeme.clone(),
            },
            &version.span.start,
        );
        (0, 0)
    });

    TVersion {
        major,
        minor,
        span: version.span.clone(),
    }
}

/// Why `other` cannot stand in for `network`, if it cannot.
fn signature_mismatch(network: &NetworkDefinition, other: &NetworkDefinition) -> Option<String> {
    let sides = [
        ("input", &network.inputs, &other.inputs),
        ("output", &network.outputs, &other.outputs),
    ];

    for (role, ours, theirs) in sides {
        if ours.len() != theirs.len() {
            return Some(format!(
                "{} {}s against {}",
                ours.len(),
                role,
                theirs.len()
            ));
        }

        for (position, (a, b)) in ours.iter().zip(theirs.iter()).enumerate() {
            if a.element_type.dtype != b.element_type.dtype {
                return Some(format!(
                    "{} {} `{}` has type `{}`, expected `{}`",
                    role, position, a.name, a.element_type.dtype, b.element_type.dtype
                ));
            }
            if a.shape != b.shape {
                return Some(format!(
                    "{} {} `{}` has shape {:?}, expected {:?}",
                    role, position, a.name, a.shape, b.shape
                ));
            }
        }
    }

    None
}

/// Checks one relation of `network` and returns whether its target can be
/// recorded.
fn type_check_relation(
    type_checker: &mut TypeChecker,
    network: &NetworkDefinition,
    relation: &NetworkRelation,
) -> bool {
    let position = &relation.span.start;

    if relation.target == network.name {
        type_checker.report_at(
            ErrorImpl::SelfRelation {
                network: network.name.clone(),
            },
            position,
        );
        return false;
    }

    let Some(&other) = type_checker.declared_networks.get(relation.target.as_str()) else {
        type_checker.report_at(
            ErrorImpl::NetworkNotDeclared {
                network: relation.target.clone(),
            },
            position,
        );
        return false;
    };

    if let Some(detail) = signature_mismatch(network, other) {
        type_checker.report_at(
            ErrorImpl::RelationSignatureMismatch {
                network: network.name.clone(),
                other: relation.target.clone(),
                detail,
            },
            position,
        );
    }

    true
}

pub fn type_check_definition(
    type_checker: &mut TypeChecker,
    scope: NetworkId,
    network: &NetworkDefinition,
    declaration: &TensorDeclaration,
    kind: SymbolKind,
) -> TDefinition {
    let info = SymbolInfo {
        name: declaration.name.clone(),
        onnx_name: declaration.onnx_name.clone(),
        dtype: declaration.element_type.dtype,
        shape: declaration.shape.clone(),
        kind,
        network_name: network.name.clone(),
    };

    let symbol = type_checker.symbols.insert(info.clone());
    if let Err(error) = type_checker
        .symbols
        .declare_variable(scope, symbol, declaration.span.start.clone())
    {
        type_checker.report(error);
    }

    TDefinition::new(symbol, &info, declaration.span.clone())
}

/// A form inside a network block.
enum NetworkItem<'n> {
    Relation(&'n NetworkRelation),
    Declaration(&'n TensorDeclaration, SymbolKind),
}

impl NetworkItem<'_> {
    fn offset(&self) -> u32 {
        match self {
            NetworkItem::Relation(relation) => relation.span.start.0,
            NetworkItem::Declaration(declaration, _) => declaration.span.start.0,
        }
    }
}

fn declaration_items(
    declarations: &[TensorDeclaration],
    kind: SymbolKind,
) -> impl Iterator<Item = NetworkItem<'_>> {
    declarations
        .iter()
        .map(move |declaration| NetworkItem::Declaration(declaration, kind))
}

/// Every form of `network`, in the order it was written.
fn network_items(network: &NetworkDefinition) -> Vec<NetworkItem<'_>> {
    let mut items: Vec<NetworkItem> = network.relations.iter().map(NetworkItem::Relation).collect();
    items.extend(declaration_items(&network.inputs, SymbolKind::Input));
    items.extend(declaration_items(&network.hidden, SymbolKind::Hidden));
    items.extend(declaration_items(&network.outputs, SymbolKind::Output));
    items.sort_by_key(|item| item.offset());
    items
}

pub fn type_check_network(
    type_checker: &mut TypeChecker,
    network: &NetworkDefinition,
) -> TNetworkDefinition {
    let (scope, symbol) = type_checker
        .symbols
        .declare_network(&network.name, network.span.start.clone());

    let symbol = match symbol {
        Ok(symbol) => Some(symbol),
        Err(error) => {
            type_checker.report(error);
            None
        }
    };

    let mut isometric_to = None;
    let mut equal_to = None;
    let mut relations = 0;
    let (mut inputs, mut hidden, mut outputs) = (vec![], vec![], vec![]);

    for item in network_items(network) {
        match item {
            NetworkItem::Relation(relation) => {
                let resolved = type_check_relation(type_checker, network, relation);

                relations += 1;
                if relations > 1 {
                    type_checker.report_at(
                        ErrorImpl::ContradictoryRelations {
                            network: network.name.clone(),
                        },
                        &relation.span.start,
                    );
                }

                let slot = match relation.kind {
                    RelationKind::IsometricTo => &mut isometric_to,
                    RelationKind::EqualTo => &mut equal_to,
                };
                if resolved && slot.is_none() {
                    *slot = Some(relation.target.clone());
                }
            }
            NetworkItem::Declaration(declaration, kind) => {
                let definition = type_check_definition(type_checker, scope, network, declaration, kind);
                match kind {
                    SymbolKind::Input => inputs.push(definition),
                    SymbolKind::Hidden => hidden.push(definition),
                    _ => outputs.push(definition),
                }
            }
        }
    }

    tracing::debug!(
        network = %network.name,
        inputs = inputs.len(),
        hidden = hidden.len(),
        outputs = outputs.len(),
        "built network"
    );

    TNetworkDefinition {
        name: network.name.clone(),
        symbol,
        isometric_to,
        equal_to,
        inputs,
        hidden,
        outputs,
        span: network.span.clone(),
    }
}

/// Builds the typed tree for `query`.
///
/// Never fails: every semantic error is recorded in the returned
/// diagnostics, in source order, next to a best-effort tree.
pub fn type_check(query: &Query, options: &BuildOptions) -> (TypedQuery, Diagnostics) {
    let mut type_checker = TypeChecker::new(query, options);

    let version = type_check_version(&mut type_checker, &query.version);

    let networks: Vec<TNetworkDefinition> = query
        .networks
        .iter()
        .map(|network| type_check_network(&mut type_checker, network))
        .collect();

    let assertions: Vec<TAssertion> = query
        .assertions
        .iter()
        .map(|assertion| type_check_assertion(&mut type_checker, assertion))
        .collect();

    tracing::debug!(
        networks = networks.len(),
        assertions = assertions.len(),
        symbols = type_checker.symbols.len(),
        errors = type_checker.diagnostics.len(),
        "type check finished"
    );

    let TypeChecker {
        symbols,
        diagnostics,
        ..
    } = type_checker;

    let span = Span {
        start: query.span.start.clone(),
        end: query.span.end.clone(),
    };

    (
        TypedQuery::new(version, networks, assertions, symbols, span),
        diagnostics,
    )
}
