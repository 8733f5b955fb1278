use crate::{
    ast::expressions::{
        CompareExpr, CompareOp, ConnectiveExpr, ConnectiveOp, Expr, FloatExpr, IntExpr,
        MinusExpr, NaryExpr, NegateExpr, VarExpr,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Span,
};

use super::{parser::Parser, stmt::parse_int_list};

pub fn parse_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token_kind = parser.current_token_kind();
    let handler = parser.get_nud_lookup().get(&token_kind).copied();

    match handler {
        Some(handler) => handler(parser),
        None => Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: parser.current_token().value.clone(),
            },
            parser.get_position(),
        )),
    }
}

/// Dispatches `( op ...)` on the operator token.
pub fn parse_compound_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator = parser.peek_kind(1);
    let handler = parser.get_compound_lookup().get(&operator).copied();

    match handler {
        Some(handler) => {
            parser.enter_nesting()?;
            let expr = handler(parser);
            parser.exit_nesting();
            expr
        }
        None => {
            parser.advance();
            Err(parser.error_detailed("expected an operator after `(`"))
        }
    }
}

pub fn parse_number_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();
    let span = token.span.clone();

    if token.value.contains(['.', 'e', 'E']) {
        match token.value.parse::<f64>() {
            Ok(value) => Ok(Expr::Float(FloatExpr {
                lexeme: token.value,
                value,
                span,
            })),
            Err(_) => Err(Error::new(ErrorImpl::NumberParseError { token: token.value }, span.start)),
        }
    } else {
        match token.value.parse::<i64>() {
            Ok(value) => Ok(Expr::Int(IntExpr {
                lexeme: token.value,
                value,
                span,
            })),
            Err(_) => Err(Error::new(ErrorImpl::NumberParseError { token: token.value }, span.start)),
        }
    }
}

pub fn parse_var_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();
    let mut span = token.span;

    let indices = if parser.current_token_kind() == TokenKind::OpenBracket {
        parser.advance();
        let indices = parse_int_list(parser)?;
        span.end = parser
            .expect_detailed(TokenKind::CloseBracket, "expected `]` after the indices")?
            .span
            .end;
        indices
    } else {
        vec![]
    };

    Ok(Expr::Var(VarExpr {
        name: token.value,
        indices,
        span,
    }))
}

/// Consumes `( op operand* )` and returns the operator token, the operands
/// and the span of the whole form.
fn parse_operands(parser: &mut Parser) -> Result<(Token, Vec<Expr>, Span), Error> {
    let start = parser.expect(TokenKind::OpenParen)?.span.start;
    let operator = parser.advance().clone();

    let mut args = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        args.push(parse_expr(parser)?);
    }

    let end = parser.advance().span.end.clone();
    Ok((operator, args, Span { start, end }))
}

fn arity_error(operator: &Token, message: &str) -> Error {
    Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: operator.value.clone(),
            message: String::from(message),
        },
        operator.span.start.clone(),
    )
}

pub fn parse_plus_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let (operator, args, span) = parse_operands(parser)?;
    if args.is_empty() {
        return Err(arity_error(&operator, "`+` takes at least one operand"));
    }

    Ok(Expr::Plus(NaryExpr { args, span }))
}

pub fn parse_multiply_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let (operator, args, span) = parse_operands(parser)?;
    if args.is_empty() {
        return Err(arity_error(&operator, "`*` takes at least one operand"));
    }

    Ok(Expr::Multiply(NaryExpr { args, span }))
}

/// `(- e)` negates, `(- e e+)` subtracts the rest from the head.
pub fn parse_minus_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let (operator, mut args, span) = parse_operands(parser)?;

    match args.len() {
        0 => Err(arity_error(&operator, "`-` takes at least one operand")),
        1 => Ok(Expr::Negate(NegateExpr {
            expr: Box::new(args.remove(0)),
            span,
        })),
        _ => {
            let head = args.remove(0);
            Ok(Expr::Minus(MinusExpr {
                head: Box::new(head),
                rest: args,
                span,
            }))
        }
    }
}

pub fn parse_compare_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let (operator, args, span) = parse_operands(parser)?;

    let op = match operator.kind {
        TokenKind::Greater => CompareOp::GreaterThan,
        TokenKind::Less => CompareOp::LessThan,
        TokenKind::GreaterEquals => CompareOp::GreaterEqual,
        TokenKind::LessEquals => CompareOp::LessEqual,
        TokenKind::Equals => CompareOp::Equal,
        _ => CompareOp::NotEqual,
    };

    let mut args = args.into_iter();
    match (args.next(), args.next(), args.next()) {
        (Some(lhs), Some(rhs), None) => Ok(Expr::Compare(CompareExpr {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            span,
        })),
        _ => Err(arity_error(&operator, "comparisons take exactly two operands")),
    }
}

pub fn parse_connective_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let (operator, args, span) = parse_operands(parser)?;

    let op = match operator.kind {
        TokenKind::And => ConnectiveOp::And,
        _ => ConnectiveOp::Or,
    };

    if args.is_empty() {
        return Err(arity_error(&operator, &format!("`{}` takes at least one operand", op)));
    }

    Ok(Expr::Connective(ConnectiveExpr { op, args, span }))
}
