use crate::{
    ast::ast::{
        Assertion, ElementType, NetworkDefinition, NetworkRelation, RelationKind,
        TensorDeclaration, Version,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::expr::parse_expr,
    type_checker::dtype::DType,
    Span,
};

use super::parser::Parser;

/// A top-level form, before it is sorted into the query.
#[derive(Debug, Clone, PartialEq)]
pub enum TopLevel {
    Version(Version),
    Network(NetworkDefinition),
    Assertion(Assertion),
}

pub fn parse_stmt(parser: &mut Parser) -> Result<TopLevel, Error> {
    let keyword = parser.peek_kind(1);
    let handler = if parser.current_token_kind() == TokenKind::OpenParen {
        parser.get_stmt_lookup().get(&keyword).copied()
    } else {
        None
    };

    match handler {
        Some(handler) => handler(parser),
        None => Err(parser.error_detailed("expected a version, network declaration or assertion")),
    }
}

pub fn parse_version_stmt(parser: &mut Parser) -> Result<TopLevel, Error> {
    let start = parser.expect(TokenKind::OpenParen)?.span.start;
    parser.expect(TokenKind::VnnlibVersion)?;
    parser.expect_detailed(TokenKind::Less, "expected `<` before the version number")?;
    let number = parser.expect_detailed(TokenKind::Number, "expected a version number")?;
    parser.expect_detailed(TokenKind::Greater, "expected `>` after the version number")?;
    let end = parser.expect(TokenKind::CloseParen)?.span.end;

    Ok(TopLevel::Version(Version {
        lexeme: number.value,
        span: Span { start, end },
    }))
}

pub fn parse_network_stmt(parser: &mut Parser) -> Result<TopLevel, Error> {
    let start = parser.expect(TokenKind::OpenParen)?.span.start;
    parser.expect(TokenKind::DeclareNetwork)?;
    let name = parser
        .expect_detailed(TokenKind::Identifier, "expected network name")?
        .value;

    let mut network = NetworkDefinition {
        name,
        relations: vec![],
        inputs: vec![],
        hidden: vec![],
        outputs: vec![],
        span: Span::null(),
    };

    while parser.current_token_kind() == TokenKind::OpenParen {
        let keyword = parser.peek_kind(1);
        let handler = parser.get_definition_lookup().get(&keyword).copied();

        match handler {
            Some(handler) => handler(parser, &mut network)?,
            None => {
                parser.advance();
                return Err(parser.error_detailed("expected a tensor declaration or network relation"));
            }
        }
    }

    let end = parser
        .expect_detailed(TokenKind::CloseParen, "expected `)` to close the network declaration")?
        .span
        .end;
    network.span = Span { start, end };

    Ok(TopLevel::Network(network))
}

pub fn parse_relation(parser: &mut Parser, network: &mut NetworkDefinition) -> Result<(), Error> {
    let start = parser.expect(TokenKind::OpenParen)?.span.start;
    let kind = match parser.advance().kind {
        TokenKind::EqualTo => RelationKind::EqualTo,
        _ => RelationKind::IsometricTo,
    };
    let target = parser
        .expect_detailed(TokenKind::Identifier, "expected the related network name")?
        .value;
    let end = parser.expect(TokenKind::CloseParen)?.span.end;

    network.relations.push(NetworkRelation {
        kind,
        target,
        span: Span { start, end },
    });
    Ok(())
}

pub fn parse_input_definition(parser: &mut Parser, network: &mut NetworkDefinition) -> Result<(), Error> {
    let declaration = parse_tensor_declaration(parser, false)?;
    network.inputs.push(declaration);
    Ok(())
}

pub fn parse_hidden_definition(parser: &mut Parser, network: &mut NetworkDefinition) -> Result<(), Error> {
    let declaration = parse_tensor_declaration(parser, true)?;
    network.hidden.push(declaration);
    Ok(())
}

pub fn parse_output_definition(parser: &mut Parser, network: &mut NetworkDefinition) -> Result<(), Error> {
    let declaration = parse_tensor_declaration(parser, false)?;
    network.outputs.push(declaration);
    Ok(())
}

/// `(declare-<kind> name type [dims] "onnx-name"?)`
fn parse_tensor_declaration(parser: &mut Parser, onnx_required: bool) -> Result<TensorDeclaration, Error> {
    let start = parser.expect(TokenKind::OpenParen)?.span.start;
    parser.advance();

    let name = parser
        .expect_detailed(TokenKind::Identifier, "expected identifier during tensor declaration")?
        .value;

    let type_token = parser.expect_detailed(TokenKind::Identifier, "expected element type")?;
    let dtype = type_token.value.parse::<DType>().map_err(|_| {
        Error::new(
            ErrorImpl::UnknownType {
                type_: type_token.value.clone(),
            },
            type_token.span.start.clone(),
        )
    })?;

    let shape = parse_shape(parser)?;

    let onnx_name = if parser.current_token_kind() == TokenKind::String {
        Some(parser.advance().value.clone())
    } else if onnx_required {
        return Err(parser.error_detailed("hidden tensors require an ONNX node name"));
    } else {
        None
    };

    let end = parser.expect(TokenKind::CloseParen)?.span.end;

    Ok(TensorDeclaration {
        name,
        element_type: ElementType { dtype },
        shape,
        onnx_name,
        span: Span { start, end },
    })
}

/// `[d0, d1, ...]`; a negative dimension has no static size.
pub fn parse_shape(parser: &mut Parser) -> Result<Vec<i64>, Error> {
    parser.expect_detailed(TokenKind::OpenBracket, "expected `[` to open the shape")?;
    let dims = parse_int_list(parser)?;
    parser.expect_detailed(TokenKind::CloseBracket, "expected `]` to close the shape")?;
    Ok(dims)
}

/// Comma separated integers up to, but not including, the closing bracket.
pub fn parse_int_list(parser: &mut Parser) -> Result<Vec<i64>, Error> {
    let mut values = vec![];

    if parser.current_token_kind() == TokenKind::CloseBracket {
        return Ok(values);
    }

    loop {
        values.push(parse_int(parser)?);

        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }

    Ok(values)
}

fn parse_int(parser: &mut Parser) -> Result<i64, Error> {
    let token = parser.expect_detailed(TokenKind::Number, "expected an integer")?;

    match token.value.parse::<i64>() {
        Ok(value) => Ok(value),
        Err(_) if token.value.contains(['.', 'e', 'E']) => Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.value,
                message: String::from("expected an integer"),
            },
            token.span.start,
        )),
        Err(_) => Err(Error::new(
            ErrorImpl::NumberParseError { token: token.value },
            token.span.start,
        )),
    }
}

pub fn parse_assert_stmt(parser: &mut Parser) -> Result<TopLevel, Error> {
    let start = parser.expect(TokenKind::OpenParen)?.span.start;
    parser.expect(TokenKind::Assert)?;
    let condition = parse_expr(parser)?;
    let end = parser
        .expect_detailed(TokenKind::CloseParen, "expected `)` after the asserted expression")?
        .span
        .end;

    Ok(TopLevel::Assertion(Assertion {
        condition,
        span: Span { start, end },
    }))
}
