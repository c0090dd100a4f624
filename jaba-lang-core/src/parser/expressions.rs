use std::rc::Rc;

use super::error::{Expected, ParseError};
use crate::ast::{BinaryOperator, Expression, FunctionLiteral, Identifier, Sign};
use crate::parser::Parser;
use crate::stack::ensure_sufficient_stack;
use crate::token::{Token, TokenKind};

/// Lowest level of the grammar. `name = ...` is only an assignment when the
/// identifier is directly followed by `=`; assignment is right-associative.
pub fn parse_assignment(parser: &mut Parser) -> Result<Expression, ParseError> {
    ensure_sufficient_stack(|| parse_assignment_inner(parser))
}

fn parse_assignment_inner(parser: &mut Parser) -> Result<Expression, ParseError> {
    if parser.peek().kind == TokenKind::Identifier
        && parser.peek_nth(1).kind == TokenKind::Assignment
    {
        let name = parser.parse_ident()?;
        parser.expect_token(TokenKind::Assignment)?;
        parser.expect_expression()?;
        let value = parse_assignment(parser)?;

        return Ok(Expression::Assignment {
            identifier: Identifier { name },
            value: Box::new(value),
        });
    }

    parse_ternary(parser)
}

fn parse_ternary(parser: &mut Parser) -> Result<Expression, ParseError> {
    let condition = parse_sum(parser)?;

    if parser.next_if(TokenKind::TernaryStart).is_none() {
        return Ok(condition);
    }

    parser.expect_expression()?;
    let consequence = parse_assignment(parser)?;
    parser.expect_token(TokenKind::TernarySep)?;
    parser.expect_expression()?;
    let alternative = parse_assignment(parser)?;

    Ok(Expression::Ternary {
        condition: Box::new(condition),
        consequence: Box::new(consequence),
        alternative: Box::new(alternative),
    })
}

fn sum_operator(kind: TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Plus => Some(BinaryOperator::Plus),
        TokenKind::Minus => Some(BinaryOperator::Minus),
        _ => None,
    }
}

fn product_operator(kind: TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Mul => Some(BinaryOperator::Multiply),
        TokenKind::Div => Some(BinaryOperator::Divide),
        TokenKind::Mod => Some(BinaryOperator::Modulo),
        _ => None,
    }
}

/// Left-associative chain of operands joined by any operator `operator_of`
/// recognises.
fn parse_binary_chain(
    parser: &mut Parser,
    operator_of: fn(TokenKind) -> Option<BinaryOperator>,
    parse_operand: fn(&mut Parser) -> Result<Expression, ParseError>,
) -> Result<Expression, ParseError> {
    let mut left = parse_operand(parser)?;

    while let Some(operator) = operator_of(parser.peek().kind) {
        parser.next();
        parser.expect_expression()?;
        let right = parse_operand(parser)?;
        left = Expression::Binary(operator, Box::new(left), Box::new(right));
    }

    Ok(left)
}

fn parse_sum(parser: &mut Parser) -> Result<Expression, ParseError> {
    parse_binary_chain(parser, sum_operator, parse_product)
}

fn parse_product(parser: &mut Parser) -> Result<Expression, ParseError> {
    parse_binary_chain(parser, product_operator, parse_call)
}

/// Every parenthesised group after a callee applies the previous result, so
/// `f(1)(2)` calls whatever `f(1)` returns.
fn parse_call(parser: &mut Parser) -> Result<Expression, ParseError> {
    let mut function = parse_unary(parser)?;

    while parser.next_if(TokenKind::LParen).is_some() {
        let arguments = parse_arguments(parser)?;
        function = Expression::Call {
            function: Box::new(function),
            arguments,
        };
    }

    Ok(function)
}

// Arguments are separated by whitespace only, so `f(1 -2)` has one argument.
fn parse_arguments(parser: &mut Parser) -> Result<Vec<Expression>, ParseError> {
    let mut arguments = Vec::new();

    loop {
        parser.expect_expression()?;
        if parser.next_if(TokenKind::RParen).is_some() {
            return Ok(arguments);
        }
        arguments.push(parse_sum(parser)?);
    }
}

fn parse_unary(parser: &mut Parser) -> Result<Expression, ParseError> {
    ensure_sufficient_stack(|| parse_unary_inner(parser))
}

fn parse_unary_inner(parser: &mut Parser) -> Result<Expression, ParseError> {
    let sign = match parser.peek().kind {
        TokenKind::Minus => Sign::Minus,
        TokenKind::Plus => Sign::Plus,
        _ => return parse_atom(parser),
    };
    parser.next();
    parser.expect_expression()?;

    Ok(Expression::Unary(sign, Box::new(parse_atom(parser)?)))
}

fn parse_atom(parser: &mut Parser) -> Result<Expression, ParseError> {
    let token = parser.next();
    match token.kind {
        TokenKind::Integer => parse_integer(token),
        TokenKind::Identifier => Ok(Expression::Identifier(Identifier { name: token.text })),
        TokenKind::LParen => parse_grouped_expression(parser),
        TokenKind::Pipe => parse_function_literal(parser),
        TokenKind::NewLine | TokenKind::EndOfInput => {
            Err(ParseError::premature_end_expected_expression())
        }
        _ => Err(ParseError::unexpected_other(Expected::Expression, token)),
    }
}

fn parse_integer(token: Token) -> Result<Expression, ParseError> {
    token
        .text
        .parse()
        .map(Expression::IntegerLiteral)
        .map_err(|source| ParseError::InvalidInteger {
            literal: token.text.to_string(),
            source,
        })
}

fn parse_grouped_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    parser.expect_expression()?;
    let expression = parse_assignment(parser)?;
    parser.expect_token(TokenKind::RParen)?;

    Ok(expression)
}

fn parse_function_literal(parser: &mut Parser) -> Result<Expression, ParseError> {
    let mut parameters = Vec::new();
    while parser.peek().kind == TokenKind::Identifier {
        parameters.push(Identifier {
            name: parser.parse_ident()?,
        });
    }
    parser.expect_token(TokenKind::Pipe)?;

    parser.expect_expression()?;
    let body = parse_assignment(parser)?;

    Ok(Expression::FunctionLiteral(Rc::new(FunctionLiteral {
        parameters,
        body,
    })))
}
