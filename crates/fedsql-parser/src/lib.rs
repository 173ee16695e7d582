//! fedsql Parser - SQL text to concrete parse tree
//!
//! This crate wraps sqlparser-rs and lowers its AST into the closed
//! [`ast::ParseNode`] productions the expression layer consumes.

use fedsql_common::{Error, Result};
use sqlparser::ast::{SetExpr, Statement};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::{Parser, ParserError};
use sqlparser::tokenizer::Token;

pub mod ast;
mod grammar;

pub use ast::{ParseNode, SelectEntry};
use grammar::Grammar;

/// Recursion allowance on top of the expression nesting bound, covering the
/// statement and query levels sqlparser descends through first.
const STATEMENT_OVERHEAD: usize = 16;

/// Parse a SQL string into a list of statements
pub fn parse_sql(sql: &str) -> Result<Vec<Statement>> {
    let dialect = GenericDialect {};
    Parser::parse_sql(&dialect, sql).map_err(|e| Error::Parse(e.to_string()))
}

/// Parse a single SQL statement
pub fn parse_statement(sql: &str) -> Result<Statement> {
    let mut statements = parse_sql(sql)?;
    if statements.len() != 1 {
        return Err(Error::Parse(format!(
            "Expected 1 statement, got {}",
            statements.len()
        )));
    }
    Ok(statements.remove(0))
}

fn parse_error(err: ParserError, max_depth: usize) -> Error {
    match err {
        ParserError::RecursionLimitExceeded => Error::NestingTooDeep {
            depth: max_depth + 1,
            max: max_depth,
        },
        other => Error::Parse(other.to_string()),
    }
}

/// Parse the projection list of a single `SELECT` statement.
///
/// `max_depth` bounds expression nesting; deeper input fails with
/// [`Error::NestingTooDeep`].
pub fn parse_projection(sql: &str, max_depth: usize) -> Result<Vec<SelectEntry>> {
    let dialect = GenericDialect {};
    let mut statements = Parser::new(&dialect)
        .with_recursion_limit(max_depth + STATEMENT_OVERHEAD)
        .try_with_sql(sql)
        .and_then(|mut parser| parser.parse_statements())
        .map_err(|e| parse_error(e, max_depth))?;

    if statements.len() != 1 {
        return Err(Error::Parse(format!(
            "Expected 1 statement, got {}",
            statements.len()
        )));
    }

    let query = match statements.remove(0) {
        Statement::Query(query) => query,
        other => {
            return Err(Error::Parse(format!(
                "Expected a SELECT statement, got: {}",
                other
            )))
        }
    };
    let select = match query.body.as_ref() {
        SetExpr::Select(select) => select,
        _ => {
            return Err(Error::NotImplemented(
                "Projection of set operations and VALUES".to_string(),
            ))
        }
    };

    let grammar = Grammar::new(sql);
    let entries: Result<Vec<_>> = select
        .projection
        .iter()
        .map(|item| grammar.select_item(item))
        .collect();
    let entries = entries?;
    log::debug!("parsed projection of {} entries", entries.len());
    Ok(entries)
}

/// Parse a standalone scalar expression
pub fn parse_expression(sql: &str, max_depth: usize) -> Result<ParseNode> {
    let dialect = GenericDialect {};
    let mut parser = Parser::new(&dialect)
        .with_recursion_limit(max_depth + STATEMENT_OVERHEAD)
        .try_with_sql(sql)
        .map_err(|e| parse_error(e, max_depth))?;
    let expr = parser.parse_expr().map_err(|e| parse_error(e, max_depth))?;

    let trailing = parser.peek_token();
    if trailing.token != Token::EOF {
        return Err(Error::Parse(format!(
            "Unexpected trailing input: {}",
            trailing.token
        )));
    }

    Grammar::new(sql).expr(&expr)
}
