//! SQL regeneration
//!
//! Function calls are re-joined from their params with the node's own
//! separator, so keyword pseudo-arguments come back out as written:
//! `TRIM(LEADING 'x' FROM col)` rather than `TRIM(LEADING, 'x', FROM, col)`.

use crate::expression::{ExpressionKind, ExpressionNode, FunctionCall};
use fedsql_parser::ast::{Fixity, Operator};
use std::fmt;

impl ExpressionNode {
    /// Render this node as SQL text
    pub fn to_sql(&self) -> String {
        let body = match &self.kind {
            ExpressionKind::Constant(value) => value.to_sql_literal(),
            ExpressionKind::ColumnRef { qualifier, column } => {
                let mut parts: Vec<String> = qualifier.iter().map(|p| quote_ident(p)).collect();
                parts.push(quote_ident(column));
                parts.join(".")
            }
            ExpressionKind::ColumnList { qualifier } => {
                if qualifier.is_empty() {
                    "*".to_string()
                } else {
                    let parts: Vec<String> = qualifier.iter().map(|p| quote_ident(p)).collect();
                    format!("{}.*", parts.join("."))
                }
            }
            ExpressionKind::FunctionCall(call) => render_call(call),
            ExpressionKind::Case(case) => {
                let mut sql = String::from("CASE");
                for branch in &case.branches {
                    sql.push_str(&format!(
                        " WHEN {} THEN {}",
                        branch.predicate.to_sql(),
                        branch.result.to_sql()
                    ));
                }
                if let Some(default) = &case.default {
                    sql.push_str(&format!(" ELSE {}", default.to_sql()));
                }
                sql.push_str(" END");
                sql
            }
            ExpressionKind::Cast { expr, target_type } => {
                format!("CAST({} AS {})", expr.to_sql(), target_type)
            }
            ExpressionKind::Operator { op, operands } => {
                let last = operands.len().saturating_sub(1);
                let rendered: Vec<String> = operands
                    .iter()
                    .enumerate()
                    .map(|(i, operand)| {
                        let sql = operand.to_sql();
                        if needs_parens(*op, operand, i > 0 && i == last) {
                            format!("({})", sql)
                        } else {
                            sql
                        }
                    })
                    .collect();
                match (op.fixity(), rendered.as_slice()) {
                    (Fixity::Prefix, [operand]) => prefix(*op, operand),
                    (Fixity::Postfix, [operand]) => format!("{} {}", operand, op),
                    _ => rendered.join(&format!(" {} ", op)),
                }
            }
        };

        if self.parenthesized {
            format!("({})", body)
        } else {
            body
        }
    }
}

/// Whether an operand must be wrapped to keep its place under `parent`.
/// `right` marks the right operand of an infix operator.
fn needs_parens(parent: Operator, child: &ExpressionNode, right: bool) -> bool {
    let child_op = match &child.kind {
        ExpressionKind::Operator { op, .. } if !child.parenthesized => *op,
        _ => return false,
    };
    if (parent == Operator::Concat) != (child_op == Operator::Concat) {
        return true;
    }
    let (outer, inner) = (parent.precedence(), child_op.precedence());
    match parent.fixity() {
        Fixity::Prefix => inner < outer,
        Fixity::Postfix => inner <= outer,
        Fixity::Infix => inner < outer || (inner == outer && (right || parent.is_comparison())),
    }
}

/// `NOT x`, `-x`; a signed operand is kept apart so `- -x` does not become a comment
pub(crate) fn prefix(op: Operator, operand: &str) -> String {
    if op.as_str().chars().all(char::is_alphabetic) || operand.starts_with(['-', '+']) {
        format!("{} {}", op, operand)
    } else {
        format!("{}{}", op, operand)
    }
}

fn render_call(call: &FunctionCall) -> String {
    if let Some(value) = &call.session_value {
        return value.to_sql_literal();
    }
    if !call.parenthesized && call.params.is_empty() {
        return call.function_name.clone();
    }
    if call.is_count_star() {
        return format!("{}(*)", call.function_name);
    }

    let params: Vec<String> = call.params.iter().map(|p| p.to_sql()).collect();
    let quantifier = if call.distinct {
        "DISTINCT "
    } else if call.all {
        "ALL "
    } else {
        ""
    };
    format!(
        "{}({}{})",
        call.function_name,
        quantifier,
        params.join(&call.arg_separator)
    )
}

/// Quote an identifier unless it is a plain lower-case name
pub fn quote_ident(name: &str) -> String {
    let mut chars = name.chars();
    let plain = match chars.next() {
        Some(first) => {
            (first.is_ascii_lowercase() || first == '_')
                && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$')
        }
        None => false,
    };
    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

/// Render a projection list as `expr [AS alias], ...`
pub fn render_projection(columns: &[ExpressionNode]) -> String {
    columns
        .iter()
        .map(|column| {
            let sql = column.to_sql();
            match column.outer_alias.as_ref().or(column.alias.as_ref()) {
                Some(alias) if !matches!(&column.kind, ExpressionKind::ColumnRef { column, .. } if column == alias) => {
                    format!("{} AS {}", sql, quote_ident(alias))
                }
                _ => sql,
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for ExpressionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
