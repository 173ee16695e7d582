//! Expression lowering: parse tree to expression nodes
//!
//! An [`ExpressionBuilder`] lowers one parse node. Every sub-expression is
//! lowered by a fresh child builder one level deeper, which is how the
//! nesting bound is enforced. Token text is accumulated per builder and merged
//! into the parent when the child returns.

use crate::expression::{ExpressionKind, ExpressionNode};
use crate::render::prefix;
use crate::text::TokenText;
use crate::Binder;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use fedsql_common::{Error, Result, Value};
use fedsql_parser::ast::{CastTarget, Literal, Operator, ParseNode, RawIdent};

/// Lowers a single parse node
pub struct ExpressionBuilder<'a> {
    binder: &'a Binder,
    depth: usize,
}

impl<'a> ExpressionBuilder<'a> {
    pub(crate) fn root(binder: &'a Binder) -> Self {
        ExpressionBuilder { binder, depth: 1 }
    }

    pub fn binder(&self) -> &'a Binder {
        self.binder
    }

    /// Nesting level of the node this builder lowers; the root is 1
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// A fresh builder for a direct sub-expression
    pub fn child(&self) -> Result<ExpressionBuilder<'a>> {
        let depth = self.depth + 1;
        let max = self.binder.config().max_nesting_depth;
        if depth > max {
            return Err(Error::NestingTooDeep { depth, max });
        }
        Ok(ExpressionBuilder {
            binder: self.binder,
            depth,
        })
    }

    /// Lower a parse node
    pub fn build(self, node: &ParseNode) -> Result<ExpressionNode> {
        let mut text = TokenText::new();
        let mut built = match node {
            ParseNode::Literal(literal) => self.literal(literal, &mut text)?,
            ParseNode::Identifier(parts) => self.column_ref(parts, &mut text)?,
            ParseNode::Nested(inner) => {
                let mut inner = self.child()?.build(inner)?;
                text.push("(");
                text.merge(&inner.raw_text);
                text.push(")");
                inner.parenthesized = true;
                inner
            }
            ParseNode::BinaryOp { left, op, right } => {
                let left = self.child()?.build(left)?;
                let right = self.child()?.build(right)?;
                text.merge(&left.raw_text);
                text.push(op.as_str());
                text.merge(&right.raw_text);
                if op.is_predicate() {
                    self.binder.predicate_builder().comparison(*op, left, right)?
                } else {
                    operator(*op, vec![left, right])
                }
            }
            ParseNode::UnaryOp { op, expr } => {
                let operand = self.child()?.build(expr)?;
                if *op == Operator::Not {
                    text.push(op.as_str());
                    text.merge(&operand.raw_text);
                } else {
                    text.push(&prefix(*op, &operand.raw_text));
                }
                operator(*op, vec![operand])
            }
            ParseNode::IsNull { expr, negated } => {
                let operand = self.child()?.build(expr)?;
                let op = if *negated { Operator::IsNotNull } else { Operator::IsNull };
                text.merge(&operand.raw_text);
                text.push(op.as_str());
                operator(op, vec![operand])
            }
            ParseNode::Function(production) => self.function(production, &mut text)?,
            ParseNode::CountStar { keyword } => self.count_star(keyword, &mut text)?,
            ParseNode::Case(production) => self.case(production, &mut text)?,
            ParseNode::Cast(production) => {
                let expr = self.child()?.build(&production.expr)?;
                let target_type = self.binder.type_resolver().resolve_type(&production.target)?;
                text.open_call("CAST");
                text.merge(&expr.raw_text);
                text.push("AS");
                text.push(match &production.target {
                    CastTarget::Null => "NULL",
                    CastTarget::Type(name) => name,
                });
                text.push(")");
                ExpressionNode::new(ExpressionKind::Cast {
                    expr: Box::new(expr),
                    target_type,
                })
            }
            ParseNode::Trim(production) => self.trim(production, &mut text)?,
            ParseNode::Extract(production) => self.extract(production, &mut text)?,
            ParseNode::Substring(production) => self.substring(production, &mut text)?,
            ParseNode::Position(production) => self.position(production, &mut text)?,
            ParseNode::Overlay(production) => self.overlay(production, &mut text)?,
            ParseNode::Convert(production) => self.convert(production, &mut text)?,
        };

        built.raw_text = text.finish();
        log::trace!(
            "lowered {} at depth {}: {}",
            node.production_name(),
            self.depth,
            built.raw_text
        );
        Ok(built)
    }

    fn literal(&self, literal: &Literal, text: &mut TokenText) -> Result<ExpressionNode> {
        let value = match literal {
            Literal::Number(number) => {
                text.push(number);
                return Value::from_numeric_literal(number)
                    .map(ExpressionNode::new_constant)
                    .ok_or_else(|| Error::InvariantViolation(format!("malformed numeric literal {}", number)));
            }
            Literal::String(s) => Value::Varchar(s.clone()),
            Literal::Boolean(b) => Value::Boolean(*b),
            Literal::Null => Value::Null,
            Literal::Interval(interval) => Value::Interval(interval.clone()),
            Literal::Typed { type_name, value } => return self.typed_literal(type_name, value, text),
        };
        text.push(&value.to_sql_literal());
        Ok(ExpressionNode::new_constant(value))
    }

    fn typed_literal(&self, type_name: &str, value: &str, text: &mut TokenText) -> Result<ExpressionNode> {
        text.push(type_name);
        text.push(&Value::Varchar(value.to_string()).to_sql_literal());

        let invalid = |e: chrono::ParseError| {
            Error::TypeResolution(format!("invalid {} literal '{}': {}", type_name, value, e))
        };
        let parsed = match type_name.to_ascii_uppercase().as_str() {
            "DATE" => Value::Date(NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(invalid)?),
            "TIME" => Value::Time(NaiveTime::parse_from_str(value, "%H:%M:%S%.f").map_err(invalid)?),
            "TIMESTAMP" => Value::Timestamp(
                NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
                    .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
                    .map_err(invalid)?,
            ),
            _ => {
                let target_type = self
                    .binder
                    .type_resolver()
                    .resolve_type(&CastTarget::Type(type_name.to_string()))?;
                return Ok(ExpressionNode::new(ExpressionKind::Cast {
                    expr: Box::new(ExpressionNode::constant(Value::Varchar(value.to_string()))),
                    target_type,
                }));
            }
        };
        Ok(ExpressionNode::new_constant(parsed))
    }

    fn column_ref(&self, parts: &[RawIdent], text: &mut TokenText) -> Result<ExpressionNode> {
        let (column, qualifier) = parts
            .split_last()
            .ok_or_else(|| Error::InvariantViolation("empty identifier".to_string()))?;
        let source: Vec<String> = parts.iter().map(|p| p.to_string()).collect();
        text.push(&source.join("."));

        let normalizer = self.binder.case_normalizer();
        Ok(ExpressionNode::new(ExpressionKind::ColumnRef {
            qualifier: qualifier.iter().map(|p| normalizer.normalize_case(p)).collect(),
            column: normalizer.normalize_case(column),
        }))
    }
}

fn operator(op: Operator, operands: Vec<ExpressionNode>) -> ExpressionNode {
    ExpressionNode::new(ExpressionKind::Operator { op, operands })
}

impl ExpressionNode {
    /// A constant whose raw text is filled in by the builder
    fn new_constant(value: Value) -> Self {
        ExpressionNode::new(ExpressionKind::Constant(value))
    }
}
