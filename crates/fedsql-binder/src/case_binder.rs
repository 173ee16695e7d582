//! CASE lowering
//!
//! Both CASE forms become an ordered list of predicate/result branches. In
//! the simple form each `WHEN value` is turned into `operand = value`.

use crate::expression::{CaseBranch, CaseConstruct, ExpressionKind, ExpressionNode};
use crate::expression_binder::ExpressionBuilder;
use crate::text::TokenText;
use fedsql_common::Result;
use fedsql_parser::ast::CaseProduction;

impl<'a> ExpressionBuilder<'a> {
    pub(crate) fn case(&self, production: &CaseProduction, text: &mut TokenText) -> Result<ExpressionNode> {
        let predicates = self.binder().predicate_builder();
        text.push("CASE");

        let operand = match &production.operand {
            Some(operand) => {
                let mut operand = self.child()?.build(operand)?;
                text.merge(&operand.raw_text);
                if matches!(operand.kind, ExpressionKind::Operator { .. }) {
                    operand.parenthesized = true;
                }
                Some(operand)
            }
            None => None,
        };

        let mut branches = Vec::with_capacity(production.branches.len());
        for (condition, result) in &production.branches {
            text.push("WHEN");
            let predicate = match &operand {
                Some(operand) => {
                    let mut value = self.child()?.build(condition)?;
                    text.merge(&value.raw_text);
                    if matches!(value.kind, ExpressionKind::Operator { .. }) {
                        value.parenthesized = true;
                    }
                    predicates.equality(operand.clone(), value)?
                }
                None => {
                    let predicate = predicates.build_predicate(self, condition)?;
                    text.merge(&predicate.raw_text);
                    predicate
                }
            };

            text.push("THEN");
            let result = self.child()?.build(result)?;
            text.merge(&result.raw_text);
            branches.push(CaseBranch { predicate, result });
        }

        let default = match &production.else_result {
            Some(else_result) => {
                text.push("ELSE");
                let default = self.child()?.build(else_result)?;
                text.merge(&default.raw_text);
                Some(Box::new(default))
            }
            None => None,
        };
        text.push("END");

        Ok(ExpressionNode::new(ExpressionKind::Case(CaseConstruct { branches, default })))
    }
}
