//! Expression nodes: the uniform output of the function dispatcher

use fedsql_catalog::{self as catalog, ids, FunctionId};
use fedsql_common::{SqlType, Value};
use fedsql_parser::ast::Operator;
use serde::Serialize;

/// A lowered expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpressionNode {
    pub kind: ExpressionKind,
    /// Assigned at the projection boundary
    pub alias: Option<String>,
    /// Name given to this column by an enclosing query
    pub outer_alias: Option<String>,
    /// Written inside parentheses in the source
    pub parenthesized: bool,
    /// Source-order token text of the node
    pub raw_text: String,
}

/// The kind of expression node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExpressionKind {
    /// Literal, session value or keyword pseudo-argument
    Constant(Value),

    /// Column reference; `qualifier` holds the normalized table path
    ColumnRef {
        qualifier: Vec<String>,
        column: String,
    },

    /// `*` (empty qualifier) or `table.*`
    ColumnList { qualifier: Vec<String> },

    FunctionCall(FunctionCall),

    Case(CaseConstruct),

    Cast {
        expr: Box<ExpressionNode>,
        target_type: SqlType,
    },

    /// Operators of the general expression grammar, operands in source order
    Operator {
        op: Operator,
        operands: Vec<ExpressionNode>,
    },
}

/// A call to a catalog function
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    pub function_id: FunctionId,
    /// Spelling used for regeneration, upper-cased
    pub function_name: String,
    /// Arguments in source order, keyword pseudo-arguments included
    pub params: Vec<ExpressionNode>,
    pub arg_separator: String,
    pub distinct: bool,
    pub all: bool,
    /// False for niladic keywords written without parentheses
    pub parenthesized: bool,
    /// Value substituted from the session for `CURRENT_USER` and friends
    pub session_value: Option<Value>,
}

impl FunctionCall {
    pub fn new(function_id: FunctionId, function_name: impl Into<String>, arg_separator: &str) -> Self {
        FunctionCall {
            function_id,
            function_name: function_name.into(),
            params: Vec::new(),
            arg_separator: arg_separator.to_string(),
            distinct: false,
            all: false,
            parenthesized: true,
            session_value: None,
        }
    }

    pub fn is_aggregate(&self) -> bool {
        catalog::is_aggregate(self.function_id)
    }

    pub fn is_count_star(&self) -> bool {
        self.function_id == ids::COUNT_STAR
    }
}

/// One `WHEN .. THEN ..` pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseBranch {
    pub predicate: ExpressionNode,
    pub result: ExpressionNode,
}

/// Lowered CASE: ordered branches, first true predicate wins
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseConstruct {
    pub branches: Vec<CaseBranch>,
    /// Absent ELSE means the construct evaluates to NULL when nothing matches
    pub default: Option<Box<ExpressionNode>>,
}

impl ExpressionNode {
    pub fn new(kind: ExpressionKind) -> Self {
        ExpressionNode {
            kind,
            alias: None,
            outer_alias: None,
            parenthesized: false,
            raw_text: String::new(),
        }
    }

    pub fn constant(value: Value) -> Self {
        let raw_text = value.to_sql_literal();
        ExpressionNode {
            raw_text,
            ..ExpressionNode::new(ExpressionKind::Constant(value))
        }
    }

    /// A bare keyword pseudo-argument such as `FROM` or `USING`
    pub fn keyword(token: &str) -> Self {
        ExpressionNode::constant(Value::keyword(token))
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_raw_text(mut self, raw_text: String) -> Self {
        self.raw_text = raw_text;
        self
    }

    pub fn function_call(&self) -> Option<&FunctionCall> {
        match &self.kind {
            ExpressionKind::FunctionCall(call) => Some(call),
            _ => None,
        }
    }

    pub fn function_id(&self) -> Option<FunctionId> {
        self.function_call().map(|call| call.function_id)
    }

    /// Function parameters; empty for every other kind
    pub fn params(&self) -> &[ExpressionNode] {
        match &self.kind {
            ExpressionKind::FunctionCall(call) => &call.params,
            _ => &[],
        }
    }

    pub fn is_column_ref(&self) -> bool {
        matches!(self.kind, ExpressionKind::ColumnRef { .. })
    }

    pub fn is_keyword(&self) -> bool {
        matches!(&self.kind, ExpressionKind::Constant(v) if v.is_keyword())
    }

    /// Direct children in source order
    pub fn children(&self) -> Vec<&ExpressionNode> {
        match &self.kind {
            ExpressionKind::Constant(_)
            | ExpressionKind::ColumnRef { .. }
            | ExpressionKind::ColumnList { .. } => vec![],
            ExpressionKind::FunctionCall(call) => call.params.iter().collect(),
            ExpressionKind::Case(case) => {
                let mut children = Vec::with_capacity(case.branches.len() * 2 + 1);
                for branch in &case.branches {
                    children.push(&branch.predicate);
                    children.push(&branch.result);
                }
                if let Some(default) = &case.default {
                    children.push(default.as_ref());
                }
                children
            }
            ExpressionKind::Cast { expr, .. } => vec![expr.as_ref()],
            ExpressionKind::Operator { operands, .. } => operands.iter().collect(),
        }
    }

    /// Pre-order traversal
    pub fn walk<'a, F: FnMut(&'a ExpressionNode)>(&'a self, f: &mut F) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }

    /// Identifiers of every function call, in pre-order
    pub fn function_ids(&self) -> Vec<FunctionId> {
        let mut found = Vec::new();
        self.walk(&mut |node| {
            if let Some(id) = node.function_id() {
                found.push(id);
            }
        });
        found
    }

    pub fn contains_aggregate(&self) -> bool {
        let mut found = false;
        self.walk(&mut |node| {
            if let Some(call) = node.function_call() {
                found |= call.is_aggregate();
            }
        });
        found
    }

    pub fn has_distinct_aggregate(&self) -> bool {
        let mut found = false;
        self.walk(&mut |node| {
            if let Some(call) = node.function_call() {
                found |= call.distinct && call.is_aggregate();
            }
        });
        found
    }

    /// Get the display name for this expression
    pub fn display_name(&self) -> String {
        if let Some(alias) = self.outer_alias.as_ref().or(self.alias.as_ref()) {
            return alias.clone();
        }
        match &self.kind {
            ExpressionKind::ColumnRef { column, .. } => column.clone(),
            _ if !self.raw_text.is_empty() => self.raw_text.clone(),
            _ => self.to_sql(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str) -> ExpressionNode {
        ExpressionNode::new(ExpressionKind::ColumnRef {
            qualifier: vec![],
            column: name.to_string(),
        })
        .with_raw_text(name.to_string())
    }

    fn call(id: FunctionId, name: &str, params: Vec<ExpressionNode>) -> ExpressionNode {
        let mut call = FunctionCall::new(id, name, ", ");
        call.params = params;
        ExpressionNode::new(ExpressionKind::FunctionCall(call))
    }

    #[test]
    fn test_function_ids_pre_order() {
        let inner = call(ids::ABS, "ABS", vec![column("x")]);
        let outer = call(ids::SUM, "SUM", vec![inner]);
        assert_eq!(outer.function_ids(), vec![ids::SUM, ids::ABS]);
    }

    #[test]
    fn test_aggregate_detection() {
        let mut sum = FunctionCall::new(ids::SUM, "SUM", ", ");
        sum.params.push(column("x"));
        sum.distinct = true;
        let node = call(ids::ABS, "ABS", vec![ExpressionNode::new(ExpressionKind::FunctionCall(sum))]);
        assert!(node.contains_aggregate());
        assert!(node.has_distinct_aggregate());

        let plain = call(ids::ABS, "ABS", vec![column("x")]);
        assert!(!plain.contains_aggregate());
        assert!(!plain.has_distinct_aggregate());
    }

    #[test]
    fn test_case_children_order() {
        let case = CaseConstruct {
            branches: vec![CaseBranch {
                predicate: column("p"),
                result: column("r"),
            }],
            default: Some(Box::new(column("d"))),
        };
        let node = ExpressionNode::new(ExpressionKind::Case(case));
        let names: Vec<String> = node.children().iter().map(|c| c.display_name()).collect();
        assert_eq!(names, vec!["p", "r", "d"]);
    }

    #[test]
    fn test_display_name_prefers_alias() {
        let node = column("price").with_alias("cost");
        assert_eq!(node.display_name(), "cost");
        let mut node = column("price");
        node.outer_alias = Some("outer".to_string());
        assert_eq!(node.display_name(), "outer");
        assert_eq!(column("price").display_name(), "price");
    }

    #[test]
    fn test_keyword_constant() {
        let node = ExpressionNode::keyword("FROM");
        assert!(node.is_keyword());
        assert_eq!(node.raw_text, "FROM");
    }
}
