//! Concrete parse tree
//!
//! One variant per production shape the expression layer lowers. The tree
//! keeps source spellings (function keywords, identifier quoting, keyword
//! tokens) because regenerated SQL must reproduce them.

use fedsql_catalog::SetQuantifier;
use serde::Serialize;
use std::fmt;

/// An identifier as written, with its quote character if it was delimited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIdent {
    pub value: String,
    pub quote_style: Option<char>,
}

impl RawIdent {
    pub fn new(value: impl Into<String>) -> Self {
        RawIdent {
            value: value.into(),
            quote_style: None,
        }
    }

    pub fn quoted(value: impl Into<String>, quote: char) -> Self {
        RawIdent {
            value: value.into(),
            quote_style: Some(quote),
        }
    }

    pub fn is_quoted(&self) -> bool {
        self.quote_style.is_some()
    }
}

impl fmt::Display for RawIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.quote_style {
            Some(q) => {
                let close = if q == '[' { ']' } else { q };
                write!(f, "{}{}{}", q, self.value, close)
            }
            None => write!(f, "{}", self.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Numeric literal text as written
    Number(String),
    String(String),
    Boolean(bool),
    Null,
    /// `DATE '2024-01-01'`, `TIME '...'`, `TIMESTAMP '...'`
    Typed { type_name: String, value: String },
    /// `INTERVAL '1 day'`
    Interval(String),
}

/// Operators of the general expression grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    // Arithmetic
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Concat,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    NotLike,

    // Logical
    And,
    Or,

    // Prefix
    Not,
    Negate,
    Identity,

    // Postfix
    IsNull,
    IsNotNull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixity {
    Prefix,
    Infix,
    Postfix,
}

impl Operator {
    pub fn fixity(&self) -> Fixity {
        match self {
            Operator::Not | Operator::Negate | Operator::Identity => Fixity::Prefix,
            Operator::IsNull | Operator::IsNotNull => Fixity::Postfix,
            _ => Fixity::Infix,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::Concat => "||",
            Operator::Eq => "=",
            Operator::NotEq => "<>",
            Operator::Lt => "<",
            Operator::LtEq => "<=",
            Operator::Gt => ">",
            Operator::GtEq => ">=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
            Operator::Negate => "-",
            Operator::Identity => "+",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
        }
    }

    /// Binding strength, higher binds tighter
    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Or => 5,
            Operator::And => 10,
            Operator::Not => 15,
            Operator::IsNull | Operator::IsNotNull => 17,
            Operator::Like | Operator::NotLike => 19,
            Operator::Eq
            | Operator::NotEq
            | Operator::Lt
            | Operator::LtEq
            | Operator::Gt
            | Operator::GtEq => 20,
            Operator::Concat => 25,
            Operator::Plus | Operator::Minus => 30,
            Operator::Multiply | Operator::Divide | Operator::Modulo => 40,
            Operator::Negate | Operator::Identity => 50,
        }
    }

    /// Comparisons do not chain without parentheses
    pub fn is_comparison(&self) -> bool {
        matches!(self.precedence(), 19 | 20)
    }

    /// Whether the operator yields a boolean
    pub fn is_predicate(&self) -> bool {
        matches!(
            self,
            Operator::Eq
                | Operator::NotEq
                | Operator::Lt
                | Operator::LtEq
                | Operator::Gt
                | Operator::GtEq
                | Operator::Like
                | Operator::NotLike
                | Operator::And
                | Operator::Or
                | Operator::Not
                | Operator::IsNull
                | Operator::IsNotNull
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A regular function call: `NAME([DISTINCT | ALL] arg, ...)` or a bare niladic keyword
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionProduction {
    /// The function keyword as written
    pub keyword: String,
    /// Matched alternative, for keywords that belong to a family
    pub alternative: Option<usize>,
    pub quantifier: Option<SetQuantifier>,
    /// False for niladic keywords written without parentheses
    pub parenthesized: bool,
    pub args: Vec<ParseNode>,
}

/// `CASE [operand] WHEN .. THEN .. [ELSE ..] END`
#[derive(Debug, Clone, PartialEq)]
pub struct CaseProduction {
    /// Present for the simple form
    pub operand: Option<Box<ParseNode>>,
    /// `(WHEN, THEN)` pairs in source order
    pub branches: Vec<(ParseNode, ParseNode)>,
    pub else_result: Option<Box<ParseNode>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CastTarget {
    /// `CAST(x AS NULL)`
    Null,
    /// Type name as written, e.g. `VARCHAR(20)`
    Type(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastProduction {
    pub expr: Box<ParseNode>,
    pub target: CastTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimSpec {
    Both,
    Leading,
    Trailing,
}

impl TrimSpec {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrimSpec::Both => "BOTH",
            TrimSpec::Leading => "LEADING",
            TrimSpec::Trailing => "TRAILING",
        }
    }
}

/// `TRIM([BOTH | LEADING | TRAILING] [chars] [FROM] source)` or `TRIM(source, chars)`
#[derive(Debug, Clone, PartialEq)]
pub struct TrimProduction {
    pub spec: Option<TrimSpec>,
    pub characters: Option<Box<ParseNode>>,
    /// Whether the `FROM` keyword was written
    pub from: bool,
    pub source: Box<ParseNode>,
}

/// `EXTRACT(field FROM source)`
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractProduction {
    /// The field token as matched by the grammar, which carries a trailing
    /// `_FROM` marker (`YEAR_FROM`)
    pub field_token: String,
    pub source: Box<ParseNode>,
}

/// `SUBSTRING(source [FROM start] [FOR length])` or `SUBSTRING(source, start [, length])`
#[derive(Debug, Clone, PartialEq)]
pub struct SubstringProduction {
    pub source: Box<ParseNode>,
    pub start: Option<Box<ParseNode>>,
    pub length: Option<Box<ParseNode>>,
    /// Whether the arguments were separated by `FROM`/`FOR` rather than commas
    pub keyword_form: bool,
}

/// `POSITION(needle IN haystack)`
#[derive(Debug, Clone, PartialEq)]
pub struct PositionProduction {
    pub needle: Box<ParseNode>,
    pub haystack: Box<ParseNode>,
}

/// `OVERLAY(source PLACING replacement FROM start [FOR length])`
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayProduction {
    pub source: Box<ParseNode>,
    pub replacement: Box<ParseNode>,
    pub start: Box<ParseNode>,
    pub length: Option<Box<ParseNode>>,
}

/// `CONVERT(expr USING charset)` or `CONVERT(expr, target [, style])`
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertProduction {
    pub expr: Box<ParseNode>,
    /// True when the target followed `USING`
    pub using: bool,
    /// Charset or type name as written
    pub target: String,
    pub style: Option<Box<ParseNode>>,
}

/// A node of the concrete parse tree
#[derive(Debug, Clone, PartialEq)]
pub enum ParseNode {
    Literal(Literal),
    /// Column reference, possibly qualified
    Identifier(Vec<RawIdent>),
    /// Parenthesized expression
    Nested(Box<ParseNode>),
    BinaryOp {
        left: Box<ParseNode>,
        op: Operator,
        right: Box<ParseNode>,
    },
    UnaryOp {
        op: Operator,
        expr: Box<ParseNode>,
    },
    IsNull {
        expr: Box<ParseNode>,
        negated: bool,
    },
    Function(FunctionProduction),
    /// `COUNT(*)`, with the keyword as written
    CountStar { keyword: String },
    Case(CaseProduction),
    Cast(CastProduction),
    Trim(TrimProduction),
    Extract(ExtractProduction),
    Substring(SubstringProduction),
    Position(PositionProduction),
    Overlay(OverlayProduction),
    Convert(ConvertProduction),
}

impl ParseNode {
    pub fn number(text: impl Into<String>) -> Self {
        ParseNode::Literal(Literal::Number(text.into()))
    }

    pub fn string(text: impl Into<String>) -> Self {
        ParseNode::Literal(Literal::String(text.into()))
    }

    pub fn column(name: impl Into<String>) -> Self {
        ParseNode::Identifier(vec![RawIdent::new(name)])
    }

    /// A parenthesized call with no modifiers
    pub fn call(keyword: impl Into<String>, args: Vec<ParseNode>) -> Self {
        ParseNode::Function(FunctionProduction {
            keyword: keyword.into(),
            alternative: None,
            quantifier: None,
            parenthesized: true,
            args,
        })
    }

    /// Short production name for diagnostics
    pub fn production_name(&self) -> &'static str {
        match self {
            ParseNode::Literal(_) => "literal",
            ParseNode::Identifier(_) => "identifier",
            ParseNode::Nested(_) => "nested expression",
            ParseNode::BinaryOp { .. } => "binary operator",
            ParseNode::UnaryOp { .. } => "unary operator",
            ParseNode::IsNull { .. } => "IS NULL",
            ParseNode::Function(_) => "function call",
            ParseNode::CountStar { .. } => "COUNT(*)",
            ParseNode::Case(_) => "CASE",
            ParseNode::Cast(_) => "CAST",
            ParseNode::Trim(_) => "TRIM",
            ParseNode::Extract(_) => "EXTRACT",
            ParseNode::Substring(_) => "SUBSTRING",
            ParseNode::Position(_) => "POSITION",
            ParseNode::Overlay(_) => "OVERLAY",
            ParseNode::Convert(_) => "CONVERT",
        }
    }
}

/// One entry of a projection list
#[derive(Debug, Clone, PartialEq)]
pub enum SelectEntry {
    /// `*`
    Wildcard,
    /// `table.*`
    QualifiedWildcard(Vec<RawIdent>),
    Expr {
        expr: ParseNode,
        alias: Option<RawIdent>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_ident_display() {
        assert_eq!(RawIdent::new("price").to_string(), "price");
        assert_eq!(RawIdent::quoted("Order Total", '"').to_string(), "\"Order Total\"");
        assert_eq!(RawIdent::quoted("x", '[').to_string(), "[x]");
    }

    #[test]
    fn test_operator_fixity() {
        assert_eq!(Operator::Not.fixity(), Fixity::Prefix);
        assert_eq!(Operator::IsNotNull.fixity(), Fixity::Postfix);
        assert_eq!(Operator::Eq.fixity(), Fixity::Infix);
        assert!(Operator::Eq.is_predicate());
        assert!(!Operator::Plus.is_predicate());
    }
}
