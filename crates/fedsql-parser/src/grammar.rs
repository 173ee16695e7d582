//! Grammar front: sqlparser AST to concrete parse tree
//!
//! Unknown functions and argument counts the catalog rejects are reported here
//! as syntax errors, so that anything reaching the dispatcher has a catalog
//! entry.

use crate::ast::*;
use fedsql_catalog::{self as catalog, ResolveContext, SetQuantifier};
use fedsql_common::{Error, Result};
use sqlparser::ast::Spanned;
use sqlparser::ast as sql;

/// Niladic keywords that SQL allows without parentheses
const BARE_NILADIC: &[&str] = &[
    "CURRENT_DATE",
    "CURRENT_TIME",
    "CURRENT_TIMESTAMP",
    "LOCALTIME",
    "LOCALTIMESTAMP",
    "CURRENT_USER",
    "SESSION_USER",
    "USER",
    "CURRENT_SCHEMA",
];

/// Converts sqlparser expressions for one source text
pub(crate) struct Grammar<'a> {
    source: &'a str,
}

impl<'a> Grammar<'a> {
    pub fn new(source: &'a str) -> Self {
        Grammar { source }
    }

    /// Byte offset of the first occurrence of `token` in the source, or 0
    fn position_of(&self, token: &str) -> usize {
        let upper = self.source.to_ascii_uppercase();
        upper.find(&token.to_ascii_uppercase()).unwrap_or(0)
    }

    /// Byte offset where a sqlparser node starts, falling back to the first
    /// occurrence of `token` when the node carries no span
    fn position_at(&self, node: &impl Spanned, token: &str) -> usize {
        let start = node.span().start;
        byte_offset(self.source, start.line, start.column).unwrap_or_else(|| self.position_of(token))
    }

    /// Check a call shape against the catalog, reporting mismatches as user errors at `position`
    fn check(&self, keyword: &str, ctx: &ResolveContext, position: usize) -> Result<()> {
        match catalog::resolve(keyword, ctx) {
            Ok(_) => Ok(()),
            Err(Error::UnknownFunction { token }) => {
                Err(Error::syntax(position, format!("unknown function {}", token)))
            }
            Err(Error::CatalogMismatch { message, .. }) => Err(Error::syntax(position, message)),
            Err(e) => Err(e),
        }
    }

    pub fn select_item(&self, item: &sql::SelectItem) -> Result<SelectEntry> {
        match item {
            sql::SelectItem::UnnamedExpr(expr) => Ok(SelectEntry::Expr {
                expr: self.expr(expr)?,
                alias: None,
            }),
            sql::SelectItem::ExprWithAlias { expr, alias } => Ok(SelectEntry::Expr {
                expr: self.expr(expr)?,
                alias: Some(raw_ident(alias)),
            }),
            sql::SelectItem::Wildcard(_) => Ok(SelectEntry::Wildcard),
            sql::SelectItem::QualifiedWildcard(name, _) => {
                Ok(SelectEntry::QualifiedWildcard(name.0.iter().map(raw_ident).collect()))
            }
        }
    }

    pub fn expr(&self, expr: &sql::Expr) -> Result<ParseNode> {
        match expr {
            sql::Expr::Value(value) => Ok(ParseNode::Literal(literal(value)?)),

            sql::Expr::Identifier(ident) => {
                let upper = ident.value.to_ascii_uppercase();
                if ident.quote_style.is_none() && BARE_NILADIC.contains(&upper.as_str()) {
                    return Ok(ParseNode::Function(FunctionProduction {
                        keyword: ident.value.clone(),
                        alternative: None,
                        quantifier: None,
                        parenthesized: false,
                        args: vec![],
                    }));
                }
                Ok(ParseNode::Identifier(vec![raw_ident(ident)]))
            }

            sql::Expr::CompoundIdentifier(idents) => {
                Ok(ParseNode::Identifier(idents.iter().map(raw_ident).collect()))
            }

            sql::Expr::Nested(inner) => Ok(ParseNode::Nested(Box::new(self.expr(inner)?))),

            sql::Expr::BinaryOp { left, op, right } => Ok(ParseNode::BinaryOp {
                left: Box::new(self.expr(left)?),
                op: binary_operator(op)?,
                right: Box::new(self.expr(right)?),
            }),

            sql::Expr::UnaryOp { op, expr } => {
                let op = match op {
                    sql::UnaryOperator::Minus => Operator::Negate,
                    sql::UnaryOperator::Plus => Operator::Identity,
                    sql::UnaryOperator::Not => Operator::Not,
                    _ => return Err(Error::NotImplemented(format!("Unary operator {}", op))),
                };
                Ok(ParseNode::UnaryOp {
                    op,
                    expr: Box::new(self.expr(expr)?),
                })
            }

            sql::Expr::IsNull(inner) => Ok(ParseNode::IsNull {
                expr: Box::new(self.expr(inner)?),
                negated: false,
            }),

            sql::Expr::IsNotNull(inner) => Ok(ParseNode::IsNull {
                expr: Box::new(self.expr(inner)?),
                negated: true,
            }),

            sql::Expr::Like {
                negated,
                expr,
                pattern,
                escape_char,
                ..
            } => {
                if escape_char.is_some() {
                    return Err(Error::NotImplemented("LIKE with an ESCAPE clause".to_string()));
                }
                Ok(ParseNode::BinaryOp {
                    left: Box::new(self.expr(expr)?),
                    op: if *negated { Operator::NotLike } else { Operator::Like },
                    right: Box::new(self.expr(pattern)?),
                })
            }

            sql::Expr::Function(func) => self.function(func),

            sql::Expr::Case {
                operand,
                conditions,
                results,
                else_result,
            } => {
                if conditions.is_empty() || conditions.len() != results.len() {
                    return Err(Error::syntax(
                        self.position_of("CASE"),
                        "CASE requires at least one WHEN ... THEN branch",
                    ));
                }
                let operand = operand
                    .as_ref()
                    .map(|e| self.expr(e).map(Box::new))
                    .transpose()?;
                let mut branches = Vec::with_capacity(conditions.len());
                for (condition, result) in conditions.iter().zip(results.iter()) {
                    branches.push((self.expr(condition)?, self.expr(result)?));
                }
                let else_result = else_result
                    .as_ref()
                    .map(|e| self.expr(e).map(Box::new))
                    .transpose()?;
                Ok(ParseNode::Case(CaseProduction {
                    operand,
                    branches,
                    else_result,
                }))
            }

            sql::Expr::Cast {
                kind,
                expr,
                data_type,
                format,
                ..
            } => {
                if !matches!(kind, sql::CastKind::Cast | sql::CastKind::DoubleColon) {
                    return Err(Error::NotImplemented(format!("{:?} expression", kind)));
                }
                if format.is_some() {
                    return Err(Error::NotImplemented("CAST with a FORMAT clause".to_string()));
                }
                Ok(ParseNode::Cast(CastProduction {
                    expr: Box::new(self.expr(expr)?),
                    target: cast_target(data_type),
                }))
            }

            // TRIM([BOTH|LEADING|TRAILING] [characters FROM] source) or TRIM(source, characters)
            sql::Expr::Trim {
                expr,
                trim_where,
                trim_what,
                trim_characters,
                ..
            } => {
                let spec = trim_where.as_ref().map(|w| match w {
                    sql::TrimWhereField::Both => TrimSpec::Both,
                    sql::TrimWhereField::Leading => TrimSpec::Leading,
                    sql::TrimWhereField::Trailing => TrimSpec::Trailing,
                });
                let source = Box::new(self.expr(expr)?);
                if let Some(what) = trim_what {
                    return Ok(ParseNode::Trim(TrimProduction {
                        spec,
                        characters: Some(Box::new(self.expr(what)?)),
                        from: true,
                        source,
                    }));
                }
                let characters = match trim_characters.as_deref() {
                    None | Some([]) => None,
                    Some([single]) => Some(Box::new(self.expr(single)?)),
                    Some(_) => {
                        return Err(Error::syntax(
                            self.position_of("TRIM"),
                            "TRIM takes at most one character set",
                        ))
                    }
                };
                Ok(ParseNode::Trim(TrimProduction {
                    spec,
                    characters,
                    from: false,
                    source,
                }))
            }

            // EXTRACT(field FROM source)
            sql::Expr::Extract { field, expr, .. } => Ok(ParseNode::Extract(ExtractProduction {
                field_token: format!("{}_FROM", field),
                source: Box::new(self.expr(expr)?),
            })),

            sql::Expr::Substring {
                expr,
                substring_from,
                substring_for,
                special,
                ..
            } => Ok(ParseNode::Substring(SubstringProduction {
                source: Box::new(self.expr(expr)?),
                start: substring_from
                    .as_ref()
                    .map(|e| self.expr(e).map(Box::new))
                    .transpose()?,
                length: substring_for
                    .as_ref()
                    .map(|e| self.expr(e).map(Box::new))
                    .transpose()?,
                keyword_form: !*special,
            })),

            // POSITION(needle IN haystack)
            sql::Expr::Position { expr, r#in } => Ok(ParseNode::Position(PositionProduction {
                needle: Box::new(self.expr(expr)?),
                haystack: Box::new(self.expr(r#in)?),
            })),

            sql::Expr::Overlay {
                expr,
                overlay_what,
                overlay_from,
                overlay_for,
            } => Ok(ParseNode::Overlay(OverlayProduction {
                source: Box::new(self.expr(expr)?),
                replacement: Box::new(self.expr(overlay_what)?),
                start: Box::new(self.expr(overlay_from)?),
                length: overlay_for
                    .as_ref()
                    .map(|e| self.expr(e).map(Box::new))
                    .transpose()?,
            })),

            sql::Expr::Convert {
                is_try,
                expr,
                data_type,
                charset,
                styles,
                ..
            } => {
                if *is_try {
                    return Err(Error::NotImplemented("TRY_CONVERT".to_string()));
                }
                let (using, target) = match (data_type, charset) {
                    (None, Some(charset)) => (true, charset.to_string()),
                    (Some(data_type), None) => (false, data_type.to_string()),
                    _ => {
                        return Err(Error::NotImplemented(
                            "CONVERT with both a type and a character set".to_string(),
                        ))
                    }
                };
                let style = match styles.as_slice() {
                    [] => None,
                    [style] => Some(Box::new(self.expr(style)?)),
                    _ => {
                        return Err(Error::syntax(
                            self.position_of("CONVERT"),
                            "CONVERT takes at most one style argument",
                        ))
                    }
                };
                Ok(ParseNode::Convert(ConvertProduction {
                    expr: Box::new(self.expr(expr)?),
                    using,
                    target,
                    style,
                }))
            }

            sql::Expr::Ceil { expr, field } => self.ceil_floor("CEIL", expr, field),
            sql::Expr::Floor { expr, field } => self.ceil_floor("FLOOR", expr, field),

            // DATE '2024-01-01', TIMESTAMP '...', or any other typed string
            sql::Expr::TypedString { data_type, value } => match data_type {
                sql::DataType::Date | sql::DataType::Time(..) | sql::DataType::Timestamp(..) => {
                    Ok(ParseNode::Literal(Literal::Typed {
                        type_name: data_type.to_string(),
                        value: value.clone(),
                    }))
                }
                _ => Ok(ParseNode::Cast(CastProduction {
                    expr: Box::new(ParseNode::string(value.clone())),
                    target: cast_target(data_type),
                })),
            },

            sql::Expr::Interval(interval) => {
                let text = match interval.value.as_ref() {
                    sql::Expr::Value(sql::Value::SingleQuotedString(s)) => s.clone(),
                    sql::Expr::Value(sql::Value::Number(n, _)) => n.clone(),
                    other => {
                        return Err(Error::NotImplemented(format!("Interval expression {}", other)))
                    }
                };
                let text = match &interval.leading_field {
                    Some(field) => format!("{} {}", text, field),
                    None => text,
                };
                Ok(ParseNode::Literal(Literal::Interval(text)))
            }

            sql::Expr::Wildcard(_) | sql::Expr::QualifiedWildcard(..) => Err(Error::syntax(
                self.position_of("*"),
                "'*' is only valid as a projection entry or inside COUNT",
            )),

            _ => Err(Error::NotImplemented(format!("Expression type: {}", expr))),
        }
    }

    /// `CEIL(x)` and `CEIL(x, scale)`; the `CEIL(x TO field)` form has no lowering
    fn ceil_floor(&self, keyword: &str, expr: &sql::Expr, field: &sql::CeilFloorKind) -> Result<ParseNode> {
        let mut args = vec![self.expr(expr)?];
        match field {
            sql::CeilFloorKind::DateTimeField(sql::DateTimeField::NoDateTime) => {}
            sql::CeilFloorKind::Scale(scale) => args.push(ParseNode::Literal(literal(scale)?)),
            sql::CeilFloorKind::DateTimeField(field) => {
                return Err(Error::NotImplemented(format!("{} to {}", keyword, field)))
            }
        }
        self.check(keyword, &ResolveContext::with_args(args.len()), self.position_of(keyword))?;
        Ok(ParseNode::call(keyword, args))
    }

    fn function(&self, func: &sql::Function) -> Result<ParseNode> {
        if func.name.0.len() != 1 {
            return Err(Error::NotImplemented(format!("Qualified function name {}", func.name)));
        }
        let keyword = func.name.to_string();
        let position = self.position_at(func, &keyword);
        if func.over.is_some() {
            return Err(Error::NotImplemented(format!("Window function {}", keyword)));
        }
        if func.filter.is_some() {
            return Err(Error::NotImplemented(format!("FILTER clause on {}", keyword)));
        }

        let (quantifier, args, parenthesized) = match &func.args {
            sql::FunctionArguments::None => (None, vec![], false),
            sql::FunctionArguments::Subquery(_) => {
                return Err(Error::NotImplemented("Subquery in function".to_string()));
            }
            sql::FunctionArguments::List(arg_list) => {
                if !arg_list.clauses.is_empty() {
                    return Err(Error::NotImplemented(format!(
                        "Argument clauses on {}",
                        keyword
                    )));
                }
                let quantifier = match &arg_list.duplicate_treatment {
                    Some(sql::DuplicateTreatment::Distinct) => Some(SetQuantifier::Distinct),
                    Some(sql::DuplicateTreatment::All) => Some(SetQuantifier::All),
                    None => None,
                };

                if let [sql::FunctionArg::Unnamed(sql::FunctionArgExpr::Wildcard)] =
                    arg_list.args.as_slice()
                {
                    if let Some(q) = quantifier {
                        return Err(Error::syntax(
                            position,
                            format!("{} cannot be applied to '*'", q.as_str()),
                        ));
                    }
                    self.check(&keyword, &ResolveContext::star(), position)?;
                    return Ok(ParseNode::CountStar { keyword });
                }

                let mut args = Vec::with_capacity(arg_list.args.len());
                for arg in &arg_list.args {
                    match arg {
                        sql::FunctionArg::Unnamed(sql::FunctionArgExpr::Expr(e)) => {
                            args.push(self.expr(e)?)
                        }
                        sql::FunctionArg::Unnamed(sql::FunctionArgExpr::Wildcard) => {
                            return Err(Error::syntax(
                                position,
                                format!("'*' is not a valid argument of {}", keyword),
                            ))
                        }
                        _ => {
                            return Err(Error::NotImplemented(format!(
                                "Argument form {} in {}",
                                arg, keyword
                            )))
                        }
                    }
                }
                (quantifier, args, true)
            }
        };

        let alternative = catalog::family_of(&keyword).and_then(|f| f.alternative_of(&keyword));
        let mut ctx = ResolveContext::with_args(args.len()).quantifier(quantifier);
        if let Some(index) = alternative {
            ctx = ctx.alternative(index);
        }
        self.check(&keyword, &ctx, position)?;

        Ok(ParseNode::Function(FunctionProduction {
            keyword,
            alternative,
            quantifier,
            parenthesized,
            args,
        }))
    }
}

fn raw_ident(ident: &sql::Ident) -> RawIdent {
    RawIdent {
        value: ident.value.clone(),
        quote_style: ident.quote_style,
    }
}

/// Byte offset of a 1-based line and character column in `source`
fn byte_offset(source: &str, line: u64, column: u64) -> Option<usize> {
    if line == 0 || column == 0 {
        return None;
    }
    let mut line_start = 0;
    for _ in 1..line {
        line_start += source[line_start..].find('\n')? + 1;
    }
    let column = usize::try_from(column - 1).ok()?;
    source[line_start..]
        .char_indices()
        .nth(column)
        .map(|(offset, _)| line_start + offset)
}

fn literal(value: &sql::Value) -> Result<Literal> {
    match value {
        sql::Value::Number(n, _) => {
            if n.parse::<f64>().is_ok_and(|f| f.is_infinite()) {
                return Err(Error::Parse(format!("numeric literal {} is out of range", n)));
            }
            Ok(Literal::Number(n.clone()))
        }
        sql::Value::SingleQuotedString(s)
        | sql::Value::NationalStringLiteral(s)
        | sql::Value::EscapedStringLiteral(s) => Ok(Literal::String(s.clone())),
        sql::Value::Boolean(b) => Ok(Literal::Boolean(*b)),
        sql::Value::Null => Ok(Literal::Null),
        _ => Err(Error::NotImplemented(format!("Value type: {}", value))),
    }
}

fn cast_target(data_type: &sql::DataType) -> CastTarget {
    let name = data_type.to_string();
    if name.eq_ignore_ascii_case("NULL") {
        CastTarget::Null
    } else {
        CastTarget::Type(name)
    }
}

fn binary_operator(op: &sql::BinaryOperator) -> Result<Operator> {
    match op {
        sql::BinaryOperator::Plus => Ok(Operator::Plus),
        sql::BinaryOperator::Minus => Ok(Operator::Minus),
        sql::BinaryOperator::Multiply => Ok(Operator::Multiply),
        sql::BinaryOperator::Divide => Ok(Operator::Divide),
        sql::BinaryOperator::Modulo => Ok(Operator::Modulo),
        sql::BinaryOperator::StringConcat => Ok(Operator::Concat),
        sql::BinaryOperator::Eq => Ok(Operator::Eq),
        sql::BinaryOperator::NotEq => Ok(Operator::NotEq),
        sql::BinaryOperator::Lt => Ok(Operator::Lt),
        sql::BinaryOperator::LtEq => Ok(Operator::LtEq),
        sql::BinaryOperator::Gt => Ok(Operator::Gt),
        sql::BinaryOperator::GtEq => Ok(Operator::GtEq),
        sql::BinaryOperator::And => Ok(Operator::And),
        sql::BinaryOperator::Or => Ok(Operator::Or),
        _ => Err(Error::NotImplemented(format!("Binary operator {}", op))),
    }
}
