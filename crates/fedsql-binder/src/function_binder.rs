//! Function dispatch
//!
//! Regular calls resolve their catalog entry and lower each argument in
//! source order. The SQL-99 keyword forms (POSITION, OVERLAY, keyword-form
//! SUBSTRING) are described by an argument shape: a list of value and keyword
//! slots that one interpreter walks, synthesizing a keyword constant for every
//! keyword slot. TRIM, EXTRACT and CONVERT carry irregularities of their own
//! and are lowered by hand.

use crate::expression::{ExpressionKind, ExpressionNode, FunctionCall};
use crate::expression_binder::ExpressionBuilder;
use crate::text::TokenText;
use fedsql_catalog::{self as catalog, ids, FunctionClass, FunctionId, ResolveContext, SetQuantifier};
use fedsql_common::{Error, Result, Value};
use fedsql_parser::ast::{
    ConvertProduction, ExtractProduction, FunctionProduction, OverlayProduction, ParseNode,
    PositionProduction, SubstringProduction, TrimProduction,
};

/// One position of a keyword-syntax argument list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// A required argument
    Value,
    /// A keyword token that is always written
    Keyword(&'static str),
    /// An optional `KEYWORD argument` clause
    Clause(&'static str),
}

/// `POSITION(needle IN haystack)`
const POSITION_SHAPE: &[Slot] = &[Slot::Value, Slot::Keyword("IN"), Slot::Value];

/// `OVERLAY(source PLACING replacement FROM start [FOR length])`
const OVERLAY_SHAPE: &[Slot] = &[
    Slot::Value,
    Slot::Keyword("PLACING"),
    Slot::Value,
    Slot::Keyword("FROM"),
    Slot::Value,
    Slot::Clause("FOR"),
];

/// `SUBSTRING(source [FROM start] [FOR length])`
const SUBSTRING_SHAPE: &[Slot] = &[Slot::Value, Slot::Clause("FROM"), Slot::Clause("FOR")];

/// Marker the grammar appends to EXTRACT field tokens
const EXTRACT_FIELD_SUFFIX: &str = "FROM";

impl<'a> ExpressionBuilder<'a> {
    pub(crate) fn function(&self, production: &FunctionProduction, text: &mut TokenText) -> Result<ExpressionNode> {
        let mut ctx = ResolveContext::with_args(production.args.len()).quantifier(production.quantifier);
        if let Some(index) = production.alternative {
            ctx = ctx.alternative(index);
        }
        let entry = catalog::resolve(&production.keyword, &ctx)?;

        let mut call = self.new_call(entry.id, &production.keyword, false);
        call.parenthesized = production.parenthesized;
        call.distinct = production.quantifier == Some(SetQuantifier::Distinct);
        call.all = production.quantifier == Some(SetQuantifier::All);
        for arg in &production.args {
            call.params.push(self.child()?.build(arg)?);
        }
        if entry.class == FunctionClass::Session {
            call.session_value = self.session_value(entry.id)?;
        }

        if call.parenthesized {
            push_call_text(text, &production.keyword, &call, production.quantifier);
        } else {
            text.push(&production.keyword);
        }
        Ok(ExpressionNode::new(ExpressionKind::FunctionCall(call)))
    }

    /// `COUNT(*)` resolves on its own and has no argument to descend into
    pub(crate) fn count_star(&self, keyword: &str, text: &mut TokenText) -> Result<ExpressionNode> {
        let entry = catalog::resolve(keyword, &ResolveContext::star())?;
        let call = self.new_call(entry.id, keyword, false);
        text.open_call(keyword);
        text.push("*");
        text.push(")");
        Ok(ExpressionNode::new(ExpressionKind::FunctionCall(call)))
    }

    pub(crate) fn position(&self, production: &PositionProduction, text: &mut TokenText) -> Result<ExpressionNode> {
        let values = [Some(production.needle.as_ref()), Some(production.haystack.as_ref())];
        self.keyword_call("POSITION", POSITION_SHAPE, &values, text)
    }

    pub(crate) fn overlay(&self, production: &OverlayProduction, text: &mut TokenText) -> Result<ExpressionNode> {
        let values = [
            Some(production.source.as_ref()),
            Some(production.replacement.as_ref()),
            Some(production.start.as_ref()),
            production.length.as_deref(),
        ];
        self.keyword_call("OVERLAY", OVERLAY_SHAPE, &values, text)
    }

    pub(crate) fn substring(&self, production: &SubstringProduction, text: &mut TokenText) -> Result<ExpressionNode> {
        let values = [
            Some(production.source.as_ref()),
            production.start.as_deref(),
            production.length.as_deref(),
        ];
        if production.keyword_form {
            return self.keyword_call("SUBSTRING", SUBSTRING_SHAPE, &values, text);
        }

        if production.start.is_none() && production.length.is_some() {
            return Err(Error::InvariantViolation(
                "SUBSTRING length argument without a start argument".to_string(),
            ));
        }
        let args: Vec<&ParseNode> = values.into_iter().flatten().collect();
        self.positional_call("SUBSTRING", &args, text)
    }

    /// TRIM keeps its keyword tokens as pseudo-arguments:
    /// `TRIM(LEADING 'x' FROM col)` lowers to `[LEADING, 'x', FROM, col]`.
    pub(crate) fn trim(&self, production: &TrimProduction, text: &mut TokenText) -> Result<ExpressionNode> {
        let argc = 1 + usize::from(production.characters.is_some());
        let entry = catalog::resolve("TRIM", &ResolveContext::with_args(argc))?;
        let spec = production.spec.map(|spec| ExpressionNode::keyword(spec.as_str()));

        let call = match (production.from, spec, production.characters.as_deref()) {
            (true, spec, characters) => {
                let mut call = self.new_call(entry.id, "TRIM", true);
                call.params.extend(spec);
                if let Some(characters) = characters {
                    call.params.push(self.child()?.build(characters)?);
                }
                call.params.push(ExpressionNode::keyword("FROM"));
                call.params.push(self.child()?.build(&production.source)?);
                call
            }
            (false, Some(spec), None) => {
                let mut call = self.new_call(entry.id, "TRIM", true);
                call.params.push(spec);
                call.params.push(self.child()?.build(&production.source)?);
                call
            }
            (false, Some(spec), Some(_)) => {
                return Err(Error::InvariantViolation(format!(
                    "TRIM {} with a character set but no FROM",
                    spec.raw_text
                )))
            }
            (false, None, characters) => {
                let mut call = self.new_call(entry.id, "TRIM", false);
                call.params.push(self.child()?.build(&production.source)?);
                if let Some(characters) = characters {
                    call.params.push(self.child()?.build(characters)?);
                }
                call
            }
        };

        push_call_text(text, "TRIM", &call, None);
        Ok(ExpressionNode::new(ExpressionKind::FunctionCall(call)))
    }

    /// The grammar hands over the field as `<field>_FROM`; the marker is
    /// stripped and the field and `FROM` become separate keyword constants.
    pub(crate) fn extract(&self, production: &ExtractProduction, text: &mut TokenText) -> Result<ExpressionNode> {
        let token = production.field_token.as_str();
        let split = token.len().checked_sub(EXTRACT_FIELD_SUFFIX.len());
        let (field, marker) = match split.and_then(|at| Some((token.get(..at)?, token.get(at..)?))) {
            Some(parts) => parts,
            None => {
                return Err(Error::InvariantViolation(format!(
                    "EXTRACT field token '{}' is missing its marker",
                    token
                )))
            }
        };
        let field = field.trim_end_matches(['_', ' ']);
        if !marker.eq_ignore_ascii_case(EXTRACT_FIELD_SUFFIX) || field.is_empty() {
            return Err(Error::InvariantViolation(format!(
                "malformed EXTRACT field token '{}'",
                token
            )));
        }

        let entry = catalog::resolve("EXTRACT", &ResolveContext::with_args(2))?;
        let mut call = self.new_call(entry.id, "EXTRACT", true);
        call.params.push(ExpressionNode::keyword(field));
        call.params.push(ExpressionNode::keyword("FROM"));
        call.params.push(self.child()?.build(&production.source)?);

        push_call_text(text, "EXTRACT", &call, None);
        Ok(ExpressionNode::new(ExpressionKind::FunctionCall(call)))
    }

    /// `CONVERT(expr USING charset)` keeps `USING` as a pseudo-argument;
    /// `CONVERT(expr, type [, style])` stays positional.
    pub(crate) fn convert(&self, production: &ConvertProduction, text: &mut TokenText) -> Result<ExpressionNode> {
        if production.using && production.style.is_some() {
            return Err(Error::InvariantViolation(
                "CONVERT ... USING does not take a style argument".to_string(),
            ));
        }
        let argc = 2 + usize::from(production.style.is_some());
        let entry = catalog::resolve("CONVERT", &ResolveContext::with_args(argc))?;

        let mut call = self.new_call(entry.id, "CONVERT", production.using);
        call.params.push(self.child()?.build(&production.expr)?);
        if production.using {
            call.params.push(ExpressionNode::keyword("USING"));
        }
        call.params.push(ExpressionNode::keyword(&production.target));
        if let Some(style) = &production.style {
            call.params.push(self.child()?.build(style)?);
        }

        push_call_text(text, "CONVERT", &call, None);
        Ok(ExpressionNode::new(ExpressionKind::FunctionCall(call)))
    }

    /// Interpret a keyword argument shape. `values` holds one entry per value
    /// or clause slot, in shape order.
    fn keyword_call(
        &self,
        keyword: &str,
        shape: &[Slot],
        values: &[Option<&ParseNode>],
        text: &mut TokenText,
    ) -> Result<ExpressionNode> {
        let argc = values.iter().flatten().count();
        let entry = catalog::resolve(keyword, &ResolveContext::with_args(argc))?;
        let mut call = self.new_call(entry.id, keyword, true);

        let mut values = values.iter();
        for slot in shape {
            match slot {
                Slot::Keyword(token) => call.params.push(ExpressionNode::keyword(token)),
                Slot::Value => match values.next().copied().flatten() {
                    Some(value) => call.params.push(self.child()?.build(value)?),
                    None => {
                        return Err(Error::InvariantViolation(format!(
                            "{} is missing a required argument",
                            keyword
                        )))
                    }
                },
                Slot::Clause(token) => {
                    if let Some(value) = values.next().copied().flatten() {
                        call.params.push(ExpressionNode::keyword(token));
                        call.params.push(self.child()?.build(value)?);
                    }
                }
            }
        }
        if values.next().is_some() {
            return Err(Error::InvariantViolation(format!(
                "{} received more arguments than its shape has slots",
                keyword
            )));
        }

        push_call_text(text, keyword, &call, None);
        Ok(ExpressionNode::new(ExpressionKind::FunctionCall(call)))
    }

    fn positional_call(&self, keyword: &str, args: &[&ParseNode], text: &mut TokenText) -> Result<ExpressionNode> {
        let entry = catalog::resolve(keyword, &ResolveContext::with_args(args.len()))?;
        let mut call = self.new_call(entry.id, keyword, false);
        for arg in args {
            call.params.push(self.child()?.build(arg)?);
        }
        push_call_text(text, keyword, &call, None);
        Ok(ExpressionNode::new(ExpressionKind::FunctionCall(call)))
    }

    fn new_call(&self, id: FunctionId, keyword: &str, keyword_syntax: bool) -> FunctionCall {
        let config = self.binder().config();
        let separator = if keyword_syntax {
            &config.keyword_separator
        } else {
            &config.default_separator
        };
        FunctionCall::new(id, keyword.to_ascii_uppercase(), separator)
    }

    fn session_value(&self, id: FunctionId) -> Result<Option<Value>> {
        let session = self.binder().session();
        let value = match id {
            ids::CURRENT_USER | ids::SESSION_USER | ids::USER => &session.user,
            ids::CURRENT_DATABASE | ids::DATABASE => &session.database,
            ids::CURRENT_SCHEMA => &session.schema,
            other => {
                return Err(Error::Internal(format!(
                    "session function {} has no session value",
                    other
                )))
            }
        };
        Ok(value.clone().map(Value::Varchar))
    }
}

/// Record the call's tokens: keyword, opening parenthesis, optional
/// quantifier, each argument's text, closing parenthesis. Commas appear only
/// between positional arguments.
fn push_call_text(text: &mut TokenText, keyword: &str, call: &FunctionCall, quantifier: Option<SetQuantifier>) {
    text.open_call(keyword);
    if let Some(quantifier) = quantifier {
        text.push(quantifier.as_str());
    }
    let positional = call.arg_separator.contains(',');
    for (i, param) in call.params.iter().enumerate() {
        if i > 0 && positional {
            text.push(",");
        }
        text.merge(&param.raw_text);
    }
    text.push(")");
}

#[cfg(test)]
mod tests {
    use crate::{Binder, ExpressionKind, ExpressionNode, SessionContext};
    use fedsql_catalog::ids;
    use fedsql_common::{BuilderConfig, Error, Value};
    use fedsql_parser::ast::{ConvertProduction, Literal, ParseNode, SubstringProduction, TrimProduction, TrimSpec};
    use fedsql_parser::parse_expression;

    fn binder() -> Binder {
        Binder::new(
            BuilderConfig::default(),
            SessionContext::new("alice", "sales").with_schema("public"),
        )
    }

    fn lower(sql: &str) -> ExpressionNode {
        let tree = parse_expression(sql, 64).unwrap();
        binder().bind_expression(&tree).unwrap()
    }

    fn keywords(node: &ExpressionNode) -> Vec<String> {
        node.params().iter().map(|p| p.raw_text.clone()).collect()
    }

    #[test]
    fn test_power_argument_order() {
        let node = lower("POWER(a, b)");
        let call = node.function_call().unwrap();
        assert_eq!(call.function_id, ids::POWER);
        assert_eq!(keywords(&node), vec!["a", "b"]);
        assert_eq!(call.arg_separator, ", ");
        assert_eq!(node.to_sql(), "POWER(a, b)");
    }

    #[test]
    fn test_synonyms_share_ids() {
        assert_eq!(lower("CEIL(x)").function_id(), lower("CEILING(x)").function_id());
        assert_eq!(lower("MOD(x, 2)").function_id(), lower("MODULE(x, 2)").function_id());
        assert_eq!(lower("ceiling(x)").to_sql(), "CEILING(x)");
    }

    #[test]
    fn test_count_forms() {
        let distinct = lower("COUNT(DISTINCT col)");
        let call = distinct.function_call().unwrap();
        assert_eq!(call.function_id, ids::COUNT);
        assert!(call.distinct && !call.all);
        assert_eq!(distinct.to_sql(), "COUNT(DISTINCT col)");
        assert_eq!(distinct.raw_text, "COUNT(DISTINCT col)");

        let star = lower("COUNT(*)");
        assert_eq!(star.function_id(), Some(ids::COUNT_STAR));
        assert!(star.params().is_empty());
        assert_eq!(star.to_sql(), "COUNT(*)");

        let all = lower("SUM(ALL x)");
        assert!(all.function_call().unwrap().all);
        assert_eq!(all.to_sql(), "SUM(ALL x)");
    }

    #[test]
    fn test_family_alternatives() {
        assert_eq!(lower("STDDEV_SAMP(x)").function_id(), Some(ids::STDDEV_SAMP));
        assert_eq!(lower("STDEV(x)").function_id(), Some(ids::STDDEV_SAMP));
        assert_eq!(lower("VAR_POP(x)").function_id(), Some(ids::VARIANCE_POP));
        assert_eq!(lower("REGR_SLOPE(y, x)").function_id(), Some(ids::REGR_SLOPE));
    }

    #[test]
    fn test_arity_selected_ids() {
        assert_eq!(lower("TRANSLATE(s, 'a', 'b')").function_id(), Some(ids::TRANSLATE));
        assert_eq!(lower("ST_COLLECT(g)").function_id(), Some(ids::ST_COLLECT_AGG));
        assert_eq!(lower("ST_COLLECT(g, h)").function_id(), Some(ids::ST_COLLECT));
        assert_eq!(lower("CURDATE()").function_id(), Some(ids::CURRENT_DATE));
    }

    #[test]
    fn test_trim_leading_from() {
        let node = lower("TRIM(LEADING 'x' FROM col)");
        let call = node.function_call().unwrap();
        assert_eq!(call.function_id, ids::TRIM);
        assert_eq!(call.arg_separator, " ");
        assert_eq!(
            call.params.iter().map(|p| p.kind.clone()).collect::<Vec<_>>(),
            vec![
                ExpressionKind::Constant(Value::keyword("LEADING")),
                ExpressionKind::Constant(Value::Varchar("x".to_string())),
                ExpressionKind::Constant(Value::keyword("FROM")),
                ExpressionKind::ColumnRef {
                    qualifier: vec![],
                    column: "col".to_string()
                },
            ]
        );
        assert_eq!(node.to_sql(), "TRIM(LEADING 'x' FROM col)");
        assert_eq!(node.raw_text, "TRIM(LEADING 'x' FROM col)");
    }

    #[test]
    fn test_trim_positional() {
        let node = lower("TRIM(col)");
        assert_eq!(node.function_call().unwrap().arg_separator, ", ");
        assert_eq!(node.to_sql(), "TRIM(col)");
    }

    #[test]
    fn test_trim_spec_with_characters_but_no_from() {
        let production = ParseNode::Trim(TrimProduction {
            spec: Some(TrimSpec::Both),
            characters: Some(Box::new(ParseNode::string("x"))),
            from: false,
            source: Box::new(ParseNode::column("col")),
        });
        let err = binder().bind_expression(&production).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
        assert!(err.is_programming_error());
    }

    #[test]
    fn test_extract_strips_marker() {
        let node = lower("EXTRACT(YEAR FROM d)");
        assert_eq!(node.function_id(), Some(ids::EXTRACT));
        assert_eq!(keywords(&node), vec!["YEAR", "FROM", "d"]);
        assert_eq!(node.to_sql(), "EXTRACT(YEAR FROM d)");
    }

    #[test]
    fn test_substring_forms() {
        let node = lower("SUBSTRING(s FROM 2 FOR 3)");
        assert_eq!(keywords(&node), vec!["s", "FROM", "2", "FOR", "3"]);
        assert_eq!(node.to_sql(), "SUBSTRING(s FROM 2 FOR 3)");

        let node = lower("SUBSTRING(s FROM 2)");
        assert_eq!(keywords(&node), vec!["s", "FROM", "2"]);

        let node = lower("SUBSTRING(s, 2, 3)");
        assert_eq!(node.function_call().unwrap().arg_separator, ", ");
        assert_eq!(node.to_sql(), "SUBSTRING(s, 2, 3)");
    }

    #[test]
    fn test_substring_length_without_start() {
        let production = ParseNode::Substring(SubstringProduction {
            source: Box::new(ParseNode::column("s")),
            start: None,
            length: Some(Box::new(ParseNode::number("3"))),
            keyword_form: false,
        });
        assert!(matches!(
            binder().bind_expression(&production),
            Err(Error::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_position_and_overlay() {
        let node = lower("POSITION('a' IN s)");
        assert_eq!(keywords(&node), vec!["'a'", "IN", "s"]);
        assert_eq!(node.to_sql(), "POSITION('a' IN s)");

        let node = lower("OVERLAY(s PLACING 'ab' FROM 2 FOR 3)");
        assert_eq!(node.function_id(), Some(ids::OVERLAY));
        assert_eq!(node.to_sql(), "OVERLAY(s PLACING 'ab' FROM 2 FOR 3)");
    }

    #[test]
    fn test_convert_forms() {
        let node = lower("CONVERT(name USING utf8)");
        let call = node.function_call().unwrap();
        assert_eq!(call.arg_separator, " ");
        assert_eq!(keywords(&node), vec!["name", "USING", "utf8"]);
        assert_eq!(node.to_sql(), "CONVERT(name USING utf8)");
    }

    #[test]
    fn test_convert_comma_form() {
        let node = lower("CONVERT(x, INT)");
        assert_eq!(node.function_id(), Some(ids::CONVERT));
        let call = node.function_call().unwrap();
        assert_eq!(call.arg_separator, ", ");
        assert!(call.params[0].is_column_ref());
        assert_eq!(call.params[1].kind, ExpressionKind::Constant(Value::keyword("INT")));
        assert_eq!(call.params.len(), 2);
        assert_eq!(node.to_sql(), "CONVERT(x, INT)");
        assert_eq!(lower(&node.to_sql()), node);
    }

    #[test]
    fn test_convert_with_style() {
        let tree = ParseNode::Convert(ConvertProduction {
            expr: Box::new(ParseNode::column("d")),
            using: false,
            target: "VARCHAR".to_string(),
            style: Some(Box::new(ParseNode::Literal(Literal::Number("112".to_string())))),
        });
        let node = binder().bind_expression(&tree).unwrap();
        assert_eq!(keywords(&node), vec!["d", "VARCHAR", "112"]);
        assert_eq!(node.function_call().unwrap().arg_separator, ", ");
        assert_eq!(node.to_sql(), "CONVERT(d, VARCHAR, 112)");

        let using = ParseNode::Convert(ConvertProduction {
            expr: Box::new(ParseNode::column("d")),
            using: true,
            target: "utf8".to_string(),
            style: Some(Box::new(ParseNode::Literal(Literal::Number("1".to_string())))),
        });
        assert!(matches!(binder().bind_expression(&using), Err(Error::InvariantViolation(_))));
    }

    #[test]
    fn test_session_values() {
        let user = lower("CURRENT_USER");
        let call = user.function_call().unwrap();
        assert!(!call.parenthesized);
        assert_eq!(call.session_value, Some(Value::Varchar("alice".to_string())));
        assert_eq!(user.to_sql(), "'alice'");
        assert_eq!(user.raw_text, "CURRENT_USER");

        let database = binder()
            .bind_expression(&ParseNode::call("DATABASE", vec![]))
            .unwrap();
        assert_eq!(database.to_sql(), "'sales'");
        assert_eq!(lower("CURRENT_SCHEMA").to_sql(), "'public'");
    }

    #[test]
    fn test_session_value_absent() {
        let binder = Binder::new(BuilderConfig::default(), SessionContext::default());
        let tree = parse_expression("CURRENT_USER", 64).unwrap();
        let node = binder.bind_expression(&tree).unwrap();
        assert_eq!(node.to_sql(), "CURRENT_USER");
    }

    #[test]
    fn test_bare_niladic_round_trip() {
        let node = lower("CURRENT_DATE");
        assert_eq!(node.function_id(), Some(ids::CURRENT_DATE));
        assert_eq!(node.to_sql(), "CURRENT_DATE");
    }

    #[test]
    fn test_unknown_function_is_fatal() {
        let err = binder()
            .bind_expression(&ParseNode::call("NO_SUCH_FN", vec![]))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownFunction { .. }));
        assert!(err.is_programming_error());
    }

    #[test]
    fn test_idempotent_lowering() {
        let tree = parse_expression("SUM(DISTINCT TRIM(BOTH ' ' FROM name)) + POWER(a, 2)", 64).unwrap();
        let binder = binder();
        assert_eq!(binder.bind_expression(&tree).unwrap(), binder.bind_expression(&tree).unwrap());
    }
}
