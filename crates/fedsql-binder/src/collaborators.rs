//! Collaborators the dispatcher delegates to
//!
//! Case folding, cast-type resolution, predicate construction, alias and
//! table-name resolution belong to the surrounding front end. Each is a trait
//! with a default implementation good enough for standalone use.

use crate::expression::{ExpressionKind, ExpressionNode};
use crate::expression_binder::ExpressionBuilder;
use fedsql_common::{Error, Result, SqlType};
use fedsql_parser::ast::{CastTarget, Operator, ParseNode, RawIdent};
use serde::{Deserialize, Serialize};

/// Folds identifier tokens to their canonical case
pub trait CaseNormalizer: Send + Sync {
    fn normalize_case(&self, ident: &RawIdent) -> String;
}

/// Unquoted identifiers fold to lower case; quoted ones keep their spelling
#[derive(Debug, Default, Clone, Copy)]
pub struct LowerCaseNormalizer;

impl CaseNormalizer for LowerCaseNormalizer {
    fn normalize_case(&self, ident: &RawIdent) -> String {
        if ident.is_quoted() {
            ident.value.clone()
        } else {
            ident.value.to_lowercase()
        }
    }
}

/// Resolves CAST and CONVERT targets
pub trait TypeResolver: Send + Sync {
    fn resolve_type(&self, target: &CastTarget) -> Result<SqlType>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTypeResolver;

impl TypeResolver for DefaultTypeResolver {
    fn resolve_type(&self, target: &CastTarget) -> Result<SqlType> {
        match target {
            CastTarget::Null => Ok(SqlType::Null),
            CastTarget::Type(name) => parse_type_name(name),
        }
    }
}

/// Map a type name as written onto [`SqlType`]. Unrecognized names pass through as
/// [`SqlType::Custom`].
pub fn parse_type_name(name: &str) -> Result<SqlType> {
    let trimmed = name.trim();
    let (base, modifiers) = match trimmed.find('(') {
        Some(open) => {
            let close = trimmed.rfind(')').filter(|close| *close > open).ok_or_else(|| {
                Error::TypeResolution(format!("unbalanced type modifier in '{}'", name))
            })?;
            let suffix = trimmed[close + 1..].trim();
            let base = format!("{} {}", trimmed[..open].trim(), suffix);
            (base, parse_modifiers(name, &trimmed[open + 1..close])?)
        }
        None => (trimmed.to_string(), Vec::new()),
    };
    let base = base.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_uppercase();
    let first = modifiers.first().copied();

    let resolved = match base.as_str() {
        "BOOLEAN" | "BOOL" => SqlType::Boolean,
        "SMALLINT" | "INT2" => SqlType::SmallInt,
        "INT" | "INTEGER" | "INT4" => SqlType::Integer,
        "BIGINT" | "INT8" => SqlType::BigInt,
        "REAL" | "FLOAT4" => SqlType::Real,
        "DOUBLE" | "DOUBLE PRECISION" | "FLOAT" | "FLOAT8" => SqlType::DoublePrecision,
        "NUMERIC" | "DECIMAL" | "DEC" => SqlType::Numeric {
            precision: first,
            scale: modifiers.get(1).copied(),
        },
        "CHAR" | "CHARACTER" => SqlType::Char(first),
        "VARCHAR" | "CHARACTER VARYING" | "CHAR VARYING" => SqlType::Varchar(first),
        "TEXT" | "STRING" => SqlType::Text,
        "BYTEA" | "BLOB" | "VARBINARY" => SqlType::Bytea,
        "DATE" => SqlType::Date,
        "TIME" | "TIME WITHOUT TIME ZONE" => SqlType::Time { with_time_zone: false },
        "TIME WITH TIME ZONE" | "TIMETZ" => SqlType::Time { with_time_zone: true },
        "TIMESTAMP" | "TIMESTAMP WITHOUT TIME ZONE" | "DATETIME" => {
            SqlType::Timestamp { with_time_zone: false }
        }
        "TIMESTAMP WITH TIME ZONE" | "TIMESTAMPTZ" => SqlType::Timestamp { with_time_zone: true },
        "INTERVAL" => SqlType::Interval,
        "INET" => SqlType::Inet,
        "CIDR" => SqlType::Cidr,
        "MACADDR" => SqlType::MacAddr,
        "GEOMETRY" => SqlType::Geometry,
        "BOX2D" => SqlType::Box2D,
        "BOX3D" => SqlType::Box3D,
        _ => SqlType::Custom(trimmed.to_string()),
    };
    Ok(resolved)
}

fn parse_modifiers(name: &str, inner: &str) -> Result<Vec<u32>> {
    inner
        .split(',')
        .map(|part| {
            part.trim().parse::<u32>().map_err(|_| {
                Error::TypeResolution(format!("invalid type modifier '{}' in '{}'", part.trim(), name))
            })
        })
        .collect()
}

/// Builds boolean-valued nodes. Shared with WHERE-clause handling in the
/// surrounding front end.
pub trait PredicateBuilder: Send + Sync {
    /// Lower a searched-CASE condition
    fn build_predicate(&self, builder: &ExpressionBuilder<'_>, node: &ParseNode) -> Result<ExpressionNode>;

    /// Combine two lowered operands with a comparison or logical operator
    fn comparison(&self, op: Operator, left: ExpressionNode, right: ExpressionNode) -> Result<ExpressionNode>;

    fn equality(&self, left: ExpressionNode, right: ExpressionNode) -> Result<ExpressionNode> {
        self.comparison(Operator::Eq, left, right)
    }
}

/// Lowers conditions with the general expression builder
#[derive(Debug, Default, Clone, Copy)]
pub struct OperatorPredicateBuilder;

impl PredicateBuilder for OperatorPredicateBuilder {
    fn build_predicate(&self, builder: &ExpressionBuilder<'_>, node: &ParseNode) -> Result<ExpressionNode> {
        builder.child()?.build(node)
    }

    fn comparison(&self, op: Operator, left: ExpressionNode, right: ExpressionNode) -> Result<ExpressionNode> {
        if !op.is_predicate() {
            return Err(Error::InvariantViolation(format!(
                "operator {} does not yield a boolean",
                op
            )));
        }
        let raw_text = format!("{} {} {}", left.raw_text, op, right.raw_text);
        Ok(ExpressionNode::new(ExpressionKind::Operator {
            op,
            operands: vec![left, right],
        })
        .with_raw_text(raw_text))
    }
}

/// Resolves the alias written after a projection expression
pub trait AliasResolver: Send + Sync {
    /// `Err(Error::AliasNotFound)` is the one failure the projection builder recovers from
    fn resolve_alias(&self, alias: Option<&RawIdent>, expr: &ExpressionNode) -> Result<Option<String>>;
}

/// Accepts any explicit alias, folded like an identifier
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultAliasResolver;

impl AliasResolver for DefaultAliasResolver {
    fn resolve_alias(&self, alias: Option<&RawIdent>, _expr: &ExpressionNode) -> Result<Option<String>> {
        Ok(alias.map(|ident| LowerCaseNormalizer.normalize_case(ident)))
    }
}

/// Resolves the table path of `table.*`
pub trait IdentifierResolver: Send + Sync {
    fn resolve_table(&self, parts: &[RawIdent]) -> Result<Vec<String>>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultIdentifierResolver;

impl IdentifierResolver for DefaultIdentifierResolver {
    fn resolve_table(&self, parts: &[RawIdent]) -> Result<Vec<String>> {
        if parts.is_empty() {
            return Err(Error::InvariantViolation("empty table name before '.*'".to_string()));
        }
        Ok(parts.iter().map(|part| LowerCaseNormalizer.normalize_case(part)).collect())
    }
}

/// Client session values answered by session niladic functions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub user: Option<String>,
    pub database: Option<String>,
    pub schema: Option<String>,
}

impl SessionContext {
    pub fn new(user: impl Into<String>, database: impl Into<String>) -> Self {
        SessionContext {
            user: Some(user.into()),
            database: Some(database.into()),
            schema: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }
}
