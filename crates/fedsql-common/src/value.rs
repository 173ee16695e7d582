//! Constant value representation for fedsql
//!
//! The `Value` enum represents the payload of a constant expression node:
//! - Literals written in the source text
//! - Session values substituted for niladic functions (`CURRENT_USER`)
//! - Bare keyword tokens inserted as pseudo-arguments (`FROM`, `BOTH`, `USING`)

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Constant value carried by an expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// NULL literal
    Null,

    /// TRUE / FALSE
    Boolean(bool),

    /// Integer literal that fits in 64 bits
    Integer(i64),
    /// Exact numeric literal (`12.50`)
    Decimal(Decimal),
    /// Approximate numeric literal (`1.5e10`)
    Double(f64),

    /// Character string literal
    Varchar(String),

    /// `DATE '...'`
    Date(NaiveDate),
    /// `TIME '...'`
    Time(NaiveTime),
    /// `TIMESTAMP '...'`
    Timestamp(NaiveDateTime),
    /// `INTERVAL '...'`, kept as written
    Interval(String),

    /// A bare SQL keyword used as a pseudo-argument. Renders without quotes.
    Keyword(String),
}

impl Value {
    /// Parse a numeric literal token, preferring the most exact representation
    pub fn from_numeric_literal(text: &str) -> Option<Value> {
        if let Ok(i) = text.parse::<i64>() {
            return Some(Value::Integer(i));
        }
        if !text.contains(['e', 'E']) {
            if let Ok(d) = Decimal::from_str(text) {
                return Some(Value::Decimal(d));
            }
        }
        text.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::Double)
    }

    /// Create a keyword pseudo-argument
    pub fn keyword(token: impl Into<String>) -> Self {
        Value::Keyword(token.into())
    }

    /// Returns true if this value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this value is a keyword pseudo-argument
    pub fn is_keyword(&self) -> bool {
        matches!(self, Value::Keyword(_))
    }

    /// Try to convert this value to an i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to convert this value to a string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Varchar(s) | Value::Keyword(s) => Some(s),
            _ => None,
        }
    }

    /// Render this value as SQL literal text
    pub fn to_sql_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Boolean(true) => "TRUE".to_string(),
            Value::Boolean(false) => "FALSE".to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::Double(n) => format!("{:e}", n),
            Value::Varchar(s) => quote_string(s),
            Value::Date(d) => format!("DATE {}", quote_string(&d.to_string())),
            Value::Time(t) => format!("TIME {}", quote_string(&t.to_string())),
            Value::Timestamp(ts) => format!("TIMESTAMP {}", quote_string(&ts.to_string())),
            Value::Interval(text) => format!("INTERVAL {}", quote_string(text)),
            Value::Keyword(k) => k.clone(),
        }
    }
}

/// Quote a string as a SQL character literal, doubling embedded quotes
pub fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Double(n) => write!(f, "{}", n),
            Value::Varchar(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", d),
            Value::Time(t) => write!(f, "{}", t),
            Value::Timestamp(ts) => write!(f, "{}", ts),
            Value::Interval(text) => write!(f, "{}", text),
            Value::Keyword(k) => write!(f, "{}", k),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Varchar(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Varchar(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_literals() {
        assert_eq!(Value::from_numeric_literal("42"), Some(Value::Integer(42)));
        assert_eq!(
            Value::from_numeric_literal("12.50"),
            Some(Value::Decimal(Decimal::from_str("12.50").unwrap()))
        );
        assert_eq!(Value::from_numeric_literal("1.5e3"), Some(Value::Double(1500.0)));
        assert_eq!(Value::from_numeric_literal("1e400"), None);
        assert_eq!(Value::from_numeric_literal("abc"), None);
    }

    #[test]
    fn test_sql_literal_rendering() {
        assert_eq!(Value::Varchar("it's".to_string()).to_sql_literal(), "'it''s'");
        assert_eq!(Value::keyword("FROM").to_sql_literal(), "FROM");
        assert_eq!(Value::Boolean(false).to_sql_literal(), "FALSE");
        assert_eq!(Value::Null.to_sql_literal(), "NULL");
        let d = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(Value::Date(d).to_sql_literal(), "DATE '2024-01-31'");
        assert_eq!(Value::Interval("1 day".to_string()).to_sql_literal(), "INTERVAL '1 day'");
    }

    #[test]
    fn test_keyword_is_not_a_string() {
        assert_ne!(Value::keyword("FROM"), Value::Varchar("FROM".to_string()));
        assert!(Value::keyword("BOTH").is_keyword());
        assert_eq!(Value::keyword("BOTH").as_str(), Some("BOTH"));
    }

    #[test]
    fn test_from_conversions() {
        let v: Value = 42i64.into();
        assert_eq!(v, Value::Integer(42));

        let v: Value = "hello".into();
        assert_eq!(v, Value::Varchar("hello".to_string()));
    }
}
