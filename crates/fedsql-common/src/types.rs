//! SQL type system for cast targets
//!
//! This module defines the types a CAST or CONVERT can name. The type-checking
//! planner owns the full type system; the expression layer only needs enough
//! structure to carry a resolved target and render it back as SQL.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved SQL type, as named by a cast target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    // ============================================
    // Untyped
    // ============================================
    /// `CAST(x AS NULL)`: the untyped marker
    Null,

    // ============================================
    // Boolean
    // ============================================
    Boolean,

    // ============================================
    // Numeric types
    // ============================================
    /// 16-bit signed integer
    SmallInt,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    BigInt,
    /// 32-bit IEEE 754 floating point
    Real,
    /// 64-bit IEEE 754 floating point
    DoublePrecision,
    /// Exact numeric with optional precision and scale
    Numeric {
        precision: Option<u32>,
        scale: Option<u32>,
    },

    // ============================================
    // Character types
    // ============================================
    /// Fixed-length character string
    Char(Option<u32>),
    /// Variable-length character string
    Varchar(Option<u32>),
    /// Unbounded text
    Text,
    /// Binary string
    Bytea,

    // ============================================
    // Date/Time types
    // ============================================
    Date,
    Time { with_time_zone: bool },
    Timestamp { with_time_zone: bool },
    Interval,

    // ============================================
    // Network and spatial types
    // ============================================
    Inet,
    Cidr,
    MacAddr,
    Geometry,
    Box2D,
    Box3D,

    // ============================================
    // Other
    // ============================================
    /// A type name the resolver passed through untouched
    Custom(String),
}

impl SqlType {
    /// Returns true if this is the untyped `NULL` marker
    pub fn is_null(&self) -> bool {
        matches!(self, SqlType::Null)
    }

    /// Returns true if this type is a numeric type
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            SqlType::SmallInt
                | SqlType::Integer
                | SqlType::BigInt
                | SqlType::Real
                | SqlType::DoublePrecision
                | SqlType::Numeric { .. }
        )
    }

    /// Returns true if this type is a character type
    pub fn is_character(&self) -> bool {
        matches!(self, SqlType::Char(_) | SqlType::Varchar(_) | SqlType::Text)
    }

    /// Returns true if this type is a temporal type
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            SqlType::Date | SqlType::Time { .. } | SqlType::Timestamp { .. } | SqlType::Interval
        )
    }

    /// Returns true if this type belongs to the spatial extension
    pub fn is_spatial(&self) -> bool {
        matches!(self, SqlType::Geometry | SqlType::Box2D | SqlType::Box3D)
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::Null => write!(f, "NULL"),
            SqlType::Boolean => write!(f, "BOOLEAN"),
            SqlType::SmallInt => write!(f, "SMALLINT"),
            SqlType::Integer => write!(f, "INTEGER"),
            SqlType::BigInt => write!(f, "BIGINT"),
            SqlType::Real => write!(f, "REAL"),
            SqlType::DoublePrecision => write!(f, "DOUBLE PRECISION"),
            SqlType::Numeric { precision, scale } => match (precision, scale) {
                (Some(p), Some(s)) => write!(f, "NUMERIC({},{})", p, s),
                (Some(p), None) => write!(f, "NUMERIC({})", p),
                _ => write!(f, "NUMERIC"),
            },
            SqlType::Char(Some(n)) => write!(f, "CHAR({})", n),
            SqlType::Char(None) => write!(f, "CHAR"),
            SqlType::Varchar(Some(n)) => write!(f, "VARCHAR({})", n),
            SqlType::Varchar(None) => write!(f, "VARCHAR"),
            SqlType::Text => write!(f, "TEXT"),
            SqlType::Bytea => write!(f, "BYTEA"),
            SqlType::Date => write!(f, "DATE"),
            SqlType::Time { with_time_zone: false } => write!(f, "TIME"),
            SqlType::Time { with_time_zone: true } => write!(f, "TIME WITH TIME ZONE"),
            SqlType::Timestamp { with_time_zone: false } => write!(f, "TIMESTAMP"),
            SqlType::Timestamp { with_time_zone: true } => write!(f, "TIMESTAMP WITH TIME ZONE"),
            SqlType::Interval => write!(f, "INTERVAL"),
            SqlType::Inet => write!(f, "INET"),
            SqlType::Cidr => write!(f, "CIDR"),
            SqlType::MacAddr => write!(f, "MACADDR"),
            SqlType::Geometry => write!(f, "GEOMETRY"),
            SqlType::Box2D => write!(f, "BOX2D"),
            SqlType::Box3D => write!(f, "BOX3D"),
            SqlType::Custom(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(SqlType::Integer.is_numeric());
        assert!(SqlType::Numeric { precision: Some(10), scale: Some(2) }.is_numeric());
        assert!(!SqlType::Text.is_numeric());
        assert!(SqlType::Varchar(Some(20)).is_character());
        assert!(SqlType::Timestamp { with_time_zone: true }.is_temporal());
        assert!(SqlType::Geometry.is_spatial());
        assert!(SqlType::Null.is_null());
    }

    #[test]
    fn test_display() {
        assert_eq!(SqlType::Integer.to_string(), "INTEGER");
        assert_eq!(
            SqlType::Numeric { precision: Some(10), scale: Some(2) }.to_string(),
            "NUMERIC(10,2)"
        );
        assert_eq!(SqlType::Varchar(Some(32)).to_string(), "VARCHAR(32)");
        assert_eq!(
            SqlType::Timestamp { with_time_zone: true }.to_string(),
            "TIMESTAMP WITH TIME ZONE"
        );
        assert_eq!(SqlType::Custom("TSVECTOR".to_string()).to_string(), "TSVECTOR");
    }
}
