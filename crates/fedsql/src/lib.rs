//! fedsql - SQL function and expression normalization for a federated query front end
//!
//! fedsql lowers SQL projection lists and expressions into a small uniform
//! expression-node tree:
//! - Every function call resolved to a stable catalog identifier
//! - SQL-99 keyword forms (TRIM, EXTRACT, SUBSTRING, ...) kept regenerable
//! - CASE lowered to ordered predicate/result branches
//! - SQL regenerated from the tree for routing to remote backends
//!
//! # Example
//!
//! ```rust
//! use fedsql::Frontend;
//!
//! let frontend = Frontend::default();
//!
//! let projection = frontend
//!     .normalize_projection("SELECT TRIM(LEADING 'x' FROM name) AS n FROM t")
//!     .unwrap();
//! assert_eq!(projection.column_count(), 1);
//! assert_eq!(projection.to_sql(), "TRIM(LEADING 'x' FROM name) AS n");
//! ```

pub use fedsql_binder as binder;
pub use fedsql_catalog as catalog;
pub use fedsql_common as common;
pub use fedsql_parser as parser;

use fedsql_binder::{render_projection, Binder, ExpressionNode, SessionContext};
use fedsql_catalog::FunctionCatalogEntry;
use fedsql_common::{BuilderConfig, Result};

/// The normalization front end
pub struct Frontend {
    binder: Binder,
}

impl Frontend {
    /// Create a front end with the given limits and session
    pub fn new(config: BuilderConfig, session: SessionContext) -> Self {
        Frontend {
            binder: Binder::new(config, session),
        }
    }

    /// Create a front end around a binder with custom collaborators
    pub fn with_binder(binder: Binder) -> Self {
        Frontend { binder }
    }

    /// Normalize the projection list of a single SELECT statement
    pub fn normalize_projection(&self, sql: &str) -> Result<NormalizedProjection> {
        let entries = parser::parse_projection(sql, self.config().max_nesting_depth)?;
        let columns = self.binder.bind_projection(&entries)?;
        Ok(NormalizedProjection { columns })
    }

    /// Normalize a standalone scalar expression
    pub fn normalize_expression(&self, sql: &str) -> Result<ExpressionNode> {
        let tree = parser::parse_expression(sql, self.config().max_nesting_depth)?;
        self.binder.bind_expression(&tree)
    }

    /// Normalize a SELECT and render its projection list back to SQL
    pub fn regenerate(&self, sql: &str) -> Result<String> {
        Ok(self.normalize_projection(sql)?.to_sql())
    }

    /// Look up a function by any of its spellings
    pub fn catalog_entry(&self, name: &str) -> Option<&'static FunctionCatalogEntry> {
        catalog::ids_for_spelling(name)
            .first()
            .and_then(|id| catalog::lookup(*id))
    }

    pub fn config(&self) -> &BuilderConfig {
        self.binder.config()
    }

    /// Change the nesting bound for subsequent statements
    pub fn set_max_nesting_depth(&mut self, depth: usize) -> Result<()> {
        let config = self.binder.config().clone().with_max_nesting_depth(depth);
        config.validate()?;
        *self.binder.config_mut() = config;
        Ok(())
    }

    pub fn session(&self) -> &SessionContext {
        self.binder.session()
    }

    pub fn session_mut(&mut self) -> &mut SessionContext {
        self.binder.session_mut()
    }

    /// Get the binder
    pub fn binder(&self) -> &Binder {
        &self.binder
    }
}

impl Default for Frontend {
    fn default() -> Self {
        Self::new(BuilderConfig::default(), SessionContext::default())
    }
}

/// Result of normalizing a projection list
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedProjection {
    /// Output columns in projection order
    pub columns: Vec<ExpressionNode>,
}

impl NormalizedProjection {
    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column display names
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.display_name()).collect()
    }

    /// Regenerated projection list
    pub fn to_sql(&self) -> String {
        render_projection(&self.columns)
    }

    pub fn contains_aggregate(&self) -> bool {
        self.columns.iter().any(|c| c.contains_aggregate())
    }

    /// Format the columns as a two-column table of name and regenerated SQL
    pub fn to_table_string(&self) -> String {
        if self.columns.is_empty() {
            return String::new();
        }

        let names = self.column_names();
        let rendered: Vec<String> = self.columns.iter().map(|c| c.to_sql()).collect();
        let name_width = names.iter().map(|n| n.len()).max().unwrap_or(0).max("column".len());
        let sql_width = rendered.iter().map(|s| s.len()).max().unwrap_or(0).max("sql".len());

        let mut output = String::new();
        output.push_str(&format!("{:name_width$} | {:sql_width$}\n", "column", "sql"));
        output.push_str(&format!("{}-+-{}\n", "-".repeat(name_width), "-".repeat(sql_width)));
        for (name, sql) in names.iter().zip(&rendered) {
            output.push_str(&format!("{:name_width$} | {:sql_width$}\n", name, sql));
        }
        output
    }
}
