//! Projection list binding

use crate::expression::{ExpressionKind, ExpressionNode};
use crate::Binder;
use fedsql_common::{Error, Result};
use fedsql_parser::ast::SelectEntry;

impl Binder {
    /// Bind every entry of a projection list, in order
    pub fn bind_projection(&self, entries: &[SelectEntry]) -> Result<Vec<ExpressionNode>> {
        let columns = entries
            .iter()
            .map(|entry| self.bind_select_entry(entry))
            .collect::<Result<Vec<_>>>()?;
        log::debug!("bound projection of {} columns", columns.len());
        Ok(columns)
    }

    /// Bind a single projection entry
    pub fn bind_select_entry(&self, entry: &SelectEntry) -> Result<ExpressionNode> {
        match entry {
            SelectEntry::Wildcard => {
                log::debug!("projection entry: *");
                Ok(ExpressionNode::new(ExpressionKind::ColumnList { qualifier: vec![] })
                    .with_raw_text("*".to_string()))
            }
            SelectEntry::QualifiedWildcard(parts) => {
                let qualifier = self.identifier_resolver().resolve_table(parts)?;
                let source: Vec<String> = parts.iter().map(|p| p.to_string()).collect();
                log::debug!("projection entry: {}.*", qualifier.join("."));
                Ok(ExpressionNode::new(ExpressionKind::ColumnList { qualifier })
                    .with_raw_text(format!("{}.*", source.join("."))))
            }
            SelectEntry::Expr { expr, alias } => {
                let mut node = self.bind_expression(expr)?;
                node.alias = match self.alias_resolver().resolve_alias(alias.as_ref(), &node) {
                    Ok(resolved) => resolved,
                    Err(err) if err.is_recoverable() => match &node.kind {
                        ExpressionKind::ColumnRef { column, .. } => {
                            log::warn!("{}; using column name '{}' as alias", err, column);
                            Some(column.clone())
                        }
                        _ => return Err(Error::query_build(node.to_sql(), err.to_string())),
                    },
                    Err(err) => return Err(Error::query_build(node.to_sql(), err.to_string())),
                };
                log::debug!("projection entry: {} as {:?}", node.raw_text, node.alias);
                Ok(node)
            }
        }
    }
}

/// Attach the column names an enclosing query gives to this projection
pub fn apply_outer_aliases(columns: &mut [ExpressionNode], names: &[String]) -> Result<()> {
    if columns.len() != names.len() {
        let rendered: Vec<String> = columns.iter().map(|c| c.to_sql()).collect();
        return Err(Error::query_build(
            rendered.join(", "),
            format!(
                "{} column aliases given for {} projection columns",
                names.len(),
                columns.len()
            ),
        ));
    }
    for (column, name) in columns.iter_mut().zip(names) {
        column.outer_alias = Some(name.clone());
    }
    Ok(())
}
