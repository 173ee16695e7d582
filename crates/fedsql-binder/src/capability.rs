//! Backend function capabilities
//!
//! Routing ships a subtree to a remote backend only when every function in
//! it is one the backend supports.

use crate::expression::ExpressionNode;
use fedsql_catalog::{self as catalog, FunctionId};
use fedsql_common::{Error, Result};
use hashbrown::HashSet;

/// The set of catalog functions a backend can execute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendCapabilities {
    supported: HashSet<FunctionId>,
}

impl BackendCapabilities {
    pub fn from_ids(ids: impl IntoIterator<Item = FunctionId>) -> Self {
        BackendCapabilities {
            supported: ids.into_iter().collect(),
        }
    }

    /// Build from function spellings. A spelling adds every identifier it can
    /// resolve to, so `COUNT` covers both `COUNT(expr)` and `COUNT(*)`.
    pub fn from_names<'n>(names: impl IntoIterator<Item = &'n str>) -> Result<Self> {
        let mut supported = HashSet::new();
        for name in names {
            let ids = catalog::ids_for_spelling(name);
            if ids.is_empty() {
                return Err(Error::UnknownFunction {
                    token: name.to_string(),
                });
            }
            supported.extend(ids);
        }
        Ok(BackendCapabilities { supported })
    }

    /// Every function in the catalog
    pub fn all() -> Self {
        BackendCapabilities::from_ids(catalog::entries().map(|entry| entry.id))
    }

    pub fn supports(&self, id: FunctionId) -> bool {
        self.supported.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.supported.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supported.is_empty()
    }

    /// Unsupported functions used by `node`, deduplicated, in pre-order
    pub fn unsupported_functions(&self, node: &ExpressionNode) -> Vec<FunctionId> {
        let mut seen = HashSet::new();
        node.function_ids()
            .into_iter()
            .filter(|id| !self.supports(*id) && seen.insert(*id))
            .collect()
    }

    pub fn can_execute(&self, node: &ExpressionNode) -> bool {
        node.function_ids().iter().all(|id| self.supports(*id))
    }
}
