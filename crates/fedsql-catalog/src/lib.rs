//! fedsql Catalog - the static function catalog
//!
//! Every supported function form has a stable [`FunctionId`] and a canonical
//! name. Surface spellings map onto identifiers through [`KeywordBinding`]s,
//! some of which depend on the shape of the call (argument count, matched
//! alternative, `*`, an optional trailing argument).
//!
//! The catalog is built once per process and never mutated, so it is read
//! from any thread without locking.

use fedsql_common::{Error, Result};
use hashbrown::HashMap;
use std::sync::LazyLock;

mod function;
mod keyword;

pub use function::{ids, Arity, FunctionCatalogEntry, FunctionClass, FunctionId};
pub use keyword::{FunctionFamily, KeywordBinding, ResolveContext, SetQuantifier};

/// Identifies the id assignment. Bumped whenever a published id changes meaning.
///
/// Version 2 gave `BIT_LENGTH` an identifier of its own; version 1 shared
/// `AGE`'s.
pub const CATALOG_VERSION: u32 = 2;

static BY_ID: LazyLock<HashMap<FunctionId, &'static FunctionCatalogEntry>> = LazyLock::new(|| {
    function::ENTRIES.iter().map(|entry| (entry.id, entry)).collect()
});

static KEYWORDS: LazyLock<HashMap<&'static str, KeywordBinding>> = LazyLock::new(|| {
    let mut keywords = HashMap::new();
    for entry in function::ENTRIES {
        keywords
            .entry(entry.canonical_name)
            .or_insert(KeywordBinding::Fixed(entry.id));
    }
    for (spelling, binding) in keyword::explicit_bindings() {
        keywords.insert(spelling, binding);
    }
    keywords
});

/// Resolve a surface spelling to its catalog entry.
///
/// The spelling is matched case-insensitively. The context supplies the
/// structural facts that context-dependent spellings need; the argument count
/// is checked against the selected entry's arity.
pub fn resolve(token: &str, ctx: &ResolveContext) -> Result<&'static FunctionCatalogEntry> {
    let spelling = token.to_ascii_uppercase();
    let binding = binding(&spelling).ok_or_else(|| Error::UnknownFunction {
        token: token.to_string(),
    })?;

    let id = binding.select(&spelling, ctx)?;
    let entry = lookup(id)
        .ok_or_else(|| Error::Internal(format!("keyword {} bound to unassigned id {}", spelling, id)))?;

    if !entry.arity.accepts(ctx.argc) {
        return Err(Error::catalog_mismatch(
            &spelling,
            format!(
                "{} takes {} argument(s), got {}",
                entry.canonical_name,
                entry.arity.describe(),
                ctx.argc
            ),
        ));
    }
    if ctx.quantifier.is_some() && !entry.is_aggregate() {
        return Err(Error::catalog_mismatch(
            &spelling,
            "DISTINCT/ALL is only valid for aggregate functions",
        ));
    }

    log::debug!("resolved {} ({:?}) to {} {}", spelling, ctx, entry.id, entry.canonical_name);
    Ok(entry)
}

/// Get the binding for a spelling, if the spelling is known
pub fn binding(token: &str) -> Option<KeywordBinding> {
    KEYWORDS.get(token.to_ascii_uppercase().as_str()).copied()
}

/// Whether the spelling names any catalog function
pub fn is_known(token: &str) -> bool {
    binding(token).is_some()
}

/// Get an entry by identifier
pub fn lookup(id: FunctionId) -> Option<&'static FunctionCatalogEntry> {
    BY_ID.get(&id).copied()
}

/// All entries in identifier order
pub fn entries() -> impl Iterator<Item = &'static FunctionCatalogEntry> {
    function::ENTRIES.iter()
}

/// Keyword families resolved by matched alternative
pub fn families() -> &'static [FunctionFamily] {
    keyword::FAMILIES
}

/// The family a spelling belongs to, if any
pub fn family_of(token: &str) -> Option<&'static FunctionFamily> {
    match binding(token)? {
        KeywordBinding::ByAlternative(family) => Some(family),
        _ => None,
    }
}

/// Every identifier a spelling can resolve to, whatever the call shape
pub fn ids_for_spelling(token: &str) -> Vec<FunctionId> {
    binding(token).map(|b| b.targets()).unwrap_or_default()
}

/// Whether the identifier names an aggregate
pub fn is_aggregate(id: FunctionId) -> bool {
    lookup(id).is_some_and(|entry| entry.is_aggregate())
}

/// All known spellings, sorted
pub fn spellings() -> Vec<&'static str> {
    let mut spellings: Vec<&'static str> = KEYWORDS.keys().copied().collect();
    spellings.sort_unstable();
    spellings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id_of(token: &str, ctx: &ResolveContext) -> FunctionId {
        resolve(token, ctx).unwrap().id
    }

    #[test]
    fn test_synonyms_share_identifiers() {
        let one = ResolveContext::with_args(1);
        assert_eq!(id_of("CEIL", &one), id_of("CEILING", &one));
        assert_eq!(id_of("ceil", &one), ids::CEIL);

        let two = ResolveContext::with_args(2);
        assert_eq!(id_of("MOD", &two), id_of("MODULE", &two));
        assert_eq!(id_of("POW", &two), ids::POWER);
    }

    #[test]
    fn test_index_and_instr_are_distinct() {
        let two = ResolveContext::with_args(2);
        assert_ne!(id_of("INDEX", &two), id_of("INSTR", &two));
    }

    #[test]
    fn test_count_star_versus_count_distinct() {
        let star = id_of("COUNT", &ResolveContext::star());
        let distinct = id_of(
            "COUNT",
            &ResolveContext::with_args(1).quantifier(Some(SetQuantifier::Distinct)),
        );
        assert_eq!(star, ids::COUNT_STAR);
        assert_eq!(distinct, ids::COUNT);
        assert_ne!(star, distinct);
    }

    #[test]
    fn test_star_rejected_outside_count() {
        let result = resolve("SUM", &ResolveContext::star());
        assert!(matches!(result, Err(Error::CatalogMismatch { .. })));
    }

    #[test]
    fn test_niladic_date_forms() {
        let none = ResolveContext::with_args(0);
        assert_eq!(id_of("CURDATE", &none), ids::CURRENT_DATE);
        assert_eq!(id_of("DATE", &none), ids::CURRENT_DATE);
        assert_eq!(id_of("DATE", &ResolveContext::with_args(1)), ids::DATE);
        assert_eq!(id_of("CURTIME", &none), ids::CURRENT_TIME);
        assert_eq!(id_of("TIME", &none), ids::CURRENT_TIME);
        assert_eq!(id_of("TIMESTAMP", &none), ids::CURRENT_TIMESTAMP);
        assert_eq!(id_of("TIMESTAMP", &ResolveContext::with_args(1)), ids::TIMESTAMP);
    }

    #[test]
    fn test_families_select_by_alternative() {
        let one = ResolveContext::with_args(1);
        assert_eq!(id_of("STDDEV", &one), ids::STDDEV);
        assert_eq!(id_of("STDDEV_POP", &one), ids::STDDEV_POP);
        assert_eq!(id_of("STDEVP", &one), ids::STDDEV_POP);
        assert_eq!(id_of("STDEV", &one), ids::STDDEV_SAMP);
        assert_eq!(id_of("VAR_SAMP", &one), ids::VARIANCE_SAMP);
        assert_eq!(id_of("VARIANCE", &one.clone().alternative(1)), ids::VARIANCE_POP);

        let two = ResolveContext::with_args(2);
        assert_eq!(id_of("REGR_SXY", &two), ids::REGR_SXY);
        assert_eq!(id_of("CORR", &two.clone().alternative(2)), ids::COVAR_SAMP);

        let out_of_range = resolve("CORR", &two.alternative(7));
        assert!(matches!(out_of_range, Err(Error::CatalogMismatch { .. })));
    }

    #[test]
    fn test_bool_and_every_are_separate() {
        let one = ResolveContext::with_args(1);
        assert_ne!(id_of("BOOL_AND", &one), id_of("EVERY", &one));
    }

    #[test]
    fn test_arity_dependent_forms() {
        assert_eq!(id_of("TRANSLATE", &ResolveContext::with_args(3)), ids::TRANSLATE);
        assert_eq!(id_of("TRANSLATE", &ResolveContext::with_args(4)), ids::ST_TRANSLATE);
        assert_eq!(id_of("ST_COLLECT", &ResolveContext::with_args(1)), ids::ST_COLLECT_AGG);
        assert_eq!(id_of("ST_COLLECT", &ResolveContext::with_args(2)), ids::ST_COLLECT);
        assert!(is_aggregate(ids::ST_COLLECT_AGG));
        assert!(!is_aggregate(ids::ST_COLLECT));
    }

    #[test]
    fn test_bit_length_has_its_own_identifier() {
        let one = ResolveContext::with_args(1);
        assert_ne!(id_of("BIT_LENGTH", &one), id_of("AGE", &one));
    }

    #[test]
    fn test_unknown_and_wrong_arity() {
        assert!(matches!(
            resolve("NO_SUCH_FUNCTION", &ResolveContext::default()),
            Err(Error::UnknownFunction { .. })
        ));
        assert!(matches!(
            resolve("ABS", &ResolveContext::with_args(2)),
            Err(Error::CatalogMismatch { .. })
        ));
        assert!(matches!(
            resolve("ABS", &ResolveContext::with_args(1).quantifier(Some(SetQuantifier::All))),
            Err(Error::CatalogMismatch { .. })
        ));
    }

    #[test]
    fn test_every_binding_target_exists() {
        for spelling in spellings() {
            for id in ids_for_spelling(spelling) {
                assert!(lookup(id).is_some(), "{} bound to missing id {}", spelling, id);
            }
        }
    }

    #[test]
    fn test_every_canonical_name_resolves() {
        for entry in entries() {
            assert!(is_known(entry.canonical_name), "{} has no binding", entry.canonical_name);
            assert!(ids_for_spelling(entry.canonical_name).contains(&entry.id));
        }
    }

    #[test]
    fn test_family_lookup() {
        assert_eq!(family_of("stddev_samp").map(|f| f.name), Some("STDDEV"));
        assert!(family_of("ABS").is_none());
        assert_eq!(families().len(), 4);
    }
}
