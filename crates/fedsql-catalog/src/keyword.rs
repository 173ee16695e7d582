//! Keyword bindings: how a surface spelling selects a catalog identifier

use crate::function::{ids, FunctionId};
use fedsql_common::{Error, Result};
use serde::{Deserialize, Serialize};

/// `DISTINCT` / `ALL` modifier on an aggregate argument list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetQuantifier {
    Distinct,
    All,
}

impl SetQuantifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetQuantifier::Distinct => "DISTINCT",
            SetQuantifier::All => "ALL",
        }
    }
}

/// Structural facts about a production that identifier selection depends on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveContext {
    /// Number of value arguments (keyword pseudo-arguments excluded)
    pub argc: usize,
    /// Index of the grammar alternative that matched, for keyword families
    pub alternative: Option<usize>,
    pub quantifier: Option<SetQuantifier>,
    /// `COUNT(*)`
    pub star: bool,
    /// Whether the production's optional clause was written
    pub optional_clause: bool,
}

impl ResolveContext {
    pub fn with_args(argc: usize) -> Self {
        ResolveContext {
            argc,
            ..Default::default()
        }
    }

    pub fn star() -> Self {
        ResolveContext {
            star: true,
            ..Default::default()
        }
    }

    pub fn alternative(mut self, index: usize) -> Self {
        self.alternative = Some(index);
        self
    }

    pub fn quantifier(mut self, quantifier: Option<SetQuantifier>) -> Self {
        self.quantifier = quantifier;
        self
    }

    pub fn optional_clause(mut self, present: bool) -> Self {
        self.optional_clause = present;
        self
    }
}

/// A group of spellings resolved by matched alternative index
#[derive(Debug, PartialEq, Eq)]
pub struct FunctionFamily {
    pub name: &'static str,
    /// Alternatives in grammar order; several spellings may share an id
    pub alternatives: &'static [(&'static str, FunctionId)],
}

impl FunctionFamily {
    /// Index of the alternative written as `spelling`
    pub fn alternative_of(&self, spelling: &str) -> Option<usize> {
        self.alternatives
            .iter()
            .position(|(name, _)| name.eq_ignore_ascii_case(spelling))
    }

    fn select(&self, alternative: usize) -> Result<FunctionId> {
        self.alternatives
            .get(alternative)
            .map(|(_, id)| *id)
            .ok_or_else(|| {
                Error::catalog_mismatch(
                    self.name,
                    format!(
                        "alternative {} out of range (family has {})",
                        alternative,
                        self.alternatives.len()
                    ),
                )
            })
    }
}

pub(crate) static FAMILIES: &[FunctionFamily] = &[
    FunctionFamily {
        name: "STDDEV",
        alternatives: &[
            ("STDDEV", ids::STDDEV),
            ("STDDEV_POP", ids::STDDEV_POP),
            ("STDEVP", ids::STDDEV_POP),
            ("STDDEV_SAMP", ids::STDDEV_SAMP),
            ("STDEV", ids::STDDEV_SAMP),
        ],
    },
    FunctionFamily {
        name: "VARIANCE",
        alternatives: &[
            ("VARIANCE", ids::VARIANCE),
            ("VARIANCE_POP", ids::VARIANCE_POP),
            ("VAR_POP", ids::VARIANCE_POP),
            ("VARIANCE_SAMP", ids::VARIANCE_SAMP),
            ("VAR_SAMP", ids::VARIANCE_SAMP),
        ],
    },
    FunctionFamily {
        name: "CORRELATION",
        alternatives: &[
            ("CORR", ids::CORR),
            ("COVAR_POP", ids::COVAR_POP),
            ("COVAR_SAMP", ids::COVAR_SAMP),
        ],
    },
    FunctionFamily {
        name: "REGRESSION",
        alternatives: &[
            ("REGR_AVGX", ids::REGR_AVGX),
            ("REGR_AVGY", ids::REGR_AVGY),
            ("REGR_COUNT", ids::REGR_COUNT),
            ("REGR_INTERCEPT", ids::REGR_INTERCEPT),
            ("REGR_R2", ids::REGR_R2),
            ("REGR_SLOPE", ids::REGR_SLOPE),
            ("REGR_SXX", ids::REGR_SXX),
            ("REGR_SXY", ids::REGR_SXY),
            ("REGR_SYY", ids::REGR_SYY),
        ],
    },
];

/// How one spelling selects its identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordBinding {
    Fixed(FunctionId),
    /// Identifier chosen by argument count
    ByArity(&'static [(usize, FunctionId)]),
    /// Identifier chosen by the matched alternative of a family
    ByAlternative(&'static FunctionFamily),
    /// `COUNT(*)` versus `COUNT([DISTINCT | ALL] expr)`
    ByStar { star: FunctionId, expr: FunctionId },
    /// Identifier chosen by whether an optional trailing argument was written
    ByOptionalArg {
        required: usize,
        present: FunctionId,
        absent: FunctionId,
    },
}

impl KeywordBinding {
    pub(crate) fn select(&self, spelling: &str, ctx: &ResolveContext) -> Result<FunctionId> {
        if ctx.star && !matches!(self, KeywordBinding::ByStar { .. }) {
            return Err(Error::catalog_mismatch(spelling, "'*' argument is only valid for COUNT"));
        }
        match self {
            KeywordBinding::Fixed(id) => Ok(*id),
            KeywordBinding::ByArity(choices) => choices
                .iter()
                .find(|(argc, _)| *argc == ctx.argc)
                .map(|(_, id)| *id)
                .ok_or_else(|| {
                    Error::catalog_mismatch(spelling, format!("no form takes {} argument(s)", ctx.argc))
                }),
            KeywordBinding::ByAlternative(family) => {
                let index = match ctx.alternative {
                    Some(index) => index,
                    None => family.alternative_of(spelling).ok_or_else(|| {
                        Error::catalog_mismatch(spelling, format!("not an alternative of {}", family.name))
                    })?,
                };
                family.select(index)
            }
            KeywordBinding::ByStar { star, expr } => Ok(if ctx.star { *star } else { *expr }),
            KeywordBinding::ByOptionalArg {
                required,
                present,
                absent,
            } => {
                if ctx.optional_clause || ctx.argc > *required {
                    Ok(*present)
                } else {
                    Ok(*absent)
                }
            }
        }
    }

    /// Every identifier this binding can produce
    pub fn targets(&self) -> Vec<FunctionId> {
        match self {
            KeywordBinding::Fixed(id) => vec![*id],
            KeywordBinding::ByArity(choices) => choices.iter().map(|(_, id)| *id).collect(),
            KeywordBinding::ByAlternative(family) => {
                let mut targets: Vec<FunctionId> = family.alternatives.iter().map(|(_, id)| *id).collect();
                targets.dedup();
                targets
            }
            KeywordBinding::ByStar { star, expr } => vec![*star, *expr],
            KeywordBinding::ByOptionalArg { present, absent, .. } => vec![*present, *absent],
        }
    }
}

/// Spellings whose binding is not simply "canonical name to its own id".
/// Everything else is derived from the entry table.
pub(crate) fn explicit_bindings() -> Vec<(&'static str, KeywordBinding)> {
    use KeywordBinding::*;

    let mut bindings = vec![
        // Synonyms
        ("CEILING", Fixed(ids::CEIL)),
        ("MODULE", Fixed(ids::MOD)),
        ("POW", Fixed(ids::POWER)),
        ("CHARACTER_LENGTH", Fixed(ids::CHAR_LENGTH)),
        ("LCASE", Fixed(ids::LOWER)),
        ("UCASE", Fixed(ids::UPPER)),
        ("IFNULL", Fixed(ids::NVL)),
        ("ST_GEOMETRYFROMTEXT", Fixed(ids::ST_GEOMFROMTEXT)),
        ("CURDATE", Fixed(ids::CURRENT_DATE)),
        ("CURTIME", Fixed(ids::CURRENT_TIME)),
        // Structural selection
        ("COUNT", ByStar { star: ids::COUNT_STAR, expr: ids::COUNT }),
        ("DATE", ByArity(&[(0, ids::CURRENT_DATE), (1, ids::DATE)])),
        ("TIME", ByArity(&[(0, ids::CURRENT_TIME), (1, ids::TIME)])),
        ("TRANSLATE", ByArity(&[(3, ids::TRANSLATE), (4, ids::ST_TRANSLATE)])),
        (
            "TIMESTAMP",
            ByOptionalArg {
                required: 0,
                present: ids::TIMESTAMP,
                absent: ids::CURRENT_TIMESTAMP,
            },
        ),
        (
            "ST_COLLECT",
            ByOptionalArg {
                required: 1,
                present: ids::ST_COLLECT,
                absent: ids::ST_COLLECT_AGG,
            },
        ),
        (
            "ST_MAKELINE",
            ByOptionalArg {
                required: 1,
                present: ids::ST_MAKELINE,
                absent: ids::ST_MAKELINE_AGG,
            },
        ),
        (
            "ST_UNION",
            ByOptionalArg {
                required: 1,
                present: ids::ST_UNION,
                absent: ids::ST_UNION_AGG,
            },
        ),
    ];

    for family in FAMILIES {
        for (spelling, _) in family.alternatives {
            bindings.push((*spelling, ByAlternative(family)));
        }
    }

    bindings
}
