//! fedsql Binder - Function/expression normalization
//!
//! The binder takes the concrete parse tree and produces expression nodes:
//! - Function calls resolved against the catalog
//! - Keyword-syntax forms lowered with their keyword tokens kept as arguments
//! - CASE lowered to ordered predicate/result branches
//! - Projection entries with resolved aliases

mod capability;
mod case_binder;
mod collaborators;
mod expression;
mod expression_binder;
mod function_binder;
mod projection_binder;
mod render;
mod text;

pub use capability::BackendCapabilities;
pub use collaborators::*;
pub use expression::*;
pub use expression_binder::ExpressionBuilder;
pub use projection_binder::apply_outer_aliases;
pub use render::{quote_ident, render_projection};

use fedsql_common::{BuilderConfig, Result};
use fedsql_parser::ast::ParseNode;

/// The binder holds configuration, session values and collaborators
pub struct Binder {
    config: BuilderConfig,
    session: SessionContext,
    case_normalizer: Box<dyn CaseNormalizer>,
    type_resolver: Box<dyn TypeResolver>,
    predicate_builder: Box<dyn PredicateBuilder>,
    alias_resolver: Box<dyn AliasResolver>,
    identifier_resolver: Box<dyn IdentifierResolver>,
}

impl Binder {
    pub fn new(config: BuilderConfig, session: SessionContext) -> Self {
        Binder {
            config,
            session,
            case_normalizer: Box::new(LowerCaseNormalizer),
            type_resolver: Box::new(DefaultTypeResolver),
            predicate_builder: Box::new(OperatorPredicateBuilder),
            alias_resolver: Box::new(DefaultAliasResolver),
            identifier_resolver: Box::new(DefaultIdentifierResolver),
        }
    }

    pub fn with_case_normalizer(mut self, normalizer: impl CaseNormalizer + 'static) -> Self {
        self.case_normalizer = Box::new(normalizer);
        self
    }

    pub fn with_type_resolver(mut self, resolver: impl TypeResolver + 'static) -> Self {
        self.type_resolver = Box::new(resolver);
        self
    }

    pub fn with_predicate_builder(mut self, builder: impl PredicateBuilder + 'static) -> Self {
        self.predicate_builder = Box::new(builder);
        self
    }

    pub fn with_alias_resolver(mut self, resolver: impl AliasResolver + 'static) -> Self {
        self.alias_resolver = Box::new(resolver);
        self
    }

    pub fn with_identifier_resolver(mut self, resolver: impl IdentifierResolver + 'static) -> Self {
        self.identifier_resolver = Box::new(resolver);
        self
    }

    /// Lower a single expression
    pub fn bind_expression(&self, node: &ParseNode) -> Result<ExpressionNode> {
        ExpressionBuilder::root(self).build(node)
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut BuilderConfig {
        &mut self.config
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionContext {
        &mut self.session
    }

    pub fn case_normalizer(&self) -> &dyn CaseNormalizer {
        self.case_normalizer.as_ref()
    }

    pub fn type_resolver(&self) -> &dyn TypeResolver {
        self.type_resolver.as_ref()
    }

    pub fn predicate_builder(&self) -> &dyn PredicateBuilder {
        self.predicate_builder.as_ref()
    }

    pub fn alias_resolver(&self) -> &dyn AliasResolver {
        self.alias_resolver.as_ref()
    }

    pub fn identifier_resolver(&self) -> &dyn IdentifierResolver {
        self.identifier_resolver.as_ref()
    }
}
