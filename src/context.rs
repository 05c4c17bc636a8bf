//! Per-compilation translation context.
//!
//! A [`TranslateContext`] bundles the read-only collaborators one
//! compilation needs (metadata, relationships, query policy, provider
//! syntax, value converters) with the little mutable state a compilation
//! carries: the table-alias counter and the path of relations being
//! expanded.
//!
//! The collaborators are shared behind `Arc` and may serve many contexts at
//! once. A context itself is single-threaded; build one per compilation.

use crate::command::BatchOperateOptions;
use crate::expression::{AliasGenerator, TableAlias};
use crate::metadata::MetadataProvider;
use crate::query::{NoPolicy, QueryPolicy};
use crate::relation::RelationshipProvider;
use crate::value::ConverterRegistry;
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

/// Provider-specific SQL facts the builders depend on
pub trait SyntaxProvider: Send + Sync {
    /// Statement retrieving the last auto-increment identity, if the
    /// provider has one
    fn identity_select(&self) -> Option<&str>;
}

/// Plain [`SyntaxProvider`] value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderSyntax {
    identity_select: Option<String>,
}

impl ProviderSyntax {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_identity_select(mut self, sql: impl Into<String>) -> Self {
        self.identity_select = Some(sql.into());
        self
    }
}

impl SyntaxProvider for ProviderSyntax {
    fn identity_select(&self) -> Option<&str> {
        self.identity_select.as_deref()
    }
}

/// Tunables for one compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Upper bound on relation levels a projection expands; deeper
    /// navigations are left out of the projector. Cycles stop earlier.
    pub max_relation_depth: usize,
    /// Default tracking mode for nested relation projections
    pub no_tracking: bool,
    /// Options for batch mutations; `None` checks the first entity only
    pub batch: Option<BatchOperateOptions>,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            max_relation_depth: 4,
            no_tracking: false,
            batch: None,
        }
    }
}

/// Collaborators and state of one compilation
pub struct TranslateContext {
    metadata: Arc<dyn MetadataProvider>,
    relationships: Arc<dyn RelationshipProvider>,
    policy: Arc<dyn QueryPolicy>,
    syntax: Arc<dyn SyntaxProvider>,
    converters: Arc<ConverterRegistry>,
    temporary_bag: Option<Vec<String>>,
    options: TranslateOptions,
    aliases: AliasGenerator,
    relation_path: RefCell<Vec<String>>,
}

impl fmt::Debug for TranslateContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslateContext")
            .field("identity_select", &self.syntax.identity_select())
            .field("temporary_bag", &self.temporary_bag)
            .field("options", &self.options)
            .field("aliases", &self.aliases.allocated())
            .field("relation_path", &self.relation_path.borrow())
            .finish_non_exhaustive()
    }
}

impl TranslateContext {
    /// Start a context over the given metadata and relationship sources
    ///
    /// Defaults: [`NoPolicy`], a provider without identity select, the
    /// global converter registry, no temporary bag, default options.
    pub fn builder(
        metadata: Arc<dyn MetadataProvider>,
        relationships: Arc<dyn RelationshipProvider>,
    ) -> TranslateContextBuilder {
        TranslateContextBuilder {
            metadata,
            relationships,
            policy: None,
            syntax: None,
            converters: None,
            temporary_bag: None,
            options: TranslateOptions::default(),
        }
    }

    #[must_use]
    pub fn metadata(&self) -> &dyn MetadataProvider {
        self.metadata.as_ref()
    }

    #[must_use]
    pub fn relationships(&self) -> &dyn RelationshipProvider {
        self.relationships.as_ref()
    }

    #[must_use]
    pub fn policy(&self) -> &dyn QueryPolicy {
        self.policy.as_ref()
    }

    #[must_use]
    pub fn syntax(&self) -> &dyn SyntaxProvider {
        self.syntax.as_ref()
    }

    #[must_use]
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// Property names a parameter-based mutation writes
    #[must_use]
    pub fn temporary_bag(&self) -> Option<&[String]> {
        self.temporary_bag.as_deref()
    }

    #[must_use]
    pub fn options(&self) -> &TranslateOptions {
        &self.options
    }

    /// Allocate a table alias unique within this compilation
    pub fn next_alias(&self) -> TableAlias {
        self.aliases.next_alias()
    }

    /// Current relation nesting level
    #[must_use]
    pub fn relation_depth(&self) -> usize {
        self.relation_path.borrow().len()
    }

    /// Whether expanding a relation from `owner` to `related` would revisit
    /// an entity type already on the current relation path
    #[must_use]
    pub fn closes_relation_cycle(&self, owner: &str, related: &str) -> bool {
        owner == related || self.relation_path.borrow().iter().any(|t| t == related)
    }

    /// Descend one relation level out of `owner`, `None` once the configured
    /// depth is reached
    ///
    /// The level is released when the guard drops.
    pub(crate) fn enter_relation(&self, owner: &str) -> Option<RelationDepthGuard<'_>> {
        let mut path = self.relation_path.borrow_mut();
        if path.len() >= self.options.max_relation_depth {
            return None;
        }
        path.push(owner.to_string());
        Some(RelationDepthGuard {
            path: &self.relation_path,
        })
    }
}

/// Holds one relation nesting level
pub(crate) struct RelationDepthGuard<'a> {
    path: &'a RefCell<Vec<String>>,
}

impl Drop for RelationDepthGuard<'_> {
    fn drop(&mut self) {
        self.path.borrow_mut().pop();
    }
}

/// Builder returned by [`TranslateContext::builder`]
pub struct TranslateContextBuilder {
    metadata: Arc<dyn MetadataProvider>,
    relationships: Arc<dyn RelationshipProvider>,
    policy: Option<Arc<dyn QueryPolicy>>,
    syntax: Option<Arc<dyn SyntaxProvider>>,
    converters: Option<Arc<ConverterRegistry>>,
    temporary_bag: Option<Vec<String>>,
    options: TranslateOptions,
}

impl TranslateContextBuilder {
    #[must_use]
    pub fn policy(mut self, policy: Arc<dyn QueryPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    #[must_use]
    pub fn syntax(mut self, syntax: Arc<dyn SyntaxProvider>) -> Self {
        self.syntax = Some(syntax);
        self
    }

    #[must_use]
    pub fn converters(mut self, converters: Arc<ConverterRegistry>) -> Self {
        self.converters = Some(converters);
        self
    }

    #[must_use]
    pub fn temporary_bag<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.temporary_bag = Some(properties.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn options(mut self, options: TranslateOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn build(self) -> TranslateContext {
        TranslateContext {
            metadata: self.metadata,
            relationships: self.relationships,
            policy: self.policy.unwrap_or_else(|| Arc::new(NoPolicy)),
            syntax: self
                .syntax
                .unwrap_or_else(|| Arc::new(ProviderSyntax::default())),
            converters: self
                .converters
                .unwrap_or_else(|| Arc::new(ConverterRegistry::global().clone())),
            temporary_bag: self.temporary_bag,
            options: self.options,
            aliases: AliasGenerator::new(),
            relation_path: RefCell::new(Vec::new()),
        }
    }
}
