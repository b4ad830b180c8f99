//! Rule set resolution: which rule list applies to which path
//!
//! Architectural Principle: Immutable Index - Scoped bindings are compiled once into an arena
//! - Every scope, glob and rule is compiled before traversal starts
//! - Resolution is an explicit lookup: deepest matching scope, then pattern specificity
//! - A directory's candidate scopes are computed once and reused for all of its children

use crate::config::LsConfig;
use crate::domain::violations::{EntryKind, LintResult};
use crate::patterns::{split_path, BindingPattern, IgnoreFilter, PathGlob, Specificity};
use crate::rules::RuleList;

/// A directory location where bindings are declared
#[derive(Debug, Clone)]
pub struct Scope {
    glob: PathGlob,
}

impl Scope {
    fn new(path: &str) -> LintResult<Self> {
        Ok(Self { glob: PathGlob::new(path)? })
    }

    /// Normalized scope path; empty for the root
    pub fn path(&self) -> &str {
        self.glob.as_str()
    }

    pub fn is_literal(&self) -> bool {
        self.glob.is_literal()
    }

    /// Depth of the deepest ancestor of `dir_parts` (inclusive) this scope matches
    fn deepest_match(&self, dir_parts: &[&str]) -> Option<usize> {
        (0..=dir_parts.len())
            .rev()
            .find(|&len| self.glob.matches(&dir_parts[..len].join("/")))
    }
}

/// One `(scope, pattern) -> rule list` entry
#[derive(Debug, Clone)]
pub struct ScopeBinding {
    pattern: BindingPattern,
    rules: RuleList,
    /// Declaration order within the scope
    order: usize,
}

impl ScopeBinding {
    pub fn pattern(&self) -> &BindingPattern {
        &self.pattern
    }

    pub fn rules(&self) -> &RuleList {
        &self.rules
    }

    /// Name the rules are evaluated against
    pub fn checked_name<'n>(&self, name: &'n str, kind: EntryKind) -> &'n str {
        self.pattern.checked_name(name, kind)
    }
}

/// A scope and every binding declared in it
#[derive(Debug, Clone)]
pub struct ScopeEntry {
    scope: Scope,
    bindings: Vec<ScopeBinding>,
}

impl ScopeEntry {
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn bindings(&self) -> &[ScopeBinding] {
        &self.bindings
    }

    /// Most specific binding for the entry; ties go to the first declared
    fn best_binding(&self, name: &str, kind: EntryKind) -> Option<&ScopeBinding> {
        self.bindings
            .iter()
            .filter(|binding| binding.pattern.matches(name, kind))
            .max_by(|a, b| {
                a.pattern
                    .specificity()
                    .cmp(&b.pattern.specificity())
                    .then_with(|| b.order.cmp(&a.order))
            })
    }
}

/// Outcome of resolving one path
#[derive(Debug, Clone, Copy)]
pub enum Resolution<'a> {
    Ignored,
    Unbound,
    Bound(&'a ScopeBinding),
}

/// Full, read-only rule index built from the configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    scopes: Vec<ScopeEntry>,
    ignore: IgnoreFilter,
    fingerprint: String,
}

impl ResolvedConfig {
    /// Compile every scope, pattern, rule and ignore of `config`
    pub fn from_config(config: &LsConfig) -> LintResult<Self> {
        let mut scopes: Vec<ScopeEntry> = Vec::new();

        for declaration in config.scope_declarations()? {
            let index = match scopes.iter().position(|s| s.scope.path() == declaration.scope) {
                Some(index) => index,
                None => {
                    scopes.push(ScopeEntry {
                        scope: Scope::new(&declaration.scope)?,
                        bindings: Vec::new(),
                    });
                    scopes.len() - 1
                }
            };

            for binding in declaration.bindings {
                let pattern = BindingPattern::new(&binding.pattern)?;
                let rules = RuleList::compile(&binding.rules)?;
                let entry = &mut scopes[index];

                tracing::debug!(
                    "Bound '{}' in scope '{}' to {}",
                    pattern,
                    entry.scope.path(),
                    rules
                );

                let order = entry.bindings.len();
                entry.bindings.push(ScopeBinding { pattern, rules, order });
            }
        }

        let ignore = IgnoreFilter::new(config.normalized_ignores())?;

        Ok(Self { scopes, ignore, fingerprint: config.fingerprint() })
    }

    /// Rule list applying to `path`, or `None` when ignored or unbound
    pub fn resolve(&self, path: &str, is_directory: bool) -> Option<&RuleList> {
        let kind = if is_directory { EntryKind::Directory } else { EntryKind::File };
        match self.resolution(path, kind) {
            Resolution::Bound(binding) => Some(binding.rules()),
            Resolution::Ignored | Resolution::Unbound => None,
        }
    }

    /// Classify `path`: ignored, unbound, or bound to a specific binding
    pub fn resolution(&self, path: &str, kind: EntryKind) -> Resolution<'_> {
        if self.ignore.is_ignored(path) {
            return Resolution::Ignored;
        }
        let (parent, name) = match path.rsplit_once('/') {
            Some((parent, name)) => (parent, name),
            None => ("", path),
        };
        match self.directory_rules(parent).resolve(name, kind) {
            Some(binding) => Resolution::Bound(binding),
            None => Resolution::Unbound,
        }
    }

    /// Precompute the candidate scopes for children of `dir`
    pub fn directory_rules(&self, dir: &str) -> DirectoryRules<'_> {
        let parts = split_path(dir);

        let mut candidates: Vec<(usize, bool, usize, &ScopeEntry)> = self
            .scopes
            .iter()
            .enumerate()
            .filter(|(_, entry)| !entry.bindings.is_empty())
            .filter_map(|(index, entry)| {
                entry
                    .scope
                    .deepest_match(&parts)
                    .map(|depth| (depth, entry.scope.is_literal(), index, entry))
            })
            .collect();

        // Deepest first, literal scopes before glob scopes, then declaration order.
        candidates.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)).then_with(|| a.2.cmp(&b.2)));

        DirectoryRules { scopes: candidates.into_iter().map(|(_, _, _, entry)| entry).collect() }
    }

    /// Whether `path` matches an ignore pattern
    pub fn is_ignored(&self, path: &str) -> bool {
        self.ignore.is_ignored(path)
    }

    pub fn ignore_filter(&self) -> &IgnoreFilter {
        &self.ignore
    }

    pub fn scopes(&self) -> &[ScopeEntry] {
        &self.scopes
    }

    /// Fingerprint of the configuration this index was built from
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Get statistics about the compiled index
    pub fn statistics(&self) -> ResolverStats {
        let mut stats = ResolverStats {
            ignore_patterns: self.ignore.len(),
            ..Default::default()
        };

        for entry in &self.scopes {
            stats.scopes += 1;
            for binding in &entry.bindings {
                stats.bindings += 1;
                stats.rules += binding.rules.len();
                if binding.pattern.applies_to_directories() {
                    stats.directory_bindings += 1;
                }
                if binding.pattern.specificity() == Specificity::Exact {
                    stats.exact_bindings += 1;
                }
            }
        }

        stats
    }
}

/// Candidate scopes for the children of one directory, nearest first
#[derive(Debug, Clone)]
pub struct DirectoryRules<'a> {
    scopes: Vec<&'a ScopeEntry>,
}

impl<'a> DirectoryRules<'a> {
    /// Binding for a child named `name`, from the nearest scope that binds it
    pub fn resolve(&self, name: &str, kind: EntryKind) -> Option<&'a ScopeBinding> {
        self.scopes.iter().find_map(|entry| entry.best_binding(name, kind))
    }

    /// Whether any scope applies at all
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

/// Statistics about the compiled index
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolverStats {
    pub scopes: usize,
    pub bindings: usize,
    pub directory_bindings: usize,
    pub exact_bindings: usize,
    pub rules: usize,
    pub ignore_patterns: usize,
}
