//! Configuration loading and management for ls-lint
//!
//! Architecture: Anti-Corruption Layer - Configuration translates the external YAML format
//! - The raw `ls` mapping is flattened into ordered scope declarations
//! - Path separators are normalized before anything downstream sees a key
//! - Shape errors are reported here; rule compilation happens in the resolver

use crate::domain::violations::{LintError, LintResult};
use crate::patterns::normalize_path;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// File names probed, in order, when no configuration path is given
pub const DEFAULT_CONFIG_FILES: [&str; 2] = [".ls-lint.yml", ".ls-lint.yaml"];

/// Structured configuration as read from `.ls-lint.yml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LsConfig {
    /// Nested mapping of scopes and pattern bindings
    #[serde(default)]
    pub ls: Mapping,
    /// Root-relative glob patterns excluded from checking and recursion
    #[serde(default)]
    pub ignore: Vec<String>,
}

/// All bindings declared directly in one scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeDeclaration {
    /// Normalized, `/`-separated scope path; empty for the root
    pub scope: String,
    /// Bindings in declaration order
    pub bindings: Vec<PatternDeclaration>,
}

/// One `pattern: rules` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternDeclaration {
    pub pattern: String,
    /// Rule strings as written; each may hold `|` alternatives
    pub rules: Vec<String>,
}

impl LsConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> LintResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            LintError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            LintError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> LintResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| LintError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Find the first default configuration file inside `dir`
    pub fn find_in(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_FILES.iter().map(|name| dir.join(name)).find(|path| path.is_file())
    }

    /// Validate the configuration shape
    pub fn validate(&self) -> LintResult<()> {
        self.scope_declarations()?;

        for pattern in &self.ignore {
            if normalize_path(pattern).is_empty() {
                return Err(LintError::config(format!("Empty ignore pattern '{pattern}'")));
            }
        }

        Ok(())
    }

    /// Flatten the nested `ls` mapping into scopes, parents before children
    pub fn scope_declarations(&self) -> LintResult<Vec<ScopeDeclaration>> {
        let mut declarations = Vec::new();
        collect_scope(String::new(), &self.ls, &mut declarations)?;
        Ok(declarations)
    }

    /// Ignore patterns with normalized separators
    pub fn normalized_ignores(&self) -> Vec<String> {
        self.ignore.iter().map(|p| normalize_path(p)).collect()
    }

    /// Create a fingerprint of the configuration for reports
    pub fn fingerprint(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        match self.scope_declarations() {
            Ok(declarations) => {
                for declaration in declarations {
                    declaration.scope.hash(&mut hasher);
                    for binding in declaration.bindings {
                        binding.pattern.hash(&mut hasher);
                        binding.rules.hash(&mut hasher);
                    }
                }
            }
            Err(e) => e.to_string().hash(&mut hasher),
        }

        for pattern in self.normalized_ignores() {
            pattern.hash(&mut hasher);
        }

        format!("{:x}", hasher.finish())
    }

    /// Serialize back to YAML
    pub fn to_yaml(&self) -> LintResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| LintError::config(format!("Failed to serialize config: {e}")))
    }
}

fn collect_scope(
    scope: String,
    mapping: &Mapping,
    out: &mut Vec<ScopeDeclaration>,
) -> LintResult<()> {
    let mut bindings = Vec::new();
    let mut children = Vec::new();

    for (key, value) in mapping {
        let key = key.as_str().ok_or_else(|| {
            LintError::config(format!("Non-string key {key:?} in scope '{}'", display_scope(&scope)))
        })?;

        match value {
            Value::Mapping(nested) => {
                let child = join_scope(&scope, &normalize_path(key));
                children.push((child, nested));
            }
            Value::String(rule) => {
                bindings.push(PatternDeclaration {
                    pattern: key.trim().to_string(),
                    rules: vec![non_empty_rule(rule, key, &scope)?],
                });
            }
            Value::Sequence(items) => {
                let rules = items
                    .iter()
                    .map(|item| match item.as_str() {
                        Some(rule) => non_empty_rule(rule, key, &scope),
                        None => Err(LintError::config(format!(
                            "Rules for '{key}' in scope '{}' must be strings",
                            display_scope(&scope)
                        ))),
                    })
                    .collect::<LintResult<Vec<_>>>()?;
                if rules.is_empty() {
                    return Err(LintError::config(format!(
                        "Empty rule list for '{key}' in scope '{}'",
                        display_scope(&scope)
                    )));
                }
                bindings.push(PatternDeclaration { pattern: key.trim().to_string(), rules });
            }
            other => {
                return Err(LintError::config(format!(
                    "Unsupported value for '{key}' in scope '{}': expected rules or a nested scope, got {other:?}",
                    display_scope(&scope)
                )));
            }
        }
    }

    out.push(ScopeDeclaration { scope, bindings });
    for (child, nested) in children {
        collect_scope(child, nested, out)?;
    }
    Ok(())
}

fn non_empty_rule(rule: &str, key: &str, scope: &str) -> LintResult<String> {
    if rule.trim().is_empty() {
        return Err(LintError::config(format!(
            "Empty rule for '{key}' in scope '{}'",
            display_scope(scope)
        )));
    }
    Ok(rule.to_string())
}

fn join_scope(parent: &str, child: &str) -> String {
    match (parent.is_empty(), child.is_empty()) {
        (_, true) => parent.to_string(),
        (true, false) => child.to_string(),
        (false, false) => format!("{parent}/{child}"),
    }
}

fn display_scope(scope: &str) -> &str {
    if scope.is_empty() {
        "."
    } else {
        scope
    }
}

/// Configuration builder for programmatic construction
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: LsConfig,
}

impl ConfigBuilder {
    /// Create a new builder with an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `rules` to `pattern` in `scope` (`""` or `"."` for the root)
    pub fn bind(
        mut self,
        scope: impl AsRef<str>,
        pattern: impl Into<String>,
        rules: impl Into<String>,
    ) -> Self {
        let scope = normalize_path(scope.as_ref());
        let entry = (Value::String(pattern.into()), Value::String(rules.into()));

        if scope.is_empty() {
            self.config.ls.insert(entry.0, entry.1);
        } else {
            let key = Value::String(scope);
            if !matches!(self.config.ls.get(&key), Some(Value::Mapping(_))) {
                self.config.ls.insert(key.clone(), Value::Mapping(Mapping::new()));
            }
            if let Some(Value::Mapping(nested)) = self.config.ls.get_mut(&key) {
                nested.insert(entry.0, entry.1);
            }
        }
        self
    }

    /// Add an ignore pattern
    pub fn ignore(mut self, pattern: impl Into<String>) -> Self {
        self.config.ignore.push(pattern.into());
        self
    }

    /// Build the final configuration
    pub fn build(self) -> LintResult<LsConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
ls:
  .dir: kebab-case
  .js: camelCase | PascalCase
  src:
    .go: snake_case
    components:
      .tsx:
        - PascalCase
        - regex:^index$
  "packages\\*\\lib":
    .ts: kebab-case
ignore:
  - node_modules
  - .\vendor\**
"#;

    #[test]
    fn test_scope_declarations_are_flattened_top_down() {
        let config = LsConfig::load_from_str(SAMPLE).unwrap();
        let declarations = config.scope_declarations().unwrap();

        let scopes: Vec<&str> = declarations.iter().map(|d| d.scope.as_str()).collect();
        assert_eq!(scopes, vec!["", "src", "src/components", "packages/*/lib"]);

        let root = &declarations[0];
        assert_eq!(root.bindings.len(), 2);
        assert_eq!(root.bindings[0].pattern, ".dir");
        assert_eq!(root.bindings[1].rules, vec!["camelCase | PascalCase"]);

        let components = &declarations[2];
        assert_eq!(components.bindings[0].rules, vec!["PascalCase", "regex:^index$"]);
    }

    #[test]
    fn test_ignores_are_normalized() {
        let config = LsConfig::load_from_str(SAMPLE).unwrap();
        assert_eq!(config.normalized_ignores(), vec!["node_modules", "vendor/**"]);
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(LsConfig::load_from_str("ls:\n  .js: 3\n").is_err());
        assert!(LsConfig::load_from_str("ls:\n  .js: []\n").is_err());
        assert!(LsConfig::load_from_str("ls:\n  .js: ''\n").is_err());
        assert!(LsConfig::load_from_str("ls:\n  .js: [1]\n").is_err());
        assert!(LsConfig::load_from_str("ignore:\n  - ./\n").is_err());
        assert!(LsConfig::load_from_str("ls: [a]\n").is_err());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = LsConfig::load_from_str("{}").unwrap();
        let declarations = config.scope_declarations().unwrap();
        assert_eq!(declarations.len(), 1);
        assert!(declarations[0].bindings.is_empty());
    }

    #[test]
    fn test_builder() {
        let config = ConfigBuilder::new()
            .bind(".", ".dir", "kebab-case")
            .bind("src", ".go", "snake_case")
            .bind("src", ".md", "UPPERCASE")
            .ignore("vendor/**")
            .build()
            .unwrap();

        let declarations = config.scope_declarations().unwrap();
        assert_eq!(declarations.len(), 2);
        assert_eq!(declarations[1].scope, "src");
        assert_eq!(declarations[1].bindings.len(), 2);
        assert_eq!(config.ignore, vec!["vendor/**"]);
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = LsConfig::load_from_str(SAMPLE).unwrap();
        let b = LsConfig::load_from_str(SAMPLE).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let c = LsConfig::load_from_str("ls:\n  .js: camelCase\n").unwrap();
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_load_from_file_and_find() {
        let temp_dir = TempDir::new().unwrap();
        assert!(LsConfig::find_in(temp_dir.path()).is_none());

        let path = temp_dir.path().join(".ls-lint.yml");
        fs::write(&path, SAMPLE).unwrap();

        assert_eq!(LsConfig::find_in(temp_dir.path()), Some(path.clone()));
        let config = LsConfig::load_from_file(&path).unwrap();
        assert_eq!(config.ignore.len(), 2);

        let missing = LsConfig::load_from_file(temp_dir.path().join("nope.yml"));
        assert!(matches!(missing, Err(LintError::Configuration { .. })));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = LsConfig::load_from_str(SAMPLE).unwrap();
        let yaml = config.to_yaml().unwrap();
        let again = LsConfig::load_from_str(&yaml).unwrap();
        assert_eq!(config, again);
    }
}
