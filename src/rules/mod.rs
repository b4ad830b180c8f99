//! Rule model and matcher compiler
//!
//! Architectural Principle: Service Layer - Rule compilation turns text into executable matchers
//! - RuleExpression is the parsed, immutable form of one configured rule
//! - CompiledRule is the executable form shared read-only by every worker
//! - RuleList carries OR semantics: one satisfied rule makes a name compliant

pub mod convention;

use crate::domain::violations::{LintError, LintResult, RULE_SEPARATOR};
use regex::Regex;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

pub use convention::Convention;

/// Prefix marking a regular-expression rule
pub const REGEX_PREFIX: &str = "regex:";

/// Prefix marking a negated rule
pub const NEGATION_PREFIX: char = '!';

/// Parsed form of a naming-rule expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleExpression {
    /// A built-in convention such as `snake_case`
    Convention(Convention),
    /// A regular expression matched against the whole name
    Regex(String),
    /// Passes exactly when the inner rule fails
    Not(Box<RuleExpression>),
}

impl RuleExpression {
    /// Parse one rule expression such as `camelCase`, `regex:^v[0-9]+$` or `!PascalCase`
    pub fn parse(text: &str) -> LintResult<Self> {
        let trimmed = text.trim();

        if let Some(inner) = trimmed.strip_prefix(NEGATION_PREFIX) {
            return Ok(Self::Not(Box::new(Self::parse(inner).map_err(|e| match e {
                LintError::Compile { message, .. } => LintError::compile(trimmed, message),
                other => other,
            })?)));
        }

        if let Some(pattern) = trimmed.strip_prefix(REGEX_PREFIX) {
            if pattern.is_empty() {
                return Err(LintError::compile(trimmed, "empty regular expression"));
            }
            return Ok(Self::Regex(pattern.to_string()));
        }

        if trimmed.is_empty() {
            return Err(LintError::compile(text, "empty rule"));
        }

        Convention::from_name(trimmed).map(Self::Convention).ok_or_else(|| {
            let known: Vec<&str> = Convention::ALL.iter().map(|c| c.name()).collect();
            LintError::compile(
                trimmed,
                format!("unknown convention (known: {})", known.join(", ")),
            )
        })
    }
}

impl fmt::Display for RuleExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Convention(convention) => write!(f, "{convention}"),
            Self::Regex(pattern) => write!(f, "{REGEX_PREFIX}{pattern}"),
            Self::Not(inner) => write!(f, "{NEGATION_PREFIX}{inner}"),
        }
    }
}

/// Executable matcher tree
#[derive(Debug, Clone)]
enum Matcher {
    Convention(Convention),
    Regex { source: String, regex: Regex },
    Not(Box<Matcher>),
}

impl Matcher {
    fn build(expression: &RuleExpression, text: &str) -> LintResult<Self> {
        match expression {
            RuleExpression::Convention(convention) => Ok(Self::Convention(*convention)),
            RuleExpression::Regex(source) => {
                // The whole name must match, not a substring of it.
                let regex = Regex::new(&format!("^(?:{source})$")).map_err(|e| {
                    LintError::compile(text, format!("invalid regular expression: {e}"))
                })?;
                Ok(Self::Regex { source: source.clone(), regex })
            }
            RuleExpression::Not(inner) => Ok(Self::Not(Box::new(Self::build(inner, text)?))),
        }
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            Self::Convention(convention) => convention.matches(name),
            Self::Regex { regex, .. } => regex.is_match(name),
            Self::Not(inner) => !inner.matches(name),
        }
    }

    fn expected(&self) -> String {
        match self {
            Self::Convention(convention) => {
                format!("{} ({})", convention.name(), convention.summary())
            }
            Self::Regex { source, .. } => format!("a name matching /{source}/"),
            Self::Not(inner) => format!("must not match {}", inner.expected()),
        }
    }
}

/// Compiled, immutable naming rule
#[derive(Debug, Clone)]
pub struct CompiledRule {
    expression: RuleExpression,
    matcher: Matcher,
}

impl CompiledRule {
    /// Whether `name` satisfies this rule
    pub fn matches(&self, name: &str) -> bool {
        self.matcher.matches(name)
    }

    /// Canonical rule text, as it would be written in the configuration
    pub fn describe(&self) -> String {
        self.expression.to_string()
    }

    /// Human-readable expected-format message
    pub fn expected(&self) -> String {
        match &self.matcher {
            Matcher::Not(_) => self.matcher.expected(),
            matcher => format!("expected {}", matcher.expected()),
        }
    }

    /// The parsed expression this rule was compiled from
    pub fn expression(&self) -> &RuleExpression {
        &self.expression
    }
}

impl PartialEq for CompiledRule {
    fn eq(&self, other: &Self) -> bool {
        self.expression == other.expression
    }
}

impl Eq for CompiledRule {}

impl Serialize for CompiledRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CompiledRule", 2)?;
        state.serialize_field("rule", &self.describe())?;
        state.serialize_field("expected", &self.expected())?;
        state.end()
    }
}

/// Compile one rule expression from text
pub fn compile(text: &str) -> LintResult<CompiledRule> {
    let expression = RuleExpression::parse(text)?;
    compile_expression(expression, text)
}

/// Compile an already-parsed expression
pub fn compile_expression(expression: RuleExpression, text: &str) -> LintResult<CompiledRule> {
    let matcher = Matcher::build(&expression, text.trim())?;
    tracing::debug!("Compiled rule '{}'", expression);
    Ok(CompiledRule { expression, matcher })
}

/// Split a configured rule string into its alternatives.
///
/// Alternatives are separated by `|`. A regex alternative swallows the rest
/// of the string, so `camelCase | regex:^(a|b)$` yields two alternatives.
pub fn split_alternatives(text: &str) -> Vec<&str> {
    let mut alternatives = Vec::new();
    let mut rest = text;

    loop {
        let candidate = rest.trim_start();
        let body = candidate.trim_start_matches(NEGATION_PREFIX);
        if body.starts_with(REGEX_PREFIX) {
            alternatives.push(candidate.trim_end());
            break;
        }
        match rest.split_once(RULE_SEPARATOR) {
            Some((head, tail)) => {
                alternatives.push(head.trim());
                rest = tail;
            }
            None => {
                alternatives.push(rest.trim());
                break;
            }
        }
    }

    alternatives
}

/// Ordered alternatives bound to one pattern: compliant if any rule matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleList {
    rules: Arc<[CompiledRule]>,
}

impl RuleList {
    /// Build a list from compiled rules; an empty list is a configuration error
    pub fn new(rules: Vec<CompiledRule>) -> LintResult<Self> {
        if rules.is_empty() {
            return Err(LintError::config("a rule list needs at least one rule"));
        }
        Ok(Self { rules: rules.into() })
    }

    /// Compile every configured entry, splitting `|` alternatives
    pub fn compile<S: AsRef<str>>(entries: &[S]) -> LintResult<Self> {
        let mut rules = Vec::new();
        for entry in entries {
            for alternative in split_alternatives(entry.as_ref()) {
                rules.push(compile(alternative)?);
            }
        }
        Self::new(rules)
    }

    /// Whether at least one rule accepts `name`
    pub fn evaluate(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(name))
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Display for RuleList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.rules.iter().map(CompiledRule::describe).collect();
        f.write_str(&parts.join(&format!(" {RULE_SEPARATOR} ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_convention() {
        assert_eq!(
            RuleExpression::parse(" snake_case ").unwrap(),
            RuleExpression::Convention(Convention::SnakeCase)
        );
    }

    #[test]
    fn test_unknown_convention_is_compile_error() {
        let err = compile("camelcase").unwrap_err();
        match err {
            LintError::Compile { expression, message } => {
                assert_eq!(expression, "camelcase");
                assert!(message.contains("unknown convention"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_regex_is_compile_error() {
        assert!(matches!(compile("regex:[a-z"), Err(LintError::Compile { .. })));
        assert!(matches!(compile("regex:"), Err(LintError::Compile { .. })));
        assert!(matches!(compile("!"), Err(LintError::Compile { .. })));
    }

    #[test]
    fn test_regex_matches_whole_name() {
        let rule = compile("regex:[a-z]+").unwrap();
        assert!(rule.matches("abc"));
        assert!(!rule.matches("abc1"));
        assert_eq!(rule.describe(), "regex:[a-z]+");
        assert_eq!(rule.expected(), "expected a name matching /[a-z]+/");
    }

    #[test]
    fn test_negation_inverts_inner_rule() {
        let rule = compile("!camelCase").unwrap();
        let inner = compile("camelCase").unwrap();

        for name in ["myFile", "my_file", "MyFile", "x", "a1B2"] {
            assert_eq!(rule.matches(name), !inner.matches(name), "{name}");
        }
        assert_eq!(rule.describe(), "!camelCase");
        assert!(rule.expected().starts_with("must not match camelCase"));
    }

    #[test]
    fn test_double_negation() {
        let rule = compile("!!kebab-case").unwrap();
        assert!(rule.matches("my-file"));
        assert!(!rule.matches("myFile"));
    }

    #[test]
    fn test_compile_is_idempotent() {
        let first = compile("regex:^v[0-9]+$").unwrap();
        let second = compile("regex:^v[0-9]+$").unwrap();
        assert_eq!(first, second);
        for name in ["v1", "v10", "x1", ""] {
            assert_eq!(first.matches(name), second.matches(name));
        }
    }

    #[test]
    fn test_split_alternatives() {
        assert_eq!(split_alternatives("camelCase | PascalCase"), vec!["camelCase", "PascalCase"]);
        assert_eq!(split_alternatives("kebab-case"), vec!["kebab-case"]);
        assert_eq!(
            split_alternatives("camelCase | regex:^(a|b)$"),
            vec!["camelCase", "regex:^(a|b)$"]
        );
        assert_eq!(split_alternatives("!regex:x|y"), vec!["!regex:x|y"]);
    }

    #[test]
    fn test_rule_list_or_semantics() {
        let list = RuleList::compile(&["camelCase | PascalCase"]).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.evaluate("myFile"));
        assert!(list.evaluate("MyFile"));
        assert!(!list.evaluate("my_file"));
        assert_eq!(list.to_string(), "camelCase | PascalCase");
    }

    #[test]
    fn test_empty_rule_list_rejected() {
        let empty: [&str; 0] = [];
        assert!(RuleList::compile(&empty).is_err());
        assert!(RuleList::compile(&["camelCase |"]).is_err());
    }

    #[test]
    fn test_serialize_compiled_rule() {
        let rule = compile("snake_case").unwrap();
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["rule"], "snake_case");
        assert_eq!(json["expected"], "expected snake_case (lower-case words joined by '_')");
    }
}
