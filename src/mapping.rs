//! Pattern-based routing of source repositories to Gitea accounts.
//!
//! A mapping table is built once at startup, either from a YAML mapping
//! file or from a single rule given on the command line, and is read-only
//! afterwards. Rules are evaluated in declaration order; the first rule
//! whose pattern matches a repository's full name wins.

use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// A single routing rule: repositories whose full name matches `pattern`
/// are migrated into the Gitea account identified by `target_user`.
#[derive(Debug, Clone)]
pub struct MappingRule {
    pattern: Regex,
    pub target_user: i64,
    pub target_user_name: String,
}

impl MappingRule {
    /// Compile a rule. An uncompilable pattern is a fatal configuration
    /// error, raised here rather than on every match.
    pub fn new(pattern: &str, target_user: i64, target_user_name: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .with_context(|| format!("Invalid source expression: {:?}", pattern))?;

        Ok(Self {
            pattern,
            target_user,
            target_user_name: target_user_name.to_string(),
        })
    }

    /// Unanchored match against a repository full name (`owner/name`).
    /// Anchoring is the pattern author's responsibility.
    pub fn matches(&self, full_name: &str) -> bool {
        self.pattern.is_match(full_name)
    }

    /// The source expression this rule was compiled from
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

/// Ordered, immutable collection of mapping rules
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    rules: Vec<MappingRule>,
}

/// On-disk mapping file layout
#[derive(Debug, Deserialize)]
struct MapFile {
    #[serde(default)]
    mappings: Vec<RawMapping>,
}

#[derive(Debug, Deserialize)]
struct RawMapping {
    source_expression: String,
    target_user: i64,
    target_user_name: String,
}

impl MappingTable {
    /// Build a table from already-compiled rules, preserving their order
    pub fn new(rules: Vec<MappingRule>) -> Self {
        Self { rules }
    }

    /// Load and validate the authoritative mapping file. Any load, parse
    /// or pattern-compile error aborts startup.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read mapping file: {:?}", path))?;

        let map_file: MapFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse mapping file: {:?}", path))?;

        let rules = map_file
            .mappings
            .iter()
            .map(|raw| {
                MappingRule::new(&raw.source_expression, raw.target_user, &raw.target_user_name)
            })
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("Invalid mapping file: {:?}", path))?;

        debug!("Loaded {} mapping rule(s) from {:?}", rules.len(), path);

        Ok(Self::new(rules))
    }

    /// Synthesize a single-rule table from direct configuration parameters
    pub fn from_single_rule(
        pattern: &str,
        target_user: i64,
        target_user_name: &str,
    ) -> Result<Self> {
        Ok(Self::new(vec![MappingRule::new(
            pattern,
            target_user,
            target_user_name,
        )?]))
    }

    /// Resolve a repository full name to the first matching rule, in
    /// declaration order. Overlapping patterns are resolved by priority
    /// of declaration, not by specificity.
    pub fn resolve(&self, full_name: &str) -> Option<&MappingRule> {
        self.rules.iter().find(|rule| rule.matches(full_name))
    }

    /// Whether any rule matches the given repository full name
    pub fn is_eligible(&self, full_name: &str) -> bool {
        self.resolve(full_name).is_some()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Select the mapping table for this run: an external mapping file is
/// authoritative when supplied; otherwise all three single-rule parameters
/// must be present together or the run is aborted.
pub fn build_table(
    map_file: Option<&Path>,
    source_expression: Option<&str>,
    target_user: Option<i64>,
    target_user_name: Option<&str>,
) -> Result<MappingTable> {
    if let Some(path) = map_file {
        return MappingTable::from_file(path);
    }

    match (source_expression, target_user, target_user_name) {
        (Some(pattern), Some(user), Some(name)) => {
            MappingTable::from_single_rule(pattern, user, name)
        }
        _ => bail!(
            "No mapping defined: provide --map-file or all of \
             --source-expression, --target-user and --target-user-name"
        ),
    }
}
