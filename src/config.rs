//! Run-wide configuration assembled once at startup.

use anyhow::{bail, Result};
use std::env;

/// Migration policy, fixed for the whole run. Passed explicitly into the
/// filter and the orchestrator so the core stays testable without
/// process-level setup.
#[derive(Debug, Clone, Copy)]
pub struct PolicyFlags {
    /// Include archived repositories
    pub migrate_archived: bool,

    /// Include forked repositories
    pub migrate_forks: bool,

    /// Include private repositories (the GitHub token is embedded as the
    /// pull credential for these)
    pub migrate_private: bool,

    /// Continuously sync mirrors instead of one-time clones
    pub mirror: bool,

    /// Report intended actions without creating anything
    pub dry_run: bool,
}

impl Default for PolicyFlags {
    fn default() -> Self {
        Self {
            migrate_archived: false,
            migrate_forks: false,
            migrate_private: true,
            mirror: true,
            dry_run: false,
        }
    }
}

/// Credentials and endpoints for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub github_token: String,
    pub gitea_url: String,
    pub gitea_token: String,
    pub policy: PolicyFlags,
}

impl Settings {
    /// Assemble settings from command line values, falling back to the
    /// conventional environment variables for tokens.
    pub fn new(
        gitea_url: String,
        gitea_token: Option<String>,
        github_token: Option<String>,
        policy: PolicyFlags,
    ) -> Result<Self> {
        Ok(Self {
            github_token: resolve_token(github_token, "--github-token", "GITHUB_TOKEN")?,
            gitea_token: resolve_token(gitea_token, "--gitea-token", "GITEA_TOKEN")?,
            gitea_url,
            policy,
        })
    }
}

/// Take a token from the given flag value, or fall back to the environment
pub fn resolve_token(flag: Option<String>, flag_name: &str, env_var: &str) -> Result<String> {
    if let Some(token) = flag {
        if !token.is_empty() {
            return Ok(token);
        }
    }

    match env::var(env_var) {
        Ok(token) if !token.is_empty() => Ok(token),
        _ => bail!("Missing token: pass {} or set {}", flag_name, env_var),
    }
}
