//! gitea-migrate - Create Gitea migration jobs mirroring GitHub repositories
//!
//! gitea-migrate enumerates the repositories visible to a GitHub token,
//! routes them to Gitea accounts through pattern-based mapping rules, and
//! creates server-side migration (mirror/clone) jobs for the ones that do
//! not exist yet. Runs are idempotent and dry-run capable.
//!
//! ## Modules
//!
//! - [`mapping`]: pattern-to-account routing rules, loaded once at startup
//! - [`filter`]: eligibility and policy filtering of the repository list
//! - [`migrate`]: the per-repository migration orchestrator
//! - [`github`]: source repository listing via the GitHub API
//! - [`gitea`]: Gitea existence checks and the migrate endpoint
//! - [`config`]: run-wide policy flags and credentials

pub mod config;
pub mod filter;
pub mod gitea;
pub mod github;
pub mod mapping;
pub mod migrate;

pub use config::{PolicyFlags, Settings};
pub use gitea::{GiteaClient, MigrationRequest, MigrationTarget};
pub use github::{GitHubClient, RepoSource, SourceRepository};
pub use mapping::{MappingRule, MappingTable};
pub use migrate::{MigrationSummary, Migrator, Outcome, RepoOutcome};
