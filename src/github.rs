//! GitHub source-host integration: repository listing and the snapshot
//! type the rest of the pipeline works with.

use anyhow::{Context, Result};
use async_trait::async_trait;
use octocrab::models::Repository;
use octocrab::Octocrab;
use tracing::{debug, info, warn};

/// Read-only snapshot of a source repository for one run
#[derive(Debug, Clone)]
pub struct SourceRepository {
    pub full_name: String,
    pub name: String,
    pub clone_url: String,
    pub description: String,
    pub is_private: bool,
    pub has_issues: bool,
    pub has_wiki: bool,
    pub is_archived: bool,
    pub is_fork: bool,
}

impl From<&Repository> for SourceRepository {
    fn from(repo: &Repository) -> Self {
        Self {
            full_name: repo
                .full_name
                .clone()
                .unwrap_or_else(|| repo.name.clone()),
            name: repo.name.clone(),
            clone_url: repo
                .clone_url
                .as_ref()
                .map(|url| url.to_string())
                .unwrap_or_default(),
            description: repo.description.clone().unwrap_or_default(),
            is_private: repo.private.unwrap_or(false),
            has_issues: repo.has_issues.unwrap_or(false),
            has_wiki: repo.has_wiki.unwrap_or(false),
            is_archived: repo.archived.unwrap_or(false),
            is_fork: repo.fork.unwrap_or(false),
        }
    }
}

/// Source-host listing contract
#[async_trait]
pub trait RepoSource {
    /// List every repository visible to the configured credentials,
    /// across all pages, before any migration decision is made.
    async fn list_repositories(&self) -> Result<Vec<SourceRepository>>;
}

/// GitHub client wrapping octocrab for authenticated listing
pub struct GitHubClient {
    client: Octocrab,
}

impl GitHubClient {
    pub fn new(token: &str) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .context("Failed to create GitHub client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl RepoSource for GitHubClient {
    async fn list_repositories(&self) -> Result<Vec<SourceRepository>> {
        debug!("Fetching repositories for the authenticated user");

        let mut repositories = Vec::new();
        let mut page = 1u8;

        loop {
            let page_repos = self
                .client
                .current()
                .list_repos_for_authenticated_user()
                .per_page(100)
                .page(page)
                .send()
                .await
                .with_context(|| format!("Failed to fetch repositories page {}", page))?;

            let items = page_repos.items;
            if items.is_empty() {
                break;
            }

            repositories.extend(items.iter().map(SourceRepository::from));

            // GitHub API pagination limit for u8
            if page >= 255 {
                warn!("Reached maximum pagination limit (255 pages)");
                break;
            }
            page += 1;
        }

        info!("Found {} source repositories", repositories.len());
        Ok(repositories)
    }
}
