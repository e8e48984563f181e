//! Gitea destination-host integration: repository existence checks and
//! the create-migration endpoint.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::debug;

/// Payload for the Gitea create-migration endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationRequest {
    pub clone_addr: String,
    pub description: String,
    pub issues: bool,
    pub mirror: bool,
    pub private: bool,
    pub pull_requests: bool,
    pub repo_name: String,
    pub uid: i64,
    pub wiki: bool,
}

/// Destination-host contract for existence checks and migration creation
#[async_trait]
pub trait MigrationTarget {
    /// Whether `owner/name` already exists at the destination. A transport
    /// or auth error here is an error, not "not found".
    async fn repo_exists(&self, owner: &str, name: &str) -> Result<bool>;

    /// Create a server-side migration job. Errors carry the rejection
    /// status and response body.
    async fn create_migration(&self, request: &MigrationRequest) -> Result<()>;
}

/// Gitea API client
pub struct GiteaClient {
    base_url: String,
    token: String,
    http: reqwest::Client,
}

impl GiteaClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn auth_header(&self) -> String {
        format!("token {}", self.token)
    }
}

#[async_trait]
impl MigrationTarget for GiteaClient {
    async fn repo_exists(&self, owner: &str, name: &str) -> Result<bool> {
        let url = self.api_url(&format!("api/v1/repos/{}/{}", owner, name));
        debug!("Checking for existing repository: {}", url);

        let response = self
            .http
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await
            .with_context(|| format!("Failed to query Gitea for {}/{}", owner, name))?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(anyhow!(
                "Unexpected status {} checking for {}/{}",
                status,
                owner,
                name
            )),
        }
    }

    async fn create_migration(&self, request: &MigrationRequest) -> Result<()> {
        let url = self.api_url("api/v1/repos/migrate");
        debug!("Creating migration for {} via {}", request.repo_name, url);

        let response = self
            .http
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(request)
            .send()
            .await
            .with_context(|| {
                format!("Failed to send migration request for {}", request.repo_name)
            })?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Gitea rejected migration of {}: status {}: {}",
                request.repo_name,
                status,
                body
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn migration_request() -> MigrationRequest {
        MigrationRequest {
            clone_addr: "https://github.com/acme/widgets.git".to_string(),
            description: "Widget factory".to_string(),
            issues: true,
            mirror: true,
            private: false,
            pull_requests: true,
            repo_name: "widgets".to_string(),
            uid: 7,
            wiki: true,
        }
    }

    #[tokio::test]
    async fn test_repo_exists_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/repos/acme-mirror/widgets"))
            .and(header("Authorization", "token gitea-tok"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = GiteaClient::new(&server.uri(), "gitea-tok");
        assert!(client.repo_exists("acme-mirror", "widgets").await.unwrap());
    }

    #[tokio::test]
    async fn test_repo_exists_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/repos/acme-mirror/widgets"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = GiteaClient::new(&server.uri(), "gitea-tok");
        assert!(!client.repo_exists("acme-mirror", "widgets").await.unwrap());
    }

    #[tokio::test]
    async fn test_repo_exists_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/repos/acme-mirror/widgets"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = GiteaClient::new(&server.uri(), "gitea-tok");
        let err = client
            .repo_exists("acme-mirror", "widgets")
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("500"));
    }

    #[tokio::test]
    async fn test_create_migration_success() {
        let server = MockServer::start().await;
        let request = migration_request();

        Mock::given(method("POST"))
            .and(path("/api/v1/repos/migrate"))
            .and(header("Authorization", "token gitea-tok"))
            .and(body_json(&request))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = GiteaClient::new(&server.uri(), "gitea-tok");
        client.create_migration(&request).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_migration_rejected_carries_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/repos/migrate"))
            .respond_with(
                ResponseTemplate::new(409).set_body_string("repository already exists"),
            )
            .mount(&server)
            .await;

        let client = GiteaClient::new(&server.uri(), "gitea-tok");
        let err = client
            .create_migration(&migration_request())
            .await
            .unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("409"));
        assert!(message.contains("repository already exists"));
    }

    #[test]
    fn test_base_url_normalization() {
        let client = GiteaClient::new("https://gitea.example.com/", "t");
        assert_eq!(
            client.api_url("/api/v1/repos/migrate"),
            "https://gitea.example.com/api/v1/repos/migrate"
        );

        let client = GiteaClient::new("https://gitea.example.com", "t");
        assert_eq!(
            client.api_url("api/v1/repos/migrate"),
            "https://gitea.example.com/api/v1/repos/migrate"
        );
    }
}
