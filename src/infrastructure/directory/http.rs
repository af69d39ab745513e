//! HTTP directory client for a Grafana-style user/team API

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::directory::{
    DirectoryError, DirectoryErrorKind, MembershipReader, MembershipWriter, UserDirectory,
    UserProvisioner,
};
use crate::domain::team::{DirectoryUser, TeamId, TeamMember, UserId};

const ORG_HEADER: &str = "X-Grafana-Org-Id";
const GENERATED_PASSWORD_LENGTH: usize = 32;

/// Credentials sent with every request
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DirectoryAuth {
    #[default]
    None,
    Token(String),
    Basic { username: String, password: String },
}

/// HTTP directory client configuration
#[derive(Debug, Clone)]
pub struct HttpDirectoryConfig {
    pub base_url: String,
    pub org_id: i64,
    pub timeout: Duration,
    pub auth: DirectoryAuth,
    /// Users fetched per page when listing the directory
    pub page_size: usize,
}

impl HttpDirectoryConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            org_id: 1,
            timeout: Duration::from_secs(30),
            auth: DirectoryAuth::None,
            page_size: 1000,
        }
    }

    pub fn with_org_id(mut self, org_id: i64) -> Self {
        self.org_id = org_id;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_auth(mut self, auth: DirectoryAuth) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    id: i64,
    email: String,
    #[serde(default)]
    login: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateUserRequest<'a> {
    email: &'a str,
    login: &'a str,
    name: &'a str,
    password: String,
}

#[derive(Debug, Deserialize)]
struct CreateUserResponse {
    id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddMemberRequest {
    user_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamMemberRecord {
    user_id: i64,
    email: String,
    #[serde(default)]
    login: String,
}

/// Directory client speaking the remote HTTP API
#[derive(Debug, Clone)]
pub struct HttpDirectoryClient {
    config: HttpDirectoryConfig,
    client: reqwest::Client,
}

impl HttpDirectoryClient {
    /// Create a client with its own connection pool and request timeout
    pub fn new(config: HttpDirectoryConfig) -> Result<Self, DirectoryError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                DirectoryError::transport(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self::with_http_client(config, client))
    }

    pub fn with_http_client(config: HttpDirectoryConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let request = self
            .client
            .request(method, url)
            .header(ORG_HEADER, self.config.org_id.to_string());

        match &self.config.auth {
            DirectoryAuth::None => request,
            DirectoryAuth::Token(token) => request.bearer_auth(token),
            DirectoryAuth::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, DirectoryError> {
        let response = request
            .send()
            .await
            .map_err(|e| DirectoryError::transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, body))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, DirectoryError> {
        self.send(request)
            .await?
            .json()
            .await
            .map_err(|e| {
                DirectoryError::invalid_response(format!("Failed to parse response: {}", e))
            })
    }
}

/// Map a non-success status to a structured error
fn classify_status(status: StatusCode, body: String) -> DirectoryError {
    let message = if body.is_empty() {
        status.to_string()
    } else {
        body
    };

    let kind = match status {
        StatusCode::CONFLICT => DirectoryErrorKind::Conflict,
        StatusCode::NOT_FOUND => DirectoryErrorKind::NotFound,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DirectoryErrorKind::Unauthorized,
        StatusCode::TOO_MANY_REQUESTS => {
            warn!("Directory rate limited the request");
            DirectoryErrorKind::RateLimited
        }
        other => DirectoryErrorKind::Remote {
            status: other.as_u16(),
        },
    };

    DirectoryError::new(kind, message)
}

fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}

#[async_trait]
impl UserDirectory for HttpDirectoryClient {
    /// Pages until a short or empty page. A page that brings no unseen ids
    /// also ends the listing, so a server ignoring `page` cannot loop forever.
    async fn list_users(&self) -> Result<Vec<DirectoryUser>, DirectoryError> {
        let page_size = self.config.page_size.max(1);
        let mut users = Vec::new();
        let mut seen = HashSet::new();
        let mut page = 1usize;

        loop {
            let request = self
                .request(Method::GET, "/api/users")
                .query(&[("perpage", page_size), ("page", page)]);
            let records: Vec<UserRecord> = self.send_json(request).await?;
            let fetched = records.len();
            let before = users.len();

            for record in records {
                let id = UserId::new(record.id);
                if seen.insert(id) {
                    users.push(DirectoryUser {
                        id,
                        email: record.email,
                        login: record.login,
                        name: record.name,
                    });
                }
            }

            if fetched < page_size {
                break;
            }
            if users.len() == before {
                warn!(page, "Directory returned a page with no new users, stop paging");
                break;
            }
            page += 1;
        }

        debug!(count = users.len(), pages = page, "Fetched directory snapshot");
        Ok(users)
    }
}

#[async_trait]
impl UserProvisioner for HttpDirectoryClient {
    async fn create_user(&self, email: &str) -> Result<UserId, DirectoryError> {
        let body = CreateUserRequest {
            email,
            login: email,
            name: email,
            password: generate_password(),
        };

        let request = self.request(Method::POST, "/api/admin/users").json(&body);
        let created: CreateUserResponse = self.send_json(request).await?;

        Ok(UserId::new(created.id))
    }
}

#[async_trait]
impl MembershipWriter for HttpDirectoryClient {
    async fn add_member(&self, team: TeamId, user: UserId) -> Result<(), DirectoryError> {
        let request = self
            .request(Method::POST, &format!("/api/teams/{}/members", team))
            .json(&AddMemberRequest {
                user_id: user.get(),
            });

        self.send(request).await.map(|_| ())
    }

    async fn remove_member(&self, team: TeamId, user: UserId) -> Result<(), DirectoryError> {
        let request = self.request(
            Method::DELETE,
            &format!("/api/teams/{}/members/{}", team, user),
        );

        self.send(request).await.map(|_| ())
    }
}

#[async_trait]
impl MembershipReader for HttpDirectoryClient {
    async fn list_members(&self, team: TeamId) -> Result<Vec<TeamMember>, DirectoryError> {
        let request = self.request(Method::GET, &format!("/api/teams/{}/members", team));
        let records: Vec<TeamMemberRecord> = self.send_json(request).await?;

        Ok(records
            .into_iter()
            .map(|r| TeamMember::new(r.user_id, r.email, r.login))
            .collect())
    }
}
