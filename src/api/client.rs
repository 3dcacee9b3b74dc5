//! API client for the Research Tracker REST backend.
//!
//! Every request goes through a small set of helpers that read the current
//! bearer token from the shared `SessionStore` immediately before dispatch.
//! The token is deliberately not captured at construction time: login and
//! logout change what the next request sends without rebuilding the client.
//!
//! The client maps non-success statuses to `ApiError` but takes no recovery
//! action of its own; what to do with a 401 is the calling view's decision.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, multipart, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::auth::SessionStore;
use crate::models::{Document, Milestone, NewMilestone, NewProject, Project};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// Signup result. A missing token means "registered, must log in separately".
#[derive(Debug, Deserialize)]
pub struct SignupResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Fields the signup endpoint expects.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub role: String,
}

/// Client for the Research Tracker API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Arc<SessionStore>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build the headers for the outgoing request, reading the token from the
    /// session store at call time. No token means no Authorization header; the
    /// request goes out unauthenticated and the backend answers accordingly.
    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = self.session.token() {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.url(path);
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        Self::check_response(response).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        let response = self
            .client
            .delete(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send DELETE request to {}", url))?;

        Self::check_response(response).await?;
        Ok(())
    }

    // ===== Authentication =====

    /// Exchange credentials for a bearer token. The caller hands the token to
    /// the session store; this method does not mutate session state itself.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let url = self.url("/auth/login");
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Failed to send login request")?;

        let response = Self::check_response(response).await?;
        let auth: LoginResponse = response
            .json()
            .await
            .context("Failed to parse login response")?;

        debug!(username, "Login request accepted");
        Ok(auth.token)
    }

    /// Register a new account.
    pub async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse> {
        let url = self.url("/auth/signup");
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .context("Failed to send signup request")?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .context("Failed to parse signup response")
    }

    // ===== Projects =====

    pub async fn fetch_projects(&self) -> Result<Vec<Project>> {
        self.get("/projects").await
    }

    pub async fn fetch_project(&self, project_id: &str) -> Result<Project> {
        self.get(&format!("/projects/{}", project_id)).await
    }

    pub async fn create_project(&self, project: &NewProject) -> Result<()> {
        self.post("/projects", project).await
    }

    pub async fn delete_project(&self, project_id: &str) -> Result<()> {
        self.delete(&format!("/projects/{}", project_id)).await
    }

    // ===== Milestones =====

    pub async fn fetch_milestones(&self, project_id: &str) -> Result<Vec<Milestone>> {
        self.get(&format!("/projects/{}/milestones", project_id)).await
    }

    /// Create a milestone under a project, tagged with the creating user.
    pub async fn create_milestone(
        &self,
        project_id: &str,
        milestone: &NewMilestone,
        username: &str,
    ) -> Result<()> {
        let url = self.url(&format!("/projects/{}/milestones", project_id));
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .query(&[("username", username)])
            .json(milestone)
            .send()
            .await
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        Self::check_response(response).await?;
        Ok(())
    }

    pub async fn delete_milestone(&self, milestone_id: &str) -> Result<()> {
        self.delete(&format!("/milestones/{}", milestone_id)).await
    }

    // ===== Documents =====

    pub async fn fetch_documents(&self, project_id: &str) -> Result<Vec<Document>> {
        self.get(&format!("/projects/{}/documents", project_id)).await
    }

    /// Upload a local file as a project document, tagged with the uploading
    /// user.
    pub async fn upload_document(
        &self,
        project_id: &str,
        title: &str,
        file_path: &Path,
        user_id: &str,
    ) -> Result<()> {
        let bytes = tokio::fs::read(file_path)
            .await
            .with_context(|| format!("Failed to read file {}", file_path.display()))?;

        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        debug!(project_id, file = %file_name, size = bytes.len(), "Uploading document");

        let form = multipart::Form::new()
            .text("title", title.to_string())
            .part("file", multipart::Part::bytes(bytes).file_name(file_name));

        let url = self.url(&format!("/projects/{}/documents", project_id));
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .query(&[("userId", user_id)])
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("Failed to send upload request to {}", url))?;

        Self::check_response(response).await?;
        Ok(())
    }

    pub async fn delete_document(&self, document_id: &str) -> Result<()> {
        self.delete(&format!("/documents/{}", document_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

    fn token(sub: &str, role: &str) -> String {
        let head = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#);
        let payload =
            URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"{}","role":"{}"}}"#, sub, role));
        format!("{}.{}.sig", head, payload)
    }

    fn client_for(server: &MockServer) -> (ApiClient, Arc<SessionStore>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let session = Arc::new(SessionStore::new(dir.path()));
        let client = ApiClient::new(server.uri(), session.clone()).unwrap();
        (client, session, dir)
    }

    /// Matches only requests that carry no Authorization header at all.
    struct NoAuthorizationHeader;

    impl Match for NoAuthorizationHeader {
        fn matches(&self, request: &Request) -> bool {
            !request
                .headers
                .iter()
                .any(|(name, _)| name.as_str().eq_ignore_ascii_case("authorization"))
        }
    }

    #[tokio::test]
    async fn test_requests_carry_bearer_token_when_logged_in() {
        let server = MockServer::start().await;
        let (client, session, _dir) = client_for(&server);

        let t = token("u1", "MEMBER");
        session.login(&t).unwrap();

        Mock::given(method("GET"))
            .and(path("/projects"))
            .and(header("Authorization", format!("Bearer {}", t).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let projects = client.fetch_projects().await.expect("fetch failed");
        assert!(projects.is_empty());
    }

    #[tokio::test]
    async fn test_requests_omit_header_when_logged_out() {
        let server = MockServer::start().await;
        let (client, _session, _dir) = client_for(&server);

        Mock::given(method("GET"))
            .and(path("/projects"))
            .and(NoAuthorizationHeader)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        client.fetch_projects().await.expect("fetch failed");
    }

    #[tokio::test]
    async fn test_token_changes_take_effect_without_rebuilding_client() {
        let server = MockServer::start().await;
        let (client, session, _dir) = client_for(&server);

        let t = token("late", "PI");

        Mock::given(method("GET"))
            .and(path("/projects"))
            .and(header("Authorization", format!("Bearer {}", t).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        // Logged out: the mock above does not match, the server answers 404.
        assert!(client.fetch_projects().await.is_err());

        // Same client instance, new session state.
        session.login(&t).unwrap();
        client.fetch_projects().await.expect("fetch failed after login");
    }

    #[tokio::test]
    async fn test_login_posts_credentials_and_returns_token() {
        let server = MockServer::start().await;
        let (client, _session, _dir) = client_for(&server);

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(serde_json::json!({
                "username": "ada",
                "password": "hunter2",
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"token": "issued.token.here"})),
            )
            .mount(&server)
            .await;

        let token = client.login("ada", "hunter2").await.expect("login failed");
        assert_eq!(token, "issued.token.here");
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_typed_error() {
        let server = MockServer::start().await;
        let (client, _session, _dir) = client_for(&server);

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client.login("ada", "wrong").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_signup_without_token_means_login_separately() {
        let server = MockServer::start().await;
        let (client, _session, _dir) = client_for(&server);

        Mock::given(method("POST"))
            .and(path("/auth/signup"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"message": "registered"})),
            )
            .mount(&server)
            .await;

        let outcome = client
            .signup(&SignupRequest {
                username: "ada".into(),
                password: "hunter2".into(),
                full_name: "Ada Lovelace".into(),
                role: "MEMBER".into(),
            })
            .await
            .expect("signup failed");

        assert!(outcome.token.is_none());
        assert_eq!(outcome.message.as_deref(), Some("registered"));
    }

    #[tokio::test]
    async fn test_create_milestone_tags_the_current_user() {
        let server = MockServer::start().await;
        let (client, session, _dir) = client_for(&server);
        session.login(&token("ada", "PI")).unwrap();

        Mock::given(method("POST"))
            .and(path("/projects/p1/milestones"))
            .and(query_param("username", "ada"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let milestone = NewMilestone {
            title: "Draft paper".into(),
            due_date: "2026-09-01".into(),
        };
        client
            .create_milestone("p1", &milestone, "ada")
            .await
            .expect("create failed");
    }
}
