//! Supabase administrative RPC client.
//!
//! Executes raw SQL through a Postgres function exposed by PostgREST
//! (`POST /rest/v1/rpc/<function>` with `{"query": "<sql>"}`).

use std::fmt;
use std::future::Future;

use thiserror::Error;
use url::Url;

use crate::config::MigrationSettings;

/// PostgREST error code for "function not found in the schema cache".
const PGRST_FUNCTION_NOT_FOUND: &str = "PGRST202";

/// Errors from executing a migration.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Required environment variables are unset or empty.
    #[error("Missing Supabase credentials: {}", .0.join(", "))]
    MissingCredentials(Vec<String>),

    #[error("Invalid project URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Not authorized to execute SQL ({status}): {body}")]
    Unauthorized { status: u16, body: String },

    /// The project does not expose the SQL execution function.
    #[error("The '{function}' RPC is not available on this project: {body}")]
    Unsupported { function: String, body: String },

    /// Any other non-2xx response, including SQL errors.
    #[error("Supabase API error ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Something that can run a SQL script.
pub trait SqlExecutor {
    fn execute_sql(&self, sql: &str) -> impl Future<Output = Result<(), MigrationError>> + Send;
}

/// Project URL and service-role key.
#[derive(Clone)]
pub struct Credentials {
    pub project_url: String,
    pub service_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("project_url", &self.project_url)
            .field("service_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Reads the variables named in `settings` through `lookup`.
    ///
    /// Empty values count as missing.
    pub fn from_lookup<F>(settings: &MigrationSettings, lookup: F) -> Result<Self, MigrationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        match (read(&settings.url_env), read(&settings.service_key_env)) {
            (Some(project_url), Some(service_key)) => Ok(Self { project_url, service_key }),
            (url, key) => {
                let mut missing = Vec::new();
                if url.is_none() {
                    missing.push(settings.url_env.clone());
                }
                if key.is_none() {
                    missing.push(settings.service_key_env.clone());
                }
                Err(MigrationError::MissingCredentials(missing))
            }
        }
    }
}

/// HTTP client for one Supabase project.
pub struct SupabaseClient {
    /// Shared connection pool
    client: reqwest::Client,
    /// `{project_url}/rest/v1/rpc/{function}`
    rpc_url: Url,
    /// SQL 実行関数名（エラー表示用）
    function: String,
    /// `apikey` と `Authorization` の両方に使う
    service_key: String,
}

impl fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("rpc_url", &self.rpc_url.as_str())
            .field("function", &self.function)
            .finish_non_exhaustive()
    }
}

impl SupabaseClient {
    /// * `function` - Postgres function that executes its `query` argument.
    pub fn new(credentials: &Credentials, function: &str) -> Result<Self, MigrationError> {
        Self::with_client(reqwest::Client::new(), credentials, function)
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        credentials: &Credentials,
        function: &str,
    ) -> Result<Self, MigrationError> {
        let rpc_url = rpc_url(&credentials.project_url, function)?;

        Ok(Self {
            client,
            rpc_url,
            function: function.to_string(),
            service_key: credentials.service_key.clone(),
        })
    }

    #[must_use]
    pub const fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }

    /// Map a non-2xx response to the matching error.
    fn classify_failure(&self, status: reqwest::StatusCode, body: String) -> MigrationError {
        if status == reqwest::StatusCode::NOT_FOUND || body.contains(PGRST_FUNCTION_NOT_FOUND) {
            return MigrationError::Unsupported { function: self.function.clone(), body };
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return MigrationError::Unauthorized { status: status.as_u16(), body };
        }

        MigrationError::Rejected { status: status.as_u16(), body }
    }
}

impl SqlExecutor for SupabaseClient {
    async fn execute_sql(&self, sql: &str) -> Result<(), MigrationError> {
        tracing::debug!(url = %self.rpc_url, bytes = sql.len(), "Sending SQL to Supabase");

        let response = self
            .client
            .post(self.rpc_url.clone())
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .json(&serde_json::json!({ "query": sql }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_else(|_| "<unreadable body>".to_string());
        tracing::debug!(status = status.as_u16(), %body, "Supabase rejected the request");

        Err(self.classify_failure(status, body))
    }
}

/// `{project_url}/rest/v1/rpc/{function}`
fn rpc_url(project_url: &str, function: &str) -> Result<Url, MigrationError> {
    let invalid = |source| MigrationError::InvalidUrl { url: project_url.to_string(), source };

    let mut base = Url::parse(project_url).map_err(invalid)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(&format!("rest/v1/rpc/{function}")).map_err(invalid)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use googletest::prelude::*;
    use httpmock::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    const SQL: &str = "ALTER TABLE dealer_users ADD COLUMN IF NOT EXISTS updated_at TIMESTAMPTZ;";

    fn credentials(server: &MockServer) -> Credentials {
        Credentials { project_url: server.base_url(), service_key: "service-key".to_string() }
    }

    #[rstest]
    #[case("https://abc.supabase.co", "https://abc.supabase.co/rest/v1/rpc/exec_sql")]
    #[case("https://abc.supabase.co/", "https://abc.supabase.co/rest/v1/rpc/exec_sql")]
    #[case("http://localhost:54321/proxy", "http://localhost:54321/proxy/rest/v1/rpc/exec_sql")]
    fn test_rpc_url(#[case] project_url: &str, #[case] expected: &str) {
        assert_eq!(rpc_url(project_url, "exec_sql").unwrap().as_str(), expected);
    }

    #[rstest]
    fn test_rpc_url_invalid() {
        assert!(matches!(
            rpc_url("abc.supabase.co", "exec_sql"),
            Err(MigrationError::InvalidUrl { .. })
        ));
    }

    #[rstest]
    fn test_credentials_from_lookup() {
        let env = HashMap::from([
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_SERVICE_ROLE_KEY", "secret"),
        ]);

        let credentials = Credentials::from_lookup(&MigrationSettings::default(), |name| {
            env.get(name).map(ToString::to_string)
        })
        .unwrap();

        assert_eq!(credentials.project_url, "https://abc.supabase.co");
        assert!(!format!("{credentials:?}").contains("secret"));
    }

    #[rstest]
    fn test_credentials_missing_are_listed() {
        let env = HashMap::from([("SUPABASE_URL", "https://abc.supabase.co")]);

        let result = Credentials::from_lookup(&MigrationSettings::default(), |name| {
            env.get(name).map(ToString::to_string)
        });

        match result {
            Err(MigrationError::MissingCredentials(missing)) => {
                assert_eq!(missing, vec!["SUPABASE_SERVICE_ROLE_KEY".to_string()]);
            }
            other => panic!("Expected MissingCredentials, got {other:?}"),
        }
    }

    #[rstest]
    fn test_credentials_empty_value_is_missing() {
        let result = Credentials::from_lookup(&MigrationSettings::default(), |_| Some("  ".into()));

        assert!(matches!(result, Err(MigrationError::MissingCredentials(m)) if m.len() == 2));
    }

    #[tokio::test]
    async fn test_execute_sql_sends_query_with_service_key() {
        let server = MockServer::start_async().await;
        let mock = server.mock_async(|when, then| {
            when.method(POST)
                .path("/rest/v1/rpc/exec_sql")
                .header("apikey", "service-key")
                .header("authorization", "Bearer service-key")
                .json_body(json!({ "query": SQL }));
            then.status(204);
        }).await;

        let client = SupabaseClient::new(&credentials(&server), "exec_sql").unwrap();
        let result = client.execute_sql(SQL).await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_execute_sql_missing_function_is_unsupported() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(POST).path("/rest/v1/rpc/exec_sql");
            then.status(404).json_body(json!({
                "code": "PGRST202",
                "message": "Could not find the function public.exec_sql(query) in the schema cache"
            }));
        }).await;

        let client = SupabaseClient::new(&credentials(&server), "exec_sql").unwrap();
        let error = client.execute_sql(SQL).await.unwrap_err();

        assert!(matches!(error, MigrationError::Unsupported { .. }));
        assert_that!(error, displays_as(contains_substring("'exec_sql' RPC is not available")));
    }

    #[rstest]
    #[case(401)]
    #[case(403)]
    #[tokio::test]
    async fn test_execute_sql_unauthorized(#[case] status: u16) {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(POST).path("/rest/v1/rpc/exec_sql");
            then.status(status).body("invalid JWT");
        }).await;

        let client = SupabaseClient::new(&credentials(&server), "exec_sql").unwrap();
        let error = client.execute_sql(SQL).await.unwrap_err();

        assert!(matches!(error, MigrationError::Unauthorized { status: s, .. } if s == status));
    }

    #[tokio::test]
    async fn test_execute_sql_sql_error_is_rejected() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(POST).path("/rest/v1/rpc/exec_sql");
            then.status(400).body(r#"{"code":"42P01","message":"relation \"dealer_users\" does not exist"}"#);
        }).await;

        let client = SupabaseClient::new(&credentials(&server), "exec_sql").unwrap();
        let error = client.execute_sql(SQL).await.unwrap_err();

        match error {
            MigrationError::Rejected { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("42P01"));
            }
            other => panic!("Expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_execute_sql_connection_refused_is_request_error() {
        let credentials = Credentials {
            project_url: "http://127.0.0.1:9".to_string(),
            service_key: "service-key".to_string(),
        };

        let client = SupabaseClient::new(&credentials, "exec_sql").unwrap();
        let error = client.execute_sql(SQL).await.unwrap_err();

        assert!(matches!(error, MigrationError::Request(_)));
    }
}
