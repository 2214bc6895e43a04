//! PostgREST HTTP client.
//!
//! Thin transport over `reqwest`: header handling, retries of reads on
//! transient failures, and mapping of network errors to `BackendUnavailable`.

use std::time::Duration;

use parking_lot::RwLock;
use reqwest::{Client as HttpClient, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use super::settings::SupabaseConfig;
use crate::error::{Error, Result};

/// HTTP client for the `/rest/v1` API of a Supabase project.
pub struct SupabaseClient {
    http: HttpClient,
    rest_url: Url,
    anon_key: String,
    /// Bearer token of the signed-in user; the anon key is used when unset.
    access_token: RwLock<Option<String>>,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
}

impl SupabaseClient {
    /// Build a client from configuration.
    pub fn from_config(config: &SupabaseConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Ok(Self {
            http,
            rest_url: rest_url(&config.url)?,
            anon_key: config.anon_key.clone(),
            access_token: RwLock::new(None),
            retry_max_attempts: config.retry_max_attempts,
            retry_backoff_ms: config.retry_backoff_ms,
        })
    }

    /// Use a user access token for subsequent requests.
    pub fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write() = token;
    }

    #[must_use]
    pub fn rest_url(&self) -> &Url {
        &self.rest_url
    }

    /// Build the URL of a table endpoint with a raw PostgREST query.
    pub fn table_url(&self, table: &str, query: &str) -> Result<Url> {
        let mut url = self.rest_url.join(table)?;
        if !query.is_empty() {
            url.set_query(Some(query));
        }
        Ok(url)
    }

    pub async fn get<T>(&self, url: Url) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_with_retry::<T, ()>(Method::GET, url, None).await
    }

    pub async fn post<T, B>(&self, url: Url, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        self.send_with_retry(Method::POST, url, Some(body)).await
    }

    pub async fn patch<T, B>(&self, url: Url, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        self.send_with_retry(Method::PATCH, url, Some(body)).await
    }

    pub async fn delete<T>(&self, url: Url) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_with_retry::<T, ()>(Method::DELETE, url, None).await
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let bearer = self
            .access_token
            .read()
            .clone()
            .unwrap_or_else(|| self.anon_key.clone());
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
            .header("Prefer", "return=representation")
    }

    /// Send a request, retrying transient transport failures for reads.
    ///
    /// Writes are sent once. Nothing is resent after a status line has been
    /// received, since the server may already have committed the change.
    async fn send_with_retry<T, B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let mut attempt = 0;
        let max_attempts = if is_retryable(&method) {
            self.retry_max_attempts.max(1)
        } else {
            1
        };

        let response = loop {
            attempt += 1;
            let mut request = self.request(method.clone(), url.clone());
            if let Some(body) = body {
                request = request.json(body);
            }

            match request.send().await {
                Ok(response) => break response,
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(Self::map_transport(err));
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                }
            }
        };

        let response = response.error_for_status()?;
        debug!(%method, path = url.path(), status = %response.status(), "PostgREST response");

        response.json::<T>().await.map_err(|err| {
            warn!(%method, path = url.path(), error = %err, "Failed to read PostgREST response body");
            Error::Parse(format!("{method} {}: {err}", url.path()))
        })
    }

    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    fn map_transport(err: reqwest::Error) -> Error {
        if Self::should_retry(&err) {
            Error::BackendUnavailable(err.to_string())
        } else {
            Error::Http(err)
        }
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, err: &reqwest::Error) {
        warn!(
            attempt,
            max_attempts,
            error = %err,
            "PostgREST request failed, retrying"
        );
        if self.retry_backoff_ms > 0 {
            sleep(Duration::from_millis(self.retry_backoff_ms)).await;
        }
    }
}

/// Only reads are safe to resend after a transport failure.
fn is_retryable(method: &Method) -> bool {
    *method == Method::GET
}

/// `<project>/rest/v1/`, with a trailing slash so table names join cleanly.
fn rest_url(project_url: &str) -> Result<Url> {
    let mut base = Url::parse(project_url.trim())?;
    let path = base.path().trim_end_matches('/').to_string();
    base.set_path(&format!("{path}/rest/v1/"));
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::net::TcpListener;

    fn config(url: &str) -> SupabaseConfig {
        SupabaseConfig {
            url: url.into(),
            anon_key: "anon".into(),
            ..SupabaseConfig::default()
        }
    }

    #[test]
    fn rest_url_is_normalized() {
        for project in ["https://demo.supabase.co", "https://demo.supabase.co/"] {
            let client = SupabaseClient::from_config(&config(project)).unwrap();
            assert_eq!(client.rest_url().as_str(), "https://demo.supabase.co/rest/v1/");
        }
    }

    #[test]
    fn table_url_keeps_postgrest_query() {
        let client = SupabaseClient::from_config(&config("https://demo.supabase.co")).unwrap();
        let url = client.table_url("tires", "select=*&order=created_at.desc").unwrap();
        assert_eq!(
            url.as_str(),
            "https://demo.supabase.co/rest/v1/tires?select=*&order=created_at.desc"
        );
    }

    #[test]
    fn only_reads_are_retried() {
        assert!(is_retryable(&Method::GET));
        for method in [Method::POST, Method::PATCH, Method::DELETE] {
            assert!(!is_retryable(&method), "{method} must be sent once");
        }
    }

    /// A server that accepts connections and never answers.
    async fn silent_server() -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accepted = Arc::new(AtomicUsize::new(0));
        let counter = accepted.clone();
        tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                open.push(stream);
            }
        });
        (format!("http://{addr}"), accepted)
    }

    fn impatient(url: &str) -> SupabaseClient {
        SupabaseClient::from_config(&SupabaseConfig {
            timeout_ms: 100,
            retry_max_attempts: 3,
            retry_backoff_ms: 0,
            ..config(url)
        })
        .unwrap()
    }

    #[tokio::test]
    async fn timed_out_insert_is_sent_once() {
        let (url, accepted) = silent_server().await;
        let client = impatient(&url);
        let target = client.table_url("movements", "").unwrap();

        let err = client
            .post::<serde_json::Value, _>(target, &serde_json::json!({ "quantity": 1 }))
            .await
            .unwrap_err();
        assert!(err.is_unavailable(), "got {err:?}");
        assert_eq!(accepted.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn timed_out_read_is_retried() {
        let (url, accepted) = silent_server().await;
        let client = impatient(&url);
        let target = client.table_url("tires", "select=*").unwrap();

        let err = client.get::<serde_json::Value>(target).await.unwrap_err();
        assert!(err.is_unavailable(), "got {err:?}");
        assert_eq!(accepted.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn invalid_project_url_is_rejected() {
        assert!(matches!(
            SupabaseClient::from_config(&config("::nope::")),
            Err(Error::Url(_))
        ));
    }
}
