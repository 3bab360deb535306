// Hand-crafted async HTTP client for the Cloud DNS v1 REST API.
//
// Base path: /dns/v1/projects/{project}/
// Auth: OAuth bearer token from the service-account JWT flow

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::{ServiceAccountKey, TokenProvider};
use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types;

const DEFAULT_ENDPOINT: &str = "https://dns.googleapis.com/";

// ── Error response shape from the Cloud DNS API ─────────────────────

#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorItem>,
}

#[derive(serde::Deserialize)]
struct ErrorItem {
    #[serde(default)]
    reason: Option<String>,
}

// ── Client ──────────────────────────────────────────────────────────

/// Async client for the Cloud DNS v1 API, scoped to one project.
///
/// All calls attach a bearer token from the [`TokenProvider`] and speak
/// JSON REST under `/dns/v1/projects/{project}/`.
pub struct DnsClient {
    http: reqwest::Client,
    base_url: Url,
    token: TokenProvider,
    project: String,
}

impl DnsClient {
    // ── Constructors ────────────────────────────────────────────────

    /// Build from a parsed service-account key and transport config.
    ///
    /// The project is taken from the key file; requests authenticate via
    /// the JWT-bearer flow against the key's token endpoint.
    pub fn from_service_account(
        key: ServiceAccountKey,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let project = key.project_id.clone();
        Self::from_service_account_for_project(key, transport, &project)
    }

    /// Like [`Self::from_service_account`], but scoped to an explicit
    /// project instead of the key file's own.
    pub fn from_service_account_for_project(
        key: ServiceAccountKey,
        transport: &TransportConfig,
        project: &str,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::project_base_url(DEFAULT_ENDPOINT, project)?;
        let token = TokenProvider::service_account(key, http.clone());

        Ok(Self {
            http,
            base_url,
            token,
            project: project.to_owned(),
        })
    }

    /// Wrap an existing `reqwest::Client` with a fixed bearer token.
    ///
    /// Intended for tests against a mock server and for callers that
    /// manage token refresh themselves.
    pub fn from_reqwest(
        endpoint: &str,
        project: &str,
        http: reqwest::Client,
        token: secrecy::SecretString,
    ) -> Result<Self, Error> {
        let base_url = Self::project_base_url(endpoint, project)?;
        Ok(Self {
            http,
            base_url,
            token: TokenProvider::Static(token),
            project: project.to_owned(),
        })
    }

    /// The project this client is scoped to.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Build `{endpoint}/dns/v1/projects/{project}/`.
    fn project_base_url(endpoint: &str, project: &str) -> Result<Url, Error> {
        let root = Url::parse(endpoint)?;
        let path = root.path().trim_end_matches('/').to_owned();
        let mut url = root;
        url.set_path(&format!("{path}/dns/v1/projects/{project}/"));
        Ok(url)
    }

    // ── URL builder ─────────────────────────────────────────────────

    /// Join a relative path (e.g. `"managedZones"`) onto the base URL.
    fn url(&self, path: &str) -> Url {
        // base_url always ends with `/`, so joining relative paths works.
        self.base_url
            .join(path)
            .expect("path should be valid relative URL")
    }

    // ── HTTP verbs ──────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url} params={params:?}");

        let token = self.token.bearer_token().await?;
        let resp = self
            .http
            .get(url)
            .query(params)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("POST {url}");

        let token = self.token.bearer_token().await?;
        let resp = self
            .http
            .post(url)
            .bearer_auth(token.expose_secret())
            .json(body)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path);
        debug!("DELETE {url}");

        let token = self.token.bearer_token().await?;
        let resp = self
            .http
            .delete(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ───────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = &body[..body.len().min(200)];
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED {
            return Error::Authentication {
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
            };
        }

        let (message, reason) = match serde_json::from_str::<ErrorEnvelope>(&raw) {
            Ok(envelope) => (
                envelope
                    .error
                    .message
                    .unwrap_or_else(|| status.to_string()),
                envelope.error.errors.into_iter().find_map(|e| e.reason),
            ),
            Err(_) => (
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                None,
            ),
        };

        let quota_reason = matches!(
            reason.as_deref(),
            Some("rateLimitExceeded" | "userRateLimitExceeded" | "quotaExceeded")
        );
        if status == StatusCode::TOO_MANY_REQUESTS || quota_reason {
            return Error::RateLimited { message };
        }

        Error::Api {
            status: status.as_u16(),
            message,
            reason,
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Managed zones ───────────────────────────────────────────────

    pub async fn list_managed_zones(
        &self,
        page_token: Option<&str>,
    ) -> Result<types::ManagedZonesResponse, Error> {
        let mut params = Vec::new();
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_owned()));
        }
        self.get("managedZones", &params).await
    }

    /// Collect every managed zone, following pagination.
    pub async fn list_all_managed_zones(&self) -> Result<Vec<types::ManagedZone>, Error> {
        let mut all = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.list_managed_zones(page_token.as_deref()).await?;
            all.extend(page.managed_zones);
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(all)
    }

    pub async fn create_managed_zone(
        &self,
        zone: &types::ManagedZone,
    ) -> Result<types::ManagedZone, Error> {
        self.post("managedZones", zone).await
    }

    pub async fn delete_managed_zone(&self, zone_name: &str) -> Result<(), Error> {
        self.delete(&format!("managedZones/{zone_name}")).await
    }

    // ── Resource record sets ────────────────────────────────────────

    pub async fn list_rrsets(
        &self,
        zone_name: &str,
        page_token: Option<&str>,
    ) -> Result<types::RrsetsResponse, Error> {
        let mut params = Vec::new();
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_owned()));
        }
        self.get(&format!("managedZones/{zone_name}/rrsets"), &params)
            .await
    }

    /// Collect every record set in a zone, following pagination.
    pub async fn list_all_rrsets(
        &self,
        zone_name: &str,
    ) -> Result<Vec<types::ResourceRecordSet>, Error> {
        let mut all = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.list_rrsets(zone_name, page_token.as_deref()).await?;
            all.extend(page.rrsets);
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(all)
    }

    // ── Changes ─────────────────────────────────────────────────────

    /// Submit an additions/deletions change against a zone.
    pub async fn create_change(
        &self,
        zone_name: &str,
        change: &types::Change,
    ) -> Result<types::Change, Error> {
        self.post(&format!("managedZones/{zone_name}/changes"), change)
            .await
    }
}
