// Portal REST API HTTP client
//
// Wraps `reqwest::Client` with portal URL construction, token auth, and
// error-envelope unwrapping. Endpoint groups (enterprise, edge,
// configuration) are implemented as inherent methods in separate files
// to keep this module focused on transport mechanics.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

const PORTAL_PATH: &str = "portal/rest/";

/// The portal wraps call failures as `{"error":{"code":N,"message":"..."}}`,
/// sometimes with HTTP 200.
#[derive(serde::Deserialize)]
struct PortalError {
    error: Option<PortalErrorInner>,
}

#[derive(serde::Deserialize)]
struct PortalErrorInner {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for the orchestrator's portal REST API.
///
/// Every call is `POST {base}/portal/rest/{method}` with a JSON parameter
/// object. Responses are bare JSON; errors come back either as a non-2xx
/// status or an `error` envelope.
pub struct OrchestratorClient {
    http: reqwest::Client,
    base_url: Url,
}

// The auth header lives inside `http`; only the endpoint is shown.
impl std::fmt::Debug for OrchestratorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrchestratorClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl OrchestratorClient {
    /// Create a client authenticating with an API token.
    ///
    /// `base_url` is the orchestrator root (e.g. `https://vco.example.net`).
    /// A bare token gets the `Token ` scheme prefix the portal expects.
    pub fn new(
        base_url: &Url,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let raw = token.expose_secret().trim();
        let header = if raw.starts_with("Token ") {
            raw.to_owned()
        } else {
            format!("Token {raw}")
        };
        let mut value =
            HeaderValue::from_str(&header).map_err(|e| Error::InvalidToken(e.to_string()))?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);

        let http = transport.build_client_with_headers(headers)?;
        Ok(Self {
            http,
            base_url: portal_base(base_url)?,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// The caller is responsible for authentication headers.
    pub fn with_client(http: reqwest::Client, base_url: &Url) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: portal_base(base_url)?,
        })
    }

    /// The portal REST base URL (ends in `/portal/rest/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The orchestrator hostname, as the cloud template expects it.
    pub fn hostname(&self) -> Option<&str> {
        self.base_url.host_str()
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Build the URL for a portal method such as `edge/edgeProvision`.
    pub(crate) fn method_url(&self, method: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(method)?)
    }

    /// POST a portal method and decode its JSON response.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.method_url(method)?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(params)
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_response(method, resp).await
    }
}

/// Normalize an orchestrator root into the portal REST base.
fn portal_base(base_url: &Url) -> Result<Url, Error> {
    let mut root = base_url.clone();
    if !root.path().ends_with('/') {
        let path = format!("{}/", root.path());
        root.set_path(&path);
    }
    Ok(root.join(PORTAL_PATH)?)
}

/// Check status and the error envelope, then decode `T`.
async fn parse_response<T: DeserializeOwned>(
    method: &str,
    resp: reqwest::Response,
) -> Result<T, Error> {
    let status = resp.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::Authentication {
            message: format!("{method}: token rejected or expired"),
        });
    }

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Api {
            method: method.to_owned(),
            message: format!("HTTP {status}: {}", preview(&body)),
            code: None,
            status: Some(status.as_u16()),
        });
    }

    let body = resp.text().await.map_err(Error::Transport)?;
    trace!(method, bytes = body.len(), "portal response");

    if let Ok(wrapper) = serde_json::from_str::<PortalError>(&body) {
        if let Some(err) = wrapper.error {
            let message = err
                .message
                .unwrap_or_else(|| "orchestrator returned an error".into());
            return Err(Error::Api {
                method: method.to_owned(),
                message,
                code: err.code,
                status: None,
            });
        }
    }

    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{method}: {e} (body preview: {:?})", preview(&body)),
        body,
    })
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_token() {
        let client = OrchestratorClient::new(
            &Url::parse("https://vco.example.net").unwrap(),
            &SecretString::from("s3cr3t-token".to_string()),
            &TransportConfig::default(),
        )
        .unwrap();
        let shown = format!("{client:?}");
        assert!(shown.contains("vco.example.net/portal/rest/"));
        assert!(!shown.contains("s3cr3t-token"));
    }

    #[test]
    fn portal_base_from_bare_host() {
        let base = portal_base(&Url::parse("https://vco.example.net").unwrap()).unwrap();
        assert_eq!(base.as_str(), "https://vco.example.net/portal/rest/");
    }

    #[test]
    fn portal_base_keeps_existing_path() {
        let base = portal_base(&Url::parse("https://lab.example.net/vco").unwrap()).unwrap();
        assert_eq!(base.as_str(), "https://lab.example.net/vco/portal/rest/");
    }

    #[test]
    fn method_url_appends_method() {
        let client = OrchestratorClient::with_client(
            reqwest::Client::new(),
            &Url::parse("https://vco.example.net/").unwrap(),
        )
        .unwrap();
        let url = client.method_url("edge/edgeProvision").unwrap();
        assert_eq!(
            url.as_str(),
            "https://vco.example.net/portal/rest/edge/edgeProvision"
        );
        assert_eq!(client.hostname(), Some("vco.example.net"));
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let body = "é".repeat(300);
        assert_eq!(preview(&body).chars().count(), 200);
        assert_eq!(preview("short"), "short");
    }
}
