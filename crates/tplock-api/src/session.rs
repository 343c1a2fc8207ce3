// Router session client
//
// Wraps `reqwest::Client` with the router's login handshake and the
// `stok`-scoped `/ds` endpoint. The token returned by login is embedded in
// the path of every authenticated call; the router never tells us when it
// expires, so a non-zero `error_code` is the only signal.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{self, BlockFlagRequest, HostsResponse, LoginResponse};
use crate::obfuscate;
use crate::transport::{DEFAULT_TIMEOUT, TransportConfig};

/// Raw HTTP client for the router's management API.
///
/// Holds the session token after a successful [`login`](Self::login). All
/// authenticated methods fail with [`Error::NotAuthenticated`] until then.
pub struct SessionClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    /// Session token (`stok`) issued by the router on login.
    stok: Option<SecretString>,
}

impl SessionClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically so transport state is kept across calls. `base_url`
    /// is the router root, e.g. `http://192.168.1.1`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout: config.timeout,
            stok: None,
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout: DEFAULT_TIMEOUT,
            stok: None,
        }
    }

    /// The router base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether a session token is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.stok.is_some()
    }

    /// Forget the session token. The router is not notified.
    pub fn clear_session(&mut self) {
        self.stok = None;
    }

    // ── Login ────────────────────────────────────────────────────────

    /// Authenticate with the router's admin password.
    ///
    /// The password is obfuscated the way the router's web UI does it and
    /// POSTed to the base URL. Success requires `error_code == 0` and a
    /// `stok` in the response; anything else (including a transport
    /// failure) clears any previous token and returns
    /// [`Error::Authentication`]. One attempt, no retry.
    pub async fn login(&mut self, password: &SecretString) -> Result<(), Error> {
        self.stok = None;

        let encoded = SecretString::from(obfuscate::encode_password(password.expose_secret()));
        let body = json!({
            "method": "do",
            "login": { "password": encoded.expose_secret() },
        });

        debug!("logging in at {}", self.base_url);

        let resp = self
            .http
            .post(self.base_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Authentication {
                message: format!("login request failed: {e}"),
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| Error::Authentication {
            message: format!("login response unreadable: {e}"),
        })?;

        let login: LoginResponse =
            serde_json::from_str(&text).map_err(|e| Error::Authentication {
                message: format!("unexpected login response (HTTP {status}): {e}"),
            })?;

        match (login.error_code, login.stok) {
            (0, Some(stok)) => {
                debug!(token_prefix = %token_prefix(&stok), "login successful");
                self.stok = Some(SecretString::from(stok));
                Ok(())
            }
            (0, _) => Err(Error::Authentication {
                message: "router accepted login but issued no session token".into(),
            }),
            (code, _) => Err(Error::Authentication {
                message: format!("router rejected login (error_code {code})"),
            }),
        }
    }

    // ── Authenticated requests ───────────────────────────────────────

    /// Build `{base}/stok={token}/ds`.
    fn ds_url(&self) -> Result<Url, Error> {
        let stok = self.stok.as_ref().ok_or(Error::NotAuthenticated)?;
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/stok={}/ds", stok.expose_secret()))?)
    }

    /// POST `body` to the session's `/ds` endpoint and return the JSON
    /// response once its `error_code` is confirmed zero.
    pub async fn authenticated_request(
        &self,
        body: &(impl Serialize + Sync),
    ) -> Result<Value, Error> {
        let url = self.ds_url()?;
        self.post(url, body).await
    }

    /// Like [`authenticated_request`](Self::authenticated_request), decoding
    /// the body into `T`.
    async fn request<T: DeserializeOwned>(&self, body: &(impl Serialize + Sync)) -> Result<T, Error> {
        let value = self.authenticated_request(body).await?;
        serde_json::from_value(value).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: String::new(),
        })
    }

    /// Run the composite host/interface/connection query.
    pub async fn query_hosts(&self) -> Result<HostsResponse, Error> {
        self.request(&models::hosts_query()).await
    }

    /// Set a device's block flag. `Ok` only on `error_code == 0`.
    pub async fn set_block_flag(&self, req: &BlockFlagRequest) -> Result<(), Error> {
        debug!(mac = %req.mac, is_blocked = %req.is_blocked, "setting block flag");
        let _: Value = self.authenticated_request(&req.to_body()).await?;
        Ok(())
    }

    async fn post(&self, url: Url, body: &(impl Serialize + Sync)) -> Result<Value, Error> {
        // Path carries the token; log without it.
        debug!("POST {}/stok=…/ds", self.base_url.as_str().trim_end_matches('/'));

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| self.transport_error(e))?;
        trace!(%status, len = text.len(), "response received");

        parse_status(&text)
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }
}

/// Decode a response body and check its `error_code`.
fn parse_status(text: &str) -> Result<Value, Error> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        let preview: String = text.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: text.to_owned(),
        }
    })?;

    match value.get("error_code").and_then(Value::as_i64) {
        Some(0) => Ok(value),
        Some(code) => Err(Error::Api { code }),
        None => Err(Error::Deserialization {
            message: "response has no error_code".into(),
            body: text.to_owned(),
        }),
    }
}

fn token_prefix(stok: &str) -> String {
    stok.chars().take(8).collect()
}
