//! Session Authenticator: the two-step login handshake.
//!
//! 1. POST credentials to the login endpoint, receive a nonce.
//! 2. Exchange the nonce for a bearer token.
//! 3. Fetch the resource overview and check that the active player shown
//!    there is the user that logged in.
//!
//! The result is a [`Session`]: the cookie-carrying transport plus the
//! bearer token. It is the only way the rest of the crate reaches the server.

use crate::error::{AuthFailure, Error, Result};
use crate::layout::current as layout;
use crate::markup;
use crate::transport::{HttpRequest, HttpResponse, Transport};
use scraper::Html;
use serde::Deserialize;
use serde_json::json;

/// Login credentials. Immutable once a session is built from them.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// Server host, e.g. `ts3.x1.international.travian.com`.
    pub server: String,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        server: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            server: server.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("server", &self.server)
            .finish()
    }
}

/// An authenticated connection to one game server.
///
/// Written once by [`authenticate`] and read-only afterwards. There is no
/// re-authentication: when the server expires the session, later calls fail.
pub struct Session {
    transport: Box<dyn Transport>,
    username: String,
    token: String,
}

impl Session {
    /// Wrap a transport whose cookies and bearer token were obtained elsewhere.
    pub fn from_parts(
        transport: impl Transport + 'static,
        username: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            transport: Box::new(transport),
            username: username.into(),
            token: token.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub(crate) async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.transport.send(request).await
    }

    /// Fetch a server-rendered page.
    pub(crate) async fn page(&self, request: HttpRequest) -> Result<String> {
        Ok(self.send(request).await?.body)
    }

    /// Call a bearer-authorized API endpoint and return its raw body.
    pub(crate) async fn api(&self, request: HttpRequest) -> Result<String> {
        Ok(self.send(request.bearer(&self.token)).await?.body)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct NonceResponse {
    nonce: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<String>,
}

/// Log in and return the authenticated session.
///
/// A missing token fails the login right away rather than at the first
/// bearer-authorized call.
pub async fn authenticate<T: Transport + 'static>(
    transport: T,
    credentials: &Credentials,
) -> Result<Session> {
    tracing::debug!("Start logging in as {}", credentials.username);

    let login = HttpRequest::post(layout::LOGIN).json(json!({
        "name": credentials.username,
        "password": credentials.password,
        "w": layout::VIEWPORT,
        "mobileOptimizations": false,
    }));
    let nonce = match transport.send(login).await {
        Ok(resp) => serde_json::from_str::<NonceResponse>(&resp.body)
            .ok()
            .and_then(|r| r.nonce)
            .filter(|n| !n.is_empty()),
        Err(Error::Status { status, .. }) => {
            tracing::debug!("login endpoint answered {status}");
            None
        }
        Err(e) => return Err(e),
    };
    let nonce = nonce.ok_or_else(|| fail(AuthFailure::MissingNonce))?;

    let exchange = HttpRequest::post(format!("{}/{}", layout::NONCE_EXCHANGE, nonce));
    let token = match transport.send(exchange).await {
        Ok(resp) => serde_json::from_str::<TokenResponse>(&resp.body)
            .ok()
            .and_then(|r| r.token)
            .filter(|t| !t.is_empty()),
        Err(Error::Status { status, .. }) => {
            tracing::debug!("nonce exchange answered {status}");
            None
        }
        Err(e) => return Err(e),
    };
    let token = token.ok_or_else(|| fail(AuthFailure::MissingToken))?;

    let dashboard = transport.send(HttpRequest::get(layout::DORF1)).await?.body;
    check_player_name(&dashboard, &credentials.username).map_err(fail)?;

    tracing::info!("Login successful, username: {}", credentials.username);
    Ok(Session {
        transport: Box::new(transport),
        username: credentials.username.clone(),
        token,
    })
}

fn fail(reason: AuthFailure) -> Error {
    tracing::error!("Login failed, {reason}");
    Error::Authentication(reason)
}

/// The dashboard's active-player name must equal the login name exactly.
fn check_player_name(html: &str, username: &str) -> std::result::Result<(), AuthFailure> {
    let doc = Html::parse_document(html);
    let found = markup::find_first(doc.root_element(), layout::PLAYER_NAME)
        .ok()
        .flatten()
        .map(markup::text)
        .ok_or(AuthFailure::PlayerNameMissing)?;

    if found == username {
        Ok(())
    } else {
        Err(AuthFailure::PlayerNameMismatch {
            expected: username.to_string(),
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::fake::FakeTransport;
    use crate::transport::Method;

    const DASHBOARD: &str = r#"<html><body>
        <div id="sidebarBoxActiveVillage"><div class="playerName">alice</div></div>
    </body></html>"#;

    fn creds() -> Credentials {
        Credentials::new("alice", "hunter2", "ts1.example.com")
    }

    #[test]
    fn test_debug_redacts_password() {
        let out = format!("{:?}", creds());
        assert!(out.contains("alice"));
        assert!(!out.contains("hunter2"));
    }

    #[test]
    fn test_player_name_check() {
        assert!(check_player_name(DASHBOARD, "alice").is_ok());
        assert_eq!(
            check_player_name(DASHBOARD, "bob"),
            Err(AuthFailure::PlayerNameMismatch {
                expected: "bob".into(),
                found: "alice".into()
            })
        );
        assert_eq!(
            check_player_name("<html></html>", "alice"),
            Err(AuthFailure::PlayerNameMissing)
        );
    }

    #[tokio::test]
    async fn test_login_handshake() {
        let transport = FakeTransport::new()
            .route(Method::Post, "/api/v1/auth/login", &[], r#"{"nonce":"n0"}"#)
            .route(Method::Post, "/api/v1/auth/n0", &[], r#"{"token":"t0"}"#)
            .route(Method::Get, "/dorf1.php", &[], DASHBOARD);

        let session = authenticate(transport, &creds()).await.unwrap();
        assert_eq!(session.token(), "t0");
        assert_eq!(session.username(), "alice");
    }

    #[tokio::test]
    async fn test_login_without_nonce() {
        let transport = FakeTransport::new().route(
            Method::Post,
            "/api/v1/auth/login",
            &[],
            r#"{"error":"wrong password"}"#,
        );
        let err = authenticate(transport, &creds()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Authentication(AuthFailure::MissingNonce)
        ));
    }

    #[tokio::test]
    async fn test_login_without_token_fails_fast() {
        let transport = FakeTransport::new()
            .route(Method::Post, "/api/v1/auth/login", &[], r#"{"nonce":"n0"}"#)
            .route(Method::Post, "/api/v1/auth/n0", &[], r#"{}"#)
            .route(Method::Get, "/dorf1.php", &[], DASHBOARD);
        let err = authenticate(transport, &creds()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Authentication(AuthFailure::MissingToken)
        ));
    }
}
