//! Interactive OAuth authorization and token endpoint calls.
//!
//! The installed-app flow: open the consent page in a browser, receive the
//! authorization code on a loopback listener, exchange it for tokens.

use crate::config::OAuthClient;
use crate::error::{MkMeetError, MkMeetResult};
use crate::session::Session;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::debug;
use url::Url;

pub const SCOPES: &[&str] = &["https://www.googleapis.com/auth/calendar"];

const REDIRECT_PORT: u16 = 8085;

pub fn redirect_uri() -> String {
    format!("http://localhost:{}/callback", REDIRECT_PORT)
}

fn redirect_address() -> String {
    format!("127.0.0.1:{}", REDIRECT_PORT)
}

/// A successful response from the token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
    #[serde(default)]
    pub scope: Option<String>,
}

fn default_expires_in() -> i64 {
    3600
}

/// Something that can mint a brand-new session. The browser flow is the
/// default; a service-account or headless flow would be another impl.
#[allow(async_fn_in_trait)]
pub trait Authorizer {
    async fn authorize(&self, client: &OAuthClient) -> MkMeetResult<Session>;
}

/// Browser + loopback-listener authorization.
pub struct InstalledFlow;

impl Authorizer for InstalledFlow {
    async fn authorize(&self, client: &OAuthClient) -> MkMeetResult<Session> {
        let state = uuid::Uuid::new_v4().to_string();
        let auth_url = consent_url(client, &state)?;

        eprintln!("\nOpen this URL in your browser to authorize calendar access:\n");
        eprintln!("{}\n", auth_url);

        // Try to open the browser automatically
        if open::that(auth_url.as_str()).is_err() {
            eprintln!("(Could not open browser automatically, please copy the URL above)");
        }

        let (code, returned_state) = wait_for_callback().await?;

        if returned_state != state {
            return Err(MkMeetError::Auth(
                "state in authorization callback did not match the request".to_string(),
            ));
        }

        eprintln!("\nReceived authorization code, exchanging for tokens...");

        let tokens = exchange_code(client, &code).await?;
        let mut session = Session::from_token_response(tokens, None);

        // The token endpoint may omit the granted scope; fall back to
        // what was requested
        if session.scopes.is_empty() {
            session.scopes = SCOPES.iter().map(|s| s.to_string()).collect();
        }

        Ok(session)
    }
}

fn consent_url(client: &OAuthClient, state: &str) -> MkMeetResult<Url> {
    let mut url = Url::parse(&client.auth_uri)
        .map_err(|e| MkMeetError::Config(format!("invalid auth_uri in client config: {e}")))?;

    url.query_pairs_mut()
        .append_pair("client_id", &client.client_id)
        .append_pair("redirect_uri", &redirect_uri())
        .append_pair("response_type", "code")
        .append_pair("access_type", "offline")
        .append_pair("prompt", "consent")
        .append_pair("scope", &SCOPES.join(" "))
        .append_pair("state", state);

    Ok(url)
}

async fn wait_for_callback() -> MkMeetResult<(String, String)> {
    let listener = TcpListener::bind(redirect_address()).await.map_err(|e| {
        MkMeetError::Auth(format!(
            "failed to bind authorization callback listener on port {REDIRECT_PORT}: {e}"
        ))
    })?;

    let (stream, _) = listener.accept().await?;

    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    let (code, state) = parse_callback(&request_line)?;

    // Send a response to the browser
    let response = "HTTP/1.1 200 OK\r\n\
        Content-Type: text/html\r\n\
        Connection: close\r\n\
        \r\n\
        <html><body>\
        <h1>Authorization complete</h1>\
        <p>You can close this window and return to the terminal.</p>\
        </body></html>";

    let mut stream = reader.into_inner();
    stream.write_all(response.as_bytes()).await?;
    stream.flush().await?;

    Ok((code, state))
}

/// Pull code and state out of the redirect request line
/// (`GET /callback?code=xxx&state=yyy HTTP/1.1`).
fn parse_callback(request_line: &str) -> MkMeetResult<(String, String)> {
    let url_part = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| MkMeetError::Auth("invalid HTTP request on callback listener".to_string()))?;

    let url = Url::parse(&format!("http://localhost{url_part}"))
        .map_err(|e| MkMeetError::Auth(format!("invalid callback URL: {e}")))?;

    if let Some((_, reason)) = url.query_pairs().find(|(k, _)| k == "error") {
        return Err(MkMeetError::Auth(format!("authorization was denied: {reason}")));
    }

    let code = url
        .query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.to_string())
        .ok_or_else(|| MkMeetError::Auth("no authorization code in callback".to_string()))?;

    let state = url
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.to_string())
        .ok_or_else(|| MkMeetError::Auth("no state in callback".to_string()))?;

    Ok((code, state))
}

async fn exchange_code(client: &OAuthClient, code: &str) -> MkMeetResult<TokenResponse> {
    let redirect = redirect_uri();
    let params = [
        ("client_id", client.client_id.as_str()),
        ("client_secret", client.client_secret.as_str()),
        ("code", code),
        ("redirect_uri", redirect.as_str()),
        ("grant_type", "authorization_code"),
    ];

    debug!(token_uri = %client.token_uri, "exchanging authorization code");

    let response = reqwest::Client::new()
        .post(&client.token_uri)
        .form(&params)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "could not read error response".to_string());
        return Err(MkMeetError::Auth(format!(
            "token exchange failed (HTTP {status}): {body}"
        )));
    }

    response
        .json::<TokenResponse>()
        .await
        .map_err(|e| MkMeetError::MalformedResponse(format!("token response: {e}")))
}

/// Mint a new access token from the session's refresh token.
pub async fn refresh(client: &OAuthClient, session: &Session) -> MkMeetResult<Session> {
    let refresh_token = session
        .refresh_token
        .clone()
        .ok_or_else(|| MkMeetError::Auth("no refresh token in stored credential".to_string()))?;

    let params = [
        ("client_id", client.client_id.as_str()),
        ("client_secret", client.client_secret.as_str()),
        ("refresh_token", refresh_token.as_str()),
        ("grant_type", "refresh_token"),
    ];

    debug!(token_uri = %client.token_uri, "refreshing access token");

    let response = reqwest::Client::new()
        .post(&client.token_uri)
        .form(&params)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "could not read error response".to_string());
        return Err(MkMeetError::Auth(format!(
            "token refresh failed (HTTP {status}): {body}"
        )));
    }

    let tokens: TokenResponse = response
        .json()
        .await
        .map_err(|e| MkMeetError::MalformedResponse(format!("token response: {e}")))?;

    Ok(Session::from_token_response(tokens, Some(session)))
}
