//! OAuth client configuration.
//!
//! The client id/secret pair created in the Google Cloud console, read from
//! `credentials.json` in the working directory. The file is the unmodified
//! JSON the console exports for a desktop ("installed") OAuth client.

use crate::error::{MkMeetError, MkMeetResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CREDENTIALS_FILE: &str = "credentials.json";

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthClient {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The shape the console exports: client details nested under an
/// "installed" (desktop app) or "web" key.
#[derive(Debug, Deserialize)]
struct ClientSecrets {
    #[serde(default)]
    installed: Option<OAuthClient>,
    #[serde(default)]
    web: Option<OAuthClient>,
}

pub fn load() -> MkMeetResult<OAuthClient> {
    load_from(Path::new(CREDENTIALS_FILE))
}

fn load_from(path: &Path) -> MkMeetResult<OAuthClient> {
    if !path.exists() {
        return Err(MkMeetError::Config(format!(
            "OAuth client configuration not found.\n\n\
            Create an OAuth client of type \"Desktop app\" at\n\
            https://console.cloud.google.com/apis/credentials\n\
            and save the downloaded JSON as {}.",
            path.display()
        )));
    }

    let contents = std::fs::read_to_string(path)?;

    let secrets: ClientSecrets = serde_json::from_str(&contents)
        .map_err(|e| MkMeetError::Config(format!("failed to parse {}: {}", path.display(), e)))?;

    secrets.installed.or(secrets.web).ok_or_else(|| {
        MkMeetError::Config(format!(
            "{} contains neither an \"installed\" nor a \"web\" client",
            path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_credentials(dir: &Path, contents: &str) -> std::path::PathBuf {
        let path = dir.join("credentials.json");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn parses_installed_client() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_credentials(
            dir.path(),
            r#"{
                "installed": {
                    "client_id": "abc.apps.googleusercontent.com",
                    "client_secret": "shh",
                    "project_id": "mkmeet-test",
                    "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                    "token_uri": "https://oauth2.googleapis.com/token",
                    "redirect_uris": ["http://localhost"]
                }
            }"#,
        );

        let client = load_from(&path).unwrap();
        assert_eq!(client.client_id, "abc.apps.googleusercontent.com");
        assert_eq!(client.client_secret, "shh");
        assert_eq!(client.token_uri, "https://oauth2.googleapis.com/token");
    }

    #[test]
    fn fills_default_endpoints_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_credentials(
            dir.path(),
            r#"{"installed": {"client_id": "id", "client_secret": "secret"}}"#,
        );

        let client = load_from(&path).unwrap();
        assert_eq!(client.auth_uri, DEFAULT_AUTH_URI);
        assert_eq!(client.token_uri, DEFAULT_TOKEN_URI);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_from(&dir.path().join("credentials.json"));
        assert!(matches!(result, Err(MkMeetError::Config(_))));
    }

    #[test]
    fn rejects_file_without_a_client() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_credentials(dir.path(), r#"{"something_else": {}}"#);
        assert!(matches!(load_from(&path), Err(MkMeetError::Config(_))));
    }
}
