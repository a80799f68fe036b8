//! The persisted OAuth session: the credential used to call the calendar API.

use crate::oauth::TokenResponse;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl Session {
    /// Build a session from a token endpoint response. Google omits the
    /// refresh token and scope on refresh, so those fall back to the
    /// previous session's values.
    pub fn from_token_response(tokens: TokenResponse, previous: Option<&Session>) -> Self {
        let expires_at = Utc::now() + Duration::seconds(tokens.expires_in);

        let refresh_token = tokens
            .refresh_token
            .or_else(|| previous.and_then(|s| s.refresh_token.clone()));

        let scopes = match tokens.scope {
            Some(scope) => scope.split_whitespace().map(str::to_string).collect(),
            None => previous.map(|s| s.scopes.clone()).unwrap_or_default(),
        };

        Session {
            access_token: tokens.access_token,
            refresh_token,
            expires_at,
            scopes,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    pub fn has_scopes(&self, required: &[&str]) -> bool {
        required
            .iter()
            .all(|scope| self.scopes.iter().any(|granted| granted == scope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_response(json: &str) -> TokenResponse {
        serde_json::from_str(json).unwrap()
    }

    // --- expiry ---

    #[test]
    fn fresh_token_is_not_expired() {
        let session = Session::from_token_response(
            token_response(r#"{"access_token": "t", "expires_in": 3600}"#),
            None,
        );
        assert!(!session.is_expired());
    }

    #[test]
    fn past_expiry_is_expired() {
        let session = Session {
            access_token: "t".into(),
            refresh_token: None,
            expires_at: Utc::now() - Duration::seconds(1),
            scopes: Vec::new(),
        };
        assert!(session.is_expired());
    }

    // --- from_token_response ---

    #[test]
    fn keeps_previous_refresh_token_when_response_omits_it() {
        let previous = Session {
            access_token: "old".into(),
            refresh_token: Some("keep-me".into()),
            expires_at: Utc::now(),
            scopes: vec!["a".into()],
        };
        let session = Session::from_token_response(
            token_response(r#"{"access_token": "new", "expires_in": 3600}"#),
            Some(&previous),
        );
        assert_eq!(session.access_token, "new");
        assert_eq!(session.refresh_token.as_deref(), Some("keep-me"));
        assert_eq!(session.scopes, vec!["a".to_string()]);
    }

    #[test]
    fn response_refresh_token_wins_over_previous() {
        let previous = Session {
            access_token: "old".into(),
            refresh_token: Some("stale".into()),
            expires_at: Utc::now(),
            scopes: Vec::new(),
        };
        let session = Session::from_token_response(
            token_response(r#"{"access_token": "new", "refresh_token": "fresh", "expires_in": 60}"#),
            Some(&previous),
        );
        assert_eq!(session.refresh_token.as_deref(), Some("fresh"));
    }

    #[test]
    fn splits_space_delimited_scope() {
        let session = Session::from_token_response(
            token_response(
                r#"{"access_token": "t", "expires_in": 60,
                    "scope": "https://www.googleapis.com/auth/calendar openid"}"#,
            ),
            None,
        );
        assert!(session.has_scopes(&["https://www.googleapis.com/auth/calendar"]));
        assert!(!session.has_scopes(&["https://www.googleapis.com/auth/drive"]));
    }

    #[test]
    fn missing_expires_in_defaults_to_an_hour() {
        let session =
            Session::from_token_response(token_response(r#"{"access_token": "t"}"#), None);
        assert!(!session.is_expired());
        assert!(session.expires_at <= Utc::now() + Duration::seconds(3600));
    }
}
