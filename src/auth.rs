//! Credential lifecycle: load a stored session, refresh it, or run the
//! interactive authorization flow, then persist the result.

use crate::config::OAuthClient;
use crate::error::MkMeetResult;
use crate::oauth::{self, Authorizer, SCOPES};
use crate::session::Session;
use crate::store::TokenStore;
use tracing::{debug, info, warn};

/// Produce a session that is non-expired and carries the calendar scope.
///
/// Order of preference: the stored session as-is, the stored session
/// refreshed in place, a brand-new session from the authorizer. The store
/// is only written after a refresh or a new authorization.
pub async fn obtain_credential<S, A>(
    client: &OAuthClient,
    store: &S,
    authorizer: &A,
) -> MkMeetResult<Session>
where
    S: TokenStore,
    A: Authorizer,
{
    if let Some(session) = store.load()? {
        let scoped = session.has_scopes(SCOPES);

        if scoped && !session.is_expired() {
            debug!("using stored access token");
            return Ok(session);
        }

        if scoped && session.refresh_token.is_some() {
            info!("access token expired, refreshing");
            match oauth::refresh(client, &session).await {
                Ok(refreshed) => {
                    store.save(&refreshed)?;
                    return Ok(refreshed);
                }
                Err(err) => {
                    warn!("token refresh failed, re-authorizing interactively: {err}");
                }
            }
        }
    }

    let session = authorizer.authorize(client).await?;
    store.save(&session)?;
    Ok(session)
}
