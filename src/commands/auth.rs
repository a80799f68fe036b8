use anyhow::Result;

use crate::config;
use crate::oauth::{Authorizer, InstalledFlow};
use crate::store::{FileTokenStore, TokenStore};

/// Run the interactive authorization flow even if a stored session exists,
/// and persist the fresh token.
pub async fn run() -> Result<()> {
    let client = config::load()?;

    println!("Authorizing with Google Calendar...");

    let session = InstalledFlow.authorize(&client).await?;

    let store = FileTokenStore::default();
    store.save(&session)?;

    println!("Authorization complete. Token saved to {}.", store.path().display());
    println!("\nRun `mkmeet new` to create an event.");

    Ok(())
}
