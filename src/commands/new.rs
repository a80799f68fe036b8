use anyhow::Result;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use crate::auth;
use crate::config;
use crate::event::{self, EventRequest};
use crate::google;
use crate::oauth::InstalledFlow;
use crate::store::FileTokenStore;

pub async fn run(
    summary: Option<String>,
    start: Option<String>,
    end: Option<String>,
    attendees: Option<String>,
    no_meet: bool,
) -> Result<()> {
    let client = config::load()?;
    let store = FileTokenStore::default();
    let session = auth::obtain_credential(&client, &store, &InstalledFlow).await?;

    // --- Summary ---
    let summary = match summary {
        Some(s) => s,
        None => Input::<String>::new()
            .with_prompt("Enter event summary")
            .interact_text()?,
    };

    // --- Start / End ---
    let start_input = match start {
        Some(s) => s,
        None => Input::<String>::new()
            .with_prompt("Enter event start time (YYYY-MM-DD HH:MM:SS)")
            .interact_text()?,
    };
    let end_input = match end {
        Some(e) => e,
        None => Input::<String>::new()
            .with_prompt("Enter event end time (YYYY-MM-DD HH:MM:SS)")
            .interact_text()?,
    };

    let start = event::parse_datetime(&start_input)?;
    let end = event::parse_datetime(&end_input)?;

    // --- Attendees ---
    let attendees_input = match attendees {
        Some(a) => a,
        None => Input::<String>::new()
            .with_prompt("Enter attendee emails separated by commas (optional)")
            .default(String::new())
            .show_default(false)
            .interact_text()?,
    };
    let attendees = event::parse_attendees(&attendees_input);

    let request = EventRequest {
        summary,
        start,
        end,
        attendees,
        with_meet: !no_meet,
    };

    let spinner = spinner("Creating event...");
    let result = google::submit(&session, &request).await;
    spinner.finish_and_clear();
    let result = result?;

    println!("{}", format!("Event created: {}", result.event_link).green());
    if request.with_meet {
        println!("{}", format!("Google Meet link: {}", result.meet_link).green());
    }

    Ok(())
}

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap(),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}
