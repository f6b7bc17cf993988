//! Command-line front end: accepts a delimited URL file, runs one scraping
//! session, and prints the wire-format event stream to stdout.

mod chrome;

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use jobscout_core::parse_url_batch;
use jobscout_engine::{EventBroadcaster, Session, SessionRegistry, SessionSettings};
use scout_logging::{scout_info, scout_warn};

use crate::chrome::ChromeProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    scout_logging::initialize(Some(Path::new("./jobscout.log")));

    let path = std::env::args()
        .nth(1)
        .context("usage: jobscout_app <url-file>")?;
    let raw = std::fs::read_to_string(&path).with_context(|| format!("cannot read {path}"))?;

    let batch = parse_url_batch(&raw);
    if batch.dropped_rows > 0 {
        scout_warn!("{} rows without a usable URL were dropped", batch.dropped_rows);
    }
    if batch.is_empty() {
        bail!("no valid links found in {path}");
    }

    let registry = Arc::new(SessionRegistry::new());
    let broadcaster = Arc::new(EventBroadcaster::new());

    let mut events = broadcaster.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(err) => scout_warn!("event serialization failed: {err}"),
            }
        }
    });

    let session = Session::new(
        registry.clone(),
        broadcaster.clone(),
        SessionSettings::default(),
    );
    let session_id = session.id().clone();
    scout_info!(
        "accepted {} URLs as session {session_id}",
        batch.urls.len()
    );

    // Ctrl-C takes the same stop path a connected observer would use.
    {
        let registry = registry.clone();
        let session_id = session_id.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                scout_info!("stop requested for session {session_id}");
                registry.request_stop(&session_id);
            }
        });
    }

    let provider = ChromeProvider::default();
    let summary = session.run(&provider, batch.urls).await?;
    scout_info!(
        "session {session_id} finished: {} of {} rows emitted",
        summary.completed,
        summary.total
    );

    drop(broadcaster);
    let _ = printer.await;
    Ok(())
}
