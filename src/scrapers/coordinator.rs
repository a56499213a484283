//! Fan-out/join for a full fetch cycle.
//!
//! One tokio task is spawned per enabled source; each returns its own
//! headline list and the lists are concatenated after every task has
//! finished. Nothing is shared between workers, so there is no lock to
//! contend on and no way for one worker to clobber another's output.
//!
//! A cycle takes as long as its slowest source, which is itself capped by the
//! fetcher's request timeout.

use crate::models::{Headline, SourceDescriptor};
use crate::scrapers::worker::Fetcher;
use futures::future::join_all;
use std::time::Instant;
use tracing::{error, info, instrument};

/// Fetch every source in parallel and return the combined headlines.
///
/// Sources contribute in the order given. A worker that fails or panics
/// contributes nothing; the cycle itself never fails.
#[instrument(level = "info", skip_all, fields(sources = sources.len()))]
pub async fn fetch_all(fetcher: &Fetcher, sources: Vec<SourceDescriptor>) -> Vec<Headline> {
    let t0 = Instant::now();

    let tasks: Vec<_> = sources
        .into_iter()
        .map(|source| {
            let fetcher = fetcher.clone();
            let name = source.name.clone();
            let handle = tokio::spawn(async move { fetcher.fetch_source(&source).await });
            (name, handle)
        })
        .collect();

    let (names, handles): (Vec<_>, Vec<_>) = tasks.into_iter().unzip();
    let results = join_all(handles).await;

    let mut headlines = Vec::new();
    for (name, result) in names.into_iter().zip(results) {
        match result {
            Ok(batch) => headlines.extend(batch),
            Err(e) => error!(source = %name, error = %e, "Fetch worker did not complete"),
        }
    }

    info!(
        count = headlines.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Fetch cycle complete"
    );
    headlines
}
