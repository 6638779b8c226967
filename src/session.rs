// src/session.rs
// =============================================================================
// This module runs fetch + extract as cancellable operations.
//
// Two ways to use it:
// - harvest(): one operation, driven directly by the caller
// - Session: a long-lived handle for callers that keep starting new
//   operations (a UI, the interactive CLI mode)
//
// Session rules:
// - At most one operation is active
// - Starting a new one cancels the previous one immediately
// - Every operation gets a bigger id than the last one
// - Outcomes only hands back results for the newest operation; anything
//   older that arrives late is dropped, so it can never overwrite a newer
//   result
// - Explicit cancel() keeps the operation current, so its Cancelled
//   outcome is still delivered (the caller shows "aborted")
//
// Rust concepts:
// - tokio::spawn: run each operation as its own task
// - mpsc channel: tasks send their outcome back to the caller
// - Arc<AtomicU64>: the "latest id" shared between Session and Outcomes
// =============================================================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::extract::{extract, LinkSet};
use crate::fetch::{FetchError, Fetcher};
use crate::target::TargetUrl;

// Everything one successful operation produces
#[derive(Debug, Clone, Serialize)]
pub struct Harvest {
    pub url: TargetUrl,
    pub html: String,
    pub links: LinkSet,
}

// Fetches `url` and extracts its links
//
// If `cancel` fires before extraction starts, the result is Cancelled;
// a cancelled operation never yields a partial Harvest.
pub async fn harvest(
    fetcher: &Fetcher,
    url: &TargetUrl,
    cancel: &CancellationToken,
) -> Result<Harvest, FetchError> {
    let html = fetcher.fetch(url, cancel).await?;

    if cancel.is_cancelled() {
        return Err(FetchError::Cancelled);
    }

    let links = extract(&html, url);
    debug!(url = %url, links = links.len(), "extracted links");

    Ok(Harvest {
        url: url.clone(),
        html,
        links,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct OperationId(u64);

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// The result of one operation, tagged with the id it was started under
#[derive(Debug)]
pub struct Outcome {
    pub id: OperationId,
    pub url: TargetUrl,
    pub result: Result<Harvest, FetchError>,
}

struct ActiveOperation {
    id: OperationId,
    cancel: CancellationToken,
}

pub struct Session {
    fetcher: Fetcher,
    latest: Arc<AtomicU64>,
    active: Option<ActiveOperation>,
    sender: mpsc::UnboundedSender<Outcome>,
}

// Receiving side of a Session
pub struct Outcomes {
    latest: Arc<AtomicU64>,
    receiver: mpsc::UnboundedReceiver<Outcome>,
}

impl Session {
    pub fn new(fetcher: Fetcher) -> (Session, Outcomes) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let latest = Arc::new(AtomicU64::new(0));

        let session = Session {
            fetcher,
            latest: Arc::clone(&latest),
            active: None,
            sender,
        };
        let outcomes = Outcomes { latest, receiver };

        (session, outcomes)
    }

    // Starts a new operation, cancelling whatever was running before
    //
    // Must be called from inside a tokio runtime.
    pub fn start(&mut self, url: TargetUrl) -> OperationId {
        if let Some(previous) = self.active.take() {
            debug!(operation = %previous.id, "superseded by a new operation");
            previous.cancel.cancel();
        }

        let id = OperationId(self.latest.fetch_add(1, Ordering::SeqCst) + 1);
        let cancel = CancellationToken::new();

        let fetcher = self.fetcher.clone();
        let sender = self.sender.clone();
        let token = cancel.clone();
        tokio::spawn(async move {
            let result = harvest(&fetcher, &url, &token).await;
            // The receiver only goes away when the caller is shutting down
            let _ = sender.send(Outcome { id, url, result });
        });

        debug!(operation = %id, "operation started");
        self.active = Some(ActiveOperation { id, cancel });
        id
    }

    // Cancels the active operation, if any, and returns its id
    pub fn cancel(&mut self) -> Option<OperationId> {
        let active = self.active.as_ref()?;
        active.cancel.cancel();
        Some(active.id)
    }

    // The newest started operation, unless its outcome has been taken
    // via Session::finish or there never was one
    pub fn active(&self) -> Option<OperationId> {
        self.active.as_ref().map(|op| op.id)
    }

    // Marks `id` as done so active() stops reporting it
    pub fn finish(&mut self, id: OperationId) {
        if self.active() == Some(id) {
            self.active = None;
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
        }
    }
}

impl Outcomes {
    // Waits for the next outcome that belongs to the newest operation
    //
    // Outcomes of superseded operations are discarded here. Returns None
    // once the Session is dropped and every task has finished.
    pub async fn next(&mut self) -> Option<Outcome> {
        while let Some(outcome) = self.receiver.recv().await {
            let latest = OperationId(self.latest.load(Ordering::SeqCst));
            if outcome.id == latest {
                return Some(outcome);
            }
            debug!(operation = %outcome.id, latest = %latest, "discarding stale outcome");
        }
        None
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why split Session and Outcomes?
//    - Starting operations needs &mut Session
//    - Waiting for results needs &mut Outcomes
//    - Keeping them separate lets a tokio::select! loop wait on results
//      and still start/cancel operations in its other branches
//
// 2. What is a CancellationToken?
//    - A shared flag plus a future that completes when the flag is set
//    - clone() gives another handle to the SAME flag
//    - The Fetcher races it against the network with tokio::select!
//
// 3. Why check the id in Outcomes::next instead of only cancelling?
//    - A task might finish just before it is cancelled
//    - Its result is then already in the channel
//    - Comparing ids catches that case too
// -----------------------------------------------------------------------------
