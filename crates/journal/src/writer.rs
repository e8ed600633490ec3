// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-writer front end for a [`JournalStore`], per spec §4.1: appends
//! are serialized through one task so the hash chain never forks, and a
//! full queue signals backpressure to callers as [`JournalError::Busy`]
//! rather than blocking indefinitely.

use std::sync::Arc;
use std::time::Duration;

use grace_core::Event;
use tokio::sync::{mpsc, oneshot};

use crate::entry::JournalEntry;
use crate::error::JournalError;
use crate::store::JournalStore;

const SUBMIT_RETRIES: u32 = 3;
const SUBMIT_RETRY_DELAY: Duration = Duration::from_millis(5);

struct WriteRequest {
    payload: Event,
    reply: oneshot::Sender<Result<JournalEntry, JournalError>>,
}

/// Handle for submitting appends to the background writer task.
///
/// Cloning and sharing this handle is the intended way to give multiple
/// callers (the mesh, the governance gate, the control plane) access to the
/// same journal without each holding its own lock over the store.
#[derive(Clone)]
pub struct JournalWriter {
    tx: mpsc::Sender<WriteRequest>,
}

impl JournalWriter {
    /// Spawn the writer task over `store` with a bounded request queue of
    /// `queue_capacity`. Returns the handle; the task runs until the handle
    /// (and all its clones) are dropped.
    pub fn spawn(store: Arc<dyn JournalStore>, queue_capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<WriteRequest>(queue_capacity);

        tokio::spawn(async move {
            while let Some(request) = rx.recv().await {
                let result = store.append(request.payload).await;
                let _ = request.reply.send(result);
            }
        });

        Self { tx }
    }

    /// Submit `payload` for append, retrying briefly against a full queue
    /// before giving up with [`JournalError::Busy`].
    pub async fn submit(&self, payload: Event) -> Result<JournalEntry, JournalError> {
        let mut retries = 0;

        loop {
            let (reply_tx, reply_rx) = oneshot::channel();
            match self.tx.try_send(WriteRequest { payload: payload.clone(), reply: reply_tx }) {
                Ok(()) => {
                    return reply_rx.await.map_err(|_| JournalError::WriterGone)?;
                }
                Err(mpsc::error::TrySendError::Full(_)) => {
                    if retries >= SUBMIT_RETRIES {
                        return Err(JournalError::Busy { retries });
                    }
                    retries += 1;
                    tokio::time::sleep(SUBMIT_RETRY_DELAY).await;
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    return Err(JournalError::WriterGone);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
