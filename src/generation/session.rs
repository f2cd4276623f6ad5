//! Last-query-wins sessions.
//!
//! A user typing a new query while the previous one is still generating only
//! cares about the newest result. Each submission takes a ticket; a finished
//! generation whose ticket is no longer the latest is dropped.

use super::{Generation, LayoutGenerator};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

pub struct QuerySession {
    generator: Arc<LayoutGenerator>,
    latest: AtomicU64,
}

impl QuerySession {
    pub fn new(generator: Arc<LayoutGenerator>) -> Self {
        Self {
            generator,
            latest: AtomicU64::new(0),
        }
    }

    /// Returns `None` when a newer query was submitted before this one finished.
    pub async fn submit(&self, query: &str) -> Option<Generation> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = self.generator.generate(query).await;

        let current = self.latest.load(Ordering::SeqCst);
        if current == ticket {
            Some(generation)
        } else {
            debug!(
                ticket = ticket,
                current = current,
                generation_id = %generation.id,
                "Discarding superseded generation"
            );
            None
        }
    }

    /// Makes any in-flight result stale without starting a new query.
    pub fn cancel(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    pub fn submitted(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}
