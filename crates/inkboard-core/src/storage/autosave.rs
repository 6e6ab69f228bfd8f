//! Debounced autosave.
//!
//! Every committed change reschedules a single pending save; it is issued
//! only after a quiet period. Issued saves carry increasing sequence
//! numbers, and a completion older than the newest completed one is ignored
//! so the last committed state always wins.
//!
//! Time is passed in explicitly as milliseconds from any monotonic clock.

use super::StorageResult;
use crate::canvas::CanvasDocument;

/// Default quiet period before an autosave fires.
pub const DEFAULT_DEBOUNCE_MS: u64 = 2000;

/// Non-blocking save indicator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatus {
    /// Nothing to save.
    #[default]
    Idle,
    /// A save is scheduled and waiting for the quiet period.
    Pending,
    /// A save has been issued and has not completed.
    Saving,
    /// The latest issued save succeeded.
    Saved,
    /// The latest issued save failed.
    Failed(String),
}

impl SaveStatus {
    /// Short label for a status indicator.
    pub fn label(&self) -> &str {
        match self {
            SaveStatus::Idle => "",
            SaveStatus::Pending => "Unsaved changes",
            SaveStatus::Saving => "Saving...",
            SaveStatus::Saved => "Saved",
            SaveStatus::Failed(_) => "Saving failed",
        }
    }
}

/// A save handed out to the caller for execution.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedSave {
    pub seq: u64,
    pub document: CanvasDocument,
}

#[derive(Debug, Clone)]
struct PendingSave {
    due_at: u64,
    document: CanvasDocument,
}

/// Debounce and ordering state for document saves.
#[derive(Debug, Clone)]
pub struct AutoSaveManager {
    debounce_ms: u64,
    pending: Option<PendingSave>,
    last_issued: u64,
    last_completed: u64,
    status: SaveStatus,
}

impl Default for AutoSaveManager {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

impl AutoSaveManager {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            debounce_ms,
            pending: None,
            last_issued: 0,
            last_completed: 0,
            status: SaveStatus::Idle,
        }
    }

    pub fn debounce_ms(&self) -> u64 {
        self.debounce_ms
    }

    pub fn status(&self) -> &SaveStatus {
        &self.status
    }

    /// Whether a save is waiting for its quiet period.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending save becomes due.
    pub fn due_at(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.due_at)
    }

    /// Schedule `document` for saving, replacing any pending save and
    /// restarting the quiet period.
    pub fn schedule(&mut self, document: CanvasDocument, now_ms: u64) {
        if self.pending.is_some() {
            log::trace!("autosave rescheduled");
        }
        self.pending = Some(PendingSave {
            due_at: now_ms.saturating_add(self.debounce_ms),
            document,
        });
        self.status = SaveStatus::Pending;
    }

    /// Drop any pending save.
    pub fn cancel(&mut self) {
        self.pending = None;
        if self.status == SaveStatus::Pending {
            self.status = SaveStatus::Idle;
        }
    }

    /// Issue the pending save if its quiet period has elapsed.
    pub fn take_due(&mut self, now_ms: u64) -> Option<IssuedSave> {
        if self.pending.as_ref()?.due_at > now_ms {
            return None;
        }
        let pending = self.pending.take()?;
        Some(self.issue(pending.document))
    }

    /// Issue a save of `document` immediately (manual save, title commit).
    ///
    /// Supersedes any pending save since `document` is at least as new.
    pub fn issue_now(&mut self, document: CanvasDocument) -> IssuedSave {
        self.pending = None;
        self.issue(document)
    }

    fn issue(&mut self, document: CanvasDocument) -> IssuedSave {
        self.last_issued += 1;
        self.status = SaveStatus::Saving;
        log::debug!("issuing save #{} of document {}", self.last_issued, document.id);
        IssuedSave {
            seq: self.last_issued,
            document,
        }
    }

    /// Record the outcome of an issued save.
    ///
    /// Returns false when the completion is stale (an equal or newer save has
    /// already completed) and was ignored.
    pub fn complete(&mut self, seq: u64, result: &StorageResult<()>) -> bool {
        debug_assert!(seq <= self.last_issued, "completion for unissued save #{seq}");
        if seq <= self.last_completed {
            log::debug!(
                "dropping stale save completion #{seq} (latest #{})",
                self.last_completed
            );
            return false;
        }
        self.last_completed = seq;

        match result {
            Ok(()) => log::debug!("save #{seq} completed"),
            Err(e) => log::warn!("save #{seq} failed: {e}"),
        }

        self.status = if self.pending.is_some() {
            SaveStatus::Pending
        } else if seq < self.last_issued {
            SaveStatus::Saving
        } else {
            match result {
                Ok(()) => SaveStatus::Saved,
                Err(e) => SaveStatus::Failed(e.to_string()),
            }
        };
        true
    }

    /// Mark a failure outside the save path (e.g. a failed load).
    pub fn set_failed(&mut self, message: impl Into<String>) {
        self.status = SaveStatus::Failed(message.into());
    }
}
