//! Linear undo/redo history over full document snapshots.

/// Default maximum number of snapshots kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// Snapshot history with a cursor.
///
/// The visible state is always `snapshots[cursor]`, and `0 <= cursor < len`
/// holds at all times. Pushing truncates everything after the cursor
/// (no branching).
#[derive(Debug, Clone)]
pub struct History<T> {
    snapshots: Vec<T>,
    cursor: usize,
    limit: Option<usize>,
}

impl<T: Default> Default for History<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> History<T> {
    /// Create a history holding a single initial snapshot.
    pub fn new(initial: T) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
            limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }

    /// Set the maximum number of snapshots kept (`None` = unbounded).
    ///
    /// A limit below 1 is treated as 1.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit.map(|l| l.max(1));
        self.enforce_limit();
        self
    }

    /// The current snapshot.
    pub fn current(&self) -> &T {
        &self.snapshots[self.cursor]
    }

    /// Cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of snapshots held.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false: a history holds at least one snapshot.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Record a new snapshot: drop the redo tail, append, advance the cursor.
    pub fn push(&mut self, snapshot: T) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        self.cursor = self.snapshots.len() - 1;
        self.enforce_limit();
        self.check_invariants();
    }

    /// Step back. Returns the new current snapshot, or `None` at the start.
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.check_invariants();
        Some(self.current())
    }

    /// Step forward. Returns the new current snapshot, or `None` at the end.
    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.check_invariants();
        Some(self.current())
    }

    /// Replace the whole history with a single snapshot (document load).
    ///
    /// This is not an undo step.
    pub fn replace(&mut self, snapshot: T) {
        self.snapshots.clear();
        self.snapshots.push(snapshot);
        self.cursor = 0;
    }

    fn enforce_limit(&mut self) {
        let Some(limit) = self.limit else { return };
        if self.snapshots.len() > limit {
            let excess = self.snapshots.len() - limit;
            self.snapshots.drain(..excess);
            self.cursor = self.cursor.saturating_sub(excess);
        }
    }

    fn check_invariants(&self) {
        debug_assert!(!self.snapshots.is_empty(), "history must hold a snapshot");
        debug_assert!(
            self.cursor < self.snapshots.len(),
            "history cursor {} out of bounds ({})",
            self.cursor,
            self.snapshots.len()
        );
    }
}
