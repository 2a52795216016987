//! # Undo/Redo Stack
//!
//! Tracks command history and enables undo/redo operations.
//!
//! ## Design
//!
//! - Commands are executed by the caller, then recorded here
//! - Undo replays each command's `undo` in recorded order and moves the entry
//!   to the redo stack
//! - Redo replays each command's `execute` in recorded order
//! - New entries clear the redo stack
//! - Supports batched operations (group multiple commands as one undo step)
//! - A command that fails during replay is logged and skipped; the rest of its
//!   entry still runs and the entry still changes stacks
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//!
//! let mut cmd = MoveCommand::new("root", 0, 2);
//! cmd.execute(&mut canvas)?;
//! stack.record(Box::new(cmd));
//!
//! stack.undo(&mut canvas);
//! stack.redo(&mut canvas);
//! ```

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::canvas::Canvas;
use crate::command::{Change, Command};

/// Default maximum number of undo levels
pub const DEFAULT_MAX_UNDO_LEVELS: usize = 100;

/// A group of commands undone/redone together
#[derive(Debug)]
pub struct UndoEntry {
    label: String,
    commands: Vec<Box<dyn Command>>,
}

impl UndoEntry {
    pub fn new(label: impl Into<String>, commands: Vec<Box<dyn Command>>) -> Self {
        Self {
            label: label.into(),
            commands,
        }
    }

    pub fn single(command: Box<dyn Command>) -> Self {
        Self::new(command.label().to_string(), vec![command])
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Replay {
    Undo,
    Redo,
}

/// Undo/redo stack for canvas editing
#[derive(Debug)]
pub struct UndoStack {
    /// Applied entries (most recent last)
    undo_stack: VecDeque<UndoEntry>,

    /// Undone entries (most recent last)
    redo_stack: Vec<UndoEntry>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Currently building a batch
    current_batch: Option<UndoEntry>,

    /// Set while an entry is being replayed
    executing: bool,

    replay_failures: usize,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_MAX_UNDO_LEVELS)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
            executing: false,
            replay_failures: 0,
        }
    }

    /// Record an executed command.
    ///
    /// Joins the open batch if there is one, otherwise becomes its own entry.
    /// Ignored while an entry is being replayed.
    pub fn record(&mut self, command: Box<dyn Command>) {
        if self.executing {
            debug!(label = command.label(), "ignoring record during replay");
            return;
        }

        match &mut self.current_batch {
            Some(batch) => batch.commands.push(command),
            None => self.push_entry(UndoEntry::single(command)),
        }
    }

    /// Record several executed commands as one entry
    pub fn record_batch(&mut self, label: impl Into<String>, commands: Vec<Box<dyn Command>>) {
        if self.executing {
            debug!("ignoring batch record during replay");
            return;
        }
        if commands.is_empty() {
            return;
        }

        match &mut self.current_batch {
            Some(batch) => batch.commands.extend(commands),
            None => self.push_entry(UndoEntry::new(label, commands)),
        }
    }

    /// Start a batch of commands (will be undone/redone together)
    pub fn begin_batch(&mut self, label: impl Into<String>) {
        self.end_batch();
        self.current_batch = Some(UndoEntry::new(label, Vec::new()));
    }

    /// End the current batch and push it to the undo stack
    pub fn end_batch(&mut self) {
        if let Some(batch) = self.current_batch.take() {
            if !batch.is_empty() {
                self.push_entry(batch);
            }
        }
    }

    pub fn is_batching(&self) -> bool {
        self.current_batch.is_some()
    }

    fn push_entry(&mut self, entry: UndoEntry) {
        debug!(label = entry.label(), commands = entry.len(), "recorded undo entry");
        self.undo_stack.push_back(entry);

        if self.max_levels > 0 {
            while self.undo_stack.len() > self.max_levels {
                self.undo_stack.pop_front();
            }
        }

        self.redo_stack.clear();
    }

    /// Undo the most recent entry. Returns false if there was nothing to undo.
    pub fn undo(&mut self, canvas: &mut Canvas) -> bool {
        self.undo_into(canvas, &mut Vec::new())
    }

    /// Redo the most recently undone entry. Returns false if there was nothing to redo.
    pub fn redo(&mut self, canvas: &mut Canvas) -> bool {
        self.redo_into(canvas, &mut Vec::new())
    }

    /// Like [`undo`](Self::undo), collecting the changes of every command that applied
    pub fn undo_into(&mut self, canvas: &mut Canvas, changes: &mut Vec<Change>) -> bool {
        self.end_batch();
        let Some(mut entry) = self.undo_stack.pop_back() else {
            return false;
        };

        self.replay(&mut entry, canvas, Replay::Undo, changes);
        self.redo_stack.push(entry);
        true
    }

    pub fn redo_into(&mut self, canvas: &mut Canvas, changes: &mut Vec<Change>) -> bool {
        self.end_batch();
        let Some(mut entry) = self.redo_stack.pop() else {
            return false;
        };

        self.replay(&mut entry, canvas, Replay::Redo, changes);
        self.undo_stack.push_back(entry);
        true
    }

    fn replay(
        &mut self,
        entry: &mut UndoEntry,
        canvas: &mut Canvas,
        direction: Replay,
        changes: &mut Vec<Change>,
    ) {
        self.executing = true;

        for command in entry.commands.iter_mut() {
            let result = match direction {
                Replay::Undo => command.undo(canvas),
                Replay::Redo => command.execute(canvas),
            };
            match result {
                Ok(change) => changes.push(change),
                Err(e) => {
                    self.replay_failures += 1;
                    warn!(
                        entry = %entry.label,
                        command = command.label(),
                        ?direction,
                        error = %e,
                        "command failed during replay"
                    );
                }
            }
        }

        self.executing = false;
        debug!(label = %entry.label, ?direction, "replayed undo entry");
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Whether an entry is being replayed right now
    pub fn is_executing(&self) -> bool {
        self.executing
    }

    /// Number of commands that failed during undo/redo replay so far
    pub fn replay_failures(&self) -> usize {
        self.replay_failures
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Label of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(UndoEntry::label)
    }

    /// Label of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(UndoEntry::label)
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
