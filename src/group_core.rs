use crate::config::GroupConfig;
use crate::text_store::{Commit, EditBuffer};
use crate::TextError;
#[allow(unused_imports)]
use log::{debug, trace};
use std::fmt::{Debug, Formatter};

/// Observer for text changes.
///
/// Registered with the [GroupCore], which forwards every
/// user edit exactly once. The edits the core does itself
/// are not forwarded.
pub trait EditObserver {
    /// Called before the text changes.
    ///
    /// `count` chars starting at `start` are about to be replaced
    /// by `after` new chars.
    fn before_change(&mut self, text: &str, start: usize, count: usize, after: usize) {
        _ = (text, start, count, after);
    }

    /// Called after the host committed the change, before
    /// the delimiters are fixed.
    ///
    /// `before` chars starting at `start` have been replaced
    /// by `count` new chars.
    fn changed(&mut self, text: &str, start: usize, before: usize, count: usize) {
        _ = (text, start, before, count);
    }

    /// Called with the final grouped text.
    fn after_change(&mut self, text: &str) {
        _ = text;
    }
}

/// Handle for a registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u32);

/// Current phase of the core.
///
/// [GroupCore::after_change] holds `&mut` borrows of the core and
/// the buffer while it rewrites. Neither the buffer nor an observer
/// can reach the core in the `SelfRewriting` phase, the borrow rules
/// enforce the guard. From the outside the phase is always `Idle`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    /// Waiting for the next edit.
    #[default]
    Idle,
    /// The core is rewriting the buffer. Change notifications
    /// caused by this are ignored.
    SelfRewriting,
}

/// Keeps a text grouped with a delimiter.
///
/// The host calls
/// * [before_change](GroupCore::before_change) before an edit,
/// * [changed](GroupCore::changed) after the edit has been applied,
/// * [after_change](GroupCore::after_change) with the buffer.
///   This rewrites the buffer.
///
/// Registered observers get the same notifications, in
/// the order they were registered. Their `after_change` sees the
/// rewritten text.
pub struct GroupCore {
    config: GroupConfig,
    phase: EditPhase,
    // Backspace deleted a delimiter. This is the position of
    // the char before the delimiter, which goes too.
    backspace_before_delimiter_at: Option<usize>,

    observers: Vec<(ObserverId, Box<dyn EditObserver>)>,
    next_id: u32,
}

impl Debug for GroupCore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupCore")
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field(
                "backspace_before_delimiter_at",
                &self.backspace_before_delimiter_at,
            )
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for GroupCore {
    fn default() -> Self {
        Self::new(GroupConfig::default())
    }
}

impl GroupCore {
    pub fn new(config: GroupConfig) -> Self {
        debug!(
            "GroupCore: delimiter = {:?}, group_len = {}",
            config.delimiter(),
            config.group_len()
        );
        Self {
            config,
            phase: Default::default(),
            backspace_before_delimiter_at: None,
            observers: Vec::new(),
            next_id: 0,
        }
    }

    /// Configuration
    #[inline]
    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> EditPhase {
        self.phase
    }

    /// Position of the char that will be removed with the next
    /// [after_change](GroupCore::after_change), because the current edit
    /// deletes the delimiter after it.
    #[inline]
    pub fn backspace_before_delimiter_at(&self) -> Option<usize> {
        self.backspace_before_delimiter_at
    }

    /// Is this the delimiter?
    #[inline]
    pub fn is_delimiter(&self, c: char) -> bool {
        c == self.config.delimiter()
    }
}

impl GroupCore {
    /// Add an observer. Observers are called in the order they
    /// are added, always after the core has done its work.
    pub fn subscribe(&mut self, observer: Box<dyn EditObserver>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove an observer.
    pub fn unsubscribe(&mut self, id: ObserverId) -> Option<Box<dyn EditObserver>> {
        let idx = self.observers.iter().position(|(v, _)| *v == id)?;
        Some(self.observers.remove(idx).1)
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl GroupCore {
    /// The host is about to replace `count` chars starting at `start`
    /// with `after` new chars. `text` is the current content.
    pub fn before_change(&mut self, text: &str, start: usize, count: usize, after: usize) {
        if self.phase == EditPhase::SelfRewriting {
            return;
        }

        debug!(
            "before_change: text = {:?}, start = {}, count = {}, after = {}",
            text, start, count, after
        );

        self.backspace_before_delimiter_at = if count == 1
            && after == 0
            && text.chars().nth(start) == Some(self.config.delimiter())
        {
            start.checked_sub(1)
        } else {
            None
        };

        for (_, o) in self.observers.iter_mut() {
            o.before_change(text, start, count, after);
        }
    }

    /// The host has replaced `before` chars starting at `start`
    /// with `count` new chars. `text` is the new content.
    pub fn changed(&mut self, text: &str, start: usize, before: usize, count: usize) {
        if self.phase == EditPhase::SelfRewriting {
            return;
        }

        debug!(
            "changed: text = {:?}, start = {}, before = {}, count = {}",
            text, start, before, count
        );

        for (_, o) in self.observers.iter_mut() {
            o.changed(text, start, before, count);
        }
    }

    /// The edit is complete. Rewrites the buffer and notifies
    /// the observers with the result.
    pub fn after_change<B: EditBuffer + ?Sized>(&mut self, buf: &mut B) -> Result<(), TextError> {
        if self.phase == EditPhase::SelfRewriting {
            return Ok(());
        }

        self.phase = EditPhase::SelfRewriting;
        let r = self.normalize(buf);
        self.phase = EditPhase::Idle;
        r?;

        if !self.observers.is_empty() {
            let text = buf.string();
            debug!("after_change: text = {:?}", text);
            for (_, o) in self.observers.iter_mut() {
                o.after_change(&text);
            }
        }

        Ok(())
    }

    /// Rewrite the buffer.
    ///
    /// Removes all delimiters and inserts them again at every
    /// group boundary. Consumes the pending backspace position.
    ///
    /// Normalizing an already grouped text doesn't change it.
    pub fn normalize<B: EditBuffer + ?Sized>(&mut self, buf: &mut B) -> Result<(), TextError> {
        let delimiter = self.config.delimiter();
        let group_len = self.config.group_len();
        let pull = self.backspace_before_delimiter_at.take();

        // strip, back to front keeps the remaining indexes valid.
        for i in (0..buf.len()).rev() {
            if buf.char_at(i) == Some(delimiter) {
                buf.remove(i..i + 1)?;
            }
            if pull == Some(i) && i < buf.len() {
                buf.remove(i..i + 1)?;
            }
        }
        trace!("normalize: stripped {:?}", buf.string());

        if group_len == 0 {
            return Ok(());
        }

        let len = buf.len();
        let max_pos = if self.config.shows_delimiter_before_next_char() {
            len.saturating_sub(1)
        } else {
            len
        };

        // place, back to front too.
        for i in (1..=max_pos).rev() {
            if i % group_len == 0 {
                self.insert_delimiter(buf, i)?;
            }
        }

        if self.config.removes_delimiter_in_last_position() {
            self.remove_trailing_delimiter(buf)?;
        }

        trace!("normalize: grouped {:?}", buf.string());
        Ok(())
    }

    /// Insert the delimiter. If the buffer is full, cut
    /// chars at the end until it fits.
    fn insert_delimiter<B: EditBuffer + ?Sized>(
        &self,
        buf: &mut B,
        pos: usize,
    ) -> Result<(), TextError> {
        let mut tmp = [0u8; 4];
        let delimiter: &str = self.config.delimiter().encode_utf8(&mut tmp);

        loop {
            if pos > buf.len() {
                return Ok(());
            }
            match buf.insert_str(pos, delimiter)? {
                Commit::Accepted => return Ok(()),
                Commit::Rejected => {
                    trace!("insert_delimiter: full at {}", pos);
                    if buf.truncate_last().is_none() {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// A delimiter in the last position stays only if
    /// there is room for another char.
    fn remove_trailing_delimiter<B: EditBuffer + ?Sized>(
        &self,
        buf: &mut B,
    ) -> Result<(), TextError> {
        let Some(last) = buf.len().checked_sub(1) else {
            return Ok(());
        };
        if buf.char_at(last) != Some(self.config.delimiter()) {
            return Ok(());
        }

        let mut tmp = [0u8; 4];
        let probe: &str = self.config.delimiter().encode_utf8(&mut tmp);

        // either the probe or the delimiter goes.
        match buf.append(probe)? {
            Commit::Accepted => {}
            Commit::Rejected => trace!("remove_trailing_delimiter: full"),
        }
        buf.truncate_last();
        Ok(())
    }
}
