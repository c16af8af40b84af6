use crate::TextError;
use std::ops::Range;

pub(crate) mod limited_string;

/// Result of an insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// The text has been inserted.
    Accepted,
    /// The host refused the insertion, the buffer is unchanged.
    /// This happens when the length ceiling is reached.
    Rejected,
}

impl Commit {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        *self == Commit::Accepted
    }
}

/// Mutable single line text buffer, as seen by the
/// [GroupCore](crate::core::GroupCore).
///
/// All positions are char indexes.
pub trait EditBuffer {
    /// Length in chars.
    fn len(&self) -> usize;

    /// Empty buffer.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Char at the given position.
    fn char_at(&self, pos: usize) -> Option<char>;

    /// Get content as string.
    fn string(&self) -> String;

    /// Maximum length accepted by the buffer.
    fn max_len(&self) -> Option<usize> {
        None
    }

    /// Remove the given range and return the removed text.
    ///
    /// * range must be a valid range: start <= end <= len.
    fn remove(&mut self, range: Range<usize>) -> Result<String, TextError>;

    /// Insert a str at the given position.
    ///
    /// Returns [Commit::Rejected] if the buffer can't take the text.
    /// In that case the buffer is unchanged.
    ///
    /// * pos must be <= len.
    fn insert_str(&mut self, pos: usize, t: &str) -> Result<Commit, TextError>;

    /// Append a str.
    fn append(&mut self, t: &str) -> Result<Commit, TextError> {
        self.insert_str(self.len(), t)
    }

    /// Remove the last char.
    fn truncate_last(&mut self) -> Option<char>;
}
