use crate::text_store::{Commit, EditBuffer};
use crate::TextError;
use std::mem;
use std::ops::Range;

/// Single line text-store with an optional maximum length.
///
/// Insertions that would exceed the maximum length are
/// rejected as a whole.
#[derive(Debug, Default, Clone)]
pub struct LimitedString {
    // text
    text: String,
    // len as char count
    len: usize,
    // length ceiling
    max_len: Option<usize>,
    // tmp buffer
    buf: String,
}

/// Length as char count.
#[inline]
fn str_len(s: &str) -> usize {
    s.chars().count()
}

impl LimitedString {
    /// New empty.
    pub fn new() -> Self {
        Self {
            text: Default::default(),
            len: 0,
            max_len: None,
            buf: Default::default(),
        }
    }

    /// New from string.
    pub fn new_text(t: &str) -> Self {
        Self {
            text: t.into(),
            len: str_len(t),
            max_len: None,
            buf: Default::default(),
        }
    }

    /// Set a maximum length.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    /// Set a maximum length.
    ///
    /// The current text is not truncated.
    pub fn set_max_len(&mut self, max_len: Option<usize>) {
        self.max_len = max_len;
    }

    /// Number of chars that can still be inserted.
    pub fn remaining(&self) -> Option<usize> {
        self.max_len.map(|v| v.saturating_sub(self.len))
    }

    /// str
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Set content as string.
    ///
    /// This ignores the maximum length.
    pub fn set_string(&mut self, t: &str) {
        self.text = t.to_string();
        self.len = str_len(&self.text);
    }

    /// Char position to byte position.
    fn byte_pos(&self, pos: usize) -> Result<usize, TextError> {
        if pos == self.len {
            Ok(self.text.len())
        } else if let Some((idx, _)) = self.text.char_indices().nth(pos) {
            Ok(idx)
        } else {
            Err(TextError::CharIndexOutOfBounds(pos, self.len))
        }
    }
}

impl EditBuffer for LimitedString {
    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn char_at(&self, pos: usize) -> Option<char> {
        self.text.chars().nth(pos)
    }

    fn string(&self) -> String {
        self.text.to_string()
    }

    #[inline]
    fn max_len(&self) -> Option<usize> {
        self.max_len
    }

    /// Remove a range.
    fn remove(&mut self, range: Range<usize>) -> Result<String, TextError> {
        if range.start > range.end {
            return Err(TextError::CharRangeInvalid(range.start, range.end));
        }
        if range.end > self.len {
            return Err(TextError::CharRangeOutOfBounds(
                range.start,
                range.end,
                self.len,
            ));
        }

        let start = self.byte_pos(range.start)?;
        let end = self.byte_pos(range.end)?;

        let (before, remove, after) = (
            &self.text[..start],
            &self.text[start..end],
            &self.text[end..],
        );

        self.buf.clear();
        self.buf.push_str(before);
        self.buf.push_str(after);

        let remove_str = remove.to_string();

        mem::swap(&mut self.text, &mut self.buf);
        self.len -= range.end - range.start;

        Ok(remove_str)
    }

    /// Insert a str at position.
    fn insert_str(&mut self, pos: usize, t: &str) -> Result<Commit, TextError> {
        if pos > self.len {
            return Err(TextError::CharIndexOutOfBounds(pos, self.len));
        }

        let t_len = str_len(t);
        if let Some(max_len) = self.max_len {
            if self.len + t_len > max_len {
                return Ok(Commit::Rejected);
            }
        }

        let byte_pos = self.byte_pos(pos)?;
        let (before, after) = self.text.split_at(byte_pos);

        self.buf.clear();
        self.buf.push_str(before);
        self.buf.push_str(t);
        self.buf.push_str(after);

        mem::swap(&mut self.text, &mut self.buf);
        self.len += t_len;

        Ok(Commit::Accepted)
    }

    fn truncate_last(&mut self) -> Option<char> {
        let c = self.text.pop()?;
        self.len -= 1;
        Some(c)
    }
}
