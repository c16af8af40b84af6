//! Text input that groups its content with a delimiter.
//!
//! * Can do the usual insert/delete/move operations.
//! * Pastes are grouped like typed text.
//! * Scrolls with the cursor.
//! * Optional maximum length. Pasted text is cut to fit, typing
//!   at the maximum length does nothing.
//!
//! * Grouping is done by [GroupCore](crate::core::GroupCore)
//!   after each edit:
//!   * `1234-5678-9` with the default configuration.
//!   * Backspace over a delimiter removes the char before it too.
//!   * Delete over a delimiter removes the char after it too.
//!
//! ```rust ignore
//! use ratatui::widgets::StatefulWidget;
//! use rat_group_input::grouped_input::{GroupedInput, GroupedInputState};
//! use rat_group_input::GroupConfig;
//!
//! let mut card_state = GroupedInputState::with_config(GroupConfig::default())
//!     .with_max_len(19);
//!
//! GroupedInput::new()
//!     .block(Block::bordered())
//!     .render(area, &mut buf, &mut card_state);
//! if let Some((cx, cy)) = card_state.screen_cursor() {
//!     frame.set_cursor_position((cx, cy));
//! }
//! ```
//!
//! The visual cursor must be set separately after rendering.
//! It is accessible as [GroupedInputState::screen_cursor()] after rendering.
//!
//! Event handling by calling the freestanding fn [handle_events].
//! There's [handle_mouse_events] if you want to override the default key bindings but keep
//! the mouse behaviour.
//!

use crate::_private::NonExhaustive;
use crate::config::GroupConfig;
use crate::event::TextOutcome;
use crate::group_core::{EditObserver, GroupCore, ObserverId};
use crate::text_store::limited_string::LimitedString;
use crate::text_store::EditBuffer;
use crate::TextError;
#[allow(unused_imports)]
use log::debug;
use rat_event::{ct_event, HandleEvent, MouseOnly, Regular};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Style, Stylize};
use ratatui::widgets::{Block, StatefulWidget, Widget};
use std::ops::Range;
use unicode_width::UnicodeWidthChar;

/// Text input widget with delimiter grouping.
///
/// # Stateful
/// This widget implements [`StatefulWidget`], you can use it with
/// [`GroupedInputState`] to handle common actions.
#[derive(Debug, Default, Clone)]
pub struct GroupedInput<'a> {
    block: Option<Block<'a>>,
    style: Style,
    focus_style: Option<Style>,
    delimiter_style: Option<Style>,
}

/// State & event-handling.
#[derive(Debug)]
pub struct GroupedInputState {
    /// The whole area with block.
    /// __read only__ renewed with each render.
    pub area: Rect,
    /// Area inside a possible block.
    /// __read only__ renewed with each render.
    pub inner: Rect,

    /// Widget has the focus.
    /// __read+write__
    pub focused: bool,

    /// Display offset in chars.
    /// __read+write__
    pub offset: usize,
    /// Cursor position in chars.
    cursor: usize,

    /// Text
    value: LimitedString,
    /// Grouping
    core: GroupCore,

    pub non_exhaustive: NonExhaustive,
}

impl<'a> GroupedInput<'a> {
    /// New widget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Base text style.
    #[inline]
    pub fn style(mut self, style: impl Into<Style>) -> Self {
        self.style = style.into();
        self
    }

    /// Style when focused.
    #[inline]
    pub fn focus_style(mut self, style: impl Into<Style>) -> Self {
        self.focus_style = Some(style.into());
        self
    }

    /// Style for the delimiter chars.
    #[inline]
    pub fn delimiter_style(mut self, style: impl Into<Style>) -> Self {
        self.delimiter_style = Some(style.into());
        self
    }

    /// Block.
    #[inline]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl<'a> StatefulWidget for &GroupedInput<'a> {
    type State = GroupedInputState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        render_ref(self, area, buf, state);
    }
}

impl StatefulWidget for GroupedInput<'_> {
    type State = GroupedInputState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        render_ref(&self, area, buf, state);
    }
}

fn render_ref(
    widget: &GroupedInput<'_>,
    area: Rect,
    buf: &mut Buffer,
    state: &mut GroupedInputState,
) {
    state.area = area;
    state.inner = if let Some(block) = &widget.block {
        block.inner(area)
    } else {
        area
    };
    state.scroll_cursor_to_visible();

    let style = widget.style;
    let style = if state.focused {
        if let Some(focus_style) = widget.focus_style {
            style.patch(focus_style)
        } else {
            style.black().on_cyan()
        }
    } else {
        style
    };
    let delimiter_style = if let Some(delimiter_style) = widget.delimiter_style {
        style.patch(delimiter_style)
    } else {
        style
    };

    // set base style
    if let Some(block) = &widget.block {
        block.render(area, buf);
    }
    buf.set_style(state.inner, style);

    if state.inner.width == 0 || state.inner.height == 0 {
        // noop
        return;
    }

    let mut screen_x = 0u16;
    for c in state.value.as_str().chars().skip(state.offset) {
        let width = c.width().unwrap_or(0) as u16;
        if width == 0 {
            continue;
        }
        if screen_x + width > state.inner.width {
            break;
        }

        let style = if state.core.is_delimiter(c) {
            delimiter_style
        } else {
            style
        };

        if let Some(cell) = buf.cell_mut((state.inner.x + screen_x, state.inner.y)) {
            cell.set_char(c);
            cell.set_style(style);
        }
        // clear the rest of the cells to avoid interferences.
        for d in 1..width {
            if let Some(cell) = buf.cell_mut((state.inner.x + screen_x + d, state.inner.y)) {
                cell.reset();
                cell.set_style(style);
            }
        }

        screen_x += width;
    }
}

impl Default for GroupedInputState {
    fn default() -> Self {
        Self {
            area: Default::default(),
            inner: Default::default(),
            focused: false,
            offset: 0,
            cursor: 0,
            value: LimitedString::new(),
            core: GroupCore::default(),
            non_exhaustive: NonExhaustive,
        }
    }
}

impl GroupedInputState {
    /// New state with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// New state.
    pub fn with_config(config: GroupConfig) -> Self {
        Self {
            core: GroupCore::new(config),
            ..Default::default()
        }
    }

    /// Set a maximum length. Delimiters count too.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.value.set_max_len(Some(max_len));
        self
    }

    /// Set a maximum length. Delimiters count too.
    ///
    /// The current text is not truncated.
    pub fn set_max_len(&mut self, max_len: Option<usize>) {
        self.value.set_max_len(max_len);
    }

    /// Maximum length.
    pub fn max_len(&self) -> Option<usize> {
        self.value.max_len()
    }

    /// Grouping configuration.
    pub fn config(&self) -> &GroupConfig {
        self.core.config()
    }
}

impl GroupedInputState {
    /// Add an observer for text changes.
    ///
    /// The observer sees every edit once, and its
    /// after_change gets the grouped text.
    pub fn subscribe(&mut self, observer: Box<dyn EditObserver>) -> ObserverId {
        self.core.subscribe(observer)
    }

    /// Remove an observer.
    pub fn unsubscribe(&mut self, id: ObserverId) -> Option<Box<dyn EditObserver>> {
        self.core.unsubscribe(id)
    }
}

impl GroupedInputState {
    /// Text value.
    #[inline]
    pub fn text(&self) -> &str {
        self.value.as_str()
    }

    /// Empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Length in chars, delimiters included.
    #[inline]
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Cursor position.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Set the cursor position.
    /// The value is clamped to the text length.
    pub fn set_cursor(&mut self, cursor: usize) -> bool {
        let old = self.cursor;
        self.cursor = cursor.min(self.value.len());
        self.scroll_cursor_to_visible();
        old != self.cursor
    }

    /// Display offset.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Set the display offset.
    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset.min(self.value.len());
    }
}

impl GroupedInputState {
    /// Reset to empty.
    #[inline]
    pub fn clear(&mut self) -> bool {
        if self.is_empty() {
            false
        } else {
            let len = self.value.len();
            self.try_replace(0..len, "").expect("valid_range")
        }
    }

    /// Set the value. The text is grouped and cut to the
    /// maximum length.
    #[inline]
    pub fn set_text<S: AsRef<str>>(&mut self, s: S) {
        self.try_set_text(s).expect("valid_range");
    }

    /// Set the value. The text is grouped and cut to the
    /// maximum length.
    pub fn try_set_text<S: AsRef<str>>(&mut self, s: S) -> Result<bool, TextError> {
        let len = self.value.len();
        let r = self.try_replace(0..len, s.as_ref())?;
        self.offset = 0;
        self.scroll_cursor_to_visible();
        Ok(r)
    }

    /// Insert a char at the current position.
    #[inline]
    pub fn insert_char(&mut self, c: char) -> bool {
        let mut tmp = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut tmp))
    }

    /// Insert a str at the current position.
    #[inline]
    pub fn insert_str(&mut self, t: &str) -> bool {
        self.try_insert_str(t).expect("valid_cursor")
    }

    /// Insert a str at the current position.
    pub fn try_insert_str(&mut self, t: &str) -> Result<bool, TextError> {
        let cursor = self.cursor;
        self.try_replace(cursor..cursor, t)
    }

    /// Delete the char before the cursor.
    #[inline]
    pub fn delete_prev_char(&mut self) -> bool {
        self.try_delete_prev_char().expect("valid_cursor")
    }

    /// Delete the char before the cursor.
    ///
    /// If this is a delimiter, the char before it is
    /// removed too.
    pub fn try_delete_prev_char(&mut self) -> Result<bool, TextError> {
        if self.cursor == 0 {
            Ok(false)
        } else {
            let cursor = self.cursor;
            self.try_replace(cursor - 1..cursor, "")
        }
    }

    /// Delete the char after the cursor.
    #[inline]
    pub fn delete_next_char(&mut self) -> bool {
        self.try_delete_next_char().expect("valid_cursor")
    }

    /// Delete the char after the cursor.
    ///
    /// If this is a delimiter, the char after it is
    /// removed too. A trailing delimiter stays.
    pub fn try_delete_next_char(&mut self) -> Result<bool, TextError> {
        let cursor = self.cursor;
        if cursor >= self.value.len() {
            return Ok(false);
        }

        let end = match self.value.char_at(cursor) {
            Some(c) if self.core.is_delimiter(c) => {
                if cursor + 1 == self.value.len() {
                    // trailing delimiter, nothing after it.
                    return Ok(false);
                }
                cursor + 2
            }
            _ => cursor + 1,
        };
        self.try_replace(cursor..end, "")
    }

    /// Replace the range with the given text and regroup.
    ///
    /// Runs the full change protocol with the core.
    fn try_replace(&mut self, range: Range<usize>, t: &str) -> Result<bool, TextError> {
        let len = self.value.len();
        if range.start > range.end {
            return Err(TextError::CharRangeInvalid(range.start, range.end));
        }
        if range.end > len {
            return Err(TextError::CharRangeOutOfBounds(range.start, range.end, len));
        }

        let count = range.end - range.start;

        // cut to the remaining length.
        let t = if let Some(max_len) = self.value.max_len() {
            let keep = max_len.saturating_sub(len - count);
            match t.char_indices().nth(keep) {
                Some((idx, _)) => &t[..idx],
                None => t,
            }
        } else {
            t
        };
        if count == 0 && t.is_empty() {
            // nothing fits. the edit is dropped without notice.
            return Ok(false);
        }
        let after = t.chars().count();

        let text = self.value.string();
        self.core.before_change(&text, range.start, count, after);

        self.value.remove(range.clone())?;
        if !self.value.insert_str(range.start, t)?.is_accepted() {
            debug!("try_replace: insert rejected {:?}", t);
        }

        let text = self.value.string();
        self.core.changed(&text, range.start, count, after);

        // count the data chars before the cursor, they
        // give the new cursor position.
        let cursor = range.start + after;
        let mut data_before = text
            .chars()
            .take(cursor)
            .filter(|c| !self.core.is_delimiter(*c))
            .count();
        if let Some(pull) = self.core.backspace_before_delimiter_at() {
            if pull < cursor {
                data_before = data_before.saturating_sub(1);
            }
        }

        self.core.after_change(&mut self.value)?;

        self.cursor = self.data_to_pos(data_before);
        self.scroll_cursor_to_visible();
        Ok(true)
    }

    /// Position after the n-th data char.
    fn data_to_pos(&self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let mut seen = 0;
        for (idx, c) in self.value.as_str().chars().enumerate() {
            if !self.core.is_delimiter(c) {
                seen += 1;
                if seen == n {
                    return idx + 1;
                }
            }
        }
        self.value.len()
    }
}

impl GroupedInputState {
    /// Move left.
    pub fn move_left(&mut self) -> bool {
        if self.cursor > 0 {
            self.set_cursor(self.cursor - 1)
        } else {
            false
        }
    }

    /// Move right.
    pub fn move_right(&mut self) -> bool {
        self.set_cursor(self.cursor + 1)
    }

    /// Start of line.
    pub fn move_to_line_start(&mut self) -> bool {
        self.set_cursor(0)
    }

    /// End of line.
    pub fn move_to_line_end(&mut self) -> bool {
        self.set_cursor(self.value.len())
    }
}

impl GroupedInputState {
    /// Scroll to make the cursor visible.
    pub fn scroll_cursor_to_visible(&mut self) {
        let width = self.inner.width as usize;
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if width > 0 && self.cursor >= self.offset + width {
            self.offset = self.cursor + 1 - width;
        }
    }

    /// Cursor position on the screen.
    ///
    /// None if the widget has no focus or the cursor
    /// is not visible.
    pub fn screen_cursor(&self) -> Option<(u16, u16)> {
        if !self.focused || self.cursor < self.offset {
            return None;
        }

        let mut x = 0u16;
        for c in self
            .value
            .as_str()
            .chars()
            .skip(self.offset)
            .take(self.cursor - self.offset)
        {
            x += c.width().unwrap_or(0) as u16;
        }

        if x < self.inner.width {
            Some((self.inner.x + x, self.inner.y))
        } else {
            None
        }
    }

    /// Column for a relative screen position.
    pub fn screen_to_col(&self, scx: u16) -> usize {
        let mut x = 0u16;
        for (idx, c) in self.value.as_str().chars().enumerate().skip(self.offset) {
            let width = c.width().unwrap_or(0) as u16;
            if scx < x + width {
                return idx;
            }
            x += width;
        }
        self.value.len()
    }
}

impl HandleEvent<crossterm::event::Event, Regular, TextOutcome> for GroupedInputState {
    fn handle(&mut self, event: &crossterm::event::Event, _keymap: Regular) -> TextOutcome {
        // small helper ...
        fn tc(r: bool) -> TextOutcome {
            if r {
                TextOutcome::TextChanged
            } else {
                TextOutcome::Unchanged
            }
        }

        let mut r = if self.focused {
            match event {
                crossterm::event::Event::Paste(s) => tc(self.insert_str(s)),
                ct_event!(key press c) | ct_event!(key press SHIFT-c) => tc(self.insert_char(*c)),
                ct_event!(keycode press Backspace) => tc(self.delete_prev_char()),
                ct_event!(keycode press Delete) => tc(self.delete_next_char()),
                ct_event!(key press CONTROL-'d') => tc(self.clear()),
                ct_event!(keycode press Left) => self.move_left().into(),
                ct_event!(keycode press Right) => self.move_right().into(),
                ct_event!(keycode press Home) => self.move_to_line_start().into(),
                ct_event!(keycode press End) => self.move_to_line_end().into(),

                ct_event!(key release _)
                | ct_event!(key release SHIFT-_)
                | ct_event!(keycode release Backspace)
                | ct_event!(keycode release Delete)
                | ct_event!(key release CONTROL-'d')
                | ct_event!(keycode release Left)
                | ct_event!(keycode release Right)
                | ct_event!(keycode release Home)
                | ct_event!(keycode release End) => TextOutcome::Unchanged,

                _ => TextOutcome::Continue,
            }
        } else {
            TextOutcome::Continue
        };

        if r == TextOutcome::Continue {
            r = self.handle(event, MouseOnly);
        }
        r
    }
}

impl HandleEvent<crossterm::event::Event, MouseOnly, TextOutcome> for GroupedInputState {
    fn handle(&mut self, event: &crossterm::event::Event, _keymap: MouseOnly) -> TextOutcome {
        match event {
            ct_event!(mouse down Left for column, row) => {
                if self.inner.contains((*column, *row).into()) {
                    let c = self.screen_to_col(column - self.inner.x);
                    self.set_cursor(c).into()
                } else {
                    TextOutcome::Continue
                }
            }
            _ => TextOutcome::Continue,
        }
    }
}

/// Handle all events.
/// Text events are only processed if focus is true.
/// Mouse events are processed if they are in range.
pub fn handle_events(
    state: &mut GroupedInputState,
    focus: bool,
    event: &crossterm::event::Event,
) -> TextOutcome {
    state.focused = focus;
    state.handle(event, Regular)
}

/// Handle only mouse-events.
pub fn handle_mouse_events(
    state: &mut GroupedInputState,
    event: &crossterm::event::Event,
) -> TextOutcome {
    state.handle(event, MouseOnly)
}
