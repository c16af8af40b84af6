#![doc = include_str!("../readme.md")]
#![allow(clippy::collapsible_else_if)]
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

pub mod config;
pub mod grouped_input;

mod group_core;
mod text_store;

pub use config::{ConfigError, GroupConfig};

pub mod event {
    //!
    //! Event-handler traits and outcome.
    //!

    pub use rat_event::{ct_event, ConsumedEvent, HandleEvent, MouseOnly, Regular};

    /// Result of event handling.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub enum TextOutcome {
        /// The given event has not been used at all.
        Continue,
        /// The event has been recognized, but the result was nil.
        /// Further processing for this event may stop.
        Unchanged,
        /// The event has been recognized and there is some change
        /// due to it.
        /// Further processing for this event may stop.
        /// Rendering the ui is advised.
        Changed,
        /// Text content has changed.
        TextChanged,
    }

    impl ConsumedEvent for TextOutcome {
        fn is_consumed(&self) -> bool {
            *self != TextOutcome::Continue
        }
    }

    // Useful for converting most navigation/edit results.
    impl From<bool> for TextOutcome {
        fn from(value: bool) -> Self {
            if value {
                TextOutcome::Changed
            } else {
                TextOutcome::Unchanged
            }
        }
    }
}

pub mod core {
    //!
    //! Core structs for delimiter grouping.
    //! Used to implement the widget, usable with any host
    //! that can drive the change notifications.
    //!

    pub use crate::group_core::{EditObserver, EditPhase, GroupCore, ObserverId};
    pub use crate::text_store::limited_string::LimitedString;
    pub use crate::text_store::{Commit, EditBuffer};
}

/// Index errors of an [EditBuffer](core::EditBuffer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    /// Indicates that the passed char index was out of bounds.
    ///
    /// Contains the index attempted and the actual length of the
    /// buffer in chars, in that order.
    CharIndexOutOfBounds(usize, usize),
    /// Indicates that the passed char-index range was partially or fully
    /// out of bounds.
    ///
    /// Contains the [start, end) char indices of the range and the actual
    /// length of the buffer in chars, in that order.
    CharRangeOutOfBounds(usize, usize, usize),
    /// Indicates that a reversed char-index range (end < start) was
    /// encountered.
    ///
    /// Contains the [start, end) char indices of the range, in that order.
    CharRangeInvalid(usize, usize),
}

impl Display for TextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for TextError {}

mod _private {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct NonExhaustive;
}
