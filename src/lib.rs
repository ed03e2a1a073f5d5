#![doc = include_str!("../readme.md")]
#![allow(clippy::uninlined_format_args)]
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod event;
pub mod filter;
pub mod mask_cache;
pub mod mask_edit;
pub mod mask_engine;
pub mod mask_token;
pub mod slot_buffer;

pub use filter::{Filter, FilterCategory};
pub use mask_cache::MaskCache;
pub use mask_edit::{MaskConfig, MaskEditState, handle_events};
pub use mask_engine::MaskEngine;
pub use mask_token::{CaseConversion, CharClass, MaskPattern, MaskToken};
pub use slot_buffer::{Cell, SlotBuffer};

/// Placeholder used for unset slots if nothing else is configured.
pub const DEFAULT_PLACEHOLDER: char = '_';

#[derive(Debug, PartialEq)]
pub enum MaskError {
    /// The mask pattern can't be compiled.
    ///
    /// Contains a short description of the offending part.
    InvalidMask(String),
    /// The pattern of a custom filter doesn't compile.
    ///
    /// Contains the error message of the regex engine.
    InvalidFilter(String),
}

impl Display for MaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for MaskError {}

/// Position type. Index into the display string, counted in chars.
#[allow(non_camel_case_types)]
pub type upos_type = u32;

mod _private {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct NonExhaustive;
}
