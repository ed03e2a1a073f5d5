//!
//! Edit controller for a masked text field.
//!
//! The host owns the widget. It forwards the input events and shows
//! [MaskEditState::text] and [MaskEditState::cursor] afterwards.
//!
//! With an active mask every text event is consumed. Without a mask
//! the state only runs the filter and returns [MaskOutcome::Continue]
//! for an edit the host should do by itself. The host reports the
//! result back with [MaskEditState::set_text].
//!
//! ```rust
//! use rat_mask::event::{MaskEvent, MaskOutcome, HandleEvent, Regular};
//! use rat_mask::MaskEditState;
//!
//! let mut state = MaskEditState::new().with_mask("00:00").expect("mask");
//! state.overwrite = true;
//!
//! let r = state.handle(&MaskEvent::Text("9".into()), Regular);
//! assert_eq!(r, MaskOutcome::TextChanged);
//! assert_eq!(state.text(), "9_:__");
//! ```
//!

use crate::_private::NonExhaustive;
use crate::event::{HandleEvent, MaskEvent, MaskOutcome, Regular};
use crate::filter::{Filter, FilterCategory};
use crate::mask_cache::MaskCache;
use crate::mask_engine::MaskEngine;
use crate::{DEFAULT_PLACEHOLDER, MaskError, ct_event, upos_type};
use log::{debug, warn};

/// Configuration of a masked field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskConfig {
    /// Mask pattern. Empty disables masking.
    pub mask: String,
    /// Shown for unset slots.
    pub placeholder: char,
    /// Whole text validation.
    pub filter: FilterCategory,

    pub non_exhaustive: NonExhaustive,
}

/// State of a masked field.
#[derive(Debug, Clone)]
pub struct MaskEditState {
    /// Active configuration. Only ever holds a configuration
    /// that compiled.
    config: MaskConfig,
    /// Engine for the active mask.
    cache: MaskCache,
    /// Compiled filter of the active configuration.
    filter: Filter,

    /// Display text.
    text: String,
    /// Cursor as char index into the display text.
    cursor: upos_type,

    /// Typing replaces instead of insert.
    /// __read+write__
    pub overwrite: bool,
    /// No edits at all. Every event is consumed.
    /// __read+write__
    pub read_only: bool,

    pub non_exhaustive: NonExhaustive,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            mask: Default::default(),
            placeholder: DEFAULT_PLACEHOLDER,
            filter: Default::default(),
            non_exhaustive: NonExhaustive,
        }
    }
}

impl MaskConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mask pattern.
    pub fn mask(mut self, mask: impl Into<String>) -> Self {
        self.mask = mask.into();
        self
    }

    /// Placeholder for unset slots.
    pub fn placeholder(mut self, placeholder: char) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Filter for the whole text.
    pub fn filter(mut self, filter: FilterCategory) -> Self {
        self.filter = filter;
        self
    }
}

impl Default for MaskEditState {
    fn default() -> Self {
        Self {
            config: Default::default(),
            cache: Default::default(),
            filter: Default::default(),
            text: Default::default(),
            cursor: 0,
            overwrite: false,
            read_only: false,
            non_exhaustive: NonExhaustive,
        }
    }
}

impl MaskEditState {
    pub fn new() -> Self {
        Self::default()
    }

    /// With a complete configuration.
    pub fn with_config(mut self, config: MaskConfig) -> Result<Self, MaskError> {
        self.on_config_changed(config)?;
        Ok(self)
    }

    /// With input mask.
    pub fn with_mask<S: AsRef<str>>(mut self, mask: S) -> Result<Self, MaskError> {
        self.set_mask(mask)?;
        Ok(self)
    }

    /// Set the input mask.
    ///
    /// The assigned values are kept as far as the new mask accepts them.
    /// If the mask doesn't compile the previous mask stays active.
    pub fn set_mask<S: AsRef<str>>(&mut self, mask: S) -> Result<(), MaskError> {
        let config = self.config.clone().mask(mask.as_ref());
        self.on_config_changed(config)
    }

    /// Set the placeholder.
    pub fn set_placeholder(&mut self, placeholder: char) -> Result<(), MaskError> {
        let config = self.config.clone().placeholder(placeholder);
        self.on_config_changed(config)
    }

    /// Set the filter.
    ///
    /// The current text is not validated again.
    pub fn set_filter(&mut self, filter: FilterCategory) -> Result<(), MaskError> {
        let config = self.config.clone().filter(filter);
        self.on_config_changed(config)
    }

    /// Set the complete configuration.
    pub fn set_config(&mut self, config: MaskConfig) -> Result<(), MaskError> {
        self.on_config_changed(config)
    }

    /// Apply a changed configuration.
    ///
    /// Compiles the filter and asks the cache for the engine. The engine
    /// is only rebuilt if the mask or the placeholder changed, and is then
    /// filled with the current plain text. The text is rendered again and
    /// the cursor goes to the start.
    ///
    /// Nothing changes if either the mask or the filter is invalid.
    pub fn on_config_changed(&mut self, config: MaskConfig) -> Result<(), MaskError> {
        let filter = match Filter::new(&config.filter) {
            Ok(v) => v,
            Err(e) => {
                warn!("rejected filter {:?}: {}", config.filter, e);
                return Err(e);
            }
        };

        let plain = self.plain_text();
        let text = match self.cache.get(&config.mask, config.placeholder, &plain) {
            Ok(Some(engine)) => engine.to_display_string(),
            Ok(None) => plain,
            Err(e) => {
                warn!("rejected mask {:?}: {}", config.mask, e);
                return Err(e);
            }
        };

        self.config = config;
        self.filter = filter;
        self.text = text;
        self.cursor = 0;
        Ok(())
    }

    /// Active configuration.
    #[inline]
    pub fn config(&self) -> &MaskConfig {
        &self.config
    }

    /// Active mask.
    #[inline]
    pub fn mask(&self) -> &str {
        &self.config.mask
    }

    /// Active placeholder.
    #[inline]
    pub fn placeholder(&self) -> char {
        self.config.placeholder
    }

    /// Engine of the active mask. None if masking is disabled.
    #[inline]
    pub fn engine(&self) -> Option<&MaskEngine> {
        self.cache.current()
    }

    /// Masking is active.
    #[inline]
    pub fn is_masked(&self) -> bool {
        self.cache.current().is_some()
    }

    /// Overwrite mode.
    #[inline]
    pub fn set_overwrite(&mut self, overwrite: bool) {
        self.overwrite = overwrite;
    }

    /// Overwrite mode.
    #[inline]
    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    /// Read-only.
    #[inline]
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Read-only.
    #[inline]
    pub fn read_only(&self) -> bool {
        self.read_only
    }
}

impl MaskEditState {
    /// Display text.
    #[inline]
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Text without literals and placeholders.
    /// Without a mask this is the text.
    pub fn plain_text(&self) -> String {
        match self.cache.current() {
            Some(engine) => engine.to_plain_string(),
            None => self.text.clone(),
        }
    }

    /// Length of the display text in chars.
    #[inline]
    pub fn len(&self) -> upos_type {
        self.text.chars().count() as upos_type
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// All required slots have a value.
    /// Always true without a mask.
    pub fn is_complete(&self) -> bool {
        match self.cache.current() {
            Some(engine) => engine.is_complete(),
            None => true,
        }
    }

    /// Cursor position.
    #[inline]
    pub fn cursor(&self) -> upos_type {
        self.cursor
    }

    /// Set the cursor. Limited to the length of the text.
    ///
    /// Returns true if the cursor moved.
    pub fn set_cursor(&mut self, cursor: upos_type) -> bool {
        let old = self.cursor;
        self.cursor = cursor.min(self.len());
        old != self.cursor
    }

    /// Set the text.
    ///
    /// With an active mask the text is run through the mask and
    /// the cursor goes to the first editable position.
    /// Returns false if some chars didn't find their place.
    pub fn set_text<S: Into<String>>(&mut self, s: S) -> bool {
        let s = s.into();
        match self.cache.current_mut() {
            Some(engine) => {
                let r = engine.set(&s);
                self.text = engine.to_display_string();
                self.cursor = engine.find_edit_position_from(0, true).unwrap_or(0);
                r
            }
            None => {
                self.text = s;
                self.cursor = self.cursor.min(self.len());
                true
            }
        }
    }

    /// Clear all values.
    pub fn clear(&mut self) -> bool {
        if self.is_empty() && self.cursor == 0 {
            return false;
        }
        match self.cache.current_mut() {
            Some(engine) => {
                engine.clear();
                self.text = engine.to_display_string();
            }
            None => {
                self.text.clear();
            }
        }
        self.cursor = 0;
        true
    }

    /// Insert a char at the cursor.
    pub fn insert_char(&mut self, c: char) -> MaskOutcome {
        let mut buf = [0u8; 4];
        self.insert_text(c.encode_utf8(&mut buf))
    }

    /// Insert a space at the cursor.
    #[inline]
    pub fn insert_space(&mut self) -> MaskOutcome {
        self.insert_text(" ")
    }

    /// Typed or pasted text.
    ///
    /// The text goes to the first editable position at or after the
    /// cursor. Depending on [overwrite](Self::overwrite) it replaces
    /// the values there or pushes them to the right. The cursor ends
    /// up at the next editable position after the new text.
    ///
    /// The edit is rejected if the mask doesn't accept the text,
    /// or if the filter doesn't accept the resulting plain text.
    pub fn insert_text(&mut self, s: &str) -> MaskOutcome {
        if self.read_only {
            return MaskOutcome::Unchanged;
        }

        let Some(engine) = self.cache.current_mut() else {
            let idx = self
                .text
                .char_indices()
                .nth(self.cursor as usize)
                .map(|(i, _)| i)
                .unwrap_or(self.text.len());
            let mut candidate = self.text.clone();
            candidate.insert_str(idx, s);
            return if self.filter.is_text_valid(&candidate) {
                MaskOutcome::Continue
            } else {
                debug!("filter rejects {:?}", candidate);
                MaskOutcome::Unchanged
            };
        };

        if s.is_empty() || self.cursor >= engine.len() {
            return MaskOutcome::Unchanged;
        }
        let Some(pos) = engine.find_edit_position_from(self.cursor, true) else {
            return MaskOutcome::Unchanged;
        };

        let snapshot = engine.snapshot();
        let ok = if self.overwrite {
            engine.replace_at(s, pos)
        } else {
            engine.insert_at(s, pos)
        };
        if !ok {
            return MaskOutcome::Unchanged;
        }
        let plain = engine.to_plain_string();
        if !self.filter.is_text_valid(&plain) {
            debug!("filter rejects {:?}", plain);
            engine.restore(snapshot);
            return MaskOutcome::Unchanged;
        }

        // behind the last char placed
        let n = s.chars().count();
        let last = engine
            .buffer()
            .edit_positions(pos as usize)
            .nth(n - 1)
            .map(|v| v as upos_type)
            .unwrap_or(pos);
        let next = last + 1;
        let cursor = engine.find_edit_position_from(next, true).unwrap_or(next);

        let text = engine.to_display_string();
        self.apply_result(text, cursor)
    }

    /// Delete key. Removes the value at the next editable position
    /// at or after the cursor.
    pub fn delete_next(&mut self) -> MaskOutcome {
        if self.read_only {
            return MaskOutcome::Unchanged;
        }
        let Some(engine) = self.cache.current_mut() else {
            return MaskOutcome::Continue;
        };
        if self.cursor >= engine.len() {
            return MaskOutcome::Continue;
        }
        let Some(pos) = engine.find_edit_position_from(self.cursor, true) else {
            return MaskOutcome::Unchanged;
        };
        if !engine.remove_at(pos) {
            return MaskOutcome::Unchanged;
        }
        let text = engine.to_display_string();
        self.apply_result(text, pos)
    }

    /// Backspace key. Removes the value at the next editable position
    /// before the cursor and moves the cursor there.
    pub fn delete_prev(&mut self) -> MaskOutcome {
        if self.read_only {
            return MaskOutcome::Unchanged;
        }
        let Some(engine) = self.cache.current_mut() else {
            return MaskOutcome::Continue;
        };
        if self.cursor == 0 {
            return MaskOutcome::Continue;
        }
        let Some(pos) = engine.find_edit_position_from(self.cursor - 1, false) else {
            return MaskOutcome::Unchanged;
        };
        if !engine.remove_at(pos) {
            return MaskOutcome::Unchanged;
        }
        let text = engine.to_display_string();
        self.apply_result(text, pos)
    }

    /// Insert key. Switches between insert and overwrite.
    ///
    /// Without a mask the host keeps its own mode.
    pub fn toggle_overwrite(&mut self) -> MaskOutcome {
        if self.read_only {
            return MaskOutcome::Unchanged;
        }
        if !self.is_masked() {
            return MaskOutcome::Continue;
        }
        self.overwrite = !self.overwrite;
        MaskOutcome::Changed
    }

    fn apply_result(&mut self, text: String, cursor: upos_type) -> MaskOutcome {
        let text_changed = self.text != text;
        let cursor_changed = self.cursor != cursor;
        self.text = text;
        self.cursor = cursor;
        if text_changed {
            MaskOutcome::TextChanged
        } else if cursor_changed {
            MaskOutcome::Changed
        } else {
            MaskOutcome::Unchanged
        }
    }
}

impl HandleEvent<MaskEvent, Regular, MaskOutcome> for MaskEditState {
    fn handle(&mut self, event: &MaskEvent, _qualifier: Regular) -> MaskOutcome {
        match event {
            MaskEvent::Text(s) => self.insert_text(s),
            MaskEvent::Delete => self.delete_next(),
            MaskEvent::Backspace => self.delete_prev(),
            MaskEvent::Space => self.insert_space(),
        }
    }
}

impl HandleEvent<crossterm::event::Event, Regular, MaskOutcome> for MaskEditState {
    fn handle(&mut self, event: &crossterm::event::Event, _qualifier: Regular) -> MaskOutcome {
        match event {
            ct_event!(key press ' ') | ct_event!(key press SHIFT-' ') => self.insert_space(),
            ct_event!(key press c)
            | ct_event!(key press SHIFT-c)
            | ct_event!(key press CONTROL_ALT-c) => self.insert_char(*c),
            ct_event!(keycode press Backspace) => self.delete_prev(),
            ct_event!(keycode press Delete) => self.delete_next(),
            ct_event!(keycode press Insert) => self.toggle_overwrite(),
            ct_event!(paste s) => self.insert_text(s),
            _ => MaskOutcome::Continue,
        }
    }
}

/// Handle all events.
pub fn handle_events(state: &mut MaskEditState, event: &crossterm::event::Event) -> MaskOutcome {
    state.handle(event, Regular)
}
