//!
//! Event-handler traits, the result of mask editing and the
//! events a host can forward.
//!

pub use crossterm;

/// All the regular and expected event-handling.
#[derive(Debug, Default, Clone, Copy)]
pub struct Regular;

///
/// A very broad trait for an event handler.
///
/// * Event - The actual event type.
/// * Qualifier - The qualifier allows creating more than one event-handler
///   for a widget.
/// * R - Result of event-handling.
///
pub trait HandleEvent<Event, Qualifier, Return>
where
    Return: ConsumedEvent,
{
    /// Handle an event.
    fn handle(&mut self, event: &Event, qualifier: Qualifier) -> Return;
}

/// When calling multiple event-handlers, the minimum information required
/// from the result is consumed the event/didn't consume the event.
pub trait ConsumedEvent {
    /// Is this the 'consumed' result.
    fn is_consumed(&self) -> bool;

    /// Or-Else chaining with `is_consumed()` as the split.
    #[inline(always)]
    fn or_else<F>(self, f: F) -> Self
    where
        F: FnOnce() -> Self,
        Self: Sized,
    {
        if self.is_consumed() { self } else { f() }
    }
}

/// Result of event handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MaskOutcome {
    /// The given event has not been used at all.
    /// The host should do its own editing.
    Continue,
    /// The event has been recognized, but the result was nil.
    /// The host must not do its own editing.
    Unchanged,
    /// The event has been recognized and the cursor moved.
    Changed,
    /// Text content has changed.
    TextChanged,
}

impl ConsumedEvent for MaskOutcome {
    fn is_consumed(&self) -> bool {
        *self != MaskOutcome::Continue
    }
}

/// Host neutral input events.
#[allow(variant_size_differences)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskEvent {
    /// Typed or pasted text.
    Text(String),
    /// Delete key.
    Delete,
    /// Backspace key.
    Backspace,
    /// Space key.
    Space,
}

/// The crossterm-KeyModifiers a text field accepts for typing.
/// CONTROL_ALT is AltGr on some keyboards.
pub mod modifiers {
    use crossterm::event::KeyModifiers;

    pub const NONE: KeyModifiers = KeyModifiers::NONE;
    pub const SHIFT: KeyModifiers = KeyModifiers::SHIFT;
    pub const CONTROL_ALT: KeyModifiers = KeyModifiers::from_bits_truncate(0b0000_0110);
}

/// This macro produces pattern matches for the crossterm events
/// a text field cares about.
///
/// ```rust ignore
/// match event {
///     ct_event!(key press c) | ct_event!(key press SHIFT-c) => state.insert_char(*c),
///     ct_event!(keycode press Backspace) => state.delete_prev(),
///     ct_event!(paste s) => state.insert_text(s),
///     _ => MaskOutcome::Continue,
/// }
/// ```
///
/// __Caveat__
/// press covers both KeyEventKind::Press and KeyEventKind::Repeat.
///
/// Syntax:
/// ```bnf
/// "key" "press" (modifier "-")? "'" char "'"
/// "keycode" "press" keycode
/// "paste" identifier
/// ```
#[macro_export]
macro_rules! ct_event {
    (key press $keychar:pat) => {
        $crate::event::crossterm::event::Event::Key($crate::event::crossterm::event::KeyEvent {
            code: $crate::event::crossterm::event::KeyCode::Char($keychar),
            modifiers: $crate::event::modifiers::NONE,
            kind: $crate::event::crossterm::event::KeyEventKind::Press
                | $crate::event::crossterm::event::KeyEventKind::Repeat,
            ..
        })
    };
    (key press $mod:ident-$keychar:pat) => {
        $crate::event::crossterm::event::Event::Key($crate::event::crossterm::event::KeyEvent {
            code: $crate::event::crossterm::event::KeyCode::Char($keychar),
            modifiers: $crate::event::modifiers::$mod,
            kind: $crate::event::crossterm::event::KeyEventKind::Press
                | $crate::event::crossterm::event::KeyEventKind::Repeat,
            ..
        })
    };
    (keycode press $code:ident) => {
        $crate::event::crossterm::event::Event::Key($crate::event::crossterm::event::KeyEvent {
            code: $crate::event::crossterm::event::KeyCode::$code,
            modifiers: $crate::event::modifiers::NONE,
            kind: $crate::event::crossterm::event::KeyEventKind::Press
                | $crate::event::crossterm::event::KeyEventKind::Repeat,
            ..
        })
    };
    (paste $value:ident) => {
        $crate::event::crossterm::event::Event::Paste($value)
    };
}
