//!
//! Editing core for one compiled mask.
//!
//! All positions are indexes into the display string, which has
//! exactly one char per mask position.
//!
//! Every mutating operation is atomic. Either the complete change is
//! applied, or the buffer stays as it was and the result is false.
//!

use crate::mask_token::{MaskPattern, MaskToken};
use crate::slot_buffer::{Cell, SlotBuffer};
use crate::{MaskError, upos_type};

/// Mask engine.
///
/// Owns the compiled mask, the slot buffer and the placeholder.
/// Changing the mask or the placeholder means a new engine.
#[derive(Debug, Clone)]
pub struct MaskEngine {
    pattern: MaskPattern,
    buffer: SlotBuffer,
    placeholder: char,
}

impl MaskEngine {
    /// New engine with all slots unset.
    pub fn new(pattern: MaskPattern, placeholder: char) -> Self {
        let buffer = SlotBuffer::new(&pattern);
        Self {
            pattern,
            buffer,
            placeholder,
        }
    }

    /// Compile the mask and create an engine.
    pub fn with_mask(mask: &str, placeholder: char) -> Result<Self, MaskError> {
        Ok(Self::new(MaskPattern::compile(mask)?, placeholder))
    }

    /// Compiled mask.
    #[inline]
    pub fn pattern(&self) -> &MaskPattern {
        &self.pattern
    }

    /// Mask string.
    #[inline]
    pub fn mask(&self) -> &str {
        self.pattern.as_str()
    }

    /// Placeholder for unset slots.
    #[inline]
    pub fn placeholder(&self) -> char {
        self.placeholder
    }

    /// Current cells.
    #[inline]
    pub fn buffer(&self) -> &SlotBuffer {
        &self.buffer
    }

    /// Length of the display string.
    #[inline]
    pub fn len(&self) -> upos_type {
        self.buffer.len() as upos_type
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Copy of the current cells.
    pub fn snapshot(&self) -> SlotBuffer {
        self.buffer.clone()
    }

    /// Go back to a snapshot.
    ///
    /// Snapshots of a different mask are ignored.
    pub fn restore(&mut self, snapshot: SlotBuffer) -> bool {
        if snapshot.len() == self.buffer.len()
            && snapshot
                .cells()
                .iter()
                .zip(self.buffer.cells())
                .all(|(a, b)| a.is_literal() == b.is_literal())
        {
            self.buffer = snapshot;
            true
        } else {
            false
        }
    }

    /// Reset all slots.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Every required slot has a value.
    pub fn is_complete(&self) -> bool {
        self.pattern
            .tokens()
            .iter()
            .zip(self.buffer.cells())
            .all(|(t, c)| match t {
                MaskToken::Slot(class, _) if class.is_required() => c.value().is_some(),
                _ => true,
            })
    }

    /// Number of slots with a value.
    #[inline]
    pub fn assigned_count(&self) -> usize {
        self.buffer.assigned_count()
    }

    /// Number of slots without a value.
    #[inline]
    pub fn available_count(&self) -> usize {
        self.buffer.available_count()
    }

    /// Test the char against the slot at the position.
    #[inline]
    fn accept(&self, idx: usize, c: char) -> Option<char> {
        self.pattern.token(idx).and_then(|t| t.accept(c))
    }

    /// Replace the content.
    ///
    /// All slots are cleared first. Then each char is put into the next
    /// slot that accepts it. Literals are skipped, and if the text
    /// contains the literal at that place it is consumed too.
    /// A placeholder char consumes one slot and leaves it unset.
    /// Chars the current slot doesn't accept are dropped.
    ///
    /// Returns true if every char of the text found its place.
    /// The content is set in any case.
    pub fn set(&mut self, text: &str) -> bool {
        self.buffer.clear();

        let mut all = true;
        let mut idx = 0;
        for c in text.chars() {
            if let Some(Cell::Literal(lit)) = self.buffer.cell(idx) {
                if lit == c {
                    idx += 1;
                    continue;
                }
            }
            let Some(pos) = self.buffer.edit_positions(idx).next() else {
                all = false;
                break;
            };
            idx = pos;

            if c == self.placeholder {
                idx += 1;
            } else if let Some(v) = self.accept(idx, c) {
                self.buffer.put(idx, Some(v));
                idx += 1;
            } else {
                all = false;
            }
        }
        all
    }

    /// Insert the text at the position.
    ///
    /// The text goes into the slots starting with the first editable
    /// position at or after `pos`. Existing values from there on move
    /// right by the length of the text. Literals stay where they are.
    /// A placeholder char in the text inserts an unset slot.
    ///
    /// Fails without any change if a char isn't accepted by its new
    /// slot, or if a value would be pushed past the last slot.
    pub fn insert_at(&mut self, text: &str, pos: upos_type) -> bool {
        let pos = pos as usize;
        if text.is_empty() || pos >= self.buffer.len() {
            return false;
        }

        let slots = self.buffer.edit_positions(pos).collect::<Vec<_>>();

        let mut moved = slots
            .iter()
            .map(|v| self.buffer.value(*v))
            .collect::<Vec<_>>();
        while let Some(None) = moved.last() {
            moved.pop();
        }

        let values = text
            .chars()
            .map(|c| (c != self.placeholder).then_some(c))
            .chain(moved)
            .collect::<Vec<_>>();
        if values.len() > slots.len() {
            return false;
        }

        let mut staged = Vec::with_capacity(slots.len());
        for (i, idx) in slots.iter().enumerate() {
            let v = match values.get(i).copied().flatten() {
                Some(c) => match self.accept(*idx, c) {
                    Some(c) => Some(c),
                    None => return false,
                },
                None => None,
            };
            staged.push((*idx, v));
        }

        for (idx, v) in staged {
            self.buffer.put(idx, v);
        }
        true
    }

    /// Overwrite the slots starting with the first editable position
    /// at or after `pos`. Literals in between are skipped.
    /// A placeholder char resets its slot.
    ///
    /// Fails without any change if the position is out of range,
    /// there are not enough slots, or a char is not accepted.
    pub fn replace_at(&mut self, text: &str, pos: upos_type) -> bool {
        let pos = pos as usize;
        if text.is_empty() || pos >= self.buffer.len() {
            return false;
        }

        let slots = self.buffer.edit_positions(pos).collect::<Vec<_>>();
        if text.chars().count() > slots.len() {
            return false;
        }

        let mut staged = Vec::with_capacity(slots.len());
        for (c, idx) in text.chars().zip(slots) {
            let v = if c == self.placeholder {
                None
            } else {
                match self.accept(idx, c) {
                    Some(c) => Some(c),
                    None => return false,
                }
            };
            staged.push((idx, v));
        }

        for (idx, v) in staged {
            self.buffer.put(idx, v);
        }
        true
    }

    /// Clear the slot at the position.
    ///
    /// The following values up to the next literal move one slot
    /// to the left. Nothing moves across a literal.
    ///
    /// Fails without any change if the position is out of range,
    /// is a literal, or a moved value is not accepted by its new slot.
    pub fn remove_at(&mut self, pos: upos_type) -> bool {
        let pos = pos as usize;
        if !self.buffer.is_editable(pos) {
            return false;
        }

        let run = self.buffer.run_at(pos);
        let mut staged = Vec::with_capacity(run.len());
        for idx in pos..run.end {
            let v = match self.buffer.value(idx + 1).filter(|_| idx + 1 < run.end) {
                Some(c) => match self.accept(idx, c) {
                    Some(c) => Some(c),
                    None => return false,
                },
                None => None,
            };
            staged.push((idx, v));
        }

        for (idx, v) in staged {
            self.buffer.put(idx, v);
        }
        true
    }

    /// Display string. Unset slots show the placeholder.
    pub fn to_display_string(&self) -> String {
        self.buffer.render(self.placeholder)
    }

    /// Only the values of the slots, without literals or placeholders.
    pub fn to_plain_string(&self) -> String {
        self.buffer.plain()
    }

    /// Find the nearest editable position, starting with `pos`.
    ///
    /// Searches towards the end if `forward`, otherwise towards
    /// the start. None if there is no editable position in that
    /// direction.
    pub fn find_edit_position_from(&self, pos: upos_type, forward: bool) -> Option<upos_type> {
        let pos = pos as usize;
        let len = self.buffer.len();
        if forward {
            self.buffer
                .edit_positions(pos)
                .next()
                .map(|v| v as upos_type)
        } else if len == 0 {
            None
        } else {
            (0..=pos.min(len - 1))
                .rev()
                .find(|v| self.buffer.is_editable(*v))
                .map(|v| v as upos_type)
        }
    }
}

#[cfg(test)]
mod test_engine {
    use crate::mask_engine::MaskEngine;

    #[test]
    fn test_insert_shift() {
        let mut m = MaskEngine::with_mask("000-000", '_').unwrap();
        assert!(m.set("12_-4"));
        assert_eq!(m.to_display_string(), "12_-4__");

        // shifts across the literal, gaps move along.
        assert!(m.insert_at("9", 0));
        assert_eq!(m.to_display_string(), "912-_4_");

        assert!(m.insert_at("8", 4));
        assert_eq!(m.to_display_string(), "912-8_4");

        // the last value would fall off
        assert!(!m.insert_at("7", 0));
        assert_eq!(m.to_display_string(), "912-8_4");
        assert!(!m.insert_at("", 0));
        assert!(!m.insert_at("7", 7));
    }

    #[test]
    fn test_insert_literal_pos() {
        let mut m = MaskEngine::with_mask("(00)", '_').unwrap();
        assert!(m.insert_at("5", 0));
        assert_eq!(m.to_display_string(), "(5_)");
        assert!(m.insert_at("4", 0));
        assert_eq!(m.to_display_string(), "(45)");
        assert!(!m.insert_at("3", 3));
    }

    #[test]
    fn test_set_drops() {
        let mut m = MaskEngine::with_mask("000-000", '_').unwrap();
        // '-' doesn't sit at the literal position and is dropped.
        assert!(!m.set("12-4"));
        assert_eq!(m.to_display_string(), "124-___");
        // too long
        assert!(!m.set("12345678"));
        assert_eq!(m.to_display_string(), "123-456");
    }

    #[test]
    fn test_insert_class() {
        let mut m = MaskEngine::with_mask("L0", '_').unwrap();
        assert!(m.set("a"));
        // 'a' would move into the digit slot.
        assert!(!m.insert_at("b", 0));
        assert_eq!(m.to_display_string(), "a_");
        assert!(!m.insert_at("1", 0));
        assert!(m.insert_at("1", 1));
        assert_eq!(m.to_display_string(), "a1");
    }

    #[test]
    fn test_remove_run() {
        let mut m = MaskEngine::with_mask("000-000", '_').unwrap();
        m.set("123456");
        assert_eq!(m.to_display_string(), "123-456");
        assert!(m.remove_at(0));
        assert_eq!(m.to_display_string(), "23_-456");
        assert!(m.remove_at(5));
        assert_eq!(m.to_display_string(), "23_-46_");
        assert!(!m.remove_at(3));
        assert!(!m.remove_at(7));
        assert_eq!(m.to_display_string(), "23_-46_");
    }

    #[test]
    fn test_remove_class() {
        let mut m = MaskEngine::with_mask("L0", '_').unwrap();
        m.set("a1");
        // '1' can't move into the letter slot.
        assert!(!m.remove_at(0));
        assert_eq!(m.to_display_string(), "a1");
        assert!(m.remove_at(1));
        assert_eq!(m.to_display_string(), "a_");
    }

    #[test]
    fn test_find() {
        let m = MaskEngine::with_mask("(00)", '_').unwrap();
        assert_eq!(m.find_edit_position_from(0, true), Some(1));
        assert_eq!(m.find_edit_position_from(2, true), Some(2));
        assert_eq!(m.find_edit_position_from(3, true), None);
        assert_eq!(m.find_edit_position_from(9, true), None);
        assert_eq!(m.find_edit_position_from(3, false), Some(2));
        assert_eq!(m.find_edit_position_from(9, false), Some(2));
        assert_eq!(m.find_edit_position_from(0, false), None);
    }

    #[test]
    fn test_complete() {
        let mut m = MaskEngine::with_mask("00-99", '_').unwrap();
        assert!(!m.is_complete());
        m.set("12");
        assert!(m.is_complete());
        assert_eq!(m.assigned_count(), 2);
        assert_eq!(m.available_count(), 2);
    }
}
