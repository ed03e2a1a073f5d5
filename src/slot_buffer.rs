//!
//! Runtime state of a mask. One cell per mask position.
//!

use crate::mask_token::{MaskPattern, MaskToken};
use std::ops::Range;

/// One cell of the slot buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Fixed char of the mask.
    Literal(char),
    /// Editable and empty.
    Unset,
    /// Editable with a value.
    Value(char),
}

/// Slot buffer.
///
/// Same length and order as the mask it was created from.
/// Literal cells keep their char for the lifetime of the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotBuffer {
    cells: Vec<Cell>,
}

impl Cell {
    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(self, Cell::Literal(_))
    }

    #[inline]
    pub fn is_editable(&self) -> bool {
        !self.is_literal()
    }

    /// Assigned value of an editable cell.
    #[inline]
    pub fn value(&self) -> Option<char> {
        match self {
            Cell::Value(c) => Some(*c),
            _ => None,
        }
    }
}

impl SlotBuffer {
    /// New buffer with all editable cells unset.
    pub fn new(pattern: &MaskPattern) -> Self {
        Self {
            cells: pattern
                .tokens()
                .iter()
                .map(|t| match t {
                    MaskToken::Literal(c) => Cell::Literal(*c),
                    MaskToken::Slot(_, _) => Cell::Unset,
                })
                .collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn cell(&self, idx: usize) -> Option<Cell> {
        self.cells.get(idx).copied()
    }

    /// Assigned value at the position.
    #[inline]
    pub fn value(&self, idx: usize) -> Option<char> {
        self.cells.get(idx).and_then(|v| v.value())
    }

    /// Position is inside the buffer and editable.
    #[inline]
    pub fn is_editable(&self, idx: usize) -> bool {
        self.cells.get(idx).is_some_and(|v| v.is_editable())
    }

    /// Set or clear the value of an editable cell.
    ///
    /// Literal cells and positions outside the buffer are left alone,
    /// the result is false then.
    pub(crate) fn put(&mut self, idx: usize, value: Option<char>) -> bool {
        match self.cells.get_mut(idx) {
            Some(Cell::Literal(_)) | None => false,
            Some(cell) => {
                *cell = match value {
                    Some(c) => Cell::Value(c),
                    None => Cell::Unset,
                };
                true
            }
        }
    }

    /// Reset all editable cells.
    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut() {
            if cell.is_editable() {
                *cell = Cell::Unset;
            }
        }
    }

    /// Indexes of the editable cells starting at the position.
    pub fn edit_positions(&self, from: usize) -> impl Iterator<Item = usize> + '_ {
        (from..self.cells.len()).filter(|v| self.cells[*v].is_editable())
    }

    /// Consecutive editable cells around the position,
    /// delimited by literals or the ends of the buffer.
    ///
    /// Empty range if the position is not editable.
    pub fn run_at(&self, idx: usize) -> Range<usize> {
        if !self.is_editable(idx) {
            return idx..idx;
        }
        let mut start = idx;
        while start > 0 && self.cells[start - 1].is_editable() {
            start -= 1;
        }
        let mut end = idx + 1;
        while end < self.cells.len() && self.cells[end].is_editable() {
            end += 1;
        }
        start..end
    }

    /// Number of editable cells with a value.
    pub fn assigned_count(&self) -> usize {
        self.cells.iter().filter(|v| v.value().is_some()).count()
    }

    /// Number of editable cells without a value.
    pub fn available_count(&self) -> usize {
        self.cells.iter().filter(|v| **v == Cell::Unset).count()
    }

    /// Literals and values, unset cells show the placeholder.
    pub fn render(&self, placeholder: char) -> String {
        self.cells
            .iter()
            .map(|v| match v {
                Cell::Literal(c) | Cell::Value(c) => *c,
                Cell::Unset => placeholder,
            })
            .collect()
    }

    /// Only the assigned values.
    pub fn plain(&self) -> String {
        self.cells.iter().filter_map(|v| v.value()).collect()
    }
}

#[cfg(test)]
mod test_buffer {
    use crate::mask_token::MaskPattern;
    use crate::slot_buffer::{Cell, SlotBuffer};

    #[test]
    fn test_new() {
        let m = MaskPattern::compile("LL-00").unwrap();
        let b = SlotBuffer::new(&m);
        assert_eq!(b.len(), 5);
        assert_eq!(
            b.cells(),
            &[
                Cell::Unset,
                Cell::Unset,
                Cell::Literal('-'),
                Cell::Unset,
                Cell::Unset
            ]
        );
        assert_eq!(b.render('_'), "__-__");
        assert_eq!(b.plain(), "");
        assert_eq!(b.available_count(), 4);
    }

    #[test]
    fn test_put() {
        let m = MaskPattern::compile("LL-00").unwrap();
        let mut b = SlotBuffer::new(&m);

        assert!(b.put(0, Some('a')));
        assert!(b.put(4, Some('7')));
        assert!(!b.put(2, Some('x')));
        assert!(!b.put(5, Some('x')));
        assert_eq!(b.render('*'), "a*-*7");
        assert_eq!(b.plain(), "a7");
        assert_eq!(b.assigned_count(), 2);
        assert_eq!(b.value(0), Some('a'));
        assert_eq!(b.value(2), None);

        b.clear();
        assert_eq!(b.render('*'), "**-**");
    }

    #[test]
    fn test_runs() {
        let m = MaskPattern::compile("(000) 000-0000").unwrap();
        let b = SlotBuffer::new(&m);

        assert_eq!(b.run_at(0), 0..0);
        assert_eq!(b.run_at(1), 1..4);
        assert_eq!(b.run_at(3), 1..4);
        assert_eq!(b.run_at(6), 6..9);
        assert_eq!(b.run_at(13), 10..14);
        assert_eq!(b.run_at(14), 14..14);

        assert_eq!(b.edit_positions(8).take(3).collect::<Vec<_>>(), vec![8, 10, 11]);
    }
}
