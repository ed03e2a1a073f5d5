//!
//! Compiled input masks.
//!
//! The mask is parsed grapheme by grapheme. Each grapheme is either a
//! class designator and becomes an editable slot, a case conversion
//! switch that occupies no position, or a literal.
//!

use crate::MaskError;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use unicode_segmentation::UnicodeSegmentation;

/// Character class of an editable slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// `0`: digit, required.
    Digit,
    /// `9`: digit or space.
    DigitOrSpace,
    /// `#`: digit, space, plus or minus.
    DigitOrSign,
    /// `L`: letter, required.
    Letter,
    /// `?`: letter.
    LetterOpt,
    /// `A`: letter or digit, required.
    AlphaNumeric,
    /// `a`: letter or digit.
    AlphaNumericOpt,
    /// `&`: anything but control chars, required.
    AnyChar,
    /// `C`: anything but control chars.
    AnyCharOpt,
}

/// Case conversion for the following slots.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseConversion {
    /// `|`
    #[default]
    None,
    /// `<`
    Lower,
    /// `>`
    Upper,
}

/// One token of the input mask.
#[allow(variant_size_differences)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskToken {
    /// Fixed char, never edited.
    Literal(char),
    /// Editable slot.
    Slot(CharClass, CaseConversion),
}

/// Compiled mask.
///
/// The pattern is immutable once compiled. An empty pattern
/// means masking is disabled.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MaskPattern {
    source: Box<str>,
    tokens: Vec<MaskToken>,
}

impl CharClass {
    /// Class for a designator char.
    pub fn from_designator(c: char) -> Option<CharClass> {
        match c {
            '0' => Some(CharClass::Digit),
            '9' => Some(CharClass::DigitOrSpace),
            '#' => Some(CharClass::DigitOrSign),
            'L' => Some(CharClass::Letter),
            '?' => Some(CharClass::LetterOpt),
            'A' => Some(CharClass::AlphaNumeric),
            'a' => Some(CharClass::AlphaNumericOpt),
            '&' => Some(CharClass::AnyChar),
            'C' => Some(CharClass::AnyCharOpt),
            _ => None,
        }
    }

    /// Designator char for this class.
    pub fn designator(&self) -> char {
        match self {
            CharClass::Digit => '0',
            CharClass::DigitOrSpace => '9',
            CharClass::DigitOrSign => '#',
            CharClass::Letter => 'L',
            CharClass::LetterOpt => '?',
            CharClass::AlphaNumeric => 'A',
            CharClass::AlphaNumericOpt => 'a',
            CharClass::AnyChar => '&',
            CharClass::AnyCharOpt => 'C',
        }
    }

    /// Valid input for this class.
    #[inline]
    pub fn is_valid_char(&self, c: char) -> bool {
        match self {
            CharClass::Digit => c.is_ascii_digit(),
            CharClass::DigitOrSpace => c.is_ascii_digit() || c == ' ',
            CharClass::DigitOrSign => c.is_ascii_digit() || c == ' ' || c == '+' || c == '-',
            CharClass::Letter | CharClass::LetterOpt => c.is_alphabetic(),
            CharClass::AlphaNumeric | CharClass::AlphaNumericOpt => c.is_alphanumeric(),
            CharClass::AnyChar | CharClass::AnyCharOpt => !c.is_control(),
        }
    }

    /// The slot must be filled for the mask to be complete.
    #[inline]
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            CharClass::Digit | CharClass::Letter | CharClass::AlphaNumeric | CharClass::AnyChar
        )
    }
}

impl Debug for CharClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.designator())
    }
}

impl CaseConversion {
    /// Convert the char. Conversions that would produce more
    /// than one char leave the char as it is.
    pub fn apply(&self, c: char) -> char {
        fn single(mut it: impl Iterator<Item = char>) -> Option<char> {
            let c = it.next()?;
            if it.next().is_some() { None } else { Some(c) }
        }

        match self {
            CaseConversion::None => c,
            CaseConversion::Lower => single(c.to_lowercase()).unwrap_or(c),
            CaseConversion::Upper => single(c.to_uppercase()).unwrap_or(c),
        }
    }

    fn designator(&self) -> char {
        match self {
            CaseConversion::None => '|',
            CaseConversion::Lower => '<',
            CaseConversion::Upper => '>',
        }
    }
}

impl MaskToken {
    /// Is a fixed char.
    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(self, MaskToken::Literal(_))
    }

    /// Is an editable slot.
    #[inline]
    pub fn is_editable(&self) -> bool {
        matches!(self, MaskToken::Slot(_, _))
    }

    /// Test the char against the slot and apply any case conversion.
    ///
    /// Returns the char as it will be stored, or None if the
    /// slot doesn't accept it. Literals accept nothing.
    #[inline]
    pub fn accept(&self, c: char) -> Option<char> {
        match self {
            MaskToken::Literal(_) => None,
            MaskToken::Slot(class, case) => {
                let c = case.apply(c);
                class.is_valid_char(c).then_some(c)
            }
        }
    }
}

impl Debug for MaskToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MaskToken::Literal(c) => write!(f, "\\{}", c),
            MaskToken::Slot(class, CaseConversion::None) => write!(f, "{:?}", class),
            MaskToken::Slot(class, case) => write!(f, "{}{:?}", case.designator(), class),
        }
    }
}

impl MaskPattern {
    /// Compile a mask.
    ///
    /// * `0`: digit, required.
    /// * `9`: digit or space.
    /// * `#`: digit, space, plus or minus.
    /// * `L`: letter, required.
    /// * `?`: letter.
    /// * `A`: letter or digit, required.
    /// * `a`: letter or digit.
    /// * `&`: any non-control char, required.
    /// * `C`: any non-control char.
    /// * `<`, `>`, `|`: lowercase, uppercase or no conversion for
    ///   the following slots. These don't occupy a position.
    /// * `\`: escapes the following char and uses it as a literal.
    /// * everything else is a literal.
    ///
    /// Fails if the mask ends with a lone `\` or contains a grapheme
    /// that doesn't fit into a single cell.
    pub fn compile(mask: &str) -> Result<MaskPattern, MaskError> {
        let mut tokens = Vec::new();
        let mut case = CaseConversion::None;
        let mut esc = false;

        for (byte_pos, g) in mask.grapheme_indices(true) {
            let mut it = g.chars();
            let (Some(c), None) = (it.next(), it.next()) else {
                return Err(MaskError::InvalidMask(format!(
                    "grapheme {:?} at byte {} doesn't fit into one cell",
                    g, byte_pos
                )));
            };

            if esc {
                esc = false;
                tokens.push(MaskToken::Literal(c));
                continue;
            }

            match c {
                '\\' => esc = true,
                '<' => case = CaseConversion::Lower,
                '>' => case = CaseConversion::Upper,
                '|' => case = CaseConversion::None,
                c => match CharClass::from_designator(c) {
                    Some(class) => tokens.push(MaskToken::Slot(class, case)),
                    None => tokens.push(MaskToken::Literal(c)),
                },
            }
        }
        if esc {
            return Err(MaskError::InvalidMask(
                "escape char at the end of the mask".into(),
            ));
        }

        Ok(MaskPattern {
            source: mask.into(),
            tokens,
        })
    }

    /// The mask as given to compile().
    #[inline]
    pub fn as_str(&self) -> &str {
        self.source.as_ref()
    }

    /// No tokens. Masking is disabled.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// All tokens.
    #[inline]
    pub fn tokens(&self) -> &[MaskToken] {
        &self.tokens
    }

    /// Token at the position.
    #[inline]
    pub fn token(&self, idx: usize) -> Option<&MaskToken> {
        self.tokens.get(idx)
    }

    /// Number of editable slots.
    pub fn edit_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_editable()).count()
    }
}

impl Display for MaskPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
