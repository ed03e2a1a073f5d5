//!
//! Memoized mask engine.
//!
//! The engine is consulted with every keystroke. The cache keeps the
//! engine for the current (mask, placeholder) pair and only compiles
//! the mask again if one of them changes.
//!

use crate::mask_engine::MaskEngine;
use crate::mask_token::MaskPattern;
use crate::MaskError;
use log::debug;

/// Mask cache.
///
/// Holds at most one engine. It's not meant to be shared between
/// fields.
#[derive(Debug, Default, Clone)]
pub struct MaskCache {
    cached: Option<CachedMask>,
}

#[derive(Debug, Clone)]
struct CachedMask {
    mask: Box<str>,
    placeholder: char,
    // None for an empty mask
    engine: Option<MaskEngine>,
}

impl MaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine for the mask and placeholder.
    ///
    /// If either differs from the last call, the mask is compiled and
    /// a new engine is filled with `plain_text`. Otherwise the existing
    /// engine is returned as is and `plain_text` is ignored.
    ///
    /// An empty mask gives no engine.
    ///
    /// If the mask doesn't compile the error is returned and the
    /// previous engine stays in place.
    pub fn get(
        &mut self,
        mask: &str,
        placeholder: char,
        plain_text: &str,
    ) -> Result<Option<&mut MaskEngine>, MaskError> {
        if !self.is_valid_for(mask, placeholder) {
            let pattern = MaskPattern::compile(mask)?;
            debug!(
                "mask engine for {:?} placeholder {:?}",
                mask, placeholder
            );
            let engine = if pattern.is_empty() {
                None
            } else {
                let mut engine = MaskEngine::new(pattern, placeholder);
                engine.set(plain_text);
                Some(engine)
            };
            self.cached = Some(CachedMask {
                mask: mask.into(),
                placeholder,
                engine,
            });
        }
        Ok(self.current_mut())
    }

    /// The cached engine fits the mask and placeholder.
    pub fn is_valid_for(&self, mask: &str, placeholder: char) -> bool {
        match &self.cached {
            Some(c) => c.mask.as_ref() == mask && c.placeholder == placeholder,
            None => false,
        }
    }

    /// Current engine without any validation.
    pub fn current(&self) -> Option<&MaskEngine> {
        self.cached.as_ref().and_then(|v| v.engine.as_ref())
    }

    /// Current engine without any validation.
    pub fn current_mut(&mut self) -> Option<&mut MaskEngine> {
        self.cached.as_mut().and_then(|v| v.engine.as_mut())
    }

    /// Forget the engine.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

#[cfg(test)]
mod test_cache {
    use crate::MaskError;
    use crate::mask_cache::MaskCache;

    #[test]
    fn test_memo() {
        let mut c = MaskCache::new();
        let m = c.get("000-000", '_', "12").unwrap().unwrap();
        assert_eq!(m.to_display_string(), "12_-___");
        assert!(m.insert_at("9", 0));

        // same key, the engine survives and the text is ignored.
        let m = c.get("000-000", '_', "").unwrap().unwrap();
        assert_eq!(m.to_display_string(), "912-___");
        assert!(c.is_valid_for("000-000", '_'));
    }

    #[test]
    fn test_rebuild() {
        let mut c = MaskCache::new();
        c.get("000-000", '_', "12").unwrap();
        let m = c.get("000-000", '*', "12").unwrap().unwrap();
        assert_eq!(m.to_display_string(), "12*-***");
        assert!(!c.is_valid_for("000-000", '_'));

        // empty mask, no engine
        assert!(c.get("", '*', "12").unwrap().is_none());
        assert!(c.current().is_none());
        assert!(c.is_valid_for("", '*'));
    }

    #[test]
    fn test_error_keeps() {
        let mut c = MaskCache::new();
        c.get("00", '_', "1").unwrap();
        assert!(matches!(
            c.get("00\\", '_', "1"),
            Err(MaskError::InvalidMask(_))
        ));
        assert!(c.is_valid_for("00", '_'));
        assert_eq!(c.current().map(|v| v.to_display_string()), Some("1_".into()));

        c.invalidate();
        assert!(c.current().is_none());
    }
}
