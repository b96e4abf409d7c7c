//! Style collection cache.
//!
//! During a render pass every style computed by the component layer is
//! recorded here, keyed by the styling engine's rule hash. After the render
//! reaches its ready point the cache is serialized once and sealed; the
//! resulting text is what gets injected into the document head.

use std::collections::HashSet;

use crate::error::{CoreError, Result};

/// Value of the `id` attribute on the injected style element. Downstream
/// consumers treat this as the idempotency marker.
pub const STYLE_ELEMENT_ID: &str = "inkstream-styles";

/// Accumulator for styles computed during a single render pass.
///
/// Write-only while the render is in flight, immutable once [`extract`]
/// has been called. One cache per server render, or per client session.
///
/// [`extract`]: StyleCache::extract
#[derive(Debug, Default)]
pub struct StyleCache {
    rules: Vec<String>,
    keys: HashSet<String>,
    sealed: bool,
}

impl StyleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a style rule under the engine's rule key.
    ///
    /// Duplicate keys are ignored (returns `Ok(false)`), preserving the
    /// insertion order of first occurrences so the cascade is stable.
    /// Fails once the cache has been sealed by extraction.
    pub fn insert(&mut self, key: &str, css: &str) -> Result<bool> {
        if self.sealed {
            return Err(CoreError::CacheSealed);
        }
        if !self.keys.insert(key.to_string()) {
            return Ok(false);
        }
        self.rules.push(css.to_string());
        Ok(true)
    }

    /// Serialize all collected rules to one text blob and seal the cache.
    pub fn extract(&mut self) -> Result<String> {
        if self.sealed {
            return Err(CoreError::CacheSealed);
        }
        self.sealed = true;
        Ok(self.rules.concat())
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Wrap serialized styles in the style element injected before `</head>`.
pub fn style_tag(css: &str) -> String {
    format!(r#"<style id="{STYLE_ELEMENT_ID}">{css}</style>"#)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order() {
        let mut cache = StyleCache::new();
        cache.insert("a", ".a{color:red}").unwrap();
        cache.insert("b", ".b{color:blue}").unwrap();
        assert_eq!(cache.extract().unwrap(), ".a{color:red}.b{color:blue}");
    }

    #[test]
    fn test_insert_dedupes_by_key() {
        let mut cache = StyleCache::new();
        assert!(cache.insert("a", ".a{}").unwrap());
        assert!(!cache.insert("a", ".a-again{}").unwrap());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.extract().unwrap(), ".a{}");
    }

    #[test]
    fn test_extract_seals() {
        let mut cache = StyleCache::new();
        cache.insert("a", ".a{}").unwrap();
        cache.extract().unwrap();
        assert!(cache.is_sealed());
        assert_eq!(cache.insert("b", ".b{}"), Err(CoreError::CacheSealed));
        assert_eq!(cache.extract(), Err(CoreError::CacheSealed));
    }

    #[test]
    fn test_empty_cache_extracts_empty() {
        let mut cache = StyleCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.extract().unwrap(), "");
    }

    #[test]
    fn test_style_tag_carries_id_marker() {
        let tag = style_tag(".a{}");
        assert_eq!(tag, r#"<style id="inkstream-styles">.a{}</style>"#);
    }
}
