//! Client bootstrap.
//!
//! Attaches interactive behavior to markup the server already delivered.
//! The style context starts from a FRESH cache: hydration does not
//! re-extract or re-inject styles, so no server-side cache state is carried
//! over - only the cache API shape is shared, giving later client-driven
//! style computation somewhere to accumulate.

use inkstream_core::StyleCache;

use crate::error::Result;

/// Boundary to the external DOM layer that makes delivered markup
/// interactive.
pub trait InteractiveRoot {
    /// Attach interactivity, reading any style context from `styles`.
    fn attach(&mut self, styles: &StyleCache) -> Result<()>;
}

/// Style context established for one client session.
#[derive(Debug)]
pub struct ClientContext {
    cache: StyleCache,
}

impl ClientContext {
    pub fn cache(&self) -> &StyleCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut StyleCache {
        &mut self.cache
    }
}

/// Attach interactivity to already-rendered markup under a fresh style
/// collection context. Failures propagate; the serving layer owns any
/// fallback rendering.
pub fn hydrate<R: InteractiveRoot>(root: &mut R) -> Result<ClientContext> {
    let cache = StyleCache::new();
    root.attach(&cache)?;
    Ok(ClientContext { cache })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;

    struct RecordingRoot {
        attached: bool,
        saw_fresh_cache: bool,
    }

    impl InteractiveRoot for RecordingRoot {
        fn attach(&mut self, styles: &StyleCache) -> Result<()> {
            self.attached = true;
            self.saw_fresh_cache = styles.is_empty() && !styles.is_sealed();
            Ok(())
        }
    }

    struct FailingRoot;

    impl InteractiveRoot for FailingRoot {
        fn attach(&mut self, _styles: &StyleCache) -> Result<()> {
            Err(RenderError::Hydration("no root element".to_string()))
        }
    }

    #[test]
    fn test_hydrate_uses_fresh_cache() {
        let mut root = RecordingRoot {
            attached: false,
            saw_fresh_cache: false,
        };
        let context = hydrate(&mut root).unwrap();
        assert!(root.attached);
        assert!(root.saw_fresh_cache);
        // The session cache stays writable for later style computation.
        assert!(!context.cache().is_sealed());
    }

    #[test]
    fn test_hydrate_failure_propagates() {
        let result = hydrate(&mut FailingRoot);
        assert!(matches!(result, Err(RenderError::Hydration(_))));
    }
}
