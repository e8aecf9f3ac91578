//! Clipboard sink abstraction
//!
//! Copy operations hand exactly one decrypted field string to a
//! [`ClipboardSink`]. The actual clipboard access is supplied by the
//! frontend; tests use the in-memory mock.

/// Clipboard interface
pub trait ClipboardSink {
    /// Copy text to the clipboard
    fn copy(&self, text: &str) -> bool;

    /// Clear the clipboard
    fn clear(&self) -> bool;
}

/// Mock clipboard for testing
#[derive(Default)]
pub struct MockClipboard {
    content: std::sync::RwLock<Option<String>>,
}

impl MockClipboard {
    /// Create new mock clipboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Current content, if any
    pub fn content(&self) -> Option<String> {
        self.content.read().unwrap().clone()
    }
}

impl ClipboardSink for MockClipboard {
    fn copy(&self, text: &str) -> bool {
        *self.content.write().unwrap() = Some(text.to_string());
        true
    }

    fn clear(&self) -> bool {
        *self.content.write().unwrap() = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_clipboard() {
        let clipboard = MockClipboard::new();
        assert!(clipboard.content().is_none());

        clipboard.copy("hello");
        assert_eq!(clipboard.content(), Some("hello".to_string()));

        clipboard.clear();
        assert!(clipboard.content().is_none());
    }
}
