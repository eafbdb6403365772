use std::sync::Mutex;
use crate::request::lock;

/// Where the "page title" goes. The detail controller announces the open
/// movie through this and restores the default when the view closes.
///
/// Called while the controller holds its state lock, so implementations
/// must not call back into the controller.
pub trait TitleSink: Send + Sync {
    fn set_title(&self, title: &str);
}

/// Keeps every title it was given. Useful wherever the title has no real
/// destination, and as a test double.
#[derive(Debug, Default)]
pub struct RecordingTitleSink {
    titles: Mutex<Vec<String>>,
}

impl RecordingTitleSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<String> {
        lock(&self.titles).last().cloned()
    }

    pub fn history(&self) -> Vec<String> {
        lock(&self.titles).clone()
    }
}

impl TitleSink for RecordingTitleSink {
    fn set_title(&self, title: &str) {
        lock(&self.titles).push(title.to_string());
    }
}
