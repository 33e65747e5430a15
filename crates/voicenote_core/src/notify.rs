//! User-feedback notification sink.
//!
//! # Responsibility
//! - Define the fire-and-forget notice contract used by store and capture.
//! - Provide a log-backed sink and a collecting sink.
//!
//! # Invariants
//! - Notifying never fails and never changes store or capture state.

use log::{info, warn};
use std::cell::RefCell;
use std::rc::Rc;

pub const NOTICE_NOTE_SAVED: &str = "Note saved successfully!";
pub const NOTICE_NOTE_DELETED: &str = "Note deleted successfully!";
pub const NOTICE_EMPTY_CONTENT: &str = "A note needs some text before it can be saved!";
pub const NOTICE_SPEECH_UNAVAILABLE: &str =
    "Unfortunately this environment does not support speech recording!";
pub const NOTICE_SPEECH_START_FAILED: &str = "Speech recording could not be started.";

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

impl NoticeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// One emitted notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Side-channel sink for user feedback.
pub trait Notifier {
    fn notify(&self, kind: NoticeKind, message: &str);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, kind: NoticeKind, message: &str) {
        (**self).notify(kind, message);
    }
}

impl<N: Notifier + ?Sized> Notifier for Rc<N> {
    fn notify(&self, kind: NoticeKind, message: &str) {
        (**self).notify(kind, message);
    }
}

/// Routes notices into the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Error => warn!("event=notice kind={} message={}", kind.as_str(), message),
            _ => info!("event=notice kind={} message={}", kind.as_str(), message),
        }
    }
}

/// Collects notices in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notices: RefCell<Vec<Notice>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every notice emitted so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    /// Removes and returns collected notices.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.borrow_mut())
    }

    pub fn count(&self, kind: NoticeKind) -> usize {
        self.notices
            .borrow()
            .iter()
            .filter(|notice| notice.kind == kind)
            .count()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        self.notices.borrow_mut().push(Notice {
            kind,
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryNotifier, NoticeKind, Notifier};
    use std::rc::Rc;

    #[test]
    fn shared_memory_notifier_sees_notices_through_rc() {
        let sink = Rc::new(MemoryNotifier::new());
        let handle = Rc::clone(&sink);
        handle.notify(NoticeKind::Info, "hi");
        handle.notify(NoticeKind::Error, "bad");

        assert_eq!(sink.count(NoticeKind::Info), 1);
        assert_eq!(sink.count(NoticeKind::Error), 1);
        assert_eq!(sink.drain().len(), 2);
        assert!(sink.notices().is_empty());
    }
}
