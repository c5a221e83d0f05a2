//! Banner/toast state: the latest outcome to show the user.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            NoticeKind::Success => "ok",
            NoticeKind::Error => "error",
            NoticeKind::Info => "info",
        };
        write!(f, "[{tag}] {}", self.text)
    }
}

/// Holds the most recent notice until it is taken for display.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    latest: Option<Notice>,
}

impl NoticeBoard {
    pub fn post(&mut self, notice: Notice) {
        if notice.is_error() {
            tracing::debug!(text = %notice.text, "Error notice posted");
        }
        self.latest = Some(notice);
    }

    pub fn take(&mut self) -> Option<Notice> {
        self.latest.take()
    }
}
