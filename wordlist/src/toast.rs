use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A short-lived notification about something that happened in the background.
#[derive(Debug, Clone)]
pub struct Toast {
    kind: ToastKind,
    title: String,
    message: String,
}

impl Toast {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn show(&self) {
        match self.kind {
            ToastKind::Success => tracing::debug!(title = %self.title, "{}", self.message),
            ToastKind::Error => tracing::warn!(title = %self.title, "{}", self.message),
        }
        println!("{self}");
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.kind {
            ToastKind::Success => "[ok]",
            ToastKind::Error => "[error]",
        };
        write!(f, "{marker} {}: {}", self.title, self.message)
    }
}
