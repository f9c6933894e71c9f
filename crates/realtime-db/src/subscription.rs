use std::fmt;

type Release = Box<dyn FnOnce() + Send>;

/// A live subscription to one path of the store.
///
/// Call [`Subscription::release`] when the owner goes away. A handle dropped
/// without being released still unregisters itself, but logs a warning since
/// that usually means the owner forgot about it.
pub struct Subscription {
    path: String,
    release: Option<Release>,
}

impl Subscription {
    pub fn new(path: impl Into<String>, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            path: path.into(),
            release: Some(Box::new(release)),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn release(mut self) {
        if let Some(release) = self.release.take() {
            tracing::debug!(path = %self.path, "releasing subscription");
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            tracing::warn!(path = %self.path, "subscription dropped without being released");
            release();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("path", &self.path)
            .field("released", &self.release.is_none())
            .finish()
    }
}
