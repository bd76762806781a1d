//! Transient notification queue.
//!
//! Toasts live in one process-wide queue published over a watch channel;
//! surfaces render the current list grouped by screen position. Each toast
//! gets its own dismiss timer, so dismissing one never disturbs the timers
//! of its neighbors. Dismissal is idempotent: a manual dismiss racing the
//! timer is harmless.
//!
//! Must be used inside a Tokio runtime; pushing a toast spawns its timer.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;

/// Default time a toast stays on screen.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(3);

/// Identifier for one toast, unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ToastId(u64);

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "toast-{}", self.0)
    }
}

/// Visual flavor of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

/// Where on screen a toast is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ToastPosition {
    TopLeft,
    TopCenter,
    #[default]
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// One visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
    pub position: ToastPosition,
}

/// Presentation options for one toast.
#[derive(Debug, Clone, Copy)]
pub struct ToastOptions {
    /// How long the toast stays up before auto-dismissing.
    pub duration: Duration,
    pub position: ToastPosition,
}

impl Default for ToastOptions {
    fn default() -> Self {
        Self {
            duration: DEFAULT_TOAST_DURATION,
            position: ToastPosition::default(),
        }
    }
}

/// The process-wide toast queue. Cheap to clone; all clones share the same
/// queue.
#[derive(Clone)]
pub struct ToastQueue {
    inner: Arc<QueueInner>,
}

struct QueueInner {
    tx: watch::Sender<Vec<Toast>>,
    next_id: AtomicU64,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastQueue {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(QueueInner {
                tx,
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Subscribe to queue snapshots. The receiver immediately sees the
    /// current list.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.inner.tx.subscribe()
    }

    /// Current toasts, oldest first.
    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        self.inner.tx.borrow().clone()
    }

    /// Current toasts grouped by screen position, oldest first within each
    /// group.
    #[must_use]
    pub fn by_position(&self) -> BTreeMap<ToastPosition, Vec<Toast>> {
        let mut groups: BTreeMap<ToastPosition, Vec<Toast>> = BTreeMap::new();
        for toast in self.inner.tx.borrow().iter() {
            groups.entry(toast.position).or_default().push(toast.clone());
        }
        groups
    }

    /// Show a toast and start its dismiss timer.
    pub fn push(
        &self,
        kind: ToastKind,
        message: impl Into<String>,
        options: ToastOptions,
    ) -> ToastId {
        let id = ToastId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let toast = Toast {
            id,
            kind,
            message: message.into(),
            position: options.position,
        };
        self.inner.tx.send_modify(|toasts| toasts.push(toast));

        let queue = self.clone();
        tokio::spawn(async move {
            sleep(options.duration).await;
            queue.dismiss(id);
        });
        id
    }

    /// Remove a toast. Idempotent: dismissing an id that is already gone
    /// does nothing and publishes nothing.
    pub fn dismiss(&self, id: ToastId) {
        self.inner.tx.send_if_modified(|toasts| {
            let before = toasts.len();
            toasts.retain(|t| t.id != id);
            toasts.len() != before
        });
    }

    pub fn success(&self, message: impl Into<String>) -> ToastId {
        self.push(ToastKind::Success, message, ToastOptions::default())
    }

    pub fn error(&self, message: impl Into<String>) -> ToastId {
        self.push(ToastKind::Error, message, ToastOptions::default())
    }

    pub fn warning(&self, message: impl Into<String>) -> ToastId {
        self.push(ToastKind::Warning, message, ToastOptions::default())
    }

    pub fn info(&self, message: impl Into<String>) -> ToastId {
        self.push(ToastKind::Info, message, ToastOptions::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn toasts_auto_dismiss_after_their_duration() {
        let queue = ToastQueue::new();
        queue.success("Saved");
        assert_eq!(queue.toasts().len(), 1);

        tokio::time::sleep(DEFAULT_TOAST_DURATION + Duration::from_millis(10)).await;
        tokio::task::yield_now().await;
        assert!(queue.toasts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dismissing_one_toast_leaves_the_others() {
        let queue = ToastQueue::new();
        let first = queue.error("Failed");
        let second = queue.info("FYI");

        queue.dismiss(first);
        let remaining = queue.toasts();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second);
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_is_idempotent() {
        let queue = ToastQueue::new();
        let id = queue.success("Done");
        queue.dismiss(id);
        queue.dismiss(id);
        assert!(queue.toasts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn ids_are_unique_and_monotonic() {
        let queue = ToastQueue::new();
        let a = queue.info("a");
        let b = queue.info("b");
        assert!(b > a);
    }

    #[tokio::test(start_paused = true)]
    async fn by_position_groups_in_render_order() {
        let queue = ToastQueue::new();
        queue.push(
            ToastKind::Info,
            "left",
            ToastOptions {
                position: ToastPosition::BottomLeft,
                ..ToastOptions::default()
            },
        );
        let right_a = queue.success("right-1");
        let right_b = queue.success("right-2");

        let groups = queue.by_position();
        assert_eq!(groups.len(), 2);
        let right = &groups[&ToastPosition::TopRight];
        assert_eq!(right[0].id, right_a);
        assert_eq!(right[1].id, right_b);
    }

    #[tokio::test(start_paused = true)]
    async fn staggered_toasts_expire_independently() {
        let queue = ToastQueue::new();
        let short = queue.push(
            ToastKind::Info,
            "short",
            ToastOptions {
                duration: Duration::from_secs(1),
                ..ToastOptions::default()
            },
        );
        let long = queue.push(
            ToastKind::Info,
            "long",
            ToastOptions {
                duration: Duration::from_secs(10),
                ..ToastOptions::default()
            },
        );

        tokio::time::sleep(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        let toasts = queue.toasts();
        assert!(toasts.iter().all(|t| t.id != short));
        assert!(toasts.iter().any(|t| t.id == long));
    }
}
