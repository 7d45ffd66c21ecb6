// File: ./src/system.rs
//! User-visible notifications at the end of a sync cycle.
use notify_rust::Notification;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Failure,
            message: message.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Writes notices to the log only. Used when desktop notifications are off.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.kind {
            NoticeKind::Success => log::info!("{}", notice.message),
            NoticeKind::Failure => log::warn!("{}", notice.message),
        }
    }
}

/// OS notification through the desktop's notification daemon.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    app_name: String,
}

impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new("Prayer Notes")
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, notice: &Notice) {
        LogNotifier.notify(notice);

        let summary = match notice.kind {
            NoticeKind::Success => "Prayer times",
            NoticeKind::Failure => "Prayer times: sync failed",
        };
        let body = notice.message.clone();
        let app_name = self.app_name.clone();

        // Showing can block on the D-Bus round trip; keep it off the async runtime.
        std::thread::spawn(move || {
            if let Err(e) = Notification::new()
                .summary(summary)
                .body(&body)
                .appname(&app_name)
                .show()
            {
                log::debug!("Desktop notification failed: {}", e);
            }
        });
    }
}
