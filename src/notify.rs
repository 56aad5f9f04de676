use std::time::{Duration, Instant};

use crate::error::ActionError;

// ---------------------------------------------------------------------------
// Notices – transient user-facing messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn from_error(err: &ActionError) -> Self {
        Self {
            severity: err.severity(),
            message: err.to_string(),
        }
    }
}

/// Outcome of a user-triggered action.
pub type ActionResult = Result<Notice, ActionError>;

// ---------------------------------------------------------------------------
// Notifications – the display sink
// ---------------------------------------------------------------------------

/// Queue of notices shown as toasts until they expire.
#[derive(Debug)]
pub struct Notifications {
    active: Vec<(Notice, Instant)>,
    lifetime: Duration,
}

impl Notifications {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            active: Vec::new(),
            lifetime,
        }
    }

    pub fn push(&mut self, notice: Notice) {
        match notice.severity {
            Severity::Error => log::error!("{}", notice.message),
            Severity::Warning => log::warn!("{}", notice.message),
            Severity::Success | Severity::Info => log::info!("{}", notice.message),
        }
        self.active.push((notice, Instant::now()));
    }

    /// Route an action outcome into the queue.
    pub fn report(&mut self, result: ActionResult) {
        let notice = match result {
            Ok(notice) => notice,
            Err(err) => Notice::from_error(&err),
        };
        self.push(notice);
    }

    /// Drop expired notices and return the rest, oldest first.
    pub fn visible(&mut self) -> impl Iterator<Item = &Notice> {
        let lifetime = self.lifetime;
        self.active.retain(|(_, at)| at.elapsed() < lifetime);
        self.active.iter().map(|(n, _)| n)
    }
}
