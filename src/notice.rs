//! Notifications
//!
//! Transient messages shown after a move fails, with an optional retry.

use leptos::task::spawn_local;

use crate::board::MoveOutcome;
use crate::error::ApiError;
use crate::store::{store_dismiss_notice, store_push_notice, AppStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Move to re-issue from a notice's Retry action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryMove {
    pub opportunity_id: u32,
    pub to_status: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    /// Assigned by the store
    pub id: u32,
    pub kind: NoticeKind,
    pub message: String,
    pub retry: Option<RetryMove>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            id: 0,
            kind: NoticeKind::Info,
            message: message.into(),
            retry: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            id: 0,
            kind: NoticeKind::Error,
            message: message.into(),
            retry: None,
        }
    }

    /// Notice for a move that did not go through
    ///
    /// `title` names the opportunity; transient errors get a retry action.
    pub fn for_failed_move(title: &str, error: &ApiError, retry: RetryMove) -> Self {
        let mut notice = Notice::error(format!("Could not move \"{}\": {}.", title, error.user_message()));
        if error.is_retryable() {
            notice.retry = Some(retry);
        }
        notice
    }

    /// Notice for a move outcome, if the user should hear about it
    pub fn for_outcome(outcome: &MoveOutcome, title: &str, retry: RetryMove) -> Option<Self> {
        match outcome {
            MoveOutcome::Removed { .. } => Some(Notice::info(format!(
                "\"{}\" was deleted and has been removed from the board.",
                title
            ))),
            _ => outcome.error().map(|error| Notice::for_failed_move(title, error, retry)),
        }
    }

    pub fn class(&self) -> &'static str {
        match self.kind {
            NoticeKind::Info => "notice notice-info",
            NoticeKind::Error => "notice notice-error",
        }
    }
}

/// Show a notice and dismiss it after `timeout_ms`
pub fn show_notice(store: AppStore, notice: Notice, timeout_ms: u32) -> u32 {
    let id = store_push_notice(&store, notice);
    spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(timeout_ms).await;
        store_dismiss_notice(&store, id);
    });
    id
}
