//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::board::BoardState;
use crate::controller::BoardCell;
use crate::error::ApiError;
use crate::notice::Notice;

/// Board load progress
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

impl LoadStatus {
    /// Status for a load that returned `error`
    ///
    /// Unauthorized loads end in a redirect; the status stays visible if the
    /// navigation is blocked.
    pub fn failed(error: &ApiError) -> Self {
        match error {
            ApiError::Unauthorized => LoadStatus::Failed("your session has expired, please sign in again".to_string()),
            other => LoadStatus::Failed(other.to_string()),
        }
    }
}

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Pipeline columns and in-flight moves
    pub board: BoardState,
    /// Visible notifications, oldest first
    pub notices: Vec<Notice>,
    /// Last id handed to a notice
    pub notice_seq: u32,
    pub load_status: LoadStatus,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

impl BoardCell for AppStore {
    fn with_board<R>(&self, f: impl FnOnce(&mut BoardState) -> R) -> Option<R> {
        let field = self.board();
        let mut board = field.try_write()?;
        Some(f(&mut board))
    }
}

// ========================
// Store Helper Functions
// ========================

/// Add a notice to the store, returning its id
pub fn store_push_notice(store: &AppStore, mut notice: Notice) -> u32 {
    let id = store.notice_seq().get_untracked() + 1;
    store.notice_seq().set(id);
    notice.id = id;
    store.notices().write().push(notice);
    id
}

/// Remove a notice from the store by ID
pub fn store_dismiss_notice(store: &AppStore, notice_id: u32) {
    store.notices().write().retain(|n| n.id != notice_id);
}

/// Set the board load status
pub fn store_set_load_status(store: &AppStore, status: LoadStatus) {
    store.load_status().set(status);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PipelineStatus;

    #[test]
    fn test_failed_load_never_stays_loading() {
        let unauthorized = LoadStatus::failed(&ApiError::Unauthorized);
        assert!(matches!(unauthorized, LoadStatus::Failed(ref m) if m.contains("sign in")));

        let offline = LoadStatus::failed(&ApiError::Network("offline".to_string()));
        assert_eq!(offline, LoadStatus::Failed("Network error: offline".to_string()));
    }

    #[test]
    fn test_store_is_a_board_cell() {
        let owner = Owner::new();
        owner.with(|| {
            let store: AppStore = Store::new(AppState::new());
            let token = store.with_board(BoardState::begin_load).unwrap();
            let columns = vec![PipelineStatus::new(1, "New", "#3b82f6")];

            assert_eq!(store.with_board(|b| b.finish_load(token, columns)), Some(true));
            assert_eq!(store.board().with_untracked(|b| b.status_ids()), vec![1]);
        });
    }
}
