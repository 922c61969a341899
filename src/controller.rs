//! Board Controller
//!
//! Drives board loads and status moves against a [`BoardApi`], keeping the
//! [`BoardState`] wherever the caller stores it.

use crate::api::BoardApi;
use crate::board::{BoardState, MoveOutcome};
use crate::error::ApiResult;

/// Somewhere a [`BoardState`] lives
///
/// Returns `None` when the state is gone (e.g. the owning view unmounted).
pub trait BoardCell {
    fn with_board<R>(&self, f: impl FnOnce(&mut BoardState) -> R) -> Option<R>;
}

pub struct BoardController<A, C> {
    api: A,
    cell: C,
}

impl<A: BoardApi, C: BoardCell> BoardController<A, C> {
    pub fn new(api: A, cell: C) -> Self {
        Self { api, cell }
    }

    /// Fetch the board and replace the local copy
    ///
    /// Returns the number of columns loaded, or `None` when a newer load
    /// landed first and this response was dropped.
    pub async fn load(&self) -> ApiResult<Option<usize>> {
        let Some(token) = self.cell.with_board(BoardState::begin_load) else {
            return Ok(None);
        };
        let columns = self.api.load_board().await?;
        let count = columns.len();
        let applied = self
            .cell
            .with_board(|board| board.finish_load(token, columns))
            .unwrap_or(false);
        if !applied {
            tracing::debug!(?token, "[BOARD] Stale board load ignored");
            return Ok(None);
        }
        tracing::info!("[BOARD] Loaded {} columns", count);
        Ok(Some(count))
    }

    /// Move an opportunity to `new_status_id`
    ///
    /// The card is relocated before the request is sent. Returns `None` when
    /// nothing was issued (card already in that column, or unknown).
    pub async fn move_opportunity(&self, opportunity_id: u32, new_status_id: u32) -> Option<MoveOutcome> {
        let ticket = self
            .cell
            .with_board(|board| board.begin_move(opportunity_id, new_status_id))
            .flatten()?;
        tracing::info!(
            opportunity_id,
            from_status = ticket.from_status,
            to_status = ticket.to_status,
            seq = ticket.seq,
            "[BOARD] Moving opportunity"
        );

        let result = self.api.move_opportunity(opportunity_id, new_status_id).await;
        let outcome = self.cell.with_board(|board| board.complete_move(&ticket, result))?;

        match &outcome {
            MoveOutcome::Confirmed => {
                tracing::info!(opportunity_id, to_status = new_status_id, "[BOARD] Move confirmed");
            }
            MoveOutcome::Superseded => {
                tracing::debug!(opportunity_id, seq = ticket.seq, "[BOARD] Stale move response ignored");
            }
            MoveOutcome::Reverted { error, status } => {
                tracing::warn!(opportunity_id, status, "[BOARD] Move reverted: {}", error);
            }
            MoveOutcome::Removed { error } => {
                tracing::warn!(opportunity_id, "[BOARD] Opportunity removed: {}", error);
            }
            MoveOutcome::RefetchRequired { error } => {
                tracing::warn!(opportunity_id, "[BOARD] Move conflicted, refetching: {}", error);
                if let Err(e) = self.load().await {
                    tracing::error!("[BOARD] Refetch after conflict failed: {}", e);
                }
            }
        }
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use crate::error::ApiError;
    use crate::models::{Opportunity, PipelineStatus, Priority};

    impl BoardCell for Rc<RefCell<BoardState>> {
        fn with_board<R>(&self, f: impl FnOnce(&mut BoardState) -> R) -> Option<R> {
            Some(f(&mut self.borrow_mut()))
        }
    }

    /// In-memory backend: serves a fixed board and scripted move results
    #[derive(Default)]
    struct FakeApi {
        board: Vec<PipelineStatus>,
        move_results: RefCell<VecDeque<ApiResult<Opportunity>>>,
        move_calls: RefCell<Vec<(u32, u32)>>,
        load_calls: RefCell<usize>,
    }

    #[async_trait(?Send)]
    impl BoardApi for FakeApi {
        async fn load_board(&self) -> ApiResult<Vec<PipelineStatus>> {
            *self.load_calls.borrow_mut() += 1;
            Ok(self.board.clone())
        }

        async fn move_opportunity(&self, opportunity_id: u32, new_status_id: u32) -> ApiResult<Opportunity> {
            self.move_calls.borrow_mut().push((opportunity_id, new_status_id));
            self.move_results
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Network("no scripted response".to_string())))
        }
    }

    fn opportunity(id: u32, status: u32, value: i64) -> Opportunity {
        Opportunity {
            id,
            title: "Renewal".to_string(),
            value: Decimal::from(value),
            company_name: "Globex".to_string(),
            priority: Priority::High,
            expected_close_date: None,
            contact_count: 1,
            status,
        }
    }

    fn new_and_won() -> Vec<PipelineStatus> {
        let new = PipelineStatus::new(1, "New", "#3b82f6");
        let mut won = PipelineStatus::new(2, "Won", "#22c55e");
        won.opportunities.push(opportunity(7, 2, 1000));
        vec![new, won]
    }

    fn setup(results: Vec<ApiResult<Opportunity>>) -> (FakeApi, Rc<RefCell<BoardState>>) {
        let api = FakeApi {
            board: new_and_won(),
            move_results: RefCell::new(results.into()),
            ..FakeApi::default()
        };
        (api, Rc::new(RefCell::new(BoardState::default())))
    }

    #[tokio::test]
    async fn test_load_populates_board() {
        let (api, cell) = setup(vec![]);
        let controller = BoardController::new(api, cell.clone());

        assert_eq!(controller.load().await.unwrap(), Some(2));
        let board = cell.borrow();
        assert_eq!(board.column(2).unwrap().count, 1);
        assert_eq!(board.column(2).unwrap().total_value, Decimal::from(1000));
    }

    #[tokio::test]
    async fn test_drop_on_own_column_makes_no_call() {
        let (api, cell) = setup(vec![]);
        let controller = BoardController::new(api, cell.clone());
        controller.load().await.unwrap();
        let before = cell.borrow().columns().to_vec();

        assert_eq!(controller.move_opportunity(7, 2).await, None);
        assert!(controller.api.move_calls.borrow().is_empty());
        assert_eq!(cell.borrow().columns(), before.as_slice());
    }

    #[tokio::test]
    async fn test_successful_move_updates_aggregates() {
        let (api, cell) = setup(vec![Ok(opportunity(7, 1, 1000))]);
        let controller = BoardController::new(api, cell.clone());
        controller.load().await.unwrap();

        let outcome = controller.move_opportunity(7, 1).await;
        assert_eq!(outcome, Some(MoveOutcome::Confirmed));
        assert_eq!(*controller.api.move_calls.borrow(), vec![(7, 1)]);

        let board = cell.borrow();
        let won = board.column(2).unwrap();
        let new = board.column(1).unwrap();
        assert_eq!((won.count, won.total_value), (0, Decimal::ZERO));
        assert_eq!((new.count, new.total_value), (1, Decimal::from(1000)));
    }

    #[tokio::test]
    async fn test_conflict_refetches_original_board() {
        let conflict = ApiError::Conflict("HTTP 409".to_string());
        let (api, cell) = setup(vec![Err(conflict.clone())]);
        let controller = BoardController::new(api, cell.clone());
        controller.load().await.unwrap();

        let outcome = controller.move_opportunity(7, 1).await.unwrap();
        assert_eq!(outcome, MoveOutcome::RefetchRequired { error: conflict });
        assert!(outcome.error().is_some());
        assert_eq!(*controller.api.load_calls.borrow(), 2);

        let board = cell.borrow();
        assert!(board.column(2).unwrap().contains(7));
        assert!(board.column(1).unwrap().opportunities.is_empty());
        assert!(board.aggregates_consistent());
    }

    #[tokio::test]
    async fn test_network_failure_reverts() {
        let (api, cell) = setup(vec![Err(ApiError::Network("offline".to_string()))]);
        let controller = BoardController::new(api, cell.clone());
        controller.load().await.unwrap();

        let outcome = controller.move_opportunity(7, 1).await.unwrap();
        assert!(matches!(outcome, MoveOutcome::Reverted { status: 2, .. }));
        assert_eq!(*controller.api.load_calls.borrow(), 1);
        assert_eq!(cell.borrow().status_of(7), Some(2));
    }
}
