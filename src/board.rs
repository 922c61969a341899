//! Board State
//!
//! In-memory pipeline board: columns, their aggregates, and the ledger of
//! in-flight status moves.
//!
//! A move is split in two synchronous halves so the UI never waits on the
//! network: [`BoardState::begin_move`] relocates the card optimistically and
//! records an intent, [`BoardState::complete_move`] reconciles the response.
//! Intents for the same opportunity are ordered by a client sequence number;
//! the card sits in the target of the newest intent that has not failed, or
//! back where it started if every intent failed.
//!
//! Board loads take a [`LoadToken`] from the same counter. A load that
//! lands after a newer one is dropped, and results the server confirmed
//! after a load was issued are re-applied on top of it.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::error::ApiError;
use crate::models::{DragPayload, Opportunity, PipelineStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntentState {
    InFlight,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone)]
struct Intent {
    seq: u64,
    to_status: u32,
    state: IntentState,
}

/// Moves issued for one opportunity while at least one is unresolved
#[derive(Debug, Clone)]
struct MoveChain {
    /// Status before the first intent of the chain
    origin_status: u32,
    intents: Vec<Intent>,
}

impl MoveChain {
    fn displayed_status(&self) -> u32 {
        self.intents
            .iter()
            .rev()
            .find(|i| i.state != IntentState::Failed)
            .map(|i| i.to_status)
            .unwrap_or(self.origin_status)
    }

    /// Newest intent that has not failed
    fn owner_seq(&self) -> Option<u64> {
        self.intents
            .iter()
            .rev()
            .find(|i| i.state != IntentState::Failed)
            .map(|i| i.seq)
    }

    fn in_flight(&self) -> bool {
        self.intents.iter().any(|i| i.state == IntentState::InFlight)
    }

    fn mark(&mut self, seq: u64, state: IntentState) {
        if let Some(intent) = self.intents.iter_mut().find(|i| i.seq == seq) {
            intent.state = state;
        }
    }
}

/// Handle for one issued move, returned by [`BoardState::begin_move`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveTicket {
    pub opportunity_id: u32,
    pub seq: u64,
    pub from_status: u32,
    pub to_status: u32,
}

/// Handle for one issued board load, returned by [`BoardState::begin_load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadToken(u64);

/// Server-confirmed result a load issued earlier cannot know about
#[derive(Debug, Clone)]
enum Settled {
    Moved(Opportunity),
    Removed,
}

#[derive(Debug, Clone)]
struct SettledMove {
    /// Intent that produced the result
    seq: u64,
    /// Counter value when the response was reconciled
    stamp: u64,
    settled: Settled,
}

/// How a completed move was reconciled
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// Server accepted the newest intent; its copy replaced the cached one
    Confirmed,
    /// A newer intent owns the card; the response changed nothing visible
    Superseded,
    /// The move failed and the card now sits in `status`
    Reverted { error: ApiError, status: u32 },
    /// The opportunity no longer exists and was removed from the board
    Removed { error: ApiError },
    /// The move conflicted with another change; the board must be refetched
    RefetchRequired { error: ApiError },
}

impl MoveOutcome {
    pub fn error(&self) -> Option<&ApiError> {
        match self {
            MoveOutcome::Confirmed | MoveOutcome::Superseded => None,
            MoveOutcome::Reverted { error, .. }
            | MoveOutcome::Removed { error }
            | MoveOutcome::RefetchRequired { error } => Some(error),
        }
    }
}

/// Decide whether a drop on column `column_status` should be dispatched
///
/// Returns the `(opportunity_id, new_status_id)` pair for `onDrop`, or `None`
/// when the card was dropped back onto its own column.
pub fn route_drop(payload: DragPayload, column_status: u32) -> Option<(u32, u32)> {
    if payload.current_status == column_status {
        None
    } else {
        Some((payload.id, column_status))
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoardState {
    columns: Vec<PipelineStatus>,
    moves: HashMap<u32, MoveChain>,
    settled: HashMap<u32, SettledMove>,
    last_load: Option<LoadToken>,
    next_seq: u64,
}

impl BoardState {
    pub fn new(columns: Vec<PipelineStatus>) -> Self {
        let mut board = Self::default();
        board.reconcile(columns);
        board
    }

    pub fn columns(&self) -> &[PipelineStatus] {
        &self.columns
    }

    pub fn status_ids(&self) -> Vec<u32> {
        self.columns.iter().map(|c| c.status_id).collect()
    }

    pub fn column(&self, status_id: u32) -> Option<&PipelineStatus> {
        self.columns.iter().find(|c| c.status_id == status_id)
    }

    pub fn find(&self, opportunity_id: u32) -> Option<&Opportunity> {
        self.columns
            .iter()
            .flat_map(|c| c.opportunities.iter())
            .find(|o| o.id == opportunity_id)
    }

    /// Status of the column currently holding the card
    pub fn status_of(&self, opportunity_id: u32) -> Option<u32> {
        self.columns
            .iter()
            .find(|c| c.contains(opportunity_id))
            .map(|c| c.status_id)
    }

    pub fn total_count(&self) -> usize {
        self.columns.iter().map(|c| c.count).sum()
    }

    pub fn total_value(&self) -> Decimal {
        self.columns.iter().map(|c| c.total_value).sum()
    }

    /// Whether a move for the opportunity awaits a response
    pub fn is_pending(&self, opportunity_id: u32) -> bool {
        self.moves.get(&opportunity_id).is_some_and(|c| c.in_flight())
    }

    pub fn aggregates_consistent(&self) -> bool {
        self.columns.iter().all(|c| c.aggregates_consistent())
    }

    /// Mark a board load as issued
    pub fn begin_load(&mut self) -> LoadToken {
        let token = LoadToken(self.next_seq);
        self.next_seq += 1;
        token
    }

    /// Apply a load issued with `token`
    ///
    /// Returns false, leaving the board untouched, when a newer load was
    /// already applied.
    pub fn finish_load(&mut self, token: LoadToken, columns: Vec<PipelineStatus>) -> bool {
        if self.last_load.is_some_and(|last| token < last) {
            return false;
        }
        self.last_load = Some(token);
        self.settled.retain(|_, s| s.stamp > token.0);
        self.reconcile(columns);
        true
    }

    /// Replace columns, keeping later confirmed and in-flight moves applied
    fn reconcile(&mut self, columns: Vec<PipelineStatus>) {
        self.columns = columns;
        for column in &mut self.columns {
            for opp in &mut column.opportunities {
                opp.status = column.status_id;
            }
            column.recompute();
        }

        let settled: Vec<(u32, Settled)> = self
            .settled
            .iter()
            .map(|(id, s)| (*id, s.settled.clone()))
            .collect();
        for (id, settled) in settled {
            match settled {
                Settled::Moved(opportunity) => self.apply_server_copy(opportunity),
                Settled::Removed => {
                    self.remove_opportunity(id);
                }
            }
        }

        let wanted: Vec<(u32, u32)> = self
            .moves
            .iter()
            .filter(|(_, chain)| chain.in_flight())
            .map(|(id, chain)| (*id, chain.displayed_status()))
            .collect();
        for (id, status) in wanted {
            self.relocate(id, status);
        }
    }

    /// Optimistically move a card and record the intent
    ///
    /// Returns `None` without touching state when the card is unknown, the
    /// target column does not exist, or the card is already there.
    pub fn begin_move(&mut self, opportunity_id: u32, to_status: u32) -> Option<MoveTicket> {
        self.column(to_status)?;
        let from_status = self.status_of(opportunity_id)?;
        if from_status == to_status {
            return None;
        }

        self.relocate(opportunity_id, to_status);

        let seq = self.next_seq;
        self.next_seq += 1;
        let chain = self.moves.entry(opportunity_id).or_insert_with(|| MoveChain {
            origin_status: from_status,
            intents: Vec::new(),
        });
        chain.intents.push(Intent {
            seq,
            to_status,
            state: IntentState::InFlight,
        });

        Some(MoveTicket {
            opportunity_id,
            seq,
            from_status,
            to_status,
        })
    }

    /// Reconcile the backend's answer to a move
    pub fn complete_move(&mut self, ticket: &MoveTicket, result: Result<Opportunity, ApiError>) -> MoveOutcome {
        let id = ticket.opportunity_id;
        if !self.moves.contains_key(&id) {
            // Chain already dropped, e.g. the card was removed
            return MoveOutcome::Superseded;
        }

        let outcome = match result {
            Ok(server_copy) => {
                let owns_card = self.moves.get_mut(&id).map(|chain| {
                    chain.mark(ticket.seq, IntentState::Succeeded);
                    chain.owner_seq() == Some(ticket.seq)
                });
                if server_copy.id == id {
                    self.settle(id, ticket.seq, Settled::Moved(server_copy.clone()));
                }
                if owns_card == Some(true) && server_copy.id == id {
                    self.apply_server_copy(server_copy);
                    MoveOutcome::Confirmed
                } else {
                    MoveOutcome::Superseded
                }
            }
            Err(error @ ApiError::NotFound(_)) => {
                self.moves.remove(&id);
                self.settle(id, ticket.seq, Settled::Removed);
                self.remove_opportunity(id);
                MoveOutcome::Removed { error }
            }
            Err(error) => {
                let before = self.status_of(id);
                let displayed = self.moves.get_mut(&id).map(|chain| {
                    chain.mark(ticket.seq, IntentState::Failed);
                    chain.displayed_status()
                });
                if let Some(status) = displayed {
                    self.relocate(id, status);
                }
                match (error, displayed) {
                    (error @ ApiError::Conflict(_), _) => MoveOutcome::RefetchRequired { error },
                    (error, Some(status)) if before != Some(status) => MoveOutcome::Reverted { error, status },
                    _ => MoveOutcome::Superseded,
                }
            }
        };

        if self.moves.get(&id).is_some_and(|c| !c.in_flight()) {
            self.moves.remove(&id);
        }
        outcome
    }

    /// Remember a confirmed result unless a newer intent already settled
    fn settle(&mut self, opportunity_id: u32, seq: u64, settled: Settled) {
        let newer_settled = self
            .settled
            .get(&opportunity_id)
            .is_some_and(|s| s.seq > seq);
        if newer_settled {
            return;
        }
        let stamp = self.next_seq;
        self.settled.insert(opportunity_id, SettledMove { seq, stamp, settled });
    }

    /// Replace a cached opportunity with the server's copy
    pub fn apply_server_copy(&mut self, opportunity: Opportunity) {
        let id = opportunity.id;
        let status = opportunity.status;
        if self.status_of(id) != Some(status) && !self.relocate(id, status) {
            return;
        }
        if let Some(column) = self.columns.iter_mut().find(|c| c.status_id == status) {
            if let Some(slot) = column.opportunities.iter_mut().find(|o| o.id == id) {
                *slot = opportunity;
            }
            column.recompute();
        }
    }

    /// Remove a card from every column
    pub fn remove_opportunity(&mut self, opportunity_id: u32) -> bool {
        let mut removed = false;
        for column in &mut self.columns {
            let before = column.opportunities.len();
            column.opportunities.retain(|o| o.id != opportunity_id);
            if column.opportunities.len() != before {
                column.recompute();
                removed = true;
            }
        }
        removed
    }

    /// Move a card to the end of another column, recomputing both aggregates
    ///
    /// Looks the card up by id, never by index. Returns false when the card
    /// or target column is missing.
    fn relocate(&mut self, opportunity_id: u32, to_status: u32) -> bool {
        let Some(to_idx) = self.columns.iter().position(|c| c.status_id == to_status) else {
            return false;
        };
        let Some(from_idx) = self.columns.iter().position(|c| c.contains(opportunity_id)) else {
            return false;
        };
        if from_idx == to_idx {
            return true;
        }

        let source = &mut self.columns[from_idx];
        let Some(pos) = source.opportunities.iter().position(|o| o.id == opportunity_id) else {
            return false;
        };
        let mut opportunity = source.opportunities.remove(pos);
        source.recompute();

        opportunity.status = to_status;
        let target = &mut self.columns[to_idx];
        target.opportunities.push(opportunity);
        target.recompute();
        true
    }
}
