//! UI Components
//!
//! Leptos components for the pipeline board.

mod opportunity_card;
mod kanban_column;
mod opportunity_board;
mod notice_stack;

pub use opportunity_card::OpportunityCard;
pub use kanban_column::KanbanColumn;
pub use opportunity_board::OpportunityBoard;
pub use notice_stack::NoticeStack;

use crate::models::DragPayload;
use leptos_dragdrop::DndSignals;

/// Drag signals for the board: card payloads dropped onto status columns
pub type BoardDnd = DndSignals<DragPayload, u32>;
