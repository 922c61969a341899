//! Opportunity Endpoints
//!
//! Board load and status moves.

use async_trait::async_trait;
use serde::Serialize;

use super::{ApiClient, BoardApi};
use crate::error::ApiResult;
use crate::models::{Opportunity, PipelineStatus};

/// Columns with embedded opportunity summaries
pub const BOARD_PATH: &str = "/opportunities?groupBy=status";

#[derive(Debug, Serialize)]
pub struct MoveOpportunityArgs {
    pub status: u32,
}

pub fn opportunity_path(opportunity_id: u32) -> String {
    format!("/opportunities/{}", opportunity_id)
}

#[async_trait(?Send)]
impl BoardApi for ApiClient {
    async fn load_board(&self) -> ApiResult<Vec<PipelineStatus>> {
        self.get(BOARD_PATH).await
    }

    async fn move_opportunity(&self, opportunity_id: u32, new_status_id: u32) -> ApiResult<Opportunity> {
        let args = MoveOpportunityArgs { status: new_status_id };
        self.patch(&opportunity_path(opportunity_id), &args).await
    }
}
