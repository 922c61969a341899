//! Opportunity Board Component
//!
//! Loads the pipeline, renders one column per status and turns column
//! drops into status moves.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::ApiClient;
use crate::board::MoveOutcome;
use crate::components::{BoardDnd, KanbanColumn, NoticeStack};
use crate::config::AppConfig;
use crate::context::{AppContext, SessionContext};
use crate::controller::BoardController;
use crate::error::ApiError;
use crate::models::format_currency;
use crate::notice::{show_notice, Notice, RetryMove};
use crate::store::{store_set_load_status, use_app_store, AppStateStoreFields, AppStore, LoadStatus};

use leptos_dragdrop::{bind_global_mouseup, create_dnd_signals};

/// Pipeline board with DnD support
#[component]
pub fn OpportunityBoard() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let session = expect_context::<SessionContext>();
    let config = expect_context::<AppConfig>();
    let store = use_app_store();

    let dnd: BoardDnd = create_dnd_signals();
    bind_global_mouseup(dnd);

    // Load board on mount and whenever a reload is requested
    let load_session = session.clone();
    Effect::new(move |_| {
        let trigger = ctx.reload_trigger.get();
        let session = load_session.clone();
        tracing::info!("[BOARD] Loading board, trigger={}", trigger);
        store_set_load_status(&store, LoadStatus::Loading);
        spawn_local(async move {
            let controller = BoardController::new(ApiClient::new(&session), store);
            match controller.load().await {
                Ok(_) => store_set_load_status(&store, LoadStatus::Loaded),
                Err(e) => {
                    tracing::error!("[BOARD] Load failed: {}", e);
                    store_set_load_status(&store, LoadStatus::failed(&e));
                    if e == ApiError::Unauthorized {
                        session.redirect_to_login();
                    }
                }
            }
        });
    });

    let notice_timeout = config.notice_timeout_ms;
    let on_drop = Callback::new(move |(opportunity_id, new_status_id): (u32, u32)| {
        let session = session.clone();
        let title = store
            .board()
            .with_untracked(|b| b.find(opportunity_id).map(|o| o.title.clone()))
            .unwrap_or_else(|| format!("#{}", opportunity_id));
        tracing::info!(opportunity_id, new_status_id, "[DND] Drop on column");

        spawn_local(async move {
            let controller = BoardController::new(ApiClient::new(&session), store);
            let Some(outcome) = controller.move_opportunity(opportunity_id, new_status_id).await else {
                return;
            };
            report_outcome(store, &session, &outcome, &title, RetryMove { opportunity_id, to_status: new_status_id }, notice_timeout);
        });
    });

    let on_retry = Callback::new(move |retry: RetryMove| {
        on_drop.run((retry.opportunity_id, retry.to_status));
    });

    let status_ids = Memo::new(move |_| store.board().with(|b| b.status_ids()));
    let total_count = move || store.board().with(|b| b.total_count());
    let total_value = move || store.board().with(|b| format_currency(b.total_value()));

    view! {
        <div class="opportunity-board">
            <div class="board-header">
                <h2>"Pipeline"</h2>
                <span class="board-summary">
                    {move || format!("{} opportunities, {}", total_count(), total_value())}
                </span>
                <button class="reload-btn" on:click=move |_| ctx.reload()>"Reload"</button>
            </div>

            {move || match store.load_status().get() {
                LoadStatus::Loading => view! { <div class="loading">"Loading..."</div> }.into_any(),
                LoadStatus::Failed(message) => view! {
                    <div class="board-error">
                        <span>{format!("Could not load the board: {}", message)}</span>
                        <button on:click=move |_| ctx.reload()>"Try again"</button>
                    </div>
                }.into_any(),
                LoadStatus::Idle | LoadStatus::Loaded => view! { <div></div> }.into_any(),
            }}

            <div class="kanban-board">
                <For
                    each=move || status_ids.get()
                    key=|id| *id
                    children=move |status_id| {
                        view! { <KanbanColumn status_id=status_id dnd=dnd on_drop=on_drop /> }
                    }
                />
            </div>

            <NoticeStack on_retry=on_retry />
        </div>
    }
}

/// Surface a finished move to the user
fn report_outcome(
    store: AppStore,
    session: &SessionContext,
    outcome: &MoveOutcome,
    title: &str,
    retry: RetryMove,
    timeout_ms: u32,
) {
    if let Some(ApiError::Unauthorized) = outcome.error() {
        session.redirect_to_login();
        return;
    }
    if let Some(notice) = Notice::for_outcome(outcome, title, retry) {
        show_notice(store, notice, timeout_ms);
    }
}
