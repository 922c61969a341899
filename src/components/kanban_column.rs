//! Kanban Column Component
//!
//! One pipeline status as a drop target for opportunity cards.

use leptos::prelude::*;

use crate::board::route_drop;
use crate::components::{BoardDnd, OpportunityCard};
use crate::models::{format_currency, DragPayload, COLUMN_ACCEPTS};
use crate::store::{use_app_store, AppStateStoreFields};

use leptos_dragdrop::{hover_state, make_on_zone_mouseenter, make_on_zone_mouseleave, DropZone, HoverState};

/// Pipeline column with header metrics and cards
///
/// `on_drop` receives `(opportunity_id, new_status_id)` and is only called
/// when a card arrives from a different column.
#[component]
pub fn KanbanColumn(
    status_id: u32,
    dnd: BoardDnd,
    #[prop(into)] on_drop: Callback<(u32, u32)>,
) -> impl IntoView {
    let store = use_app_store();

    let column = Memo::new(move |_| store.board().with(|b| b.column(status_id).cloned()));

    let zone = DropZone {
        key: status_id,
        accepts: COLUMN_ACCEPTS,
        on_drop: Callback::new(move |payload: DragPayload| {
            if let Some(drop) = route_drop(payload, status_id) {
                on_drop.run(drop);
            }
        }),
    };
    let on_mouseenter = make_on_zone_mouseenter(dnd, zone);
    let on_mouseleave = make_on_zone_mouseleave(dnd, status_id);

    let hover = move || hover_state(dnd, status_id);
    let is_empty = move || column.with(|c| c.as_ref().map_or(true, |c| c.opportunities.is_empty()));

    let column_class = move || {
        let mut c = String::from("kanban-column");
        match hover() {
            HoverState::Acceptable => c.push_str(" drop-acceptable"),
            HoverState::Rejected => c.push_str(" drop-rejected"),
            HoverState::Idle => {}
        }
        c
    };

    let header = move || {
        column.get().map(|c| {
            view! {
                <div class="kanban-column-header">
                    <span class="status-swatch" style=format!("background-color: {};", c.status_color)></span>
                    <span class="status-name">{c.status_name.clone()}</span>
                    <span class="status-count">{c.count}</span>
                    <span class="status-total">{format_currency(c.total_value)}</span>
                </div>
            }
        })
    };

    view! {
        <div class=column_class on:mouseenter=on_mouseenter on:mouseleave=on_mouseleave>
            {header}

            <div class="kanban-column-body">
                <For
                    each=move || column.get().map(|c| c.opportunities).unwrap_or_default()
                    key=|opp| {
                        // Every rendered field, so edits from the server re-render the card
                        (
                            opp.id,
                            opp.title.clone(),
                            opp.value,
                            opp.company_name.clone(),
                            opp.priority,
                            opp.expected_close_date,
                            opp.contact_count,
                            opp.status,
                        )
                    }
                    children=move |opp| view! { <OpportunityCard opportunity=opp dnd=dnd /> }
                />

                <Show when=move || hover() == HoverState::Acceptable>
                    <div class="drop-hint">"Drop here"</div>
                </Show>

                <Show when=move || is_empty() && hover() == HoverState::Idle>
                    <div class="empty-column-message">"No opportunities"</div>
                </Show>
            </div>
        </div>
    }
}
