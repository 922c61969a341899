//! Opportunity Card Component
//!
//! One opportunity on the board, draggable between pipeline columns.

use leptos::prelude::*;

use crate::components::BoardDnd;
use crate::config::AppConfig;
use crate::models::{format_close_date, format_currency, Opportunity, OPPORTUNITY_ITEM_TYPE};
use crate::store::{use_app_store, AppStateStoreFields};

use leptos_dragdrop::{make_on_mousedown, DragItem};

/// Draggable opportunity summary
///
/// The chevron link is excluded from drag handling, so it navigates even
/// though the card itself is a drag source.
#[component]
pub fn OpportunityCard(opportunity: Opportunity, dnd: BoardDnd) -> impl IntoView {
    let config = expect_context::<AppConfig>();
    let store = use_app_store();

    let id = opportunity.id;
    let detail_url = config.opportunity_url(id);
    let today = chrono::Local::now().date_naive();
    let overdue = opportunity.is_overdue(today);

    let on_mousedown = make_on_mousedown(dnd, DragItem::new(OPPORTUNITY_ITEM_TYPE, opportunity.drag_payload()));

    let is_dragging = move || matches!(dnd.dragging_read.get(), Some(item) if item.payload.id == id);
    let is_pending = move || store.board().with(|b| b.is_pending(id));

    let card_class = move || {
        let mut c = String::from("opportunity-card");
        if is_dragging() { c.push_str(" dragging"); }
        if is_pending() { c.push_str(" saving"); }
        c
    };

    let contacts = match opportunity.contact_count {
        1 => "1 contact".to_string(),
        n => format!("{} contacts", n),
    };

    view! {
        <div class=card_class on:mousedown=on_mousedown>
            <div class="card-header">
                <span class="card-title">{opportunity.title.clone()}</span>
                <a class="card-chevron" href=detail_url data-no-drag title="Open opportunity">"›"</a>
            </div>
            <div class="card-value">{format_currency(opportunity.value)}</div>
            <div class="card-company">{opportunity.company_name.clone()}</div>
            <div class="card-meta">
                <span class=opportunity.priority.badge_class()>{opportunity.priority.label()}</span>
                <span class="card-date" class:overdue=overdue>
                    {format_close_date(opportunity.expected_close_date)}
                </span>
                <span class="card-contacts">{contacts}</span>
            </div>
        </div>
    }
}
