//! CRM Pipeline Frontend App
//!
//! Root component: reads configuration, provides context and the store.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::components::OpportunityBoard;
use crate::config::AppConfig;
use crate::context::{AppContext, SessionContext};
use crate::store::AppState;

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::load();
    let session = SessionContext::from_config(&config);
    tracing::info!("[APP] Starting with API at {}", session.api_base_url);

    let (reload_trigger, set_reload_trigger) = signal(0u32);

    // Provide context to all children
    provide_context(AppContext::new((reload_trigger, set_reload_trigger)));
    provide_context(Store::new(AppState::new()));
    provide_context(session);
    provide_context(config);

    view! {
        <div class="app-layout">
            <main class="main-content">
                <h1>"Sales Pipeline"</h1>
                <OpportunityBoard />
            </main>
        </div>
    }
}
