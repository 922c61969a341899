//! Notice Stack Component
//!
//! Transient notifications in the corner of the board.

use leptos::prelude::*;

use crate::notice::RetryMove;
use crate::store::{store_dismiss_notice, use_app_store, AppStateStoreFields};

#[component]
pub fn NoticeStack(#[prop(into)] on_retry: Callback<RetryMove>) -> impl IntoView {
    let store = use_app_store();

    view! {
        <div class="notice-stack">
            <For
                each=move || store.notices().get()
                key=|notice| notice.id
                children=move |notice| {
                    let id = notice.id;
                    let retry = notice.retry;
                    view! {
                        <div class=notice.class()>
                            <span class="notice-message">{notice.message.clone()}</span>
                            {retry.map(|retry| view! {
                                <button
                                    class="notice-retry"
                                    on:click=move |_| {
                                        store_dismiss_notice(&store, id);
                                        on_retry.run(retry);
                                    }
                                >
                                    "Retry"
                                </button>
                            })}
                            <button class="notice-dismiss" on:click=move |_| store_dismiss_notice(&store, id)>"×"</button>
                        </div>
                    }
                }
            />
        </div>
    }
}
