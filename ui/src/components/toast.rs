use crate::state::AppState;
use leptos::prelude::*;

/// Stack of transient messages, top-right
#[component]
pub fn Toasts() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <div class="fixed top-4 right-4 z-50 flex flex-col gap-2 w-80">
            <For
                each=move || state.toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=format!(
                            "card px-4 py-3 shadow-lg flex items-start gap-3 animate-fade-in {}",
                            toast.kind.class()
                        )>
                            <p class="flex-1 text-sm">{toast.message}</p>
                            <button
                                on:click=move |_| state.dismiss_toast(id)
                                class="text-[var(--text-muted)] hover:text-[var(--text-primary)]"
                            >
                                "✕"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
