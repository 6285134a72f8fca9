//! Sidebar component

use crate::components::Avatar;
use crate::state::AppState;
use gpu_portal_core::{routes::NAV, Route as AppRoute};
use leptos::prelude::*;
use leptos_router::hooks::use_location;

fn nav_icon(route: AppRoute) -> &'static str {
    match route {
        AppRoute::Dashboard => "📊",
        AppRoute::Resources => "🖥️",
        AppRoute::Request => "📝",
        AppRoute::History => "🕒",
        AppRoute::Notifications => "🔔",
        AppRoute::Profile => "👤",
        _ => "•",
    }
}

/// Side menu with the gated pages and the signed-in user
#[component]
pub fn Sidebar() -> impl IntoView {
    let state = expect_context::<AppState>();
    let location = use_location();
    let is_open = state.sidebar_open;

    let current = Memo::new(move |_| AppRoute::from_path(&location.pathname.get()));
    let unread = Memo::new(move |_| state.notifications.with(|n| n.unread_count()));

    view! {
        // Overlay for mobile
        <Show when=move || is_open.get()>
            <div
                class="fixed inset-0 bg-black/60 backdrop-blur-sm z-30 lg:hidden animate-fade-in"
                on:click=move |_| is_open.set(false)
            ></div>
        </Show>

        <aside class=move || format!(
            "sidebar fixed lg:relative inset-y-0 left-0 z-40 w-64
             flex flex-col transform transition-transform duration-300 lg:translate-x-0 {}",
            if is_open.get() { "translate-x-0" } else { "-translate-x-full" }
        )>
            // Header
            <div class="h-16 px-4 flex items-center justify-between border-b border-[var(--border-default)]">
                <div class="flex items-center gap-2">
                    <span class="text-2xl">"🧮"</span>
                    <span class="text-lg font-semibold">"GPU Cluster"</span>
                </div>
                <button
                    on:click=move |_| is_open.set(false)
                    class="btn btn-ghost p-2 lg:hidden"
                >
                    "✕"
                </button>
            </div>

            // Links
            <nav class="flex-1 overflow-y-auto p-4 space-y-1">
                {NAV.into_iter().map(|route| {
                    let badge = move || {
                        let count = if route == AppRoute::Notifications { unread.get() } else { 0 };
                        (count > 0).then(|| view! {
                            <span class="ml-auto badge bg-red-500 text-white">{count}</span>
                        })
                    };
                    view! {
                        <a
                            href=route.path()
                            on:click=move |_| is_open.set(false)
                            class=move || format!(
                                "sidebar-item transition-colors {}",
                                if current.get() == route { "sidebar-item-active" } else { "" }
                            )
                        >
                            <span class="text-lg">{nav_icon(route)}</span>
                            <span class="text-sm font-medium">{route.title()}</span>
                            {badge}
                        </a>
                    }
                }).collect::<Vec<_>>()}
            </nav>

            // Signed-in user
            <div class="p-4 border-t border-[var(--border-default)]">
                {move || state.user().map(|user| view! {
                    <div class="flex items-center gap-3">
                        <Avatar user=user.clone() />
                        <div class="min-w-0">
                            <p class="text-sm font-medium truncate">{user.name.clone()}</p>
                            <p class="text-xs text-[var(--text-muted)] truncate">{user.organization.clone()}</p>
                        </div>
                    </div>
                })}
            </div>
        </aside>
    }
}
