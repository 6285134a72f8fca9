//! Top bar: page title, theme toggle, notification preview and user menu

use crate::api::{self, sync_notifications, NotificationSync};
use crate::components::Avatar;
use crate::format;
use crate::state::AppState;
use gpu_portal_core::{notifications::PREVIEW_LIMIT, Route as AppRoute};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

/// Main application header
#[component]
pub fn Header(route: AppRoute) -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();

    let show_notifications = RwSignal::new(false);
    let show_user_menu = RwSignal::new(false);
    let unread = Memo::new(move |_| state.notifications.with(|n| n.unread_count()));

    let toggle_notifications = move |_| {
        show_notifications.update(|v| *v = !*v);
        show_user_menu.set(false);
    };
    let toggle_user_menu = move |_| {
        show_user_menu.update(|v| *v = !*v);
        show_notifications.set(false);
    };

    let mark_read = move |id: String| {
        let changed = state.notifications.try_update(|n| n.mark_as_read(&id)).unwrap_or(false);
        if changed {
            sync_notifications(state, NotificationSync::MarkRead(id));
        }
    };

    let sign_out = move |_| {
        show_user_menu.set(false);
        let base = state.api_base.get_untracked();
        if let Some(token) = state.token.get_untracked() {
            spawn_local(async move {
                if let Err(e) = api::logout(&base, &token).await {
                    tracing::warn!("Failed to revoke token: {}", e);
                }
            });
        }
        state.sign_out();
        navigate(AppRoute::Login.path(), Default::default());
    };

    view! {
        <header class="header h-16 sticky top-0 z-20 bg-[var(--bg-card)] border-b border-[var(--border-default)]">
            <div class="h-full px-4 flex items-center justify-between">
                <div class="flex items-center gap-3">
                    <button
                        on:click=move |_| state.sidebar_open.set(true)
                        class="btn btn-ghost p-2 lg:hidden"
                    >
                        "☰"
                    </button>
                    <h1 class="text-lg font-semibold">{route.title()}</h1>
                </div>

                <div class="flex items-center gap-4">
                    <button
                        on:click=move |_| state.toggle_theme()
                        class="btn btn-ghost p-2"
                        title=move || state.theme.get().toggle_label()
                        aria-label=move || state.theme.get().toggle_label()
                    >
                        {move || if state.theme.get().is_dark() { "☀️" } else { "🌙" }}
                    </button>

                    // Notifications
                    <div class="relative">
                        <button on:click=toggle_notifications class="btn btn-ghost p-2 relative">
                            "🔔"
                            <Show when=move || { unread.get() > 0 }>
                                <span class="absolute -top-1 -right-1 badge bg-red-500 text-white">
                                    {move || unread.get()}
                                </span>
                            </Show>
                        </button>

                        <Show when=move || show_notifications.get()>
                            <div class="absolute right-0 mt-2 w-80 card shadow-lg animate-fade-in">
                                <div class="px-4 py-2 border-b border-[var(--border-default)] flex justify-between items-center">
                                    <h3 class="text-sm font-medium">"Notifications"</h3>
                                    <a
                                        href=AppRoute::Notifications.path()
                                        on:click=move |_| show_notifications.set(false)
                                        class="text-xs text-blue-400 hover:text-blue-300"
                                    >
                                        "View all"
                                    </a>
                                </div>
                                <div class="max-h-80 overflow-y-auto">
                                    {move || {
                                        let preview = state
                                            .notifications
                                            .with(|n| n.preview(PREVIEW_LIMIT).to_vec());
                                        if preview.is_empty() {
                                            return view! {
                                                <div class="px-4 py-3 text-sm text-[var(--text-muted)]">
                                                    "No notifications"
                                                </div>
                                            }.into_any();
                                        }
                                        preview.into_iter().map(|n| {
                                            let id = n.id.clone();
                                            view! {
                                                <div
                                                    on:click=move |_| mark_read(id.clone())
                                                    class=format!(
                                                        "px-4 py-3 cursor-pointer hover:bg-slate-800 {}",
                                                        if n.read { "" } else { "bg-blue-500/10" }
                                                    )
                                                >
                                                    <div class="flex justify-between gap-2">
                                                        <p class="text-sm font-medium">{n.title.clone()}</p>
                                                        <span class="text-xs text-[var(--text-muted)]">
                                                            {format::time(n.created_at)}
                                                        </span>
                                                    </div>
                                                    <p class="text-xs text-[var(--text-secondary)] mt-1">{n.message.clone()}</p>
                                                </div>
                                            }
                                        }).collect::<Vec<_>>().into_any()
                                    }}
                                </div>
                            </div>
                        </Show>
                    </div>

                    // User menu
                    <div class="relative">
                        <button on:click=toggle_user_menu class="flex items-center rounded-full">
                            {move || state.user().map(|user| view! { <Avatar user=user /> })}
                        </button>

                        <Show when=move || show_user_menu.get()>
                            <div class="absolute right-0 mt-2 w-48 card shadow-lg animate-fade-in py-1">
                                {move || state.user().map(|user| view! {
                                    <div class="px-4 py-2 border-b border-[var(--border-default)]">
                                        <p class="text-sm font-medium">{user.name}</p>
                                        <p class="text-xs text-[var(--text-muted)]">{user.email}</p>
                                    </div>
                                })}
                                <a
                                    href=AppRoute::Profile.path()
                                    on:click=move |_| show_user_menu.set(false)
                                    class="block px-4 py-2 text-sm hover:bg-slate-800"
                                >
                                    "Profile"
                                </a>
                                <button
                                    on:click=sign_out.clone()
                                    class="block w-full text-left px-4 py-2 text-sm hover:bg-slate-800"
                                >
                                    "Sign out"
                                </button>
                            </div>
                        </Show>
                    </div>
                </div>
            </div>
        </header>
    }
}
