//! Full notification list with read filters

use crate::api::{sync_notifications, NotificationSync};
use crate::components::PageLoading;
use crate::format;
use crate::state::AppState;
use chrono::Utc;
use gpu_portal_core::{Notification, NotificationKind, ReadFilter};
use leptos::prelude::*;

fn kind_icon(kind: NotificationKind) -> (&'static str, &'static str) {
    match kind {
        NotificationKind::Info => ("ℹ️", "bg-blue-500/15"),
        NotificationKind::Success => ("✅", "bg-green-500/15"),
        NotificationKind::Warning => ("⚠️", "bg-yellow-500/15"),
        NotificationKind::Error => ("⛔", "bg-red-500/15"),
    }
}

#[component]
pub fn NotificationsPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let filter = RwSignal::new(ReadFilter::All);

    let visible = Memo::new(move |_| {
        let filter = filter.get();
        state
            .notifications
            .with(|store| store.filter(filter).into_iter().cloned().collect::<Vec<_>>())
    });
    let unread = Memo::new(move |_| state.notifications.with(|n| n.unread_count()));
    let total = Memo::new(move |_| state.notifications.with(|n| n.len()));

    let mark_all = move |_| {
        state.notifications.update(|n| n.mark_all_as_read());
        sync_notifications(state, NotificationSync::MarkAllRead);
    };
    let clear_all = move |_| {
        state.notifications.update(|n| n.clear_all());
        sync_notifications(state, NotificationSync::ClearAll);
    };

    view! {
        <div class="space-y-6 max-w-4xl">
            <div class="flex flex-col sm:flex-row sm:items-center sm:justify-between gap-4">
                <div>
                    <h2 class="text-2xl font-bold">"Notifications"</h2>
                    <p class="text-[var(--text-muted)]">
                        {move || format!("{} unread of {}", unread.get(), total.get())}
                    </p>
                </div>
                <div class="flex gap-2">
                    <button on:click=mark_all class="btn btn-ghost" disabled=move || unread.get() == 0>
                        "Mark all as read"
                    </button>
                    <button on:click=clear_all class="btn btn-danger" disabled=move || total.get() == 0>
                        "Clear all"
                    </button>
                </div>
            </div>

            <div class="flex gap-2">
                {[ReadFilter::All, ReadFilter::Unread, ReadFilter::Read]
                    .into_iter()
                    .map(|tab| {
                        let label = match tab {
                            ReadFilter::All => "All",
                            ReadFilter::Unread => "Unread",
                            ReadFilter::Read => "Read",
                        };
                        view! {
                            <button
                                on:click=move |_| filter.set(tab)
                                class=move || if filter.get() == tab { "btn btn-primary" } else { "btn btn-ghost" }
                            >
                                {label}
                            </button>
                        }
                    })
                    .collect::<Vec<_>>()}
            </div>

            <Show
                when=move || state.notifications_loaded.get()
                fallback=|| view! { <PageLoading /> }
            >
                <div class="card divide-y divide-[var(--border-default)]">
                    {move || {
                        let list = visible.get();
                        if list.is_empty() {
                            view! {
                                <p class="p-8 text-center text-[var(--text-muted)]">"No notifications."</p>
                            }.into_any()
                        } else {
                            let now = Utc::now();
                            list.into_iter()
                                .map(|n| view! { <NotificationItem notification=n now=now /> })
                                .collect::<Vec<_>>()
                                .into_any()
                        }
                    }}
                </div>
            </Show>
        </div>
    }
}

#[component]
fn NotificationItem(notification: Notification, now: chrono::DateTime<Utc>) -> impl IntoView {
    let state = expect_context::<AppState>();
    let (icon, tint) = kind_icon(notification.kind);
    let read = notification.read;

    let mark_read = {
        let id = notification.id.clone();
        move |_| {
            let changed = state.notifications.try_update(|n| n.mark_as_read(&id)).unwrap_or(false);
            if changed {
                sync_notifications(state, NotificationSync::MarkRead(id.clone()));
            }
        }
    };
    let delete = {
        let id = notification.id.clone();
        move |_| {
            let changed = state.notifications.try_update(|n| n.delete(&id)).unwrap_or(false);
            if changed {
                sync_notifications(state, NotificationSync::Delete(id.clone()));
            }
        }
    };

    view! {
        <div class=format!("p-4 flex gap-4 {}", if read { "" } else { "bg-blue-500/5" })>
            <div class=format!("w-10 h-10 rounded-full flex items-center justify-center shrink-0 {}", tint)>
                {icon}
            </div>
            <div class="flex-1 min-w-0">
                <div class="flex items-center gap-2">
                    <p class="font-medium">{notification.title}</p>
                    {(!read).then(|| view! { <span class="w-2 h-2 rounded-full bg-blue-500"></span> })}
                </div>
                <p class="text-sm text-[var(--text-muted)]">{notification.message}</p>
                <p class="text-xs text-[var(--text-muted)] mt-1">
                    {format!("{} at {}", format::relative(notification.created_at, now), format::time(notification.created_at))}
                </p>
            </div>
            <div class="flex items-start gap-2">
                {(!read).then(|| view! {
                    <button on:click=mark_read class="btn btn-ghost text-xs">"Mark read"</button>
                })}
                <button on:click=delete class="btn btn-ghost text-xs text-red-400">"Delete"</button>
            </div>
        </div>
    }
}
