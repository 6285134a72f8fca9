//! Request history with filters, detail expansion and cancellation

use crate::api::{cancel_request, fetch_requests};
use crate::components::{StatusBadge, TableSkeleton};
use crate::format;
use crate::state::AppState;
use crate::types::ToastKind;
use chrono::Utc;
use gpu_portal_core::{
    DetailSelection, HistoryFilter, RequestAction, RequestHistory, RequestStatus,
    ResourceRequest, Route as AppRoute, TimeFrame,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

#[component]
pub fn HistoryPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let history = RwSignal::new(Option::<RequestHistory>::None);
    let filter = RwSignal::new(HistoryFilter::default());
    let selection = RwSignal::new(DetailSelection::default());

    spawn_local(async move {
        let base = state.api_base.get_untracked();
        let Some(token) = state.token.get_untracked() else {
            return;
        };
        match fetch_requests(&base, &token).await {
            Ok(list) => history.set(Some(RequestHistory::new(list))),
            Err(e) => {
                tracing::error!("Failed to load request history: {}", e);
                state.toast(ToastKind::Error, e);
            }
        }
    });

    let visible = Memo::new(move |_| {
        let filter = filter.get();
        let now = Utc::now();
        history.with(|h| {
            h.as_ref()
                .map(|h| h.filter(&filter, now).into_iter().cloned().collect::<Vec<_>>())
        })
    });

    let on_cancel = move |id: String| {
        let base = state.api_base.get_untracked();
        let Some(token) = state.token.get_untracked() else {
            return;
        };
        spawn_local(async move {
            match cancel_request(&base, &token, &id).await {
                Ok(_) => {
                    let applied = history
                        .try_update(|h| h.as_mut().map(|h| h.cancel(&id).map(|_| ())))
                        .flatten();
                    if let Some(Err(e)) = applied {
                        tracing::warn!("Local history out of sync: {}", e);
                    }
                    state.toast(ToastKind::Success, format!("Request #{} cancelled", id));
                }
                Err(e) => state.toast(ToastKind::Error, e),
            }
        });
    };

    view! {
        <div class="space-y-6">
            <div>
                <h2 class="text-2xl font-bold">"Request History"</h2>
                <p class="text-[var(--text-muted)]">"Track the status of your resource requests."</p>
            </div>

            <HistoryFilters filter=filter />

            <div class="card overflow-x-auto">
                {move || match visible.get() {
                    None => view! { <div class="p-6"><TableSkeleton rows=6 /></div> }.into_any(),
                    Some(list) => view! {
                        <table class="w-full text-sm">
                            <thead class="text-left text-[var(--text-muted)] border-b border-[var(--border-default)]">
                                <tr>
                                    <th class="px-4 py-3">"Request"</th>
                                    <th class="px-4 py-3">"Project"</th>
                                    <th class="px-4 py-3">"Requested"</th>
                                    <th class="px-4 py-3">"Status"</th>
                                    <th class="px-4 py-3"></th>
                                </tr>
                            </thead>
                            <tbody>
                                {if list.is_empty() {
                                    view! {
                                        <tr>
                                            <td colspan="5" class="px-4 py-6 text-center text-[var(--text-muted)]">
                                                "No requests found matching your criteria."
                                            </td>
                                        </tr>
                                    }.into_any()
                                } else {
                                    list.into_iter().map(|request| view! {
                                        <HistoryRow request=request selection=selection on_cancel=on_cancel />
                                    }).collect::<Vec<_>>().into_any()
                                }}
                            </tbody>
                        </table>
                    }.into_any(),
                }}
            </div>
        </div>
    }
}

#[component]
fn HistoryFilters(filter: RwSignal<HistoryFilter>) -> impl IntoView {
    view! {
        <div class="card p-4 grid grid-cols-1 md:grid-cols-3 gap-4">
            <div>
                <label class="block text-sm mb-1">"Search"</label>
                <input
                    type="search"
                    placeholder="GPU, project or request id"
                    prop:value=move || filter.with(|f| f.search.clone())
                    on:input=move |ev| filter.update(|f| f.search = event_target_value(&ev))
                    class="input"
                />
            </div>
            <div>
                <label class="block text-sm mb-1">"Status"</label>
                <select
                    class="input"
                    prop:value=move || filter.with(|f| f.status.map_or("all", |s| s.as_str()))
                    on:change=move |ev| {
                        let status = event_target_value(&ev).parse::<RequestStatus>().ok();
                        filter.update(|f| f.status = status);
                    }
                >
                    <option value="all">"All Statuses"</option>
                    {RequestStatus::ALL
                        .into_iter()
                        .map(|s| view! { <option value=s.as_str()>{s.label()}</option> })
                        .collect::<Vec<_>>()}
                </select>
            </div>
            <div>
                <label class="block text-sm mb-1">"Time frame"</label>
                <select
                    class="input"
                    prop:value=move || filter.with(|f| f.time_frame.as_str())
                    on:change=move |ev| {
                        let frame = event_target_value(&ev).parse::<TimeFrame>().unwrap_or_default();
                        filter.update(|f| f.time_frame = frame);
                    }
                >
                    {TimeFrame::ALL
                        .into_iter()
                        .map(|t| view! { <option value=t.as_str()>{t.label()}</option> })
                        .collect::<Vec<_>>()}
                </select>
            </div>
        </div>
    }
}

#[component]
fn HistoryRow<F>(
    request: ResourceRequest,
    selection: RwSignal<DetailSelection>,
    on_cancel: F,
) -> impl IntoView
where
    F: Fn(String) + Copy + Send + Sync + 'static,
{
    let id = request.id.clone();
    let expanded = {
        let id = id.clone();
        Memo::new(move |_| selection.with(|s| s.is_expanded(&id)))
    };
    let toggle = {
        let id = id.clone();
        move |_| selection.update(|s| s.toggle(&id))
    };

    let cancel_button = request.can_cancel().then(|| {
        let id = id.clone();
        view! {
            <button
                on:click=move |ev: web_sys::MouseEvent| {
                    ev.stop_propagation();
                    on_cancel(id.clone());
                }
                class="btn btn-danger text-xs"
            >
                {RequestAction::Cancel.label()}
            </button>
        }
    });

    let details = request.clone();

    view! {
        <tr
            on:click=toggle
            class=move || format!(
                "border-t border-[var(--border-default)] cursor-pointer hover:bg-slate-800/50 {}",
                if expanded.get() { "bg-blue-500/10" } else { "" }
            )
        >
            <td class="px-4 py-3">
                <p class="font-medium">{format!("#{}", request.id)}</p>
                <p class="text-xs text-[var(--text-muted)]">
                    {format!("{} x {}", request.quantity, request.gpu_type)}
                </p>
            </td>
            <td class="px-4 py-3">
                <p>{request.project_name.clone()}</p>
                <p class="text-xs text-[var(--text-muted)]">{request.research_field.clone()}</p>
            </td>
            <td class="px-4 py-3">{format::date(request.requested_at)}</td>
            <td class="px-4 py-3">
                <StatusBadge status=request.status />
                {request.expires_at().map(|at| view! {
                    <p class="text-xs text-[var(--text-muted)] mt-1">{format!("Expires {}", format::date(at))}</p>
                })}
            </td>
            <td class="px-4 py-3 text-right">{cancel_button}</td>
        </tr>
        <Show when=move || expanded.get()>
            <tr class="bg-blue-500/5">
                <td colspan="5" class="px-4 py-4">
                    <RequestDetails request=details.clone() />
                </td>
            </tr>
        </Show>
    }
}

#[component]
fn RequestDetails(request: ResourceRequest) -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();

    let action_buttons = request
        .actions()
        .iter()
        .copied()
        .filter(|a| *a != RequestAction::Cancel)
        .map(|action| {
            let navigate = navigate.clone();
            let on_click = move |ev: web_sys::MouseEvent| {
                ev.stop_propagation();
                match action {
                    RequestAction::RequestSimilar => {
                        navigate(AppRoute::Request.path(), Default::default())
                    }
                    _ => state.toast(
                        ToastKind::Info,
                        format!("{} is not available yet", action.label()),
                    ),
                }
            };
            view! {
                <button on:click=on_click class="btn btn-ghost border border-[var(--border-default)] text-xs">
                    {action.label()}
                </button>
            }
        })
        .collect::<Vec<_>>();

    view! {
        <div class="text-sm space-y-4">
            <h3 class="font-medium">"Request Details"</h3>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                <Detail label="Request Date" value=format::date(request.requested_at) />
                {request.start_date.map(|at| view! { <Detail label="Start Date" value=format::date(at) /> })}
                {request.end_date.map(|at| view! { <Detail label="End Date" value=format::date(at) /> })}
            </div>
            {request.project_description.map(|description| view! {
                <Detail label="Description" value=description />
            })}
            {request.rejection_reason.map(|reason| view! {
                <div class="p-3 rounded-[var(--radius-md)] border border-red-800 bg-red-900/20">
                    <p class="font-medium text-red-300">"Rejection Reason"</p>
                    <p class="text-red-400">{reason}</p>
                </div>
            })}
            <div class="flex gap-3">{action_buttons}</div>
        </div>
    }
}

#[component]
fn Detail(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div>
            <p class="text-xs text-[var(--text-muted)] mb-1">{label}</p>
            <p>{value}</p>
        </div>
    }
}
