//! Dashboard: summary counts, allocations, usage chart and recent requests

use crate::api::fetch_dashboard;
use crate::components::{PageLoading, StatusBadge};
use crate::format;
use crate::state::AppState;
use crate::types::ToastKind;
use chrono::Utc;
use gpu_portal_core::{
    ActiveAllocation, DashboardSnapshot, Route as AppRoute, UsageChart, WarningLevel,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let snapshot = RwSignal::new(Option::<DashboardSnapshot>::None);

    spawn_local(async move {
        let base = state.api_base.get_untracked();
        let Some(token) = state.token.get_untracked() else {
            return;
        };
        match fetch_dashboard(&base, &token).await {
            Ok(data) => snapshot.set(Some(data)),
            Err(e) => {
                tracing::error!("Failed to load dashboard: {}", e);
                state.toast(ToastKind::Error, e);
            }
        }
    });

    let first_name = move || {
        state
            .user()
            .map(|u| u.name.split_whitespace().next().unwrap_or_default().to_string())
            .unwrap_or_default()
    };

    view! {
        <div class="space-y-6">
            <div class="flex flex-col sm:flex-row sm:items-center sm:justify-between gap-4">
                <div>
                    <h2 class="text-2xl font-bold">{move || format!("Welcome back, {}", first_name())}</h2>
                    <p class="text-[var(--text-muted)]">"Here's what's happening on the cluster."</p>
                </div>
                <a href=AppRoute::Request.path() class="btn btn-primary">"Request new resources"</a>
            </div>

            {move || match snapshot.get() {
                None => view! { <PageLoading /> }.into_any(),
                Some(data) => view! { <DashboardBody data=data /> }.into_any(),
            }}
        </div>
    }
}

#[component]
fn DashboardBody(data: DashboardSnapshot) -> impl IntoView {
    let now = Utc::now();
    let summary = data.summary;

    view! {
        // Summary
        <div class="grid grid-cols-1 sm:grid-cols-2 xl:grid-cols-4 gap-4">
            <SummaryCard icon="🖥️" label="Active GPUs" value=summary.active_gpus.to_string() />
            <SummaryCard icon="🗄️" label="Available GPUs" value=summary.available_gpus.to_string() />
            <SummaryCard icon="📈" label="Usage Rate" value=format!("{}%", summary.usage_rate) />
            <SummaryCard icon="⏳" label="Pending Requests" value=summary.pending_requests.to_string() />
        </div>

        // Allocations
        <section class="card p-6">
            <h3 class="text-lg font-semibold mb-4">"Your Active Resources"</h3>
            {if data.allocations.is_empty() {
                view! {
                    <div class="text-center py-8 space-y-4">
                        <p class="text-[var(--text-muted)]">"You don't have any active GPU allocations."</p>
                        <a href=AppRoute::Request.path() class="btn btn-primary">"Request Resources"</a>
                    </div>
                }.into_any()
            } else {
                view! {
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        {data.allocations.into_iter().map(|allocation| view! {
                            <AllocationCard allocation=allocation now=now />
                        }).collect::<Vec<_>>()}
                    </div>
                }.into_any()
            }}
        </section>

        <div class="grid grid-cols-1 xl:grid-cols-2 gap-6">
            // Usage chart
            <section class="card p-6">
                <h3 class="text-lg font-semibold mb-4">"Resource Usage (7 days)"</h3>
                <UsageLines chart=data.chart />
            </section>

            // Recent requests
            <section class="card p-6">
                <div class="flex justify-between items-center mb-4">
                    <h3 class="text-lg font-semibold">"Recent Requests"</h3>
                    <a href=AppRoute::History.path() class="text-sm text-blue-400 hover:text-blue-300">"View all"</a>
                </div>
                <table class="w-full text-sm">
                    <thead class="text-left text-[var(--text-muted)]">
                        <tr>
                            <th class="py-2">"GPU"</th>
                            <th class="py-2">"Requested"</th>
                            <th class="py-2">"Duration"</th>
                            <th class="py-2">"Status"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {data.recent_requests.into_iter().map(|request| view! {
                            <tr class="border-t border-[var(--border-default)]">
                                <td class="py-2">{request.gpu_type}</td>
                                <td class="py-2">{format::date(request.requested_at)}</td>
                                <td class="py-2">{format!("{} days", request.duration_days)}</td>
                                <td class="py-2"><StatusBadge status=request.status /></td>
                            </tr>
                        }).collect::<Vec<_>>()}
                    </tbody>
                </table>
            </section>
        </div>

        // Cluster availability
        <section class="card p-6">
            <h3 class="text-lg font-semibold mb-4">
                {format!(
                    "Cluster Availability: {} of {} GPUs free",
                    data.availability.available, data.availability.total
                )}
            </h3>
            <div class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-4 gap-4">
                {data.availability.models.into_iter().map(|model| {
                    let percent = model.available_percent();
                    view! {
                        <div class="p-4 rounded-[var(--radius-md)] bg-[var(--bg-primary)]">
                            <div class="flex justify-between text-sm mb-2">
                                <span class="font-medium">{model.name.clone()}</span>
                                <span class="text-[var(--text-muted)]">
                                    {format!("{}/{}", model.available, model.total)}
                                </span>
                            </div>
                            <div class="h-2 rounded-full bg-slate-800 overflow-hidden">
                                <div class="h-full level-healthy" style=format!("width: {}%", percent)></div>
                            </div>
                            <p class="text-xs text-[var(--text-muted)] mt-1">{format!("{}% available", percent)}</p>
                        </div>
                    }
                }).collect::<Vec<_>>()}
            </div>
        </section>
    }
}

#[component]
fn SummaryCard(icon: &'static str, label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="card p-5 flex items-center gap-4">
            <div class="w-12 h-12 rounded-full bg-blue-500/15 flex items-center justify-center text-2xl">{icon}</div>
            <div>
                <p class="text-sm text-[var(--text-muted)]">{label}</p>
                <p class="text-2xl font-bold">{value}</p>
            </div>
        </div>
    }
}

#[component]
fn AllocationCard(allocation: ActiveAllocation, now: chrono::DateTime<Utc>) -> impl IntoView {
    let days = allocation.days_remaining(now);
    let level = allocation.warning_level(now);
    let (border, note) = match level {
        WarningLevel::Critical => ("warning-critical", "Expires very soon"),
        WarningLevel::Warning => ("warning-warning", "Expiring soon"),
        WarningLevel::Normal => ("warning-normal", ""),
    };

    view! {
        <div class=format!("p-4 rounded-[var(--radius-md)] border-2 {}", border)>
            <div class="flex justify-between items-start">
                <div>
                    <p class="font-medium">{allocation.name}</p>
                    <p class="text-sm text-[var(--text-muted)]">{format!("{}GB memory", allocation.memory_gb)}</p>
                </div>
                <span class="badge badge-active">"Active"</span>
            </div>
            <p class="mt-3 text-sm">
                {format!("Expires {} ({} day{} remaining)",
                    format::date(allocation.expires_at),
                    days,
                    if days == 1 { "" } else { "s" })}
            </p>
            {(!note.is_empty()).then(|| view! {
                <p class="mt-1 text-xs text-[var(--accent-warning)]">{note}</p>
            })}
        </div>
    }
}

const CHART_WIDTH: f64 = 600.0;
const CHART_HEIGHT: f64 = 200.0;

fn polyline(values: &[i64]) -> String {
    let step = if values.len() > 1 {
        CHART_WIDTH / (values.len() - 1) as f64
    } else {
        0.0
    };
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let y = CHART_HEIGHT - (*v).clamp(0, 100) as f64 / 100.0 * CHART_HEIGHT;
            format!("{:.1},{:.1}", i as f64 * step, y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// CPU, memory and GPU utilization as three lines on a 0-100% scale
#[component]
fn UsageLines(chart: UsageChart) -> impl IntoView {
    let series = [
        ("CPU", "#3b82f6", polyline(&chart.cpu_usage)),
        ("Memory", "#a855f7", polyline(&chart.memory_usage)),
        ("GPU", "#22c55e", polyline(&chart.gpu_utilization)),
    ];

    view! {
        <svg viewBox=format!("0 0 {} {}", CHART_WIDTH, CHART_HEIGHT) class="w-full h-48" preserveAspectRatio="none">
            {series.iter().map(|(_, color, points)| view! {
                <polyline fill="none" stroke=*color stroke-width="2" points=points.clone() />
            }).collect::<Vec<_>>()}
        </svg>
        <div class="flex justify-between text-xs text-[var(--text-muted)] mt-2">
            {chart.labels.into_iter().map(|label| view! { <span>{label}</span> }).collect::<Vec<_>>()}
        </div>
        <div class="flex gap-4 text-xs mt-3">
            {series.into_iter().map(|(name, color, _)| view! {
                <span class="flex items-center gap-1">
                    <span class="w-3 h-3 rounded-full inline-block" style=format!("background: {}", color)></span>
                    {name}
                </span>
            }).collect::<Vec<_>>()}
        </div>
    }
}
