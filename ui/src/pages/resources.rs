//! GPU catalog with filters and a side-by-side comparison

use crate::api::fetch_resources;
use crate::components::{AvailabilityBar, TableSkeleton};
use crate::state::AppState;
use crate::types::ToastKind;
use gpu_portal_core::{
    catalog::{self, MEMORY_THRESHOLDS_GB},
    GpuResource, Manufacturer, ResourceFilter, Route as AppRoute,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn ResourcesPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let resources = RwSignal::new(Option::<Vec<GpuResource>>::None);
    let filter = RwSignal::new(ResourceFilter::default());

    spawn_local(async move {
        let base = state.api_base.get_untracked();
        let Some(token) = state.token.get_untracked() else {
            return;
        };
        match fetch_resources(&base, &token).await {
            Ok(list) => resources.set(Some(list)),
            Err(e) => {
                tracing::error!("Failed to load resources: {}", e);
                state.toast(ToastKind::Error, e);
            }
        }
    });

    let visible = Memo::new(move |_| {
        let filter = filter.get();
        resources.with(|list| {
            list.as_deref()
                .map(|list| filter.apply(list).into_iter().cloned().collect::<Vec<_>>())
        })
    });

    view! {
        <div class="space-y-6">
            <div class="flex flex-col sm:flex-row sm:items-center sm:justify-between gap-4">
                <div>
                    <h2 class="text-2xl font-bold">"GPU Resources"</h2>
                    <p class="text-[var(--text-muted)]">"Browse the cluster's GPU models and their availability."</p>
                </div>
                <a href=AppRoute::Request.path() class="btn btn-primary">"Request resources"</a>
            </div>

            <FilterPanel filter=filter />

            {move || match visible.get() {
                None => view! { <div class="card p-6"><TableSkeleton rows=6 /></div> }.into_any(),
                Some(list) if list.is_empty() => view! {
                    <div class="card p-12 text-center text-[var(--text-muted)]">
                        "No GPUs match the current filters."
                    </div>
                }.into_any(),
                Some(list) => view! {
                    <ResourceTable resources=list.clone() />
                    <ComparisonTable resources=list />
                }.into_any(),
            }}
        </div>
    }
}

#[component]
fn FilterPanel(filter: RwSignal<ResourceFilter>) -> impl IntoView {
    view! {
        <div class="card p-4 grid grid-cols-1 md:grid-cols-4 gap-4 items-end">
            <div>
                <label class="block text-sm mb-1">"Search"</label>
                <input
                    type="search"
                    placeholder="Model name"
                    prop:value=move || filter.with(|f| f.search.clone())
                    on:input=move |ev| filter.update(|f| f.search = event_target_value(&ev))
                    class="input"
                />
            </div>
            <div>
                <label class="block text-sm mb-1">"Manufacturer"</label>
                <select
                    class="input"
                    prop:value=move || filter.with(|f| f.manufacturer.as_str())
                    on:change=move |ev| {
                        let manufacturer = event_target_value(&ev).parse().unwrap_or_default();
                        filter.update(|f| f.manufacturer = manufacturer);
                    }
                >
                    {[Manufacturer::All, Manufacturer::Nvidia, Manufacturer::Amd]
                        .into_iter()
                        .map(|m| view! { <option value=m.as_str()>{m.label()}</option> })
                        .collect::<Vec<_>>()}
                </select>
            </div>
            <div>
                <label class="block text-sm mb-1">"Minimum memory"</label>
                <select
                    class="input"
                    prop:value=move || filter.with(|f| f.min_memory.to_string())
                    on:change=move |ev| {
                        let min_memory = event_target_value(&ev).parse().unwrap_or(0);
                        filter.update(|f| f.min_memory = min_memory);
                    }
                >
                    {MEMORY_THRESHOLDS_GB
                        .into_iter()
                        .map(|gb| {
                            let label = if gb == 0 { "Any".to_string() } else { format!("{}GB+", gb) };
                            view! { <option value=gb.to_string()>{label}</option> }
                        })
                        .collect::<Vec<_>>()}
                </select>
            </div>
            <label class="flex items-center gap-2 text-sm pb-2">
                <input
                    type="checkbox"
                    prop:checked=move || filter.with(|f| f.only_available)
                    on:change=move |ev| filter.update(|f| f.only_available = event_target_checked(&ev))
                />
                "Show only available"
            </label>
        </div>
    }
}

#[component]
fn ResourceTable(resources: Vec<GpuResource>) -> impl IntoView {
    view! {
        <div class="card overflow-x-auto">
            <table class="w-full text-sm">
                <thead class="text-left text-[var(--text-muted)] border-b border-[var(--border-default)]">
                    <tr>
                        <th class="px-4 py-3">"Model"</th>
                        <th class="px-4 py-3">"Memory"</th>
                        <th class="px-4 py-3">"Cores"</th>
                        <th class="px-4 py-3">"Clock"</th>
                        <th class="px-4 py-3">"Power"</th>
                        <th class="px-4 py-3">"Availability"</th>
                        <th class="px-4 py-3">"Location"</th>
                        <th class="px-4 py-3"></th>
                    </tr>
                </thead>
                <tbody>
                    {resources.into_iter().map(|resource| {
                        let request_href = format!("{}?gpu={}", AppRoute::Request.path(), resource.id);
                        let available = resource.is_available();
                        view! {
                            <tr class="border-t border-[var(--border-default)]">
                                <td class="px-4 py-3 font-medium">{resource.name.clone()}</td>
                                <td class="px-4 py-3">{resource.memory_label()}</td>
                                <td class="px-4 py-3">{resource.cores.to_string()}</td>
                                <td class="px-4 py-3">{resource.clock_speed.clone()}</td>
                                <td class="px-4 py-3">{resource.power_draw.clone()}</td>
                                <td class="px-4 py-3"><AvailabilityBar resource=resource.clone() /></td>
                                <td class="px-4 py-3">{resource.location.clone()}</td>
                                <td class="px-4 py-3 text-right">
                                    {if available {
                                        view! { <a href=request_href class="btn btn-primary text-xs">"Request"</a> }.into_any()
                                    } else {
                                        view! { <span class="btn text-xs opacity-50">"Unavailable"</span> }.into_any()
                                    }}
                                </td>
                            </tr>
                        }
                    }).collect::<Vec<_>>()}
                </tbody>
            </table>
        </div>
    }
}

/// First few visible models, one column each
#[component]
fn ComparisonTable(resources: Vec<GpuResource>) -> impl IntoView {
    let refs: Vec<&GpuResource> = resources.iter().collect();
    let columns: Vec<GpuResource> = catalog::comparison(&refs).iter().map(|r| (*r).clone()).collect();

    let row = |label: &'static str, cell: fn(&GpuResource) -> String| {
        view! {
            <tr class="border-t border-[var(--border-default)]">
                <td class="px-4 py-2 text-[var(--text-muted)]">{label}</td>
                {columns.iter().map(|r| view! { <td class="px-4 py-2">{cell(r)}</td> }).collect::<Vec<_>>()}
            </tr>
        }
    };

    view! {
        <section class="card overflow-x-auto">
            <h3 class="text-lg font-semibold px-4 pt-4">"Comparison Chart"</h3>
            <table class="w-full text-sm mt-2">
                <thead class="text-left">
                    <tr>
                        <th class="px-4 py-2"></th>
                        {columns.iter().map(|r| view! { <th class="px-4 py-2">{r.name.clone()}</th> }).collect::<Vec<_>>()}
                    </tr>
                </thead>
                <tbody>
                    {row("Memory", |r| r.memory_label())}
                    {row("CUDA / Stream Cores", |r| r.cores.to_string())}
                    {row("Clock Speed", |r| r.clock_speed.clone())}
                    {row("Power Draw", |r| r.power_draw.clone())}
                    {row("Available", |r| format!("{} / {}", r.available, r.total))}
                    {row("Location", |r| r.location.clone())}
                </tbody>
            </table>
        </section>
    }
}
