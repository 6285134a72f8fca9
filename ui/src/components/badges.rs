//! Status badge and availability bar

use gpu_portal_core::{AvailabilityLevel, GpuResource, RequestStatus};
use leptos::prelude::*;

#[component]
pub fn StatusBadge(status: RequestStatus) -> impl IntoView {
    view! {
        <span class=format!("badge badge-{}", status.as_str())>{status.label()}</span>
    }
}

/// `available / total` with a bar coloured by availability level
#[component]
pub fn AvailabilityBar(resource: GpuResource) -> impl IntoView {
    let level = match resource.availability_level() {
        AvailabilityLevel::None => "level-none",
        AvailabilityLevel::Low => "level-low",
        AvailabilityLevel::Healthy => "level-healthy",
    };
    let width = format!("width: {:.0}%", resource.availability_percent());

    view! {
        <div class="flex items-center gap-2">
            <div class="w-24 h-2 rounded-full bg-slate-800 overflow-hidden">
                <div class=format!("h-full rounded-full {}", level) style=width></div>
            </div>
            <span class="text-sm text-[var(--text-secondary)]">
                {format!("{} / {}", resource.available, resource.total)}
            </span>
        </div>
    }
}
