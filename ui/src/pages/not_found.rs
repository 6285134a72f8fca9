use gpu_portal_core::Route as AppRoute;
use leptos::prelude::*;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="min-h-screen flex items-center justify-center bg-[var(--bg-primary)]">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-slate-500 mb-4">"404"</h1>
                <p class="text-xl text-slate-400 mb-8">"Page not found"</p>
                <a href=AppRoute::Dashboard.path() class="btn btn-primary">
                    "Back to Dashboard"
                </a>
            </div>
        </div>
    }
}
