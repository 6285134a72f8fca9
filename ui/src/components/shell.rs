//! Route gating and the signed-in page layout

use crate::components::{Header, LoadingOverlay, Sidebar};
use crate::state::AppState;
use gpu_portal_core::{gate, Gate, Route as AppRoute};
use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::components::Redirect;

/// Render `children` for `route` only when the session allows it.
///
/// Gated pages get the side menu and top bar; public pages render bare.
#[component]
pub fn Guarded(route: AppRoute, children: ChildrenFn) -> impl IntoView {
    let state = expect_context::<AppState>();
    let decision = Memo::new(move |_| gate(route, &state.session_state()));

    view! {
        <Title text=route.title() />
        {move || match decision.get() {
            Gate::Render if route.is_public() => children().into_any(),
            Gate::Render => {
                let children = children.clone();
                view! { <Shell route=route>{children()}</Shell> }.into_any()
            }
            Gate::Loading => view! { <LoadingOverlay message="Restoring session..." /> }.into_any(),
            Gate::Redirect(to) => view! { <Redirect path=to.path() /> }.into_any(),
        }}
    }
}

/// Sidebar, top bar and page content
#[component]
fn Shell(route: AppRoute, children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen flex bg-[var(--bg-primary)]">
            <Sidebar />
            <div class="flex-1 flex flex-col min-w-0">
                <Header route=route />
                <main class="flex-1 p-6 max-w-screen-2xl w-full mx-auto">
                    {children()}
                </main>
            </div>
        </div>
    }
}
