//! GPU Portal UI - Leptos frontend
//!
//! Single-page dashboard for requesting and tracking GPU allocations. Talks
//! to the mock backend under `/api` and keeps session, notifications and
//! form state in reactive signals backed by `gpu-portal-core`.

pub mod api;
pub mod components;
pub mod format;
pub mod pages;
pub mod state;
pub mod types;

use leptos::prelude::*;
use leptos_meta::provide_meta_context;
use leptos_router::{
    components::{Route, Router, Routes},
    path,
};

use components::{Guarded, Toasts};
use gpu_portal_core::Route as AppRoute;
use pages::{
    dashboard::DashboardPage,
    forgot_password::ForgotPasswordPage,
    history::HistoryPage,
    login::{LoginPage, RegisterPage},
    not_found::NotFoundPage,
    notifications::NotificationsPage,
    profile::ProfilePage,
    request::RequestPage,
    resources::ResourcesPage,
};
use state::AppState;

/// Main application component
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    // Initialize global state
    let app_state = AppState::new();
    app_state.restore_session();
    provide_context(app_state);

    // Mirror the colour scheme onto the document root
    Effect::new(move |_| state::apply_theme(app_state.theme.get()));

    // Fetch notifications once per signed-in session
    Effect::new(move |_| {
        if app_state.token.get().is_some() && !app_state.notifications_loaded.get() {
            api::load_notifications(app_state);
        }
    });

    view! {
        <Router>
            <Toasts />
            <Routes fallback=|| view! { <Guarded route=AppRoute::NotFound><NotFoundPage /></Guarded> }>
                <Route path=path!("/login") view=|| view! { <Guarded route=AppRoute::Login><LoginPage /></Guarded> } />
                <Route path=path!("/register") view=|| view! { <Guarded route=AppRoute::Register><RegisterPage /></Guarded> } />
                <Route path=path!("/forgot-password") view=|| view! { <Guarded route=AppRoute::ForgotPassword><ForgotPasswordPage /></Guarded> } />
                <Route path=path!("/") view=|| view! { <Guarded route=AppRoute::Dashboard><DashboardPage /></Guarded> } />
                <Route path=path!("/resources") view=|| view! { <Guarded route=AppRoute::Resources><ResourcesPage /></Guarded> } />
                <Route path=path!("/request") view=|| view! { <Guarded route=AppRoute::Request><RequestPage /></Guarded> } />
                <Route path=path!("/history") view=|| view! { <Guarded route=AppRoute::History><HistoryPage /></Guarded> } />
                <Route path=path!("/notifications") view=|| view! { <Guarded route=AppRoute::Notifications><NotificationsPage /></Guarded> } />
                <Route path=path!("/profile") view=|| view! { <Guarded route=AppRoute::Profile><ProfilePage /></Guarded> } />
            </Routes>
        </Router>
    }
}
