//! Route table and the authentication gate in front of it.

use crate::session::SessionState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Login,
    Register,
    ForgotPassword,
    Dashboard,
    Resources,
    Request,
    History,
    Notifications,
    Profile,
    NotFound,
}

/// Side-menu entries, in display order.
pub const NAV: [Route; 6] = [
    Route::Dashboard,
    Route::Resources,
    Route::Request,
    Route::History,
    Route::Notifications,
    Route::Profile,
];

impl Route {
    /// Classify a path. Query strings and a trailing slash are ignored.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Route::Dashboard,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/forgot-password" => Route::ForgotPassword,
            "/resources" => Route::Resources,
            "/request" => Route::Request,
            "/history" => Route::History,
            "/notifications" => Route::Notifications,
            "/profile" => Route::Profile,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::ForgotPassword => "/forgot-password",
            Route::Dashboard => "/",
            Route::Resources => "/resources",
            Route::Request => "/request",
            Route::History => "/history",
            Route::Notifications => "/notifications",
            Route::Profile => "/profile",
            Route::NotFound => "/404",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Sign in",
            Route::Register => "Create account",
            Route::ForgotPassword => "Reset password",
            Route::Dashboard => "Dashboard",
            Route::Resources => "GPU Resources",
            Route::Request => "Request Resources",
            Route::History => "Request History",
            Route::Notifications => "Notifications",
            Route::Profile => "Profile",
            Route::NotFound => "Page Not Found",
        }
    }

    /// Reachable without a session. The not-found page is public too.
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Route::Login | Route::Register | Route::ForgotPassword | Route::NotFound
        )
    }

    /// Public pages that make no sense once signed in.
    pub fn is_auth_page(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

/// What the shell should do for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Render,
    /// Session restore still running; show a spinner.
    Loading,
    Redirect(Route),
}

pub fn gate(route: Route, session: &SessionState) -> Gate {
    if route.is_public() {
        if route.is_auth_page() && session.is_authenticated() {
            return Gate::Redirect(Route::Dashboard);
        }
        return Gate::Render;
    }
    if session.is_loading {
        return Gate::Loading;
    }
    if session.is_authenticated() {
        Gate::Render
    } else {
        Gate::Redirect(Route::Login)
    }
}
