//! Sign-in and registration pages

use crate::api::{login, oauth_login, register};
use crate::components::LoadingSpinner;
use crate::state::AppState;
use crate::types::{AuthResponse, RegisterRequest};
use gpu_portal_core::Route as AppRoute;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use std::future::Future;

/// Run a sign-in call with the session loading flag raised.
fn run_sign_in<F, S>(state: AppState, error: RwSignal<Option<String>>, call: F, on_success: S)
where
    F: Future<Output = Result<AuthResponse, String>> + 'static,
    S: FnOnce() + 'static,
{
    state.begin_auth();
    error.set(None);
    spawn_local(async move {
        match call.await {
            Ok(auth) => {
                tracing::info!(user_id = %auth.user.id, "signed in");
                state.save_auth(auth);
                on_success();
            }
            Err(e) => {
                state.finish_auth();
                error.set(Some(e));
            }
        }
    });
}

/// Frame shared by the public auth pages
#[component]
pub fn AuthCard(
    title: &'static str,
    subtitle: &'static str,
    error: RwSignal<Option<String>>,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="min-h-screen flex items-center justify-center bg-[var(--bg-primary)] px-4">
            <div class="w-full max-w-md">
                <div class="card p-8">
                    <div class="text-center mb-8">
                        <div class="text-5xl mb-4">"🧮"</div>
                        <h1 class="text-2xl font-bold">{title}</h1>
                        <p class="text-[var(--text-muted)] mt-1">{subtitle}</p>
                    </div>

                    <Show when=move || error.get().is_some()>
                        <div class="mb-6 p-4 bg-[var(--accent-error)]/10 border border-[var(--accent-error)]/50
                                    rounded-[var(--radius-md)] text-[var(--accent-error)] text-sm animate-fade-in">
                            {move || error.get().unwrap_or_default()}
                        </div>
                    </Show>

                    {children()}
                </div>
            </div>
        </div>
    }
}

/// Google and GitHub sign-in buttons
#[component]
fn OAuthButtons(error: RwSignal<Option<String>>) -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();
    let is_loading = move || state.is_loading();

    let sign_in_with = move |provider: &'static str| {
        let base = state.api_base.get_untracked();
        let navigate = navigate.clone();
        run_sign_in(state, error, async move { oauth_login(&base, provider).await }, move || {
            navigate(AppRoute::Dashboard.path(), Default::default())
        });
    };
    let google = sign_in_with.clone();
    let github = sign_in_with;

    view! {
        <div class="mt-6">
            <div class="flex items-center gap-3 mb-4 text-xs text-[var(--text-muted)]">
                <div class="flex-1 border-t border-[var(--border-default)]"></div>
                "or continue with"
                <div class="flex-1 border-t border-[var(--border-default)]"></div>
            </div>
            <div class="grid grid-cols-2 gap-3">
                <button
                    type="button"
                    disabled=is_loading
                    on:click=move |_| google("google")
                    class="btn btn-ghost border border-[var(--border-default)]"
                >
                    "Google"
                </button>
                <button
                    type="button"
                    disabled=is_loading
                    on:click=move |_| github("github")
                    class="btn btn-ghost border border-[var(--border-default)]"
                >
                    "GitHub"
                </button>
            </div>
        </div>
    }
}

/// Sign-in page
#[component]
pub fn LoginPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(Option::<String>::None);
    let is_loading = move || state.is_loading();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let base = state.api_base.get_untracked();
        let email_val = email.get_untracked();
        let password_val = password.get_untracked();
        let navigate = navigate.clone();
        run_sign_in(
            state,
            error,
            async move { login(&base, &email_val, &password_val).await },
            move || navigate(AppRoute::Dashboard.path(), Default::default()),
        );
    };

    view! {
        <AuthCard title="Welcome Back" subtitle="Sign in to the GPU Portal" error=error>
            <form on:submit=on_submit class="space-y-4">
                <div>
                    <label class="block text-sm mb-1">"Email"</label>
                    <input
                        type="email"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                        placeholder="you@university.edu"
                        required=true
                        class="input"
                    />
                </div>
                <div>
                    <div class="flex justify-between mb-1">
                        <label class="text-sm">"Password"</label>
                        <a href=AppRoute::ForgotPassword.path() class="text-xs text-blue-400 hover:text-blue-300">
                            "Forgot password?"
                        </a>
                    </div>
                    <input
                        type="password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                        placeholder="••••••••"
                        required=true
                        class="input"
                    />
                </div>
                <button type="submit" disabled=is_loading class="btn btn-primary w-full py-3">
                    <Show when=is_loading>
                        <LoadingSpinner />
                    </Show>
                    "Sign In"
                </button>
            </form>

            <OAuthButtons error=error />

            <p class="mt-6 text-center text-sm text-[var(--text-muted)]">
                "Don't have an account? "
                <a href=AppRoute::Register.path() class="text-blue-400 hover:text-blue-300">"Sign up"</a>
            </p>
        </AuthCard>
    }
}

/// Registration page
#[component]
pub fn RegisterPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let organization = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(Option::<String>::None);
    let is_loading = move || state.is_loading();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let base = state.api_base.get_untracked();
        let body = RegisterRequest {
            name: name.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
            organization: organization.get_untracked(),
        };
        let navigate = navigate.clone();
        run_sign_in(
            state,
            error,
            async move { register(&base, &body).await },
            move || navigate(AppRoute::Dashboard.path(), Default::default()),
        );
    };

    view! {
        <AuthCard title="Create Account" subtitle="Request GPUs for your research" error=error>
            <form on:submit=on_submit class="space-y-4">
                <div>
                    <label class="block text-sm mb-1">"Name"</label>
                    <input
                        type="text"
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                        placeholder="Your name"
                        required=true
                        class="input"
                    />
                </div>
                <div>
                    <label class="block text-sm mb-1">"Email"</label>
                    <input
                        type="email"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                        placeholder="you@university.edu"
                        required=true
                        class="input"
                    />
                </div>
                <div>
                    <label class="block text-sm mb-1">"Organization"</label>
                    <input
                        type="text"
                        prop:value=move || organization.get()
                        on:input=move |ev| organization.set(event_target_value(&ev))
                        placeholder="Lab or institute"
                        class="input"
                    />
                </div>
                <div>
                    <label class="block text-sm mb-1">"Password"</label>
                    <input
                        type="password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                        placeholder="••••••••"
                        required=true
                        minlength="8"
                        class="input"
                    />
                    <p class="text-xs text-[var(--text-muted)] mt-1">"Minimum 8 characters"</p>
                </div>
                <button type="submit" disabled=is_loading class="btn btn-primary w-full py-3">
                    <Show when=is_loading>
                        <LoadingSpinner />
                    </Show>
                    "Create Account"
                </button>
            </form>

            <OAuthButtons error=error />

            <p class="mt-6 text-center text-sm text-[var(--text-muted)]">
                "Already have an account? "
                <a href=AppRoute::Login.path() class="text-blue-400 hover:text-blue-300">"Sign in"</a>
            </p>
        </AuthCard>
    }
}
