//! Password reset request page

use crate::api::forgot_password;
use crate::components::LoadingSpinner;
use crate::pages::login::AuthCard;
use crate::state::AppState;
use crate::types::ToastKind;
use gpu_portal_core::Route as AppRoute;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let state = expect_context::<AppState>();

    let email = RwSignal::new(String::new());
    let sent_to = RwSignal::new(Option::<String>::None);
    let error = RwSignal::new(Option::<String>::None);
    let is_loading = move || state.is_loading();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let base = state.api_base.get_untracked();
        let email_val = email.get_untracked();
        state.begin_auth();
        error.set(None);
        spawn_local(async move {
            let result = forgot_password(&base, &email_val).await;
            state.finish_auth();
            match result {
                Ok(resp) => {
                    state.toast(ToastKind::Success, resp.message);
                    sent_to.set(Some(email_val));
                }
                Err(e) => error.set(Some(e)),
            }
        });
    };

    view! {
        <AuthCard title="Reset Password" subtitle="We'll email you a reset link" error=error>
            <Show
                when=move || sent_to.get().is_none()
                fallback=move || view! {
                    <div class="text-center space-y-4">
                        <p class="text-[var(--text-secondary)]">
                            "Check "
                            <span class="font-medium">{move || sent_to.get().unwrap_or_default()}</span>
                            " for a link to reset your password."
                        </p>
                        <a href=AppRoute::Login.path() class="btn btn-primary w-full">"Back to sign in"</a>
                    </div>
                }
            >
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
                    <button type="submit" disabled=is_loading class="btn btn-primary w-full py-3">
                        <Show when=is_loading>
                            <LoadingSpinner />
                        </Show>
                        "Send Reset Link"
                    </button>
                </form>
                <p class="mt-6 text-center text-sm text-[var(--text-muted)]">
                    <a href=AppRoute::Login.path() class="text-blue-400 hover:text-blue-300">"Back to sign in"</a>
                </p>
            </Show>
        </AuthCard>
    }
}
