//! Profile view and editor

use crate::api::{fetch_profile, update_profile};
use crate::components::{Avatar, LoadingSpinner, PageLoading};
use crate::state::AppState;
use crate::types::ToastKind;
use gpu_portal_core::{
    profile::{PROFILE_SAVED_MESSAGE, PROFILE_SAVE_FAILED_MESSAGE},
    ProfileDraft, ProfileEditor, User,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn ProfilePage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let profile = RwSignal::new(Option::<User>::None);
    let editor = RwSignal::new(ProfileEditor::default());
    let saving = RwSignal::new(false);

    spawn_local(async move {
        let base = state.api_base.get_untracked();
        let Some(token) = state.token.get_untracked() else {
            return;
        };
        let user = match fetch_profile(&base, &token).await {
            Ok(user) => Some(user),
            Err(e) => {
                // Fall back to the cached session user
                tracing::warn!("Failed to load profile: {}", e);
                state.session.with_untracked(|s| s.user().cloned())
            }
        };
        if let Some(user) = user {
            editor.set(ProfileEditor::new(&user));
            profile.set(Some(user));
        }
    });

    let toggle_editing = move |_| {
        if let Some(user) = profile.get_untracked() {
            editor.update(|e| e.toggle_editing(&user));
        }
    };

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(current) = profile.get_untracked() else {
            return;
        };
        let draft = editor.with_untracked(|e| e.draft().clone());
        if let Err(e) = draft.apply_to(&current) {
            state.toast(ToastKind::Error, e.to_string());
            return;
        }
        let Some(token) = state.token.get_untracked() else {
            return;
        };
        let base = state.api_base.get_untracked();
        saving.set(true);
        spawn_local(async move {
            match update_profile(&base, &token, &draft).await {
                Ok(user) => {
                    editor.update(|e| e.saved(&user));
                    state.update_user(user.clone());
                    profile.set(Some(user));
                    state.toast(ToastKind::Success, PROFILE_SAVED_MESSAGE);
                }
                Err(e) => {
                    tracing::error!("Profile update failed: {}", e);
                    state.toast(ToastKind::Error, PROFILE_SAVE_FAILED_MESSAGE);
                }
            }
            saving.set(false);
        });
    };

    view! {
        <div class="space-y-6 max-w-3xl">
            <div class="flex items-center justify-between">
                <div>
                    <h2 class="text-2xl font-bold">"Profile"</h2>
                    <p class="text-[var(--text-muted)]">"Your account details."</p>
                </div>
                <Show when=move || profile.with(Option::is_some)>
                    <button on:click=toggle_editing class="btn btn-ghost border border-[var(--border-default)]">
                        {move || if editor.with(|e| e.is_editing()) { "Cancel" } else { "Edit Profile" }}
                    </button>
                </Show>
            </div>

            {move || match profile.get() {
                None => view! { <PageLoading /> }.into_any(),
                Some(user) => view! {
                    <div class="card p-6 space-y-6">
                        <div class="flex items-center gap-4">
                            <Avatar user=user.clone() size="h-20 w-20 text-2xl" />
                            <div>
                                <p class="text-xl font-semibold">{user.name.clone()}</p>
                                <p class="text-[var(--text-muted)]">{user.email.clone()}</p>
                                <span class="badge badge-approved mt-2 inline-block">{user.role.clone()}</span>
                            </div>
                        </div>
                        <Show
                            when=move || editor.with(|e| e.is_editing())
                            fallback=move || view! { <ProfileDetails user=user.clone() /> }
                        >
                            <form on:submit=save class="space-y-4">
                                <DraftField label="Full name" input_type="text" editor=editor saving=saving
                                    get={|d| d.name.clone()} set={|d, v| d.name = v} />
                                <DraftField label="Email" input_type="email" editor=editor saving=saving
                                    get={|d| d.email.clone()} set={|d, v| d.email = v} />
                                <DraftField label="Organization" input_type="text" editor=editor saving=saving
                                    get={|d| d.organization.clone()} set={|d, v| d.organization = v} />
                                <DraftField label="Avatar URL" input_type="url" editor=editor saving=saving
                                    get={|d| d.avatar.clone().unwrap_or_default()} set={|d, v| d.avatar = Some(v)} />
                                <div class="flex justify-end">
                                    <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                                        <Show when=move || saving.get() fallback=|| "Save Changes">
                                            <LoadingSpinner size="w-4 h-4" />
                                            "Saving..."
                                        </Show>
                                    </button>
                                </div>
                            </form>
                        </Show>
                    </div>
                }.into_any(),
            }}
        </div>
    }
}

#[component]
fn ProfileDetails(user: User) -> impl IntoView {
    let rows = [
        ("Full name", user.name),
        ("Email", user.email),
        ("Organization", user.organization),
        ("Role", user.role),
    ];
    view! {
        <dl class="grid grid-cols-1 md:grid-cols-2 gap-4 text-sm">
            {rows.into_iter().map(|(label, value)| view! {
                <div>
                    <dt class="text-xs text-[var(--text-muted)] mb-1">{label}</dt>
                    <dd>{value}</dd>
                </div>
            }).collect::<Vec<_>>()}
        </dl>
    }
}

/// One text input bound to a field of the editor's draft
#[component]
fn DraftField(
    label: &'static str,
    input_type: &'static str,
    editor: RwSignal<ProfileEditor>,
    saving: RwSignal<bool>,
    get: fn(&ProfileDraft) -> String,
    set: fn(&mut ProfileDraft, String),
) -> impl IntoView {
    view! {
        <div>
            <label class="block text-sm mb-1">{label}</label>
            <input
                type=input_type
                class="input"
                prop:value=move || editor.with(|e| get(e.draft()))
                on:input=move |ev| editor.update(|e| set(e.draft_mut(), event_target_value(&ev)))
                disabled=move || saving.get()
            />
        </div>
    }
}
