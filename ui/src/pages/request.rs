//! Resource request form

use crate::api::{fetch_request_form, submit_request};
use crate::components::{LoadingSpinner, PageLoading};
use crate::state::AppState;
use crate::types::ToastKind;
use gpu_portal_core::{
    request::{MAX_DURATION_DAYS, MAX_QUANTITY, MIN_DURATION_DAYS, MIN_QUANTITY},
    Error as CoreError, GpuResource, RequestForm, RequestWorkflow, Route as AppRoute,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_query_map};

#[component]
pub fn RequestPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();
    let query = use_query_map();

    let workflow = RwSignal::new(RequestWorkflow::default());
    let catalog = RwSignal::new(Option::<Vec<GpuResource>>::None);
    let research_fields = RwSignal::new(Vec::<String>::new());

    let preselected = query.with_untracked(|q| q.get("gpu"));
    spawn_local(async move {
        let base = state.api_base.get_untracked();
        let Some(token) = state.token.get_untracked() else {
            return;
        };
        match fetch_request_form(&base, &token, preselected.as_deref()).await {
            Ok(ctx) => {
                workflow.set(RequestWorkflow::new(ctx.form));
                research_fields.set(ctx.research_fields);
                catalog.set(Some(ctx.gpu_models));
            }
            Err(e) => {
                tracing::error!("Failed to load request form: {}", e);
                state.toast(ToastKind::Error, e);
            }
        }
    });

    let submitting = Memo::new(move |_| workflow.with(|w| w.state().is_submitting()));

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(models) = catalog.get_untracked() else {
            return;
        };
        let Some(token) = state.token.get_untracked() else {
            return;
        };

        let validated = workflow.try_update(|w| w.submit(&models));
        match validated {
            Some(Ok(_)) => {}
            Some(Err(CoreError::Validation(e))) => {
                state.toast(ToastKind::Error, e.to_string());
                return;
            }
            Some(Err(e)) => {
                tracing::warn!("Submit ignored: {}", e);
                return;
            }
            None => return,
        }

        let form = workflow.with_untracked(|w| w.form().clone());
        let base = state.api_base.get_untracked();
        let navigate = navigate.clone();
        spawn_local(async move {
            let outcome = submit_request(&base, &token, &form).await.map(|_| ());
            let succeeded = outcome.is_ok();
            if let Err(e) = &outcome {
                tracing::error!("Request submission failed: {}", e);
            }
            match workflow.try_update(|w| w.complete(outcome)) {
                Some(Ok(message)) => {
                    let kind = if succeeded { ToastKind::Success } else { ToastKind::Error };
                    state.toast(kind, message);
                }
                Some(Err(e)) => tracing::warn!("{}", e),
                None => return,
            }
            if succeeded {
                navigate(AppRoute::History.path(), Default::default());
            }
        });
    };

    view! {
        <div class="space-y-6 max-w-4xl">
            <div>
                <h2 class="text-2xl font-bold">"Request GPU Resources"</h2>
                <p class="text-[var(--text-muted)]">
                    "Describe your project and pick the hardware you need. Requests are reviewed by the cluster team."
                </p>
            </div>

            {move || match catalog.get() {
                None => view! { <PageLoading /> }.into_any(),
                Some(models) => view! {
                    <form on:submit=on_submit.clone() class="card p-6 space-y-5">
                        <GpuFields workflow=workflow models=models.clone() submitting=submitting />
                        <ProjectFields workflow=workflow research_fields=research_fields submitting=submitting />
                        <SelectedGpu workflow=workflow models=models />

                        <label class="flex items-start gap-2 text-sm">
                            <input
                                type="checkbox"
                                class="mt-1"
                                prop:checked=move || workflow.with(|w| w.form().agree_to_terms)
                                on:change=move |ev| workflow.update(|w| w.form_mut().agree_to_terms = event_target_checked(&ev))
                                disabled=move || submitting.get()
                            />
                            "I agree to the cluster usage policy and will release resources when my project ends."
                        </label>

                        <div class="flex justify-end">
                            <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                                <Show when=move || submitting.get() fallback=|| "Submit Request">
                                    <LoadingSpinner size="w-4 h-4" />
                                    "Submitting..."
                                </Show>
                            </button>
                        </div>
                    </form>
                }.into_any(),
            }}
        </div>
    }
}

fn number_value(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[component]
fn GpuFields(
    workflow: RwSignal<RequestWorkflow>,
    models: Vec<GpuResource>,
    submitting: Memo<bool>,
) -> impl IntoView {
    view! {
        <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
            <div>
                <label class="block text-sm mb-1">"GPU model"</label>
                <select
                    class="input"
                    prop:value=move || workflow.with(|w| w.form().gpu_model.clone())
                    on:change=move |ev| workflow.update(|w| w.form_mut().gpu_model = event_target_value(&ev))
                    disabled=move || submitting.get()
                >
                    <option value="">"Select a GPU"</option>
                    {models
                        .into_iter()
                        .map(|gpu| {
                            let label = format!("{} ({} available)", gpu.name, gpu.available);
                            view! { <option value=gpu.id.clone() disabled=!gpu.is_available()>{label}</option> }
                        })
                        .collect::<Vec<_>>()}
                </select>
            </div>
            <div>
                <label class="block text-sm mb-1">"Quantity"</label>
                <input
                    type="number"
                    min=MIN_QUANTITY.to_string()
                    max=MAX_QUANTITY.to_string()
                    class="input"
                    prop:value=move || workflow.with(|w| number_value(w.form().quantity))
                    on:input=move |ev| {
                        let quantity = RequestForm::parse_number(&event_target_value(&ev));
                        workflow.update(|w| w.form_mut().quantity = quantity);
                    }
                    disabled=move || submitting.get()
                />
            </div>
            <div>
                <label class="block text-sm mb-1">"Duration (days)"</label>
                <input
                    type="number"
                    min=MIN_DURATION_DAYS.to_string()
                    max=MAX_DURATION_DAYS.to_string()
                    class="input"
                    prop:value=move || workflow.with(|w| number_value(w.form().duration_days))
                    on:input=move |ev| {
                        let days = RequestForm::parse_number(&event_target_value(&ev));
                        workflow.update(|w| w.form_mut().duration_days = days);
                    }
                    disabled=move || submitting.get()
                />
            </div>
        </div>
    }
}

#[component]
fn ProjectFields(
    workflow: RwSignal<RequestWorkflow>,
    research_fields: RwSignal<Vec<String>>,
    submitting: Memo<bool>,
) -> impl IntoView {
    view! {
        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
            <div>
                <label class="block text-sm mb-1">"Research field"</label>
                <select
                    class="input"
                    prop:value=move || workflow.with(|w| w.form().research_field.clone())
                    on:change=move |ev| workflow.update(|w| w.form_mut().research_field = event_target_value(&ev))
                    disabled=move || submitting.get()
                >
                    <option value="">"Select a field"</option>
                    {move || research_fields
                        .get()
                        .into_iter()
                        .map(|field| view! { <option value=field.clone()>{field}</option> })
                        .collect::<Vec<_>>()}
                </select>
            </div>
            <div>
                <label class="block text-sm mb-1">"Project name"</label>
                <input
                    type="text"
                    class="input"
                    placeholder="e.g. Protein folding ablations"
                    prop:value=move || workflow.with(|w| w.form().project_name.clone())
                    on:input=move |ev| workflow.update(|w| w.form_mut().project_name = event_target_value(&ev))
                    disabled=move || submitting.get()
                />
            </div>
        </div>
        <div>
            <label class="block text-sm mb-1">"Project description"</label>
            <textarea
                rows="4"
                class="input"
                placeholder="What will you run and why does it need these GPUs?"
                prop:value=move || workflow.with(|w| w.form().project_description.clone())
                on:input=move |ev| workflow.update(|w| w.form_mut().project_description = event_target_value(&ev))
                disabled=move || submitting.get()
            ></textarea>
        </div>
    }
}

/// Spec card for the currently selected model
#[component]
fn SelectedGpu(workflow: RwSignal<RequestWorkflow>, models: Vec<GpuResource>) -> impl IntoView {
    let selected = Memo::new(move |_| {
        workflow.with(|w| w.form().selected_gpu(&models).cloned())
    });

    move || {
        selected.get().map(|gpu| view! {
            <div class="p-4 rounded-[var(--radius-md)] bg-[var(--bg-primary)] border border-[var(--border-default)]">
                <p class="font-medium mb-2">{gpu.name.clone()}</p>
                <div class="grid grid-cols-2 md:grid-cols-4 gap-3 text-sm">
                    <Spec label="Memory" value=gpu.memory_label() />
                    <Spec label="Cores" value=gpu.cores.to_string() />
                    <Spec label="Clock" value=gpu.clock_speed.clone() />
                    <Spec label="Available" value=format!("{} / {}", gpu.available, gpu.total) />
                </div>
            </div>
        })
    }
}

#[component]
fn Spec(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div>
            <p class="text-xs text-[var(--text-muted)]">{label}</p>
            <p>{value}</p>
        </div>
    }
}
