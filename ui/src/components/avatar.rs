use gpu_portal_core::User;
use leptos::prelude::*;

/// Round avatar image, or the name's initial when there is none
#[component]
pub fn Avatar(
    user: User,
    #[prop(default = "h-8 w-8")] size: &'static str,
) -> impl IntoView {
    match user.avatar.clone() {
        Some(src) => view! {
            <img
                class=format!("{} rounded-full object-cover border border-slate-700", size)
                src=src
                alt=user.name.clone()
            />
        }
        .into_any(),
        None => view! {
            <div class=format!(
                "{} rounded-full bg-blue-600 flex items-center justify-center text-white font-medium",
                size
            )>
                {user.initial().map(String::from).unwrap_or_default()}
            </div>
        }
        .into_any(),
    }
}
