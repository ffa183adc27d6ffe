//! Toast stack

use leptos::prelude::*;

use crate::state::use_toast_context;

#[component]
pub fn ToastStack() -> impl IntoView {
    let toasts = use_toast_context();

    view! {
        <div class="toast-stack">
            <For
                each=move || toasts.toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=format!("toast toast-{}", toast.level) on:click=move |_| toasts.dismiss(id)>
                            {toast.message}
                        </div>
                    }
                }
            />
        </div>
    }
}
