use leptos::prelude::*;
use office_client::NotificationKind;

use crate::services::ConsoleContext;

fn kind_class(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Success => "toast-success",
        NotificationKind::Error => "toast-error",
        NotificationKind::Warning => "toast-warning",
        NotificationKind::Info => "toast-info",
    }
}

/// Renders the notification channel. Place this once near the root of the app.
#[component]
pub fn ToastStack() -> impl IntoView {
    let ctx = expect_context::<ConsoleContext>();

    let dismiss = move |id: u64| {
        if let Some(services) = ctx.services.get_untracked() {
            services.notifications.dismiss(id);
        }
    };

    view! {
        <div class="toast-container">
            <For
                each=move || ctx.toasts.get()
                key=|toast| toast.id
                let:toast
            >
                <div class=format!("toast {}", kind_class(toast.kind))>
                    <span>{toast.message.clone()}</span>
                    <button class="toast-close" on:click=move |_| dismiss(toast.id)>
                        "\u{00D7}"
                    </button>
                </div>
            </For>
        </div>
    }
}
