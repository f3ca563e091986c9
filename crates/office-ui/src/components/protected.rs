use leptos::prelude::*;
use leptos_router::components::Redirect;
use office_client::AuthStatus;

use crate::app::LOGIN_PATH;
use crate::services::ConsoleContext;

/// Renders `children` only for a signed-in user. While the stored session is
/// still being read nothing but a spinner shows, so neither screen flashes.
#[component]
pub fn Protected(children: ChildrenFn) -> impl IntoView {
    let ctx = expect_context::<ConsoleContext>();

    move || match (ctx.services.get(), ctx.status.get()) {
        (Some(services), AuthStatus::Authenticated) => {
            provide_context(services);
            children().into_any()
        }
        (Some(_), AuthStatus::Anonymous) => view! { <Redirect path=LOGIN_PATH /> }.into_any(),
        _ => view! {
            <div class="loading">
                <div class="spinner"></div>
                "Verificando sessão..."
            </div>
        }
        .into_any(),
    }
}
