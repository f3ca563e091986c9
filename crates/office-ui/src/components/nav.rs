use leptos::prelude::*;
use leptos_router::hooks::use_location;
use office_types::EntityKind;

use crate::services::ConsoleContext;

fn icon(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Brand => "\u{25A3}",
        EntityKind::Customer => "\u{263A}",
        EntityKind::Product => "\u{2B21}",
        EntityKind::Service => "\u{2692}",
    }
}

#[component]
pub fn Nav() -> impl IntoView {
    let ctx = expect_context::<ConsoleContext>();
    let location = use_location();

    let logout = move |_| {
        if let Some(services) = ctx.services.get_untracked() {
            services.auth.logout();
        }
    };

    view! {
        <nav class="nav-sidebar">
            <div class="nav-brand">
                <div class="brand-icon">"O"</div>
                <span class="brand-text">"Office Console"</span>
            </div>
            <ul class="nav-links">
                {EntityKind::ALL
                    .into_iter()
                    .map(|kind| {
                        let href = format!("/{}", kind.slug());
                        let isActive = {
                            let href = href.clone();
                            move || location.pathname.get() == href
                        };
                        view! {
                            <li class="nav-item" class:active=isActive>
                                <a href=href>
                                    <span class="nav-icon">{icon(kind)}</span>
                                    <span>{kind.title()}</span>
                                </a>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
            <div class="nav-footer">
                <span class="nav-user">
                    {move || ctx.user.get().map(|user| user.username).unwrap_or_default()}
                </span>
                <button class="btn btn-ghost btn-sm" on:click=logout>
                    "Sair"
                </button>
            </div>
        </nav>
    }
}
