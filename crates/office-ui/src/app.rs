use leptos::logging::{error, warn};
use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::{
    components::{Redirect, Route, Router, Routes},
    hooks::use_navigate,
    StaticSegment,
};
use office_client::SessionEvent;
use office_types::{Brand, ConsoleSettings, Customer, Product, Service};

use crate::components::nav::Nav;
use crate::components::protected::Protected;
use crate::components::toast::ToastStack;
use crate::pages::login::LoginPage;
use crate::pages::resource::ResourcePage;
use crate::platform;
use crate::services::{ConsoleContext, Services};

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/customers";

#[server(name = GetConsoleSettings)]
pub async fn console_settings() -> Result<ConsoleSettings, ServerFnError> {
    use_context::<ConsoleSettings>()
        .ok_or_else(|| ServerFnError::new("console settings unavailable"))
}

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="pt-BR">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <MetaTags />
            </head>
            <body>
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let ctx = ConsoleContext::new();
    provide_context(ctx);

    platform::spawn(async move {
        let settings = console_settings().await.unwrap_or_else(|e| {
            warn!("console settings unavailable, using defaults: {e}");
            ConsoleSettings::default()
        });
        match Services::build(settings) {
            Ok(services) => {
                services.start(ctx);
                ctx.services.set(Some(services));
            }
            Err(e) => error!("failed to build console services: {e}"),
        }
    });

    on_cleanup(move || {
        if let Some(services) = ctx.services.get_untracked() {
            services.session.teardown();
        }
    });

    view! {
        <Stylesheet id="leptos" href="/pkg/office-console.css" />
        <Title text="Office Console" />
        <Router>
            <SessionRedirects />
            <Routes fallback=|| view! { <p>"Página não encontrada."</p> }.into_any()>
                <Route path=StaticSegment("") view=|| view! { <Redirect path=HOME_PATH /> } />
                <Route path=StaticSegment("login") view=LoginPage />
                <Route path=StaticSegment("brands") view=BrandsView />
                <Route path=StaticSegment("customers") view=CustomersView />
                <Route path=StaticSegment("products") view=ProductsView />
                <Route path=StaticSegment("services") view=ServicesView />
            </Routes>
        </Router>
        <ToastStack />
    }
}

/// Keeps the auth signals in step with the guard and moves the user in or
/// out of the protected area on session events.
#[component]
fn SessionRedirects() -> impl IntoView {
    let ctx = expect_context::<ConsoleContext>();
    let navigate = use_navigate();

    Effect::new(move |_| {
        let event = ctx.last_event.get();
        let Some(services) = ctx.services.get() else {
            return;
        };
        ctx.status.set(services.session.is_authenticated());
        ctx.user.set(services.session.user());

        match event {
            Some(event) if event.leaves_protected_area() => {
                navigate(LOGIN_PATH, Default::default())
            }
            Some(SessionEvent::SignedIn) => navigate(HOME_PATH, Default::default()),
            _ => {}
        }
    });
}

#[component]
fn BrandsView() -> impl IntoView {
    view! {
        <Protected>
            <div class="app-layout">
                <Nav />
                <main class="main-content">
                    <ResourcePage<Brand> />
                </main>
            </div>
        </Protected>
    }
}

#[component]
fn CustomersView() -> impl IntoView {
    view! {
        <Protected>
            <div class="app-layout">
                <Nav />
                <main class="main-content">
                    <ResourcePage<Customer> />
                </main>
            </div>
        </Protected>
    }
}

#[component]
fn ProductsView() -> impl IntoView {
    view! {
        <Protected>
            <div class="app-layout">
                <Nav />
                <main class="main-content">
                    <ResourcePage<Product> />
                </main>
            </div>
        </Protected>
    }
}

#[component]
fn ServicesView() -> impl IntoView {
    view! {
        <Protected>
            <div class="app-layout">
                <Nav />
                <main class="main-content">
                    <ResourcePage<Service> />
                </main>
            </div>
        </Protected>
    }
}
