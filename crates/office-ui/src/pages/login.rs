use leptos::ev::SubmitEvent;
use leptos::logging::error;
use leptos::prelude::*;
use leptos_router::components::Redirect;
use office_client::{AuthStatus, ClientError};
use office_types::LoginRequest;

use crate::app::HOME_PATH;
use crate::platform;
use crate::services::ConsoleContext;

const LOGIN_FAILED: &str = "Erro ao gerar token. Tente novamente.";

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = expect_context::<ConsoleContext>();

    move || match ctx.status.get() {
        AuthStatus::Authenticated => view! { <Redirect path=HOME_PATH /> }.into_any(),
        AuthStatus::Unknown => view! {
            <div class="loading">
                <div class="spinner"></div>
            </div>
        }
        .into_any(),
        AuthStatus::Anonymous => view! { <LoginForm /> }.into_any(),
    }
}

#[component]
fn LoginForm() -> impl IntoView {
    let ctx = expect_context::<ConsoleContext>();
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let failure = RwSignal::new(None::<String>);

    let submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(services) = ctx.services.get_untracked() else {
            return;
        };
        let request = LoginRequest {
            username: username.get_untracked(),
            password: password.get_untracked(),
        };

        busy.set(true);
        failure.set(None);
        platform::spawn(async move {
            match services.auth.login(&request).await {
                Ok(_) => {
                    services.notifications.success("Login realizado com sucesso!");
                }
                Err(ClientError::Validation(e)) => failure.set(Some(e.message)),
                Err(e) => {
                    error!("login failed: {e}");
                    services.notifications.error(LOGIN_FAILED);
                    failure.set(Some(LOGIN_FAILED.to_string()));
                }
            }
            busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <div class="login-header">
                    <div class="login-icon">"O"</div>
                    <h1>"Office Console"</h1>
                    <p>"Entre com seu usuário e senha"</p>
                </div>

                {move || failure.get().map(|message| view! { <div class="login-error">{message}</div> })}

                <form on:submit=submit>
                    <div class="form-group">
                        <label for="username">"Usuário"</label>
                        <input
                            type="text"
                            id="username"
                            autocomplete="username"
                            prop:value=username
                            on:input=move |ev| username.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-group">
                        <label for="password">"Senha"</label>
                        <input
                            type="password"
                            id="password"
                            autocomplete="current-password"
                            prop:value=password
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                    </div>
                    <button type="submit" class="btn btn-primary" disabled=move || busy.get()>
                        {move || if busy.get() { "Entrando..." } else { "Entrar" }}
                    </button>
                </form>
            </div>
        </div>
    }
}
