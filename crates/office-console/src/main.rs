#![allow(non_snake_case)]

#[cfg(feature = "ssr")]
mod config {
    use office_types::ConsoleSettings;
    use serde::Deserialize;

    #[derive(Deserialize, Clone, Debug, Default)]
    #[serde(default)]
    pub struct Config {
        pub server: ServerConfig,
        pub api: ApiConfig,
        pub ui: UiConfig,
    }

    #[derive(Deserialize, Clone, Debug)]
    #[serde(default)]
    pub struct ServerConfig {
        pub bind: String,
        pub port: u16,
    }

    /// Where the browser finds the REST backend.
    #[derive(Deserialize, Clone, Debug)]
    #[serde(default)]
    pub struct ApiConfig {
        pub base_url: String,
        pub login_path: String,
    }

    #[derive(Deserialize, Clone, Debug)]
    #[serde(default)]
    pub struct UiConfig {
        pub search_debounce_ms: u64,
        pub toast_ttl_ms: u64,
        pub default_page_size: u32,
        pub page_size_options: Vec<u32>,
    }

    impl Default for ServerConfig {
        fn default() -> Self {
            Self {
                bind: "0.0.0.0".into(),
                port: 3000,
            }
        }
    }

    impl Default for ApiConfig {
        fn default() -> Self {
            let defaults = ConsoleSettings::default();
            Self {
                base_url: defaults.api_base_url,
                login_path: defaults.login_path,
            }
        }
    }

    impl Default for UiConfig {
        fn default() -> Self {
            let defaults = ConsoleSettings::default();
            Self {
                search_debounce_ms: defaults.search_debounce_ms,
                toast_ttl_ms: defaults.toast_ttl_ms,
                default_page_size: defaults.default_page_size,
                page_size_options: defaults.page_size_options,
            }
        }
    }

    impl Config {
        /// The part of the config the browser is allowed to see.
        pub fn console_settings(&self) -> ConsoleSettings {
            let mut pageSizes = self.ui.page_size_options.clone();
            if !pageSizes.contains(&self.ui.default_page_size) {
                pageSizes.push(self.ui.default_page_size);
                pageSizes.sort_unstable();
            }
            ConsoleSettings {
                api_base_url: self.api.base_url.clone(),
                login_path: self.api.login_path.clone(),
                search_debounce_ms: self.ui.search_debounce_ms,
                toast_ttl_ms: self.ui.toast_ttl_ms,
                default_page_size: self.ui.default_page_size,
                page_size_options: pageSizes,
            }
        }
    }

    pub const DEFAULT_PATH: &str = "config.example.toml";

    /// Path given with `--config`, or the example file next to the binary.
    pub fn path_from_args(mut args: impl Iterator<Item = String>) -> String {
        while let Some(arg) = args.next() {
            if arg == "--config" {
                return args.next().unwrap_or_else(|| DEFAULT_PATH.into());
            }
        }
        DEFAULT_PATH.into()
    }

    /// Reads `path`. An unreadable or invalid file falls back to defaults.
    pub fn load(path: &str) -> Config {
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|contents| toml::from_str::<Config>(&contents).map_err(|e| e.to_string()));
        parsed.unwrap_or_else(|e| {
            tracing::warn!("config {path} unusable ({e}), falling back to defaults");
            Config::default()
        })
    }

}

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() {
    use axum::Router;
    use leptos::prelude::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};
    use office_ui::{shell, App};
    use tower_http::trace::TraceLayer;
    use tracing_subscriber::{fmt, EnvFilter};

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let configPath = config::path_from_args(std::env::args().skip(1));
    let appConfig = config::load(&configPath);
    let settings = appConfig.console_settings();
    tracing::info!(
        "loaded config from {configPath}: bind={}:{} api={}",
        appConfig.server.bind,
        appConfig.server.port,
        settings.api_base_url
    );

    let conf = get_configuration(None).expect("failed to load Leptos configuration");
    let mut leptosOptions = conf.leptos_options;
    let addr: std::net::SocketAddr = format!("{}:{}", appConfig.server.bind, appConfig.server.port)
        .parse()
        .unwrap_or_else(|e| {
            tracing::warn!("invalid bind address in {configPath}: {e}, using Leptos default");
            leptosOptions.site_addr
        });
    leptosOptions.site_addr = addr;

    let routes = generate_route_list(App);

    let app = Router::new()
        .leptos_routes_with_context(
            &leptosOptions,
            routes,
            {
                let settings = settings.clone();
                move || provide_context(settings.clone())
            },
            {
                let leptosOptions = leptosOptions.clone();
                move || shell(leptosOptions.clone())
            },
        )
        .fallback(leptos_axum::file_and_error_handler(shell))
        .with_state(leptosOptions)
        .layer(TraceLayer::new_for_http());

    tracing::info!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    axum::serve(listener, app.into_make_service())
        .await
        .expect("server exited with error");
}

#[cfg(not(feature = "ssr"))]
fn main() {}
