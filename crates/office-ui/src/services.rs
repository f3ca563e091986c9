use std::sync::Arc;
use std::time::Duration;

use leptos::prelude::*;
use office_client::{
    ApiClient, AuthService, AuthStatus, ClientError, HttpTransport, Notification,
    NotificationCenter, Resource, SessionEvent, SessionGuard, SessionUser,
};
use office_types::{Brand, ConsoleSettings, Customer, Product, Service};

use crate::platform;

pub type EntityResource<E> = Resource<E, HttpTransport>;

/// Reactive state shared by every screen.
#[derive(Clone, Copy)]
pub struct ConsoleContext {
    /// `None` until the browser has built the services.
    pub services: RwSignal<Option<Services>>,
    pub status: RwSignal<AuthStatus>,
    pub user: RwSignal<Option<SessionUser>>,
    pub last_event: RwSignal<Option<SessionEvent>>,
    pub toasts: RwSignal<Vec<Notification>>,
}

impl ConsoleContext {
    pub fn new() -> Self {
        Self {
            services: RwSignal::new(None),
            status: RwSignal::new(AuthStatus::Unknown),
            user: RwSignal::new(None),
            last_event: RwSignal::new(None),
            toasts: RwSignal::new(Vec::new()),
        }
    }
}

impl Default for ConsoleContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Backend access for the whole console. Built once per page load.
#[derive(Clone)]
pub struct Services {
    pub settings: ConsoleSettings,
    pub session: SessionGuard,
    pub auth: Arc<AuthService<HttpTransport>>,
    pub notifications: NotificationCenter,
    pub brands: Arc<EntityResource<Brand>>,
    pub customers: Arc<EntityResource<Customer>>,
    pub products: Arc<EntityResource<Product>>,
    pub services: Arc<EntityResource<Service>>,
}

impl Services {
    pub fn build(settings: ConsoleSettings) -> Result<Self, ClientError> {
        let scheduler = platform::scheduler();
        let session = SessionGuard::new(
            platform::session_store(),
            scheduler.clone(),
            platform::clock(),
        );
        let transport = HttpTransport::new(&settings.api_base_url)?;
        let api = Arc::new(ApiClient::new(transport).with_session(session.clone()));

        let brands = Arc::new(Resource::new(api.clone()));
        let products: Arc<EntityResource<Product>> = Arc::new(Resource::new(api.clone()));
        // product rows embed their brand
        let dependents = products.clone();
        brands.subscribe(move |_| dependents.invalidate());

        Ok(Self {
            notifications: NotificationCenter::new(
                scheduler,
                Duration::from_millis(settings.toast_ttl_ms),
            ),
            auth: Arc::new(AuthService::new(
                api.clone(),
                session.clone(),
                settings.login_path.clone(),
            )),
            customers: Arc::new(Resource::new(api.clone())),
            services: Arc::new(Resource::new(api)),
            brands,
            products,
            session,
            settings,
        })
    }

    /// Mirrors notifications and session events into `ctx`, then reads the
    /// stored session back.
    pub fn start(&self, ctx: ConsoleContext) -> AuthStatus {
        self.notifications
            .subscribe(move |items| ctx.toasts.set(items.to_vec()));
        self.session
            .subscribe(move |event| ctx.last_event.set(Some(event)));
        self.session.init()
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.settings.search_debounce_ms)
    }
}
