use std::marker::PhantomData;
use std::sync::Arc;

use leptos::logging::error;
use leptos::prelude::*;
use office_client::{ListController, ListSnapshot};
use office_types::{ListQuery, Mutation};

use crate::components::confirm::ConfirmDialog;
use crate::components::details::DetailsModal;
use crate::components::entity_form::EntityForm;
use crate::components::modal::Modal;
use crate::components::pagination::Pagination;
use crate::components::search::SearchBox;
use crate::entity_view::{status_label, EntityView};
use crate::platform;
use crate::services::{EntityResource, Services};

#[derive(Clone, Debug, PartialEq)]
enum Dialog<E> {
    Closed,
    Create,
    Edit(E),
    Details(i64),
    Delete(E),
}

type Controller<E> = Arc<ListController<E, office_client::HttpTransport>>;

/// Loads `query` in the background and reports a failed load once.
fn spawn_load<E: EntityView>(controller: &Controller<E>, services: &Services, query: ListQuery) {
    let controller = controller.clone();
    let notifications = services.notifications.clone();
    platform::spawn(async move {
        let snapshot = controller.load(query.clone()).await;
        if snapshot.query != query || snapshot.is_fetching {
            return;
        }
        if let Some(e) = snapshot.error {
            error!("loading {} failed: {e}", E::KIND);
            notifications.error(E::KIND.load_failure_message());
        }
    });
}

/// Paginated, searchable CRUD screen for one record kind.
#[component]
pub fn ResourcePage<E: EntityView>(#[prop(optional)] _marker: PhantomData<E>) -> impl IntoView {
    let services = expect_context::<Services>();
    let resource: Arc<EntityResource<E>> = E::resource(&services);
    let controller: Controller<E> = Arc::new(ListController::new(
        resource.clone(),
        ListQuery::first(services.settings.default_page_size),
    ));

    let snapshot = RwSignal::new(controller.snapshot());
    controller.subscribe(move |current| snapshot.set(current.clone()));
    let dialog = RwSignal::new(Dialog::<E>::Closed);
    let busy = RwSignal::new(false);

    spawn_load(&controller, &services, controller.query());

    let onPage = Callback::new({
        let controller = controller.clone();
        let services = services.clone();
        move |page: u32| spawn_load(&controller, &services, controller.query().with_page(page))
    });
    let onSize = Callback::new({
        let controller = controller.clone();
        let services = services.clone();
        move |size: u32| spawn_load(&controller, &services, controller.query().with_size(size))
    });
    let onSearch = Callback::new({
        let controller = controller.clone();
        let services = services.clone();
        move |term: String| {
            spawn_load(&controller, &services, controller.query().with_search(&term))
        }
    });

    let mutate = {
        let controller = controller.clone();
        let services = services.clone();
        move |mutation: Mutation, outcome: Result<(), office_client::ClientError>| {
            match outcome {
                Ok(()) => {
                    services.notifications.success(E::KIND.success_message(mutation));
                    dialog.set(Dialog::Closed);
                    spawn_load(&controller, &services, controller.query());
                }
                Err(e) => {
                    error!("{mutation:?} {} failed: {e}", E::KIND);
                    services.notifications.error(E::KIND.failure_message(mutation));
                }
            }
            busy.set(false);
        }
    };

    let onCreate = Callback::new({
        let resource = resource.clone();
        let mutate = mutate.clone();
        move |draft: E::Draft| {
            busy.set(true);
            let resource = resource.clone();
            let mutate = mutate.clone();
            platform::spawn(async move {
                let outcome = resource.create(&draft).await.map(|_| ());
                mutate(Mutation::Create, outcome);
            });
        }
    });
    let onUpdate = {
        let resource = resource.clone();
        let mutate = mutate.clone();
        move |id: i64| {
            let resource = resource.clone();
            let mutate = mutate.clone();
            Callback::new(move |draft: E::Draft| {
                busy.set(true);
                let resource = resource.clone();
                let mutate = mutate.clone();
                platform::spawn(async move {
                    let patch = E::Patch::from(draft);
                    let outcome = resource.update(id, &patch).await.map(|_| ());
                    mutate(Mutation::Update, outcome);
                });
            })
        }
    };
    let onDelete = {
        let resource = resource.clone();
        move |id: i64| {
            let resource = resource.clone();
            let mutate = mutate.clone();
            Callback::new(move |()| {
                busy.set(true);
                let resource = resource.clone();
                let mutate = mutate.clone();
                platform::spawn(async move {
                    let outcome = resource.delete(id).await.map(|_| ());
                    mutate(Mutation::Delete, outcome);
                });
            })
        }
    };
    let close = Callback::new(move |()| dialog.set(Dialog::Closed));

    let isRefreshing = move || snapshot.with(|s| s.is_fetching && s.page.is_some());
    let columnCount = (E::COLUMNS.len() + 3).to_string();

    view! {
        <div class="dashboard-header">
            <h1>{E::KIND.title()}</h1>
            <button
                class="btn btn-primary"
                disabled=move || busy.get()
                on:click=move |_| dialog.set(Dialog::Create)
            >
                "Adicionar"
            </button>
        </div>

        <div class="toolbar">
            <SearchBox
                window=services.search_debounce()
                on_search=onSearch
                placeholder="Pesquisar..."
            />
        </div>

        <div class="card table-card" class:refreshing=isRefreshing>
            {move || {
                if snapshot.with(ListSnapshot::is_initial_load) {
                    return view! {
                        <div class="loading">
                            <div class="spinner"></div>
                        </div>
                    }
                        .into_any();
                }
                let rows = snapshot.with(|s| s.rows().to_vec());
                view! {
                    <table>
                        <thead>
                            <tr>
                                <th>"Nome"</th>
                                {E::COLUMNS.iter().map(|column| view! { <th>{*column}</th> }).collect_view()}
                                <th>"Status"</th>
                                <th class="actions">"Ações"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {if rows.is_empty() {
                                view! {
                                    <tr>
                                        <td colspan=columnCount.clone() class="empty">{E::EMPTY}</td>
                                    </tr>
                                }
                                    .into_any()
                            } else {
                                rows.into_iter()
                                    .map(|row| view! { <Row<E> row dialog busy /> })
                                    .collect_view()
                                    .into_any()
                            }}
                        </tbody>
                    </table>
                }
                    .into_any()
            }}
        </div>

        <Pagination
            page=Signal::derive(move || snapshot.with(|s| s.query.page))
            size=Signal::derive(move || snapshot.with(|s| s.query.size))
            total_pages=Signal::derive(move || {
                snapshot.with(|s| s.page.as_ref().map(|p| p.total_pages).unwrap_or(0))
            })
            total_elements=Signal::derive(move || snapshot.with(ListSnapshot::total_elements))
            size_options=services.settings.page_size_options.clone()
            disabled=Signal::derive(move || snapshot.with(|s| s.is_fetching))
            on_page=onPage
            on_size=onSize
        />

        {move || match dialog.get() {
            Dialog::Closed => ().into_any(),
            Dialog::Create => view! {
                <Modal title=E::NEW_TITLE on_close=close>
                    <EntityForm<E>
                        initial=E::blank_form()
                        submit_label="Criar"
                        busy=busy
                        on_submit=onCreate
                        on_cancel=close
                    />
                </Modal>
            }
            .into_any(),
            Dialog::Edit(record) => {
                let onSubmit = onUpdate(record.id());
                view! {
                    <Modal title=E::EDIT_TITLE on_close=close>
                        <EntityForm<E>
                            initial=record.to_form()
                            submit_label="Salvar"
                            busy=busy
                            on_submit=onSubmit
                            on_cancel=close
                        />
                    </Modal>
                }
                .into_any()
            }
            Dialog::Details(id) => view! { <DetailsModal<E> id=Some(id) on_close=close /> }.into_any(),
            Dialog::Delete(record) => view! {
                <ConfirmDialog
                    title="Confirmar exclusão"
                    message=format!("Tem certeza que deseja excluir \"{}\"?", record.name())
                    busy=busy
                    on_confirm=onDelete(record.id())
                    on_cancel=close
                />
            }
            .into_any(),
        }}
    }
}

#[component]
fn Row<E: EntityView>(row: E, dialog: RwSignal<Dialog<E>>, busy: RwSignal<bool>) -> impl IntoView {
    let id = row.id();
    let isActive = row.is_active();
    let editRecord = row.clone();
    let deleteRecord = row.clone();

    view! {
        <tr>
            <td>{row.name().to_string()}</td>
            {row.cells().into_iter().map(|cell| view! { <td>{cell}</td> }).collect_view()}
            <td>
                <span class="chip" class:chip-active=isActive>
                    {status_label(isActive)}
                </span>
            </td>
            <td class="actions">
                <button class="btn btn-ghost btn-sm" on:click=move |_| dialog.set(Dialog::Details(id))>
                    "Ver"
                </button>
                <button
                    class="btn btn-ghost btn-sm"
                    disabled=move || busy.get()
                    on:click=move |_| dialog.set(Dialog::Edit(editRecord.clone()))
                >
                    "Editar"
                </button>
                <button
                    class="btn btn-ghost btn-sm btn-danger"
                    disabled=move || busy.get()
                    on:click=move |_| dialog.set(Dialog::Delete(deleteRecord.clone()))
                >
                    "Excluir"
                </button>
            </td>
        </tr>
    }
}
