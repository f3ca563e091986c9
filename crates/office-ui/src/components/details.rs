use std::marker::PhantomData;

use leptos::prelude::*;
use office_client::ClientError;

use crate::components::modal::Modal;
use crate::entity_view::EntityView;
use crate::platform;
use crate::services::Services;

/// Read-only view of one record, fetched by id when opened.
#[component]
pub fn DetailsModal<E: EntityView>(
    id: Option<i64>,
    on_close: Callback<()>,
    #[prop(optional)] _marker: PhantomData<E>,
) -> impl IntoView {
    let services = expect_context::<Services>();
    let record = RwSignal::new(None::<Result<Option<E>, ClientError>>);

    let resource = E::resource(&services);
    platform::spawn(async move {
        record.set(Some(resource.get_by_id(id).await));
    });

    view! {
        <Modal title=E::DETAILS_TITLE on_close>
            {move || match record.get() {
                None => view! {
                    <div class="loading">
                        <div class="spinner"></div>
                    </div>
                }
                .into_any(),
                Some(Ok(Some(record))) => view! {
                    <dl class="details">
                        {record
                            .details()
                            .into_iter()
                            .map(|(label, value)| view! {
                                <dt>{label}</dt>
                                <dd>{value}</dd>
                            })
                            .collect_view()}
                    </dl>
                }
                .into_any(),
                Some(Ok(None)) => view! { <p>"Registro não encontrado."</p> }.into_any(),
                Some(Err(e)) => view! {
                    <p class="login-error">{E::KIND.load_failure_message()} ": " {e.to_string()}</p>
                }
                .into_any(),
            }}
        </Modal>
    }
}
