use std::marker::PhantomData;

use leptos::ev::SubmitEvent;
use leptos::logging::warn;
use leptos::prelude::*;
use office_types::{Brand, FormValues, FromForm, ListQuery, Validate, ValidationError};

use crate::entity_view::{EntityView, FieldInput, FieldSpec};
use crate::platform;
use crate::services::Services;

/// Enough to list every brand in the product form.
const BRAND_OPTIONS: u32 = 1000;

fn input_type(input: FieldInput) -> &'static str {
    match input {
        FieldInput::Email => "email",
        FieldInput::Date => "date",
        FieldInput::Money | FieldInput::Integer => "number",
        _ => "text",
    }
}

fn input_step(input: FieldInput) -> Option<&'static str> {
    match input {
        FieldInput::Money => Some("0.01"),
        FieldInput::Integer => Some("1"),
        _ => None,
    }
}

/// Create/edit form. Values are parsed and validated before `on_submit`
/// sees them; a failure is shown next to its field and nothing is sent.
#[component]
pub fn EntityForm<E: EntityView>(
    initial: FormValues,
    #[prop(into)] submit_label: String,
    #[prop(into)] busy: Signal<bool>,
    on_submit: Callback<E::Draft>,
    on_cancel: Callback<()>,
    #[prop(optional)] _marker: PhantomData<E>,
) -> impl IntoView {
    let values = RwSignal::new(initial);
    let fieldError = RwSignal::new(None::<ValidationError>);

    let submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let parsed = values
            .with_untracked(E::Draft::from_form)
            .and_then(|draft| draft.validate().map(|()| draft));
        match parsed {
            Ok(draft) => {
                fieldError.set(None);
                on_submit.run(draft);
            }
            Err(e) => fieldError.set(Some(e)),
        }
    };

    view! {
        <form class="entity-form" on:submit=submit>
            {E::FIELDS
                .iter()
                .map(|field| view! { <FormField field=*field values error=fieldError /> })
                .collect_view()}
            <div class="form-actions">
                <button
                    type="button"
                    class="btn btn-ghost"
                    disabled=move || busy.get()
                    on:click=move |_| on_cancel.run(())
                >
                    "Cancelar"
                </button>
                <button type="submit" class="btn btn-primary" disabled=move || busy.get()>
                    {move || if busy.get() { "Salvando...".to_string() } else { submit_label.clone() }}
                </button>
            </div>
        </form>
    }
}

#[component]
fn FormField(
    field: FieldSpec,
    values: RwSignal<FormValues>,
    error: RwSignal<Option<ValidationError>>,
) -> impl IntoView {
    let key = field.key;
    let current = Signal::derive(move || values.with(|v| v.get(key).to_string()));
    let set = move |value: String| values.update(|v| v.set(key, value));
    let message = move || error.get().filter(|e| e.field == key).map(|e| e.message);

    let control = match field.input {
        FieldInput::TextArea => view! {
            <textarea id=key rows="3" prop:value=current on:input=move |ev| set(event_target_value(&ev))></textarea>
        }
        .into_any(),
        FieldInput::Status => view! {
            <select id=key on:change=move |ev| set(event_target_value(&ev))>
                <option value="true" selected=move || current.get() != "false">"Ativo"</option>
                <option value="false" selected=move || current.get() == "false">"Inativo"</option>
            </select>
        }
        .into_any(),
        FieldInput::BrandSelect => view! {
            <BrandSelect field_id=key value=current on_change=Callback::new(set) />
        }
        .into_any(),
        input => view! {
            <input
                id=key
                type=input_type(input)
                step=input_step(input)
                prop:value=current
                on:input=move |ev| set(event_target_value(&ev))
            />
        }
        .into_any(),
    };

    view! {
        <div class="form-group" class:has-error=move || message().is_some()>
            <label for=key>{field.label}</label>
            {control}
            {move || message().map(|m| view! { <span class="field-error">{m}</span> })}
        </div>
    }
}

/// Brand picker sourced from the brand collection.
#[component]
fn BrandSelect(field_id: &'static str, value: Signal<String>, on_change: Callback<String>) -> impl IntoView {
    let services = expect_context::<Services>();
    let options = RwSignal::new(Vec::<Brand>::new());

    let brands = services.brands.clone();
    platform::spawn(async move {
        match brands.list_page(&ListQuery::new(0, BRAND_OPTIONS, None)).await {
            Ok(page) => options.set(page.content),
            Err(e) => warn!("brand options unavailable: {e}"),
        }
    });

    view! {
        <select id=field_id on:change=move |ev| on_change.run(event_target_value(&ev))>
            <option value="" selected=move || value.get().is_empty()>"Sem marca"</option>
            <For each=move || options.get() key=|brand| brand.id let:brand>
                <option
                    value=brand.id.to_string()
                    selected={
                        let id = brand.id.to_string();
                        move || value.get() == id
                    }
                >
                    {brand.name.clone()}
                </option>
            </For>
        </select>
    }
}
