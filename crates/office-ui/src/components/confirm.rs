use leptos::prelude::*;

use crate::components::modal::Modal;

#[component]
pub fn ConfirmDialog(
    #[prop(into)] title: String,
    #[prop(into)] message: String,
    #[prop(into)] busy: Signal<bool>,
    on_confirm: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    view! {
        <Modal title on_close=on_cancel>
            <p class="confirm-message">{message}</p>
            <div class="form-actions">
                <button
                    class="btn btn-ghost"
                    disabled=move || busy.get()
                    on:click=move |_| on_cancel.run(())
                >
                    "Cancelar"
                </button>
                <button
                    class="btn btn-danger"
                    disabled=move || busy.get()
                    on:click=move |_| on_confirm.run(())
                >
                    {move || if busy.get() { "Excluindo..." } else { "Confirmar" }}
                </button>
            </div>
        </Modal>
    }
}
