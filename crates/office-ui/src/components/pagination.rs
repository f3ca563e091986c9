use leptos::prelude::*;

fn range_label(page: u32, size: u32, total: u64) -> String {
    if total == 0 {
        return "0 de 0".into();
    }
    let from = u64::from(page) * u64::from(size) + 1;
    let to = (from + u64::from(size) - 1).min(total);
    format!("{from}-{to} de {total}")
}

#[component]
pub fn Pagination(
    #[prop(into)] page: Signal<u32>,
    #[prop(into)] size: Signal<u32>,
    #[prop(into)] total_pages: Signal<u32>,
    #[prop(into)] total_elements: Signal<u64>,
    size_options: Vec<u32>,
    #[prop(into)] disabled: Signal<bool>,
    on_page: Callback<u32>,
    on_size: Callback<u32>,
) -> impl IntoView {
    let hasPrevious = move || page.get() > 0;
    let hasNext = move || page.get() + 1 < total_pages.get();

    view! {
        <div class="pagination">
            <label class="pagination-size">
                "Linhas por página"
                <select
                    prop:value=move || size.get().to_string()
                    disabled=move || disabled.get()
                    on:change=move |ev| {
                        if let Ok(size) = event_target_value(&ev).parse() {
                            on_size.run(size);
                        }
                    }
                >
                    {size_options
                        .into_iter()
                        .map(|option| {
                            view! {
                                <option value=option.to_string() selected=move || size.get() == option>
                                    {option}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </label>
            <span class="pagination-range">
                {move || range_label(page.get(), size.get(), total_elements.get())}
            </span>
            <button
                class="btn btn-ghost btn-sm"
                disabled=move || !hasPrevious() || disabled.get()
                on:click=move |_| on_page.run(page.get_untracked().saturating_sub(1))
            >
                "\u{2039}"
            </button>
            <button
                class="btn btn-ghost btn-sm"
                disabled=move || !hasNext() || disabled.get()
                on:click=move |_| on_page.run(page.get_untracked() + 1)
            >
                "\u{203A}"
            </button>
        </div>
    }
}
