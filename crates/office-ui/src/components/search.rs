use std::time::Duration;

use leptos::prelude::*;
use office_client::Debouncer;

use crate::platform;

/// Text box that reports its value once typing pauses for `window`.
#[component]
pub fn SearchBox(
    window: Duration,
    on_search: Callback<String>,
    #[prop(into, optional)] placeholder: String,
) -> impl IntoView {
    let debouncer = Debouncer::new(platform::scheduler(), window, move |term: String| {
        on_search.run(term)
    });

    let pending = debouncer.clone();
    on_cleanup(move || pending.cancel());

    view! {
        <input
            type="search"
            class="search-box"
            placeholder=placeholder
            on:input=move |ev| debouncer.push(event_target_value(&ev))
        />
    }
}
