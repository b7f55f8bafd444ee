use dioxus::prelude::*;

use crate::context::RefreshHandle;

#[component]
pub fn ErrorBanner() -> Element {
    let mut refresh = use_context::<RefreshHandle>();
    let Some(message) = refresh.error() else {
        return rsx! {};
    };

    rsx! {
        div { class: "error-banner", role: "alert",
            p { "Something went wrong: {message}" }
            button {
                class: "btn",
                r#type: "button",
                onclick: move |_| refresh.dismiss_error(),
                "Dismiss"
            }
        }
    }
}
