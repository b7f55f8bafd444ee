use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use crate::context::RefreshHandle;
use crate::views::{DashboardView, ErrorBanner, Sidebar};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", DashboardView)] Dashboard {},
}

#[component]
fn Layout() -> Element {
    use_context_provider(RefreshHandle::new);

    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                ErrorBanner {}
                Outlet::<Route> {}
            }
        }
    }
}
