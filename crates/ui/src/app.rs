use dioxus::prelude::*;
use dioxus_router::Router;

use crate::routes::Route;
use crate::session::SessionProvider;

#[component]
pub fn App() -> Element {
    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Title { "Site Progress" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                SessionProvider {
                    Router::<Route> {}
                }
            }
        }
    }
}
