use dioxus::prelude::*;

use crate::session::use_session;

#[component]
pub fn NoticeBanner() -> Element {
    let session = use_session();
    let Some(notice) = session.notice.read().clone() else {
        return rsx! {};
    };

    rsx! {
        div { class: notice.kind.class(), role: "status",
            span { "{notice.text}" }
            button {
                class: "notice-close",
                "aria-label": "Dismiss",
                onclick: move |_| session.dismiss(),
                "×"
            }
        }
    }
}
