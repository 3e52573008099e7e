//! Reactive session and notice state shared by every view.

use dioxus::prelude::*;
use services::SessionState;

use crate::context::AppContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

impl NoticeKind {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            NoticeKind::Success => "notice notice-success",
            NoticeKind::Info => "notice notice-info",
            NoticeKind::Error => "notice notice-error",
        }
    }
}

/// A transient message shown above the page content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Handles to the shared signals. Copy, so event handlers can capture it freely.
#[derive(Clone, Copy, PartialEq)]
pub struct SessionSignals {
    pub state: Signal<SessionState>,
    pub notice: Signal<Option<Notice>>,
}

impl SessionSignals {
    pub fn notify(mut self, notice: Notice) {
        self.notice.set(Some(notice));
    }

    pub fn dismiss(mut self) {
        self.notice.set(None);
    }
}

#[must_use]
pub fn use_session() -> SessionSignals {
    use_context::<SessionSignals>()
}

/// Provides `SessionSignals` to its children and restores any stored session
/// once on mount.
#[component]
pub fn SessionProvider(children: Element) -> Element {
    let ctx = use_context::<AppContext>();
    let initial = ctx.auth().state();
    let needs_restore = initial == SessionState::Loading;
    let state = use_signal(|| initial);
    let notice = use_signal(|| None::<Notice>);
    use_context_provider(|| SessionSignals { state, notice });

    use_hook(move || {
        if !needs_restore {
            return;
        }
        let auth = ctx.auth();
        let mut state = state;
        spawn(async move {
            let restored = auth.initialize().await;
            state.set(restored);
        });
    });

    rsx! { {children} }
}
