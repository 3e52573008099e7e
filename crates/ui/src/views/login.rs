use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use services::SessionState;
use site_core::model::{Credentials, CredentialsError};

use crate::context::AppContext;
use crate::routes::Route;
use crate::session::{Notice, use_session};

#[derive(Clone, Debug, PartialEq, Eq)]
enum SubmitState {
    Idle,
    Submitting,
    Failed(String),
}

pub(crate) fn credentials_message(err: CredentialsError) -> &'static str {
    match err {
        CredentialsError::MissingField => "Please fill in every field.",
        CredentialsError::PasswordMismatch => "Passwords do not match.",
        CredentialsError::InvalidEmail => "Please enter a valid email address.",
        _ => "Please check the form and try again.",
    }
}

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session();
    let navigator = use_navigator();

    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut submit = use_signal(|| SubmitState::Idle);

    use_effect(move || {
        if matches!(*session.state.read(), SessionState::Authenticated(_)) {
            navigator.replace(Route::Dashboard {});
        }
    });

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let credentials = match Credentials::new(username(), password()) {
            Ok(credentials) => credentials,
            Err(err) => {
                submit.set(SubmitState::Failed(credentials_message(err).to_string()));
                return;
            }
        };
        let auth = ctx.auth();
        let mut state = session.state;
        spawn(async move {
            submit.set(SubmitState::Submitting);
            match auth.login(&credentials).await {
                Ok(user) => {
                    let greeting = format!("Welcome back, {}!", user.username);
                    state.set(SessionState::Authenticated(user));
                    session.notify(Notice::success(greeting));
                    submit.set(SubmitState::Idle);
                    navigator.replace(Route::Dashboard {});
                }
                Err(failure) => {
                    submit.set(SubmitState::Failed(failure.message().to_string()));
                }
            }
        });
    };

    let submitting = submit() == SubmitState::Submitting;

    rsx! {
        div { class: "auth-page",
            form { class: "auth-card", onsubmit: on_submit,
                h1 { "Site Progress" }
                p { class: "muted", "Sign in to follow your construction projects." }

                if let SubmitState::Failed(message) = submit() {
                    p { class: "form-error", role: "alert", "{message}" }
                }

                label { r#for: "username", "Username" }
                input {
                    id: "username",
                    r#type: "text",
                    autocomplete: "username",
                    value: "{username}",
                    oninput: move |evt| username.set(evt.value()),
                }
                label { r#for: "password", "Password" }
                input {
                    id: "password",
                    r#type: "password",
                    autocomplete: "current-password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: submitting,
                    if submitting { "Signing in..." } else { "Sign in" }
                }
                p { class: "auth-switch",
                    "No account yet? "
                    Link { to: Route::Register {}, "Create one" }
                }
            }
        }
    }
}
