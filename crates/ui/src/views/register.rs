use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use services::SessionState;
use site_core::model::RegistrationDraft;

use super::login::credentials_message;
use crate::context::AppContext;
use crate::routes::Route;
use crate::session::{Notice, use_session};

const ROLES: &[(&str, &str)] = &[
    ("engineer", "Engineer"),
    ("manager", "Project manager"),
    ("inspector", "Inspector"),
];

#[component]
pub fn RegisterView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session();
    let navigator = use_navigator();

    let mut form = use_signal(RegistrationDraft::default);
    let mut error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    use_effect(move || {
        if matches!(*session.state.read(), SessionState::Authenticated(_)) {
            navigator.replace(Route::Dashboard {});
        }
    });

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let registration = match form().validate() {
            Ok(registration) => registration,
            Err(err) => {
                error.set(Some(credentials_message(err).to_string()));
                return;
            }
        };
        let auth = ctx.auth();
        let mut state = session.state;
        spawn(async move {
            submitting.set(true);
            error.set(None);
            match auth.register(&registration).await {
                Ok(user) => {
                    let greeting = format!("Account created. Welcome, {}!", user.username);
                    state.set(SessionState::Authenticated(user));
                    session.notify(Notice::success(greeting));
                    navigator.replace(Route::Dashboard {});
                }
                Err(failure) => error.set(Some(failure.message().to_string())),
            }
            submitting.set(false);
        });
    };

    let draft = form();

    rsx! {
        div { class: "auth-page",
            form { class: "auth-card", onsubmit: on_submit,
                h1 { "Create account" }

                if let Some(message) = error() {
                    p { class: "form-error", role: "alert", "{message}" }
                }

                label { r#for: "username", "Username" }
                input {
                    id: "username",
                    value: "{draft.username}",
                    oninput: move |evt| form.write().username = evt.value(),
                }
                label { r#for: "email", "Email" }
                input {
                    id: "email",
                    r#type: "email",
                    value: "{draft.email}",
                    oninput: move |evt| form.write().email = evt.value(),
                }
                label { r#for: "role", "Role" }
                select {
                    id: "role",
                    onchange: move |evt| form.write().role = Some(evt.value()),
                    option { value: "", "Choose a role (optional)" }
                    for (value, label) in ROLES.iter().copied() {
                        option {
                            value: value,
                            selected: draft.role.as_deref() == Some(value),
                            "{label}"
                        }
                    }
                }
                label { r#for: "password", "Password" }
                input {
                    id: "password",
                    r#type: "password",
                    autocomplete: "new-password",
                    value: "{draft.password}",
                    oninput: move |evt| form.write().password = evt.value(),
                }
                label { r#for: "confirm_password", "Confirm password" }
                input {
                    id: "confirm_password",
                    r#type: "password",
                    autocomplete: "new-password",
                    value: "{draft.confirm_password}",
                    oninput: move |evt| form.write().confirm_password = evt.value(),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: submitting(),
                    if submitting() { "Creating account..." } else { "Create account" }
                }
                p { class: "auth-switch",
                    "Already registered? "
                    Link { to: Route::Login {}, "Sign in" }
                }
            }
        }
    }
}
