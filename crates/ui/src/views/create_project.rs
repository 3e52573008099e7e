use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use site_core::model::{ImageUpload, MAX_IMAGES_PER_UPLOAD, ProjectDraft, ProjectDraftError};

use super::picker::pick_images;
use crate::context::AppContext;
use crate::routes::Route;
use crate::session::{Notice, use_session};

fn draft_message(err: &ProjectDraftError) -> String {
    match err {
        ProjectDraftError::EmptyName => "Give the project a name.".to_string(),
        ProjectDraftError::MissingTemplate => "Choose a template image.".to_string(),
        ProjectDraftError::TooManyImages { max, .. } => {
            format!("Choose at most {max} images.")
        }
        other => other.to_string(),
    }
}

#[component]
pub fn CreateProjectView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_session();
    let navigator = use_navigator();

    let mut name = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut images = use_signal(Vec::<ImageUpload>::new);
    let mut error = use_signal(|| None::<String>);
    let mut saving = use_signal(|| false);

    let on_pick = move |_| {
        spawn(async move {
            match pick_images("Choose the project template image").await {
                Ok(picked) if picked.is_empty() => {}
                Ok(picked) => {
                    images.set(picked);
                    error.set(None);
                }
                Err(message) => error.set(Some(message)),
            }
        });
    };

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let description_value = description();
        let mut draft = ProjectDraft::new(name(), Some(description_value));
        draft.template_images = images();
        let project = match draft.validate() {
            Ok(project) => project,
            Err(err) => {
                error.set(Some(draft_message(&err)));
                return;
            }
        };
        let projects = ctx.projects();
        spawn(async move {
            saving.set(true);
            error.set(None);
            match projects.create_project(&project).await {
                Ok(created) => {
                    session.notify(Notice::success(format!(
                        "Project \"{}\" created.",
                        created.name
                    )));
                    navigator.push(Route::Dashboard {});
                }
                Err(err) => error.set(Some(err.user_message("Could not create the project"))),
            }
            saving.set(false);
        });
    };

    let picked = images();

    rsx! {
        div { class: "page",
            div { class: "page-header",
                h2 { "New project" }
                Link { class: "btn btn-ghost", to: Route::Dashboard {}, "Cancel" }
            }
            form { class: "form-card", onsubmit: on_submit,
                if let Some(message) = error() {
                    p { class: "form-error", role: "alert", "{message}" }
                }
                label { r#for: "name", "Name" }
                input {
                    id: "name",
                    value: "{name}",
                    oninput: move |evt| name.set(evt.value()),
                }
                label { r#for: "description", "Description" }
                textarea {
                    id: "description",
                    rows: 3,
                    value: "{description}",
                    oninput: move |evt| description.set(evt.value()),
                }

                div { class: "picker",
                    button { class: "btn", r#type: "button", onclick: on_pick, "Choose template image" }
                    span { class: "muted",
                        "The first image becomes the reference for progress analysis (up to {MAX_IMAGES_PER_UPLOAD})."
                    }
                }
                if !picked.is_empty() {
                    ul { class: "file-list",
                        for (index, image) in picked.iter().enumerate() {
                            li { key: "{index}",
                                "{image.file_name()}"
                                if index == 0 {
                                    span { class: "badge", "template" }
                                }
                            }
                        }
                    }
                }

                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: saving(),
                    if saving() { "Creating..." } else { "Create project" }
                }
            }
        }
    }
}
