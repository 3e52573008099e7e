use axum::http::StatusCode;
use serde_json::json;

use super::test_harness::{Backend, ViewKind, project_json, setup_view_harness};

#[tokio::test(flavor = "current_thread")]
async fn dashboard_greets_user_and_lists_active_projects() {
    let backend = Backend {
        projects: json!({
            "projects": [
                project_json("p1", "active", 40.0),
                project_json("p2", "completed", 100.0),
            ]
        }),
        completed: json!({ "projects": [project_json("p2", "completed", 100.0)] }),
        ..Backend::default()
    };
    let mut harness = setup_view_harness(ViewKind::Dashboard, backend, true).await;
    harness.rebuild();

    let html = harness.render_until("Obra p1").await;
    assert!(html.contains("Hello, ana!"), "missing greeting in {html}");
    assert!(html.contains("Active projects"), "missing heading in {html}");
    assert!(html.contains("40%"), "missing progress in {html}");
    assert!(html.contains("Created 2025-10-14"), "missing created date in {html}");
    assert!(html.contains("badge"), "missing status badge in {html}");
    assert!(html.contains("Show completed projects"), "missing toggle in {html}");
    assert!(!html.contains("Obra p2"), "completed project listed before asked in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_shows_server_message_and_retry_on_failure() {
    let backend = Backend {
        projects_status: StatusCode::INTERNAL_SERVER_ERROR,
        ..Backend::default()
    };
    let mut harness = setup_view_harness(ViewKind::Dashboard, backend, true).await;
    harness.rebuild();

    let html = harness.render_until("Retry").await;
    assert!(
        html.contains("Servidor indisponível"),
        "missing server message in {html}"
    );
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn login_view_renders_form_when_signed_out() {
    let mut harness = setup_view_harness(ViewKind::Login, Backend::default(), false).await;
    harness.rebuild();

    let html = harness.render();
    assert!(html.contains("Sign in"), "missing submit in {html}");
    assert!(html.contains("Username"), "missing username field in {html}");
    assert!(html.contains("Create one"), "missing register link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn project_detail_lists_analyses_and_actions() {
    let backend = Backend {
        projects: json!([project_json("p1", "active", 55.0)]),
        project_analyses: json!({
            "analyses": [{
                "id": "a1",
                "created_at": "2025-10-14T19:43:57Z",
                "content": {
                    "progress_percentage": 55,
                    "observations": ["Estrutura metálica montada"]
                },
                "pdf_generated": true
            }]
        }),
        ..Backend::default()
    };
    let mut harness =
        setup_view_harness(ViewKind::ProjectDetail("p1".into()), backend, true).await;
    harness.rebuild();

    let html = harness.render_until("Estrutura metálica montada").await;
    assert!(html.contains("Obra p1"), "missing project name in {html}");
    assert!(html.contains("Estrutura metálica montada"), "missing analysis row in {html}");
    assert!(html.contains("PDF"), "missing pdf badge in {html}");
    assert!(html.contains("Upload progress photos"), "missing upload action in {html}");
    assert!(html.contains("Finish project"), "missing finish action in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn completed_project_returns_to_dashboard() {
    let backend = Backend {
        projects: json!({ "projects": [project_json("p2", "finished", 100.0)] }),
        ..Backend::default()
    };
    let mut harness =
        setup_view_harness(ViewKind::ProjectDetail("p2".into()), backend, true).await;
    harness.rebuild();

    let html = harness.render_until("Returning to your projects").await;
    assert!(html.contains("Returning to your projects"), "missing redirect message in {html}");
    assert!(!html.contains("Finish project"), "finish still offered in {html}");
    assert!(!html.contains("Upload progress photos"), "upload still offered in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn unknown_project_reports_not_found() {
    let mut harness =
        setup_view_harness(ViewKind::ProjectDetail("nope".into()), Backend::default(), true).await;
    harness.rebuild();

    let html = harness.render_until("find what you were looking for").await;
    assert!(
        html.contains("find what you were looking for"),
        "missing not-found message in {html}"
    );
    assert!(html.contains("Back to projects"), "missing back link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn analysis_detail_renders_sections() {
    let backend = Backend {
        analysis: json!({
            "analysis": {
                "id": "a1",
                "project_id": "p1",
                "created_at": "2025-10-14T19:43:57Z",
                "current_images_paths": ["/uploads/a.jpg", "/uploads/b.jpg"],
                "content": {
                    "progress_percentage": 72.5,
                    "observations": ["Laje concluída"],
                    "recommendations": ["Reforçar escoramento"],
                    "next_steps": ["Alvenaria"]
                }
            }
        }),
        pdf_generated: true,
        ..Backend::default()
    };
    let mut harness = setup_view_harness(
        ViewKind::AnalysisDetail("p1".into(), "a1".into()),
        backend,
        true,
    )
    .await;
    harness.rebuild();

    let html = harness.render_until("Laje concluída").await;
    assert!(html.contains("Reforçar escoramento"), "missing recommendation in {html}");
    assert!(html.contains("Alvenaria"), "missing next step in {html}");
    assert!(html.contains("2 photo(s)"), "missing image count in {html}");
    assert!(html.contains("PDF ready"), "missing pdf badge in {html}");
    assert!(html.contains("Download PDF report"), "missing download in {html}");
    assert!(html.contains("Nothing reported."), "missing empty issues section in {html}");
}
