use reqwest::StatusCode;
use tokio::net::TcpListener;

use super::*;
use crate::app;
use crate::handlers::test_support::state_with;
use crate::models::application::ApplicationStatus;
use crate::repositories::MemoryApplicationRepository;
use crate::utils::attachment::AttachmentKind;

const PDF: &[u8] = b"%PDF-1.4\n%portal\n";

async fn spawn_server() -> (String, MemoryApplicationRepository) {
    let repository = MemoryApplicationRepository::new();
    let (state, _) = state_with(repository.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app(state)).await });
    (format!("http://{addr}"), repository)
}

async fn spawn_portal() -> (PortalClient, MemoryApplicationRepository) {
    let (base_url, repository) = spawn_server().await;
    (PortalClient::new(base_url), repository)
}

fn filled_form(client: &PortalClient) -> SubmissionForm {
    let form = SubmissionForm::new(client.clone(), 1024);
    form.edit_personal(PersonalField::FullName, "Budi Santoso");
    form.edit_personal(PersonalField::Nim, "162111233044");
    form.edit_personal(PersonalField::Email, "budi@x.id");
    form.edit_personal(PersonalField::Phone, "08123456789");
    form.edit_personal(PersonalField::Semester, "3");
    form.edit_personal(PersonalField::Motivation, "Ingin belajar berorganisasi");
    form.select_department(Slot::First, "Departemen PSDM");
    form.select_choice(Slot::First, "Upgrading");
    form.toggle_sekben(Slot::Second);
    form.select_department(Slot::Second, "Departemen HUBLU");
    form.select_choice(Slot::Second, "Bendahara");
    for kind in [
        AttachmentKind::Ktm,
        AttachmentKind::CommitmentLetter,
        AttachmentKind::Cv,
    ] {
        form.attach(kind, "berkas.pdf", "application/pdf", PDF.to_vec());
    }
    form
}

#[tokio::test]
async fn submitted_application_is_found_by_email_as_pending() {
    let (client, repository) = spawn_portal().await;
    let form = filled_form(&client);

    let application_id = form.submit().await.unwrap();
    assert_eq!(form.snapshot().confirmation, Some(application_id));
    assert_eq!(repository.len().await, 1);

    let mut checker = StatusChecker::new(client.clone());
    checker.set_input("  budi@x.id ");
    match checker.check().await {
        Some(StatusOutcome::Found {
            application,
            presentation,
        }) => {
            assert_eq!(application.status, "pending");
            assert_eq!(application.nim, "162111233044");
            assert_eq!(application.proker2, "Bendahara");
            assert_eq!(presentation.icon, StatusIcon::Clock);
        }
        other => panic!("expected a found outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_identifier_is_a_neutral_not_found() {
    let (client, _) = spawn_portal().await;
    let mut checker = StatusChecker::new(client);
    checker.set_input("999999999");

    assert_eq!(checker.check().await, Some(&StatusOutcome::NotFound));
    assert!(checker.error().is_none());
}

#[tokio::test]
async fn second_submission_with_same_nim_conflicts() {
    let (client, repository) = spawn_portal().await;
    let form = filled_form(&client);
    form.submit().await.unwrap();

    let result = form.submit().await;

    match result {
        Err(ClientError::Rejected { status, .. }) => assert_eq!(status, StatusCode::CONFLICT),
        other => panic!("expected a conflict, got {other:?}"),
    }
    assert!(form.snapshot().error.is_some());
    assert_eq!(form.snapshot().personal.nim, "162111233044");
    assert_eq!(repository.len().await, 1);
}

#[tokio::test]
async fn wrong_password_loads_nothing() {
    let (client, _) = spawn_portal().await;
    let mut admin = AdminSession::new(client.clone());

    let result = admin.login("bukan-password").await;

    assert!(matches!(result, Err(ClientError::Unauthorized(_))));
    assert!(!admin.is_authenticated());
    assert_eq!(admin.error(), Some("Password salah!"));
    assert!(admin.applications().is_empty());
    assert_eq!(client.requests_sent(), 1);
}

#[tokio::test]
async fn accepted_applicant_reopens_in_assigned_division() {
    let (client, _) = spawn_portal().await;
    let id = filled_form(&client).submit().await.unwrap();

    let mut admin = AdminSession::new(client.clone());
    admin.login("admin123").await.unwrap();
    assert_eq!(admin.applications().len(), 1);
    assert_eq!(admin.division_options(), vec!["Departemen PSDM"]);

    admin.open_detail(&id).unwrap();
    admin.set_assigned_division("Departemen HUBLU");
    assert_eq!(
        admin.relocation(),
        Some(("Departemen PSDM", "Departemen HUBLU"))
    );

    admin.decide(ApplicationStatus::Accepted).await.unwrap();

    assert_eq!(admin.notice().map(|n| n.kind), Some(NoticeKind::Success));
    assert!(admin.detail().is_none());
    assert_eq!(admin.stats().map(|s| s.by_status.accepted), Some(1));

    let reopened = admin.open_detail(&id).unwrap();
    assert_eq!(reopened.assigned_division, "Departemen HUBLU");
    assert_eq!(reopened.application.status, ApplicationStatus::Accepted);

    let mut checker = StatusChecker::new(client);
    checker.set_input("162111233044");
    match checker.check().await {
        Some(StatusOutcome::Found { presentation, .. }) => {
            assert_eq!(presentation.icon, StatusIcon::CheckCircle)
        }
        other => panic!("expected a found outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn admin_routes_refuse_bad_tokens() {
    let (client, _) = spawn_portal().await;

    assert!(matches!(
        client.list("not-a-token").await,
        Err(ClientError::Unauthorized(_))
    ));
    assert!(matches!(
        client.stats("").await,
        Err(ClientError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn catalog_is_served_to_the_form() {
    let (client, _) = spawn_portal().await;

    let divisions = client.divisions().await.unwrap();
    assert_eq!(divisions.len(), 7);
    assert_eq!(divisions[1].name, "Departemen PSDM");

    let options = client
        .proker_options("Departemen PSDM", "Departemen PSDM", "Upgrading", false)
        .await
        .unwrap();
    assert_eq!(options.len(), 5);
    assert!(!options.contains(&"Upgrading".to_string()));

    let roles = client
        .proker_options("Departemen HUBLU", "", "", true)
        .await
        .unwrap();
    assert_eq!(roles, vec!["Sekretaris", "Bendahara"]);
}

#[tokio::test]
async fn malformed_bodies_get_the_json_envelope() {
    let (base_url, _) = spawn_server().await;
    let token = PortalClient::new(base_url.clone())
        .login("admin123")
        .await
        .unwrap()
        .token;
    let http = reqwest::Client::new();

    let requests = [
        http.post(format!("{base_url}/applications/check-status"))
            .body(r#"{"identifier": 5}"#),
        http.post(format!("{base_url}/admin/login")).body("{"),
        http.post(format!("{base_url}/applications/submit"))
            .body(r#"{"fullName": []}"#),
        http.patch(format!("{base_url}/applications/REG-1/status"))
            .bearer_auth(&token)
            .body(r#"{"status": true}"#),
    ];

    for request in requests {
        let response = request
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let content_type = response.headers()[reqwest::header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("application/json"));
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }
}
