//! Application session against the in-memory backend

use ecampus_client::{ApiError, ApplicationSession, SchemaFallback, SessionContext, SessionError};
use ecampus_schema::ProgramType;
use ecampus_test_utils::{
    fill_contact, fill_documents, fill_parents, fill_personal, fill_tenth, session, ug_structure,
    Endpoint, FakeBackend, COURSE_ID, STUDENT_ID,
};
use ecampus_wizard::notice::{DRAFT_LOAD_FAILED, DRAFT_RESUMED, SCHEMA_FALLBACK, SUBMITTED};
use ecampus_wizard::{FormField, NoticeLevel, Section, SubmitError, WizardError};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::sync::Arc;

fn backend() -> Arc<FakeBackend> {
    Arc::new(FakeBackend::new().with_structure(COURSE_ID, ug_structure()))
}

async fn open(api: &Arc<FakeBackend>) -> ApplicationSession<Arc<FakeBackend>> {
    ApplicationSession::open(Arc::clone(api), session(), COURSE_ID, SchemaFallback::FailOpen)
        .await
        .unwrap()
}

#[tokio::test]
async fn opening_requires_login() {
    let anonymous = Arc::new(SessionContext::new().with_student_id(STUDENT_ID));
    let err = ApplicationSession::open(backend(), anonymous, COURSE_ID, SchemaFallback::FailOpen)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::LoginRequired));
}

#[tokio::test]
async fn missing_schema_falls_back_to_pg() {
    let api = Arc::new(FakeBackend::new());
    let app = open(&api).await;
    assert_eq!(app.wizard().schema().program_type(), ProgramType::Postgraduate);
    assert!(app.wizard().schema().required_levels().is_empty());
    assert_eq!(app.notices()[0].message, SCHEMA_FALLBACK);
    assert_eq!(app.notices()[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn fail_closed_refuses_to_open() {
    let api = Arc::new(FakeBackend::new());
    let err = ApplicationSession::open(api, session(), COURSE_ID, SchemaFallback::FailClosed)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Api(ApiError::NotFound(_))));
}

#[tokio::test]
async fn expired_session_is_not_masked_by_fallback() {
    let api = backend();
    api.fail(Endpoint::FormStructure, ApiError::SessionExpired);
    let err = ApplicationSession::open(api, session(), COURSE_ID, SchemaFallback::FailOpen)
        .await
        .unwrap_err();
    assert!(err.requires_login());
}

#[tokio::test]
async fn draft_load_failure_starts_fresh() {
    let api = backend();
    api.fail(
        Endpoint::Application,
        ApiError::Server {
            status: 500,
            message: "boom".into(),
        },
    );
    let app = open(&api).await;
    assert_eq!(app.wizard().active(), Section::PersonalDetails);
    assert_eq!(app.notices()[0].message, DRAFT_LOAD_FAILED);
}

#[tokio::test]
async fn first_pass_through_a_section_saves_once() {
    let api = backend();
    let mut app = open(&api).await;
    assert!(app.take_notices().is_empty());

    fill_personal(app.wizard_mut());
    let advance = app.next().await.unwrap();
    assert!(advance.save_due);
    assert!(app.wizard().is_saved(Section::PersonalDetails));
    assert_eq!(api.drafts().len(), 1);
    assert_eq!(api.drafts()[0].last_active_section(), Some(0));

    app.wizard_mut().back().unwrap();
    let again = app.next().await.unwrap();
    assert!(!again.save_due);
    assert_eq!(api.drafts().len(), 1);
}

#[tokio::test]
async fn rejected_next_reports_notice() {
    let api = backend();
    let mut app = open(&api).await;
    let err = app.next().await.unwrap_err();
    assert!(matches!(err, SessionError::Wizard(WizardError::ValidationFailed { .. })));
    let notices = app.take_notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].is_error());
    assert!(api.drafts().is_empty());
}

#[tokio::test]
async fn failed_implicit_save_does_not_block() {
    let api = backend();
    api.fail(Endpoint::SaveDraft, ApiError::Transport("connection reset".into()));
    let mut app = open(&api).await;
    fill_personal(app.wizard_mut());
    let advance = app.next().await.unwrap();
    assert_eq!(advance.to, Section::ContactInformation);
    assert!(!app.wizard().is_saved(Section::PersonalDetails));
    let notice = app.take_notices().pop().unwrap();
    assert!(notice.message.starts_with("Failed to save draft"));
}

#[tokio::test]
async fn saved_section_index_restores_progress() {
    let api = backend();
    let mut app = open(&api).await;
    fill_personal(app.wizard_mut());
    app.next().await.unwrap();
    fill_contact(app.wizard_mut());
    app.next().await.unwrap();
    assert_eq!(app.wizard().active(), Section::ParentDetails);
    app.save().await.unwrap();

    let restored = open(&api).await;
    let wizard = restored.wizard();
    assert_eq!(wizard.active().index(), 2);
    assert_eq!(
        wizard.completed().iter().map(|s| s.index()).collect::<BTreeSet<_>>(),
        BTreeSet::from([0, 1])
    );
    assert_eq!(
        wizard.saved().iter().map(|s| s.index()).collect::<BTreeSet<_>>(),
        BTreeSet::from([0, 1, 2])
    );
    assert_eq!(restored.notices()[0].message, DRAFT_RESUMED);
}

#[tokio::test]
async fn normalized_phone_survives_reload() {
    let api = backend();
    let mut app = open(&api).await;
    fill_personal(app.wizard_mut());
    app.next().await.unwrap();
    fill_contact(app.wizard_mut());
    app.next().await.unwrap();

    let mut restored = open(&api).await;
    assert_eq!(
        restored.wizard().form().get(FormField::PhoneNumber),
        "+919876543210"
    );
    restored.wizard_mut().jump(Section::ContactInformation).unwrap();
    restored.next().await.unwrap();
}

#[tokio::test]
async fn full_submission_is_terminal() {
    let api = backend();
    let mut app = open(&api).await;
    fill_personal(app.wizard_mut());
    app.next().await.unwrap();
    fill_contact(app.wizard_mut());
    app.next().await.unwrap();
    fill_parents(app.wizard_mut());
    app.next().await.unwrap();
    fill_tenth(app.wizard_mut());
    app.next().await.unwrap();
    fill_documents(app.wizard_mut());
    app.next().await.unwrap();
    app.wizard_mut().set_agreement(true).unwrap();
    app.take_notices();

    app.submit().await.unwrap();
    assert!(app.wizard().is_submitted());
    assert_eq!(app.take_notices().pop().unwrap().message, SUBMITTED);

    let submissions = api.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].files().len(), 2);
    assert_eq!(submissions[0].last_active_section(), None);

    let err = app.next().await.unwrap_err();
    assert!(matches!(err, SessionError::Wizard(WizardError::AlreadySubmitted)));

    let reopened = open(&api).await;
    assert!(reopened.wizard().is_submitted());
    assert!(reopened.wizard().is_reviewing());
}

#[tokio::test]
async fn submit_away_from_declaration_is_rejected() {
    let api = backend();
    let mut app = open(&api).await;
    fill_personal(app.wizard_mut());
    app.wizard_mut()
        .add_document(ecampus_schema::DocumentType::Aadhaar)
        .unwrap();
    app.wizard_mut()
        .attach_file(0, ecampus_test_utils::pdf())
        .unwrap();
    app.take_notices();

    let err = app.submit().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Submit(SubmitError::NotOnLastSection {
            active: Section::PersonalDetails
        })
    ));
    assert!(!app.wizard().is_submitted());
    assert!(api.submissions().is_empty());
}

#[tokio::test]
async fn malformed_credential_is_cleared_on_submit() {
    let api = backend();
    let ctx = Arc::new(
        SessionContext::new()
            .with_credential("not-a-token")
            .with_student_id(STUDENT_ID),
    );
    let mut app = ApplicationSession::open(Arc::clone(&api), Arc::clone(&ctx), COURSE_ID, SchemaFallback::FailOpen)
        .await
        .unwrap();
    fill_personal(app.wizard_mut());
    app.next().await.unwrap();
    fill_contact(app.wizard_mut());
    app.next().await.unwrap();
    fill_parents(app.wizard_mut());
    app.next().await.unwrap();
    fill_tenth(app.wizard_mut());
    app.next().await.unwrap();
    fill_documents(app.wizard_mut());
    app.next().await.unwrap();
    app.wizard_mut().set_agreement(true).unwrap();

    let err = app.submit().await.unwrap_err();
    assert!(err.requires_login());
    assert_eq!(ctx.credential(), None);
    assert!(api.submissions().is_empty());
}
