//! Unit tests for the edit session state machine

use commerce_console_api::services::{EditSession, FinishOutcome, SessionError, SessionState};
use commerce_console_api::storage::MutationError;

type Session = EditSession<&'static str, &'static str>;

#[test]
fn test_edit_then_submit_success_adopts_result() {
    let mut session = Session::new("v1");
    session.edit("draft").unwrap();
    let ticket = session.begin_submit().unwrap();
    assert!(session.is_submitting());

    assert_eq!(session.finish(ticket, Ok("v2")), FinishOutcome::Applied);
    assert!(matches!(session.state(), SessionState::Viewing { original } if *original == "v2"));
    assert_eq!(session.draft(), None);
}

#[test]
fn test_failed_submit_returns_to_editing_with_error() {
    let mut session = Session::new("v1");
    session.edit("draft").unwrap();
    let ticket = session.begin_submit().unwrap();

    let outcome = session.finish(
        ticket,
        Err(MutationError::conflict("type-definition", "t1", 1, Some(2))),
    );
    assert_eq!(outcome, FinishOutcome::Failed);
    assert_eq!(session.draft(), Some(&"draft"));
    assert_eq!(session.original(), Some(&"v1"));
    assert!(session.last_error().is_some_and(|e| e.requires_reload()));
}

#[test]
fn test_double_submit_is_rejected() {
    let mut session = Session::new("v1");
    session.edit("draft").unwrap();
    let _ticket = session.begin_submit().unwrap();

    assert_eq!(session.begin_submit(), Err(SessionError::SubmitInProgress));
    assert_eq!(session.edit("other"), Err(SessionError::SubmitInProgress));
    assert!(session.is_submitting());
}

#[test]
fn test_submit_without_draft_is_rejected() {
    let mut session = Session::new("v1");
    assert_eq!(session.begin_submit(), Err(SessionError::NothingToSubmit));
}

#[test]
fn test_response_after_close_is_ignored() {
    let mut session = Session::new("v1");
    session.edit("draft").unwrap();
    let ticket = session.begin_submit().unwrap();
    session.close();

    assert_eq!(session.finish(ticket, Ok("v2")), FinishOutcome::Ignored);
    assert!(matches!(session.state(), SessionState::Closed));
    assert_eq!(session.edit("again"), Err(SessionError::Closed));
}

#[test]
fn test_stale_ticket_is_ignored() {
    let mut session = Session::new("v1");
    session.edit("first").unwrap();
    let first = session.begin_submit().unwrap();
    session.finish(first, Err(MutationError::transport("timeout")));

    let second = session.begin_submit().unwrap();
    assert_ne!(first, second);
    assert_eq!(session.finish(first, Ok("late")), FinishOutcome::Ignored);
    assert_eq!(session.finish(second, Ok("v2")), FinishOutcome::Applied);
    assert_eq!(session.original(), Some(&"v2"));
}

#[test]
fn test_reload_keeps_draft() {
    let mut session = Session::new("v1");
    session.edit("draft").unwrap();
    session.reload("v3").unwrap();
    assert_eq!(session.original(), Some(&"v3"));
    assert_eq!(session.draft(), Some(&"draft"));
    assert!(session.last_error().is_none());
}

#[test]
fn test_revert_discards_draft() {
    let mut session = Session::new("v1");
    session.edit("draft").unwrap();
    session.revert().unwrap();
    assert_eq!(session.draft(), None);
    assert_eq!(session.original(), Some(&"v1"));
}
