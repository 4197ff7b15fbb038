//! Per-session edit state machine.
//!
//! `Viewing(original)` -> `Editing(original, draft)` -> `Submitting` ->
//! `Viewing(updated)` on success or back to `Editing` with the error on
//! failure. Only one submission may be outstanding; responses that arrive for
//! a superseded or closed session are ignored.

use crate::storage::MutationError;
use thiserror::Error;
use tracing::debug;

/// Identifies one submission of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmitTicket(u64);

#[derive(Debug, Clone)]
pub enum SessionState<E, D> {
    Viewing {
        original: E,
    },
    Editing {
        original: E,
        draft: D,
        error: Option<MutationError>,
    },
    Submitting {
        original: E,
        draft: D,
        ticket: SubmitTicket,
    },
    Closed,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("A submission is already in progress")]
    SubmitInProgress,
    #[error("There is no draft to submit")]
    NothingToSubmit,
    #[error("The session is closed")]
    Closed,
}

/// What happened to a response handed to [`EditSession::finish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishOutcome {
    Applied,
    Failed,
    /// Response belonged to a submission this session no longer waits for
    Ignored,
}

#[derive(Debug, Clone)]
pub struct EditSession<E, D> {
    state: SessionState<E, D>,
    next_ticket: u64,
}

impl<E, D> EditSession<E, D> {
    pub fn new(original: E) -> Self {
        Self {
            state: SessionState::Viewing { original },
            next_ticket: 1,
        }
    }

    pub fn state(&self) -> &SessionState<E, D> {
        &self.state
    }

    pub fn original(&self) -> Option<&E> {
        match &self.state {
            SessionState::Viewing { original }
            | SessionState::Editing { original, .. }
            | SessionState::Submitting { original, .. } => Some(original),
            SessionState::Closed => None,
        }
    }

    pub fn draft(&self) -> Option<&D> {
        match &self.state {
            SessionState::Editing { draft, .. } | SessionState::Submitting { draft, .. } => {
                Some(draft)
            }
            SessionState::Viewing { .. } | SessionState::Closed => None,
        }
    }

    pub fn last_error(&self) -> Option<&MutationError> {
        match &self.state {
            SessionState::Editing { error, .. } => error.as_ref(),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, SessionState::Submitting { .. })
    }

    /// Replace the draft. Not allowed while a submission is outstanding.
    pub fn edit(&mut self, draft: D) -> Result<(), SessionError> {
        let state = std::mem::replace(&mut self.state, SessionState::Closed);
        let (result, next) = match state {
            SessionState::Viewing { original } | SessionState::Editing { original, .. } => (
                Ok(()),
                SessionState::Editing {
                    original,
                    draft,
                    error: None,
                },
            ),
            submitting @ SessionState::Submitting { .. } => {
                (Err(SessionError::SubmitInProgress), submitting)
            }
            SessionState::Closed => (Err(SessionError::Closed), SessionState::Closed),
        };
        self.state = next;
        result
    }

    /// Move to `Submitting` and hand out the ticket for the response.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, SessionError> {
        let state = std::mem::replace(&mut self.state, SessionState::Closed);
        let (result, next) = match state {
            SessionState::Editing {
                original, draft, ..
            } => {
                let ticket = SubmitTicket(self.next_ticket);
                self.next_ticket += 1;
                (
                    Ok(ticket),
                    SessionState::Submitting {
                        original,
                        draft,
                        ticket,
                    },
                )
            }
            submitting @ SessionState::Submitting { .. } => {
                (Err(SessionError::SubmitInProgress), submitting)
            }
            viewing @ SessionState::Viewing { .. } => (Err(SessionError::NothingToSubmit), viewing),
            SessionState::Closed => (Err(SessionError::Closed), SessionState::Closed),
        };
        self.state = next;
        result
    }

    /// Settle a submission. Success adopts the updated entity as the new
    /// baseline; failure returns to `Editing` with the error attached.
    pub fn finish(
        &mut self,
        ticket: SubmitTicket,
        result: Result<E, MutationError>,
    ) -> FinishOutcome {
        let outstanding = matches!(
            &self.state,
            SessionState::Submitting { ticket: current, .. } if *current == ticket
        );
        if !outstanding {
            debug!("Ignoring response for submission {:?}", ticket);
            return FinishOutcome::Ignored;
        }

        let (original, draft) = match std::mem::replace(&mut self.state, SessionState::Closed) {
            SessionState::Submitting {
                original, draft, ..
            } => (original, draft),
            other => {
                self.state = other;
                return FinishOutcome::Ignored;
            }
        };

        match result {
            Ok(updated) => {
                self.state = SessionState::Viewing { original: updated };
                FinishOutcome::Applied
            }
            Err(error) => {
                self.state = SessionState::Editing {
                    original,
                    draft,
                    error: Some(error),
                };
                FinishOutcome::Failed
            }
        }
    }

    /// Replace a stale baseline (after a conflict), keeping the draft.
    pub fn reload(&mut self, latest: E) -> Result<(), SessionError> {
        let state = std::mem::replace(&mut self.state, SessionState::Closed);
        let (result, next) = match state {
            SessionState::Viewing { .. } => (Ok(()), SessionState::Viewing { original: latest }),
            SessionState::Editing { draft, .. } => (
                Ok(()),
                SessionState::Editing {
                    original: latest,
                    draft,
                    error: None,
                },
            ),
            submitting @ SessionState::Submitting { .. } => {
                (Err(SessionError::SubmitInProgress), submitting)
            }
            SessionState::Closed => (Err(SessionError::Closed), SessionState::Closed),
        };
        self.state = next;
        result
    }

    /// Drop back to viewing the original, discarding the draft.
    pub fn revert(&mut self) -> Result<(), SessionError> {
        let state = std::mem::replace(&mut self.state, SessionState::Closed);
        let (result, next) = match state {
            SessionState::Editing { original, .. } | SessionState::Viewing { original } => {
                (Ok(()), SessionState::Viewing { original })
            }
            submitting @ SessionState::Submitting { .. } => {
                (Err(SessionError::SubmitInProgress), submitting)
            }
            SessionState::Closed => (Err(SessionError::Closed), SessionState::Closed),
        };
        self.state = next;
        result
    }

    /// Tear the session down; any outstanding response will be ignored.
    pub fn close(&mut self) {
        self.state = SessionState::Closed;
    }
}
