// ABOUTME: Per-attempt classification into success, retryable, or terminal.
// ABOUTME: The retry loop decides what to do; this module only labels outcomes.

use serde_json::Value;

use super::envelope::{ToolOutcome, parse_envelope, snippet};
use super::transport::TransportResponse;
use crate::error::{DatagenError, HttpError, TransportError};

/// Result of a single attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// The tool ran and produced a result.
    Success(Value),
    /// Transient failure. Carries the error to surface if retries run out.
    Retryable(DatagenError),
    /// Failure that another attempt will not fix.
    Terminal(DatagenError),
}

impl AttemptOutcome {
    pub fn is_retryable(&self) -> bool {
        matches!(self, AttemptOutcome::Retryable(_))
    }
}

/// Statuses worth another attempt: 429 and every 5xx.
pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

/// Label the result of one transport round trip.
pub fn classify(result: Result<TransportResponse, TransportError>) -> AttemptOutcome {
    let response = match result {
        Ok(response) => response,
        Err(TransportError::Request(message)) => {
            return AttemptOutcome::Terminal(DatagenError::InvalidConfig(message));
        }
        Err(err) => return AttemptOutcome::Retryable(DatagenError::Http(err.into())),
    };

    let TransportResponse { status, body } = response;

    match status {
        401 | 403 => AttemptOutcome::Terminal(DatagenError::Auth {
            status,
            message: snippet(&body),
        }),
        200..=299 => match parse_envelope(&body) {
            Ok(ToolOutcome::Completed(result)) => AttemptOutcome::Success(result),
            Ok(ToolOutcome::Failed(message)) => {
                AttemptOutcome::Terminal(DatagenError::ToolExecution(message))
            }
            Err(err) => AttemptOutcome::Terminal(DatagenError::Http(err)),
        },
        s if is_retryable_status(s) => AttemptOutcome::Retryable(
            HttpError::Status {
                status,
                body: snippet(&body),
            }
            .into(),
        ),
        _ => AttemptOutcome::Terminal(
            HttpError::Status {
                status,
                body: snippet(&body),
            }
            .into(),
        ),
    }
}
