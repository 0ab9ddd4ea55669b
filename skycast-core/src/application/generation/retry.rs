//! The generation-retry loop, written as an explicit state machine.
//!
//! Attempts run strictly one after another. The attempt number is carried
//! through the loop so the `max_attempts` bound holds by construction.

use super::error::GenerationFailure;
use super::prompts::corrective_prompt;
use crate::a2ui::{DirectiveBatch, extract, repair, repair_intensified, validate};
use crate::agent::Generator;
use crate::constants::{APOLOGY_TEXT, DEFAULT_MAX_ATTEMPTS};
use crate::domain::events::TurnEvents;
use tracing::{debug, info, warn};

/// Whether replies must carry a validated directive batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Structured,
    Text,
}

/// Observable loop states, in the order they were entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Invoking,
    Extracting,
    Repairing,
    Validating,
    Retrying,
    Accepted,
    ExhaustedFailure,
}

/// Bookkeeping for one attempt. Lives only as long as the loop.
#[derive(Debug, Clone)]
struct GenerationAttempt {
    number: u32,
    query_text: String,
    raw_reply: Option<String>,
    extracted_text: Option<String>,
    extracted_payload: Option<String>,
    diagnostic: Option<String>,
}

impl GenerationAttempt {
    fn first(query: &str) -> Self {
        Self::numbered(1, query.to_string())
    }

    fn numbered(number: u32, query_text: String) -> Self {
        Self {
            number,
            query_text,
            raw_reply: None,
            extracted_text: None,
            extracted_payload: None,
            diagnostic: None,
        }
    }

    fn next(&self, query_text: String) -> Self {
        Self::numbered(self.number + 1, query_text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedReply {
    /// Natural-language part of the reply.
    pub text: String,
    /// Present only in structured mode.
    pub batch: Option<DirectiveBatch>,
    pub attempts: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoopOutcome {
    Accepted(AcceptedReply),
    Exhausted { last: GenerationFailure },
}

impl LoopOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, LoopOutcome::Accepted(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryRun {
    pub outcome: LoopOutcome,
    pub attempts: u32,
    pub trace: Vec<LoopState>,
}

impl RetryRun {
    /// Text shown to the user: the accepted text, or the fixed apology.
    pub fn reply_text(&self) -> &str {
        match &self.outcome {
            LoopOutcome::Accepted(reply) => &reply.text,
            LoopOutcome::Exhausted { .. } => APOLOGY_TEXT,
        }
    }

    /// Terminal error for an exhausted run.
    pub fn failure(&self) -> Option<GenerationFailure> {
        match self.outcome {
            LoopOutcome::Accepted(_) => None,
            LoopOutcome::Exhausted { .. } => Some(GenerationFailure::ExhaustedRetries {
                attempts: self.attempts,
            }),
        }
    }

    pub fn batch(&self) -> Option<&DirectiveBatch> {
        match &self.outcome {
            LoopOutcome::Accepted(reply) => reply.batch.as_ref(),
            LoopOutcome::Exhausted { .. } => None,
        }
    }
}

enum Step {
    Invoking,
    Extracting(String),
    Repairing { payload: String, intensified: bool },
    Validating { payload: String, repaired: String, intensified: bool },
    Retrying(GenerationFailure),
    Accepted(AcceptedReply),
    Exhausted(GenerationFailure),
}

impl Step {
    fn state(&self) -> LoopState {
        match self {
            Step::Invoking => LoopState::Invoking,
            Step::Extracting(_) => LoopState::Extracting,
            Step::Repairing { .. } => LoopState::Repairing,
            Step::Validating { .. } => LoopState::Validating,
            Step::Retrying(_) => LoopState::Retrying,
            Step::Accepted(_) => LoopState::Accepted,
            Step::Exhausted(_) => LoopState::ExhaustedFailure,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryLoop {
    mode: OutputMode,
    max_attempts: u32,
}

impl RetryLoop {
    pub fn new(mode: OutputMode, max_attempts: u32) -> Self {
        Self {
            mode,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn structured() -> Self {
        Self::new(OutputMode::Structured, DEFAULT_MAX_ATTEMPTS)
    }

    pub fn text() -> Self {
        Self::new(OutputMode::Text, DEFAULT_MAX_ATTEMPTS)
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub async fn run(
        &self,
        generator: &dyn Generator,
        session_id: &str,
        query: &str,
        events: &TurnEvents,
    ) -> RetryRun {
        let mut attempt = GenerationAttempt::first(query);
        let mut trace = Vec::new();
        let mut step = Step::Invoking;

        loop {
            trace.push(step.state());
            debug!(
                session_id,
                attempt = attempt.number,
                state = ?step.state(),
                "Generation loop transition"
            );

            step = match step {
                Step::Invoking => self.invoke(generator, session_id, &mut attempt, events).await,
                Step::Extracting(reply) => match extract(&reply) {
                    Ok(extracted) => {
                        attempt.extracted_text = Some(extracted.text);
                        attempt.extracted_payload = Some(extracted.payload.clone());
                        Step::Repairing {
                            payload: extracted.payload,
                            intensified: false,
                        }
                    }
                    Err(err) => self.fail(&mut attempt, err.into()),
                },
                Step::Repairing {
                    payload,
                    intensified,
                } => {
                    let repaired = if intensified {
                        repair_intensified(&payload)
                    } else {
                        repair(&payload)
                    };
                    Step::Validating {
                        payload,
                        repaired,
                        intensified,
                    }
                }
                Step::Validating {
                    payload,
                    repaired,
                    intensified,
                } => match validate(&repaired) {
                    Ok(batch) => Step::Accepted(AcceptedReply {
                        text: attempt.extracted_text.clone().unwrap_or_default(),
                        batch: Some(batch),
                        attempts: attempt.number,
                    }),
                    Err(err) if err.is_parse() && !intensified => {
                        debug!(attempt = attempt.number, %err, "Retrying repair with the stricter pass");
                        Step::Repairing {
                            payload,
                            intensified: true,
                        }
                    }
                    Err(err) => self.fail(&mut attempt, err.into()),
                },
                Step::Retrying(failure) => {
                    attempt = attempt.next(corrective_prompt(&failure, query));
                    Step::Invoking
                }
                Step::Accepted(reply) => {
                    info!(session_id, attempts = reply.attempts, "Generation accepted");
                    return RetryRun {
                        attempts: reply.attempts,
                        outcome: LoopOutcome::Accepted(reply),
                        trace,
                    };
                }
                Step::Exhausted(failure) => {
                    warn!(
                        session_id,
                        attempts = attempt.number,
                        last_failure = %failure,
                        diagnostic = ?attempt.diagnostic,
                        "Generation attempts exhausted"
                    );
                    return RetryRun {
                        attempts: attempt.number,
                        outcome: LoopOutcome::Exhausted { last: failure },
                        trace,
                    };
                }
            };
        }
    }

    async fn invoke(
        &self,
        generator: &dyn Generator,
        session_id: &str,
        attempt: &mut GenerationAttempt,
        events: &TurnEvents,
    ) -> Step {
        let result = generator
            .generate(session_id, &attempt.query_text, events)
            .await;

        let reply = match result {
            Ok(Some(reply)) if !reply.trim().is_empty() => reply,
            Ok(_) => return self.fail(attempt, GenerationFailure::GenerationEmpty),
            Err(err) => {
                return self.fail(attempt, GenerationFailure::GenerationFailed(err.to_string()));
            }
        };
        attempt.raw_reply = Some(reply.clone());

        match self.mode {
            OutputMode::Text => Step::Accepted(AcceptedReply {
                text: reply.trim().to_string(),
                batch: None,
                attempts: attempt.number,
            }),
            OutputMode::Structured => Step::Extracting(reply),
        }
    }

    fn fail(&self, attempt: &mut GenerationAttempt, failure: GenerationFailure) -> Step {
        warn!(
            attempt = attempt.number,
            max_attempts = self.max_attempts,
            had_reply = attempt.raw_reply.is_some(),
            had_payload = attempt.extracted_payload.is_some(),
            error = %failure,
            "Generation attempt failed"
        );
        attempt.diagnostic = Some(failure.to_string());
        if attempt.number < self.max_attempts {
            Step::Retrying(failure)
        } else {
            Step::Exhausted(failure)
        }
    }
}
