mod error;
mod prompts;
mod retry;


pub use error::GenerationFailure;
pub use prompts::corrective_prompt;
pub use retry::{AcceptedReply, LoopOutcome, LoopState, OutputMode, RetryLoop, RetryRun};
