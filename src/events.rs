// Event types for async communication

use crate::error::GenerationError;

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A generation task finished; `id` is the request generation it belongs to
    GenerationFinished {
        id: u64,
        result: Result<String, GenerationError>,
    },
    /// The "copied" indicator timer with this sequence number ran out
    CopyFeedbackExpired(u64),
}
