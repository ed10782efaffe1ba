use thiserror::Error as ThisError;

/// Errors raised while encoding or decoding wire frames
#[derive(Debug, Clone, ThisError, PartialEq, Eq)]
pub enum MessageError {
    /// The inbound frame is not valid JSON or does not match any known event
    #[error("Malformed message frame: {reason}")]
    Decode {
        reason: String,
    },

    /// The outbound message could not be serialized
    #[error("Could not encode message {event}: {reason}")]
    Encode {
        event: &'static str,
        reason: String,
    },
}
