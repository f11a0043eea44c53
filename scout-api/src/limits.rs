use thiserror::Error;

/// Cap on one inbound message, head and body together. Search bodies are tiny.
pub const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum LimitError {
    #[error("message too large: {actual} bytes (max {max})")]
    TooLarge { max: usize, actual: usize },
}

pub fn enforce_max_message_size(len: usize) -> Result<(), LimitError> {
    if len > MAX_MESSAGE_BYTES {
        return Err(LimitError::TooLarge { max: MAX_MESSAGE_BYTES, actual: len });
    }
    Ok(())
}

/// Check a message announced as `head_len` header bytes plus `body_len` body
/// bytes. A sum that overflows is reported as `usize::MAX`.
pub fn enforce_message_parts(head_len: usize, body_len: usize) -> Result<(), LimitError> {
    enforce_max_message_size(head_len.checked_add(body_len).unwrap_or(usize::MAX))
}
