//! State management-specific error types.

/// Errors that can occur during state operations.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Session not configured
    #[error("Session not configured")]
    #[allow(dead_code)]
    SessionNotSet,

    /// No selection pending
    #[error("No entity selected")]
    #[allow(dead_code)]
    NothingSelected,

    /// Network channel is gone
    #[error("Network channel closed")]
    #[allow(dead_code)]
    ChannelClosed,

    /// Generic state error
    #[error("State error: {0}")]
    #[allow(dead_code)]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_error_display() {
        let error = StateError::SessionNotSet;
        assert!(error.to_string().contains("Session not configured"));

        let error = StateError::NothingSelected;
        assert!(error.to_string().contains("No entity selected"));

        let error = StateError::ChannelClosed;
        assert!(error.to_string().contains("Network channel closed"));

        let error = StateError::Other("Generic error".to_string());
        assert!(error.to_string().contains("State error"));
        assert!(error.to_string().contains("Generic error"));
    }
}
