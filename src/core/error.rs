//! Error taxonomy for the input synthesis engine

/// Failure to deliver an event to the injection transport
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("application matching '{keyword}' not found")]
    TargetNotFound { keyword: String },

    #[error("could not parse window geometry from: {raw}")]
    GeometryParse { raw: String },

    #[error("window manager command failed: {reason}")]
    WindowManager { reason: String },

    #[error("input delivery failed: {0}")]
    Transport(#[from] TransportError),

    #[error("unknown key name: '{name}'")]
    UnknownKey { name: String },

    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("clipboard update failed: {reason}")]
    Clipboard { reason: String },

    #[error("screen capture failed: {reason}")]
    Capture { reason: String },
}

impl EngineError {
    pub(crate) fn window_manager(error: anyhow::Error) -> Self {
        EngineError::WindowManager {
            reason: format!("{error:#}"),
        }
    }

    /// Whether the error means the target application is simply absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::TargetNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_is_distinguishable() {
        let error = EngineError::TargetNotFound {
            keyword: "cluster".to_string(),
        };
        assert!(error.to_string().contains("not found"));
        assert!(error.is_not_found());
    }

    #[test]
    fn test_transport_error_converts() {
        let error: EngineError = TransportError::Failed {
            program: "ydotool".to_string(),
            status: "exit status: 1".to_string(),
            stderr: "failed to connect socket".to_string(),
        }
        .into();
        assert_eq!(
            error.to_string(),
            "input delivery failed: ydotool exited with exit status: 1: failed to connect socket"
        );
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_window_manager_keeps_context() {
        let error = EngineError::window_manager(
            anyhow::anyhow!("connection refused").context("X11 query failed"),
        );
        assert_eq!(
            error.to_string(),
            "window manager command failed: X11 query failed: connection refused"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineError>();
    }
}
