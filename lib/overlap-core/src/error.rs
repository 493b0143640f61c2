use std::error::Error;

use overlap_kube::ClientError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Reasons a tick was abandoned before any Pod was evaluated
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Failed to list services: {0}")]
    ListServices(#[source] ClientError),

    #[error("Failed to list pods: {0}")]
    ListPods(#[source] ClientError),
}

/// Render an error followed by every source not already in its message
///
/// Transport failures keep the DNS/TLS/connect cause a few levels down the
/// source chain; this surfaces it in a single log line.
pub fn error_chain(err: &dyn Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let message = cause.to_string();
        if !rendered.contains(&message) {
            rendered.push_str(": ");
            rendered.push_str(&message);
        }
        source = cause.source();
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::io;

    #[derive(Debug)]
    struct Wrapped(io::Error);

    impl fmt::Display for Wrapped {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "error sending request")
        }
    }

    impl Error for Wrapped {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_error_chain_surfaces_hidden_cause() {
        let err = Wrapped(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"));
        assert_eq!(error_chain(&err), "error sending request: connection refused");
    }

    #[test]
    fn test_error_chain_skips_repeated_messages() {
        let err = ReconcileError::ListPods(invalid_path_error());
        let top = err.to_string();
        assert_eq!(error_chain(&err), top);
    }

    fn invalid_path_error() -> ClientError {
        ClientError::InvalidPath {
            path: "/api/v1/pods".to_string(),
            reason: "relative URL without a base".to_string(),
        }
    }
}
