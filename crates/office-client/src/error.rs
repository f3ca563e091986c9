use office_types::ValidationError;

/// Failure of a backend call, surfaced as-is to the caller.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
    #[error("malformed payload: {0}")]
    Codec(String),
    #[error("response {status} carried no data")]
    MissingData { status: u16 },
    #[error("token rejected: {0}")]
    InvalidToken(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ClientError {
    /// HTTP-like status. Failures that never produced a response report 0.
    pub fn status(&self) -> u16 {
        match self {
            ClientError::Transport(_) | ClientError::Codec(_) => 0,
            ClientError::Server { status, .. } | ClientError::MissingData { status } => *status,
            ClientError::InvalidToken(_) => 401,
            ClientError::Validation(_) => 422,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), 401 | 403)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// Some entries could not be written; whatever was reachable was cleared.
    #[error("storage write failed: {0}")]
    Write(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_covers_every_variant() {
        assert_eq!(ClientError::Transport("reset".into()).status(), 0);
        assert_eq!(
            ClientError::Server {
                status: 409,
                message: "duplicada".into()
            }
            .status(),
            409
        );
        assert_eq!(ClientError::MissingData { status: 200 }.status(), 200);
        assert_eq!(
            ClientError::from(ValidationError::new("name", "obrigatório")).status(),
            422
        );
        assert!(ClientError::InvalidToken("expired".into()).is_unauthorized());
    }
}
