use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong between the console and the remote API.
/// None of these are fatal: every view converts them into a displayable
/// message and leaves the UI in a retryable state.
#[derive(Debug, Error)]
pub enum Error {
    /// The server answered with a non-success status. The message is taken
    /// from the `{message}` body when the server provided one.
    #[error("{}", message.as_deref().unwrap_or("the server rejected the request"))]
    Server {
        status: u16,
        message: Option<String>,
    },
    /// The request never completed (DNS, connect, timeout, bad body).
    #[error(transparent)]
    Network(#[from] reqwest::Error),
    /// Raised locally, without a network call, when an action needs a
    /// logged-in session and there is none.
    #[error("authentication required")]
    AuthenticationRequired,
    /// Client-side form validation, surfaced inline next to the form.
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Config(#[from] figment::Error),
}

impl Error {
    /// The user-facing rendition of this error. `fallback` substitutes for
    /// transport failures and message-less server errors, matching the
    /// per-call wording the screens show.
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Server { message: None, .. } | Self::Network(_) => fallback.to_string(),
            other => other.to_string(),
        }
    }
}
