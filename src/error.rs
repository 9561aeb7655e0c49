use thiserror::Error;

/// Central error type for the notification-sound crate.
#[derive(Debug, Error)]
pub enum SoundError {
    // Generic fallback (wraps anyhow)
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),

    // Domain-specific variants
    #[error("Invalid option: {0:?}")]
    InvalidChoice(String),

    #[error("sox or ffmpeg is required to generate the sound")]
    NoSynthesisTool,

    #[error("{tool} failed at step `{step}`: {detail}")]
    StepFailed {
        tool: &'static str,
        step: &'static str,
        detail: String,
    },

    #[error("Config error: {0}")]
    Config(String),
}

// --- Implement From conversions for common errors ---
impl From<std::io::Error> for SoundError {
    fn from(e: std::io::Error) -> Self {
        SoundError::Anyhow(e.into())
    }
}

impl From<serde_json::Error> for SoundError {
    fn from(e: serde_json::Error) -> Self {
        SoundError::Anyhow(e.into())
    }
}

impl From<reqwest::Error> for SoundError {
    fn from(e: reqwest::Error) -> Self {
        SoundError::Anyhow(e.into())
    }
}

impl SoundError {
    /// True when the failure was already explained to the user on the
    /// menu's output, so callers need not print it again.
    pub fn is_reported(&self) -> bool {
        matches!(self, SoundError::InvalidChoice(_) | SoundError::NoSynthesisTool)
    }
}

pub type Result<T> = std::result::Result<T, SoundError>;
