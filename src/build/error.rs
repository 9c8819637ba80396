use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildNumberError {
    #[error("Malformed build number '{text}': {reason}")]
    Malformed { text: String, reason: &'static str },
}

impl BuildNumberError {
    pub(crate) fn malformed(text: &str, reason: &'static str) -> Self {
        BuildNumberError::Malformed {
            text: text.to_string(),
            reason,
        }
    }
}
