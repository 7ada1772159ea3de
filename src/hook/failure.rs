use std::any::Any;

use thiserror::Error;

/// A failure captured inside the dispatch boundary.
///
/// Never propagated synchronously; delivered at most once per failing
/// invocation on the controller's failure channel.
#[derive(Debug, Error)]
pub enum HookFailure {
    #[error("Event handler returned an error: {0}")]
    Reaction(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Event handler panicked: {0}")]
    Panic(String),
}

impl HookFailure {
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "non-string panic payload".to_string()
        };

        Self::Panic(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_payload_extraction() {
        let from_str = HookFailure::from_panic(Box::new("boom"));
        assert!(matches!(from_str, HookFailure::Panic(ref msg) if msg == "boom"));

        let from_string = HookFailure::from_panic(Box::new("owned".to_string()));
        assert!(matches!(from_string, HookFailure::Panic(ref msg) if msg == "owned"));

        let from_other = HookFailure::from_panic(Box::new(7_u32));
        assert!(matches!(from_other, HookFailure::Panic(ref msg) if msg == "non-string panic payload"));
    }
}
