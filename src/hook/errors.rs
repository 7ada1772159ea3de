use thiserror::Error;

use crate::hook::kind::HookKind;

/// OS refusal to install or address a hook, carrying the native error code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("OS refused the hook operation (native code {code})")]
pub struct RegistrationError {
    pub code: i32,
}

impl RegistrationError {
    pub fn new(code: i32) -> Self {
        Self { code }
    }
}

#[derive(Debug, Error)]
pub enum HookError {
    #[error("Failed to register {kind} hook: {source}")]
    Registration {
        kind: HookKind,
        source: RegistrationError,
    },

    #[error("HookKind::None is a parse fallback and cannot be installed")]
    KindIsNone,
}

impl HookError {
    /// Native error code, when the OS supplied one.
    pub fn native_code(&self) -> Option<i32> {
        match self {
            Self::Registration { source, .. } => Some(source.code),
            Self::KindIsNone => None,
        }
    }
}

pub type HookResult<T> = std::result::Result<T, HookError>;
