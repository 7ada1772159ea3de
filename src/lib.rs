//! hookguard
//! Lifecycle management and failure isolation for OS-level input hooks.
//!
//! The crate owns exactly one concern: installing a system hook callback and
//! guaranteeing that no application failure ever unwinds into OS-owned call
//! frames. Event decoding is supplied by callers through [`hook::HookHandler`].

pub mod common;
pub mod hook;
pub mod os;

pub use hook::{
    HookController, HookError, HookFailure, HookHandler, HookKind, HookOs, RegistrationError,
};
