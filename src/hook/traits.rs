use std::fmt::Debug;
use std::sync::Arc;

use crate::hook::errors::RegistrationError;
use crate::hook::kind::HookKind;

/// The fixed-shape callback handed to the OS surface at registration time.
/// For every matching system event the OS invokes it with the control code
/// and the two opaque event-data words, and consumes its result.
pub type Trampoline = Arc<dyn Fn(i32, usize, isize) -> isize + Send + Sync>;

/// Decode-and-react capability for one hook kind's events.
///
/// The handler runs on whatever thread the OS dispatches events from and
/// sits on a latency-sensitive path: it must be fast and non-blocking.
/// A returned error (or a panic) never unwinds past the controller; it is
/// converted into a chain continuation and a failure notification.
pub trait HookHandler: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// React to one event. The returned value goes back to the OS unmodified
    /// and decides whether the event keeps propagating down the hook chain.
    fn on_event(&self, code: i32, wparam: usize, lparam: isize) -> Result<isize, Self::Error>;
}

/// Abstract OS surface for hook registration.
///
/// The real implementation lives in `os::windows`; tests substitute a mock.
pub trait HookOs: Send + Sync + 'static {
    /// Opaque identifier of a live registration, required to unregister it.
    type Handle: Send + Debug;

    /// Module identity required by the OS at registration time.
    type Module: Send;

    /// Resolve the current process's module handle.
    fn current_module(&self) -> Result<Self::Module, RegistrationError>;

    /// Install a hook of the given kind, routing matching events to the
    /// trampoline. Returns the opaque handle or the native error code.
    fn register(
        &self,
        kind: HookKind,
        module: Self::Module,
        trampoline: Trampoline,
    ) -> Result<Self::Handle, RegistrationError>;

    /// Remove a previously installed hook. Best-effort: a false return is
    /// reported to no one beyond the caller's logging.
    fn unregister(&self, handle: Self::Handle) -> bool;

    /// Pass an event through to the next hook in the chain unmodified.
    fn chain_continue(&self, code: i32, wparam: usize, lparam: isize) -> isize;
}
