//! Hook lifecycle state machine and the dispatch failure boundary.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, error, info, warn};
use parking_lot::Mutex;

use crate::common::channel::{Channel, SubscriptionId};
use crate::hook::errors::{HookError, HookResult};
use crate::hook::failure::HookFailure;
use crate::hook::kind::HookKind;
use crate::hook::traits::{HookHandler, HookOs, Trampoline};

/// A live OS registration: the opaque handle plus the kind it was
/// installed with. Exists exactly while the controller is started.
#[derive(Debug)]
struct Registration<T> {
    kind: HookKind,
    handle: T,
}

/// Everything the trampoline needs. Kept behind an Arc so the closure
/// handed to the OS surface stays valid independent of borrow scopes.
struct Shared<O: HookOs, H: HookHandler> {
    os: O,
    handler: H,
    failures: Channel<HookFailure>,
}

impl<O: HookOs, H: HookHandler> Shared<O, H> {
    /// The trampoline body. Runs on whatever thread the OS dispatches
    /// events from; nothing may unwind out of here.
    fn dispatch(&self, code: i32, wparam: usize, lparam: isize) -> isize {
        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| self.handler.on_event(code, wparam, lparam)));

        let failure = match outcome {
            Ok(Ok(result)) => return result,
            Ok(Err(err)) => HookFailure::Reaction(Box::new(err)),
            Err(payload) => HookFailure::from_panic(payload),
        };

        error!("Contained a reaction failure during event dispatch: {failure}");
        self.failures.emit(&failure);

        self.os.chain_continue(code, wparam, lparam)
    }
}

/// Owns at most one live OS hook registration and guarantees that no
/// handler failure ever unwinds into OS-owned call frames.
///
/// Generic over the OS surface and the decode-and-react capability; the
/// concrete handler decides what each event means and whether to suppress
/// it. `start`/`stop` are serialized through an internal mutex, but the
/// lifecycle is intended to be driven from one place; callers coordinating
/// several threads should serialize externally.
pub struct HookController<O: HookOs, H: HookHandler> {
    shared: Arc<Shared<O, H>>,
    registration: Mutex<Option<Registration<O::Handle>>>,
    started: AtomicBool,
}

impl<O: HookOs, H: HookHandler> HookController<O, H> {
    pub fn new(os: O, handler: H) -> Self {
        Self {
            shared: Arc::new(Shared {
                os,
                handler,
                failures: Channel::new(),
            }),
            registration: Mutex::new(None),
            started: AtomicBool::new(false),
        }
    }

    /// Install the hook. Idempotent: a repeated call while started keeps the
    /// first registration and ignores the new kind.
    pub fn start(&self, kind: HookKind) -> HookResult<()> {
        let mut registration = self.registration.lock();

        // Idempotence wins over argument validation: while started, any
        // repeated start keeps the first registration and ignores the new
        // kind, sentinel included.
        if let Some(active) = registration.as_ref() {
            debug!(
                "Hook already started as {}, ignoring start({kind})",
                active.kind
            );
            return Ok(());
        }

        if kind == HookKind::None {
            return Err(HookError::KindIsNone);
        }

        info!("Installing {kind} hook");

        let module = self
            .shared
            .os
            .current_module()
            .map_err(|source| HookError::Registration { kind, source })?;

        let shared = Arc::clone(&self.shared);
        let trampoline: Trampoline =
            Arc::new(move |code, wparam, lparam| shared.dispatch(code, wparam, lparam));

        let handle = self
            .shared
            .os
            .register(kind, module, trampoline)
            .map_err(|source| {
                error!("{kind} hook registration refused (native code {})", source.code);
                HookError::Registration { kind, source }
            })?;

        debug!("{kind} hook registered with handle {handle:?}");

        *registration = Some(Registration { kind, handle });
        self.started.store(true, Ordering::Release);

        info!("{kind} hook installed");
        Ok(())
    }

    /// Remove the hook. Idempotent while stopped. Unregistration failure is
    /// absorbed: the OS may already have torn the chain entry down, and a
    /// stuck "started" state would be worse than a leaked unhook attempt.
    pub fn stop(&self) {
        let mut registration = self.registration.lock();

        let Some(active) = registration.take() else {
            return;
        };

        info!("Removing {} hook", active.kind);

        if !self.shared.os.unregister(active.handle) {
            warn!("OS refused to unregister the {} hook", active.kind);
        }

        self.started.store(false, Ordering::Release);
    }

    /// Whether a live registration is currently held.
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Kind the live registration was installed with, if any.
    pub fn kind(&self) -> Option<HookKind> {
        self.registration.lock().as_ref().map(|active| active.kind)
    }

    /// Feed one OS-delivered event through the failure boundary.
    ///
    /// The OS glue calls this for every matching event; tests drive it
    /// directly. On normal handler completion the handler's result is
    /// returned unmodified; on failure the event is passed to the next hook
    /// in the chain and the failure goes out on the failure channel.
    pub fn dispatch(&self, code: i32, wparam: usize, lparam: isize) -> isize {
        self.shared.dispatch(code, wparam, lparam)
    }

    /// Subscribe to captured reaction failures.
    ///
    /// Subscribers run synchronously inside the dispatch path and are not
    /// themselves failure-isolated: a panicking subscriber breaks the
    /// containment the controller provides, and that is on the subscriber.
    pub fn on_failure<F: Fn(&HookFailure) + Send + Sync + 'static>(
        &self,
        callback: F,
    ) -> SubscriptionId {
        self.shared.failures.subscribe(callback)
    }

    /// Drop a failure subscription.
    pub fn off_failure(&self, id: SubscriptionId) -> bool {
        self.shared.failures.unsubscribe(id)
    }
}

impl<O: HookOs, H: HookHandler> Drop for HookController<O, H> {
    fn drop(&mut self) {
        self.stop();
    }
}
