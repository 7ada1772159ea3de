//! Real hook backend for Windows.
//!
//! The OS `HOOKPROC` carries no user data, so registrations route through a
//! process-global dispatch table keyed by WH_* id. The table slot is filled
//! before `SetWindowsHookExW` is called and emptied after unhooking, so an
//! event delivered in the unregistration race window still finds either a
//! live trampoline or the fail-open chain continuation.

pub mod winapi;

use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use log::debug;
use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::HOOKPROC;

use crate::hook::errors::RegistrationError;
use crate::hook::kind::HookKind;
use crate::hook::traits::{HookOs, Trampoline};

use self::winapi::{HModule, HookHandle};

static DISPATCH_SLOTS: LazyLock<DashMap<i32, Trampoline>> = LazyLock::new(DashMap::new);

fn route(kind_id: i32, code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    // Clone the slot out before invoking it: the handler may stop the
    // controller from inside the callback, and removal must not contend
    // with a held map guard on this thread.
    let slot = DISPATCH_SLOTS
        .get(&kind_id)
        .map(|entry| Arc::clone(entry.value()));

    match slot {
        Some(trampoline) => LRESULT(trampoline(code, wparam.0, lparam.0)),
        None => LRESULT(winapi::call_next_hook_ex(code, wparam.0, lparam.0)),
    }
}

macro_rules! hook_procs {
    ($(($proc:ident, $kind:expr, $kind_id:literal)),+ $(,)?) => {
        $(
            unsafe extern "system" fn $proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
                route($kind_id, code, wparam, lparam)
            }
        )+

        fn proc_for(kind: HookKind) -> HOOKPROC {
            match kind {
                $( k if k == $kind => Some($proc), )+
                _ => None,
            }
        }

        #[cfg(test)]
        fn proc_table() -> Vec<(HookKind, i32)> {
            vec![$( ($kind, $kind_id) ),+]
        }
    };
}

hook_procs![
    (call_wnd_proc_hook_proc, HookKind::CallWndProc, 4),
    (cbt_hook_proc, HookKind::Cbt, 5),
    (get_message_hook_proc, HookKind::GetMessage, 3),
    (keyboard_hook_proc, HookKind::Keyboard, 2),
    (mouse_hook_proc, HookKind::Mouse, 7),
    (shell_hook_proc, HookKind::Shell, 10),
    (keyboard_low_level_hook_proc, HookKind::KeyboardLowLevel, 13),
    (mouse_low_level_hook_proc, HookKind::MouseLowLevel, 14),
];

/// The live `HookOs` implementation backed by user32.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsHookOs;

impl WindowsHookOs {
    pub fn new() -> Self {
        Self
    }
}

impl HookOs for WindowsHookOs {
    type Handle = HookHandle;
    type Module = HModule;

    fn current_module(&self) -> Result<HModule, RegistrationError> {
        winapi::get_current_module_handle()
            .map_err(|err| RegistrationError::new(err.native_code()))
    }

    fn register(
        &self,
        kind: HookKind,
        module: HModule,
        trampoline: Trampoline,
    ) -> Result<HookHandle, RegistrationError> {
        // 87: ERROR_INVALID_PARAMETER. The sentinel has no WH_* id, and a
        // native code of 0 would read as ERROR_SUCCESS inside an error.
        let Some(kind_id) = kind.raw_id() else {
            return Err(RegistrationError::new(87));
        };

        // One dispatch slot per WH_* id in this process. A second in-process
        // registration of the same kind would clobber the first one's
        // trampoline, so it is refused instead (ERROR_ALREADY_EXISTS).
        match DISPATCH_SLOTS.entry(kind_id) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(RegistrationError::new(183));
            }
            // Fill the slot before the install call: the OS may deliver an
            // event before SetWindowsHookExW even returns.
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(trampoline);
            }
        }

        match winapi::set_windows_hook_ex_w(kind, proc_for(kind), &module, 0) {
            Ok(handle) => {
                debug!("{kind} hook installed at dispatch slot {kind_id}");
                Ok(handle)
            }
            Err(err) => {
                DISPATCH_SLOTS.remove(&kind_id);
                Err(RegistrationError::new(err.native_code()))
            }
        }
    }

    fn unregister(&self, handle: HookHandle) -> bool {
        let kind_id = handle.kind_id();
        let unhooked = winapi::unhook_windows_hook_ex(handle).is_ok();

        DISPATCH_SLOTS.remove(&kind_id);
        debug!("dispatch slot {kind_id} cleared (unhook ok: {unhooked})");

        unhooked
    }

    fn chain_continue(&self, code: i32, wparam: usize, lparam: isize) -> isize {
        winapi::call_next_hook_ex(code, wparam, lparam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_installable_kind_has_a_proc() {
        for (kind, kind_id) in proc_table() {
            assert!(proc_for(kind).is_some(), "{kind} has no hook proc");
            assert_eq!(kind.raw_id(), Some(kind_id), "{kind} dispatch slot id drifted");
        }

        assert!(proc_for(HookKind::None).is_none());
    }

    #[test]
    fn test_local_failures_never_report_success_codes() {
        assert_ne!(self::winapi::WinapiError::InputNullPtr().native_code(), 0);
        assert_ne!(self::winapi::WinapiError::KindWithoutId().native_code(), 0);

        let err = WindowsHookOs::new()
            .register(
                HookKind::None,
                // A dangling module handle is never dereferenced on this path;
                // the kind check rejects the call first.
                unsafe { HModule::new(1 as *mut std::ffi::c_void) }.unwrap(),
                Arc::new(|_, _, _| 0),
            )
            .unwrap_err();

        assert_eq!(err.code, 87);
    }
}
