//! WinAPI wrapper
//!
//! Thin wrappers over the user32 hook surface and module handle lookup.

use std::ffi::c_void;
use std::ptr::NonNull;

use thiserror::Error;
use windows::Win32::Foundation::{HINSTANCE, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, SetWindowsHookExW, UnhookWindowsHookEx, HHOOK, HOOKPROC,
};

use crate::hook::kind::HookKind;

#[derive(Debug, Error)]
pub enum WinapiError {
    #[error("Windows core API error: {0}")]
    WindowsCore(#[from] windows::core::Error),

    #[error("Input PTR is NULL")]
    InputNullPtr(),

    #[error("Hook kind has no installable id")]
    KindWithoutId(),
}

impl WinapiError {
    /// Native error code for surfacing through `RegistrationError`.
    /// Locally detected misuse maps to ERROR_INVALID_PARAMETER so the code
    /// never reads as ERROR_SUCCESS on a failure path.
    pub fn native_code(&self) -> i32 {
        match self {
            Self::WindowsCore(err) => err.code().0,
            Self::InputNullPtr() | Self::KindWithoutId() => 87,
        }
    }
}

pub type WinapiResult<T> = std::result::Result<T, WinapiError>;

/// Wrapper for WinAPI HMODULE type.
///
/// # Safety
/// Inner pointer stored in NonNull and read-only.
#[derive(Debug)]
pub struct HModule {
    ptr: NonNull<c_void>,
}

// Safety: inner pointer is non-null and never mutated
unsafe impl Send for HModule {}

// Safety: inner pointer is non-null and never mutated
unsafe impl Sync for HModule {}

impl HModule {
    /// Constructs new `HModule`
    ///
    /// # Safety
    /// - If `ptr` is NULL, error will be returned
    pub unsafe fn new(ptr: *mut c_void) -> WinapiResult<Self> {
        if ptr.is_null() {
            return Err(WinapiError::InputNullPtr());
        }

        Ok(Self {
            ptr: unsafe { NonNull::new_unchecked(ptr) },
        })
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.ptr.as_ptr()
    }
}

/// Owned handle of a live hook registration.
///
/// Move-only on purpose: unregistration consumes it, so a released handle
/// cannot be reused against the OS.
#[derive(Debug)]
pub struct HookHandle {
    ptr: NonNull<c_void>,
    kind_id: i32,
}

// Safety: inner pointer is non-null and never mutated
unsafe impl Send for HookHandle {}

// Safety: inner pointer is non-null and never mutated
unsafe impl Sync for HookHandle {}

impl HookHandle {
    /// Constructs new `HookHandle`
    ///
    /// # Safety
    /// - If `ptr` is NULL, error will be returned
    pub unsafe fn new(ptr: *mut c_void, kind_id: i32) -> WinapiResult<Self> {
        if ptr.is_null() {
            return Err(WinapiError::InputNullPtr());
        }

        Ok(Self {
            ptr: unsafe { NonNull::new_unchecked(ptr) },
            kind_id,
        })
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.ptr.as_ptr()
    }

    /// WH_* id this handle was installed with.
    pub fn kind_id(&self) -> i32 {
        self.kind_id
    }
}

impl From<&HookHandle> for HHOOK {
    fn from(value: &HookHandle) -> Self {
        HHOOK(value.as_ptr())
    }
}

/// WinAPI: GetModuleHandleW(NULL)
/// Returns the handle of the current process's module.
pub fn get_current_module_handle() -> WinapiResult<HModule> {
    let hmodule = unsafe { GetModuleHandleW(None) }?;

    unsafe { HModule::new(hmodule.0) }
}

/// WinAPI: SetWindowsHookExW(...)
/// Installs a hook of the given kind routing events to `hook_proc`.
/// `thread_id` of 0 requests a system-wide hook.
pub fn set_windows_hook_ex_w(
    kind: HookKind,
    hook_proc: HOOKPROC,
    module: &HModule,
    thread_id: u32,
) -> WinapiResult<HookHandle> {
    let kind_id = kind.raw_id().ok_or(WinapiError::KindWithoutId())?;

    let hhook = unsafe {
        SetWindowsHookExW(kind.into(), hook_proc, HINSTANCE(module.as_ptr()), thread_id)
    }?;

    unsafe { HookHandle::new(hhook.0, kind_id) }
}

/// WinAPI: UnhookWindowsHookEx(...)
/// Consumes the handle; the registration is gone either way.
pub fn unhook_windows_hook_ex(handle: HookHandle) -> WinapiResult<()> {
    unsafe { UnhookWindowsHookEx(HHOOK::from(&handle)) }?;

    Ok(())
}

/// WinAPI: CallNextHookEx(...)
/// Passes an event to the next hook in the chain unmodified. The hook
/// handle argument is ignored by the OS on modern Windows, so NULL is passed.
pub fn call_next_hook_ex(code: i32, wparam: usize, lparam: isize) -> isize {
    let result: LRESULT = unsafe { CallNextHookEx(None, code, WPARAM(wparam), LPARAM(lparam)) };

    result.0
}
