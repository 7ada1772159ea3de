//! Hook kind identifiers and the textual lookup helper.

use std::fmt;

/// Category of system events a hook intercepts.
///
/// The numeric values mirror the WH_* hook ids the host OS uses, so the
/// variant set is fixed by the OS contract rather than by this crate.
/// `None` is a parse-fallback sentinel and cannot be installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HookKind {
    #[default]
    None,
    CallWndProc,
    Cbt,
    GetMessage,
    Keyboard,
    Mouse,
    Shell,
    KeyboardLowLevel,
    MouseLowLevel,
}

impl HookKind {
    /// Case-insensitive lookup of a kind by its canonical name.
    /// Unknown names map to the `None` sentinel.
    pub fn parse(text: &str) -> Self {
        match text.to_ascii_lowercase().as_str() {
            "callwndproc" => Self::CallWndProc,
            "cbt" => Self::Cbt,
            "getmessage" => Self::GetMessage,
            "keyboard" => Self::Keyboard,
            "mouse" => Self::Mouse,
            "shell" => Self::Shell,
            "keyboardlowlevel" => Self::KeyboardLowLevel,
            "mouselowlevel" => Self::MouseLowLevel,
            _ => Self::None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::CallWndProc => "CallWndProc",
            Self::Cbt => "Cbt",
            Self::GetMessage => "GetMessage",
            Self::Keyboard => "Keyboard",
            Self::Mouse => "Mouse",
            Self::Shell => "Shell",
            Self::KeyboardLowLevel => "KeyboardLowLevel",
            Self::MouseLowLevel => "MouseLowLevel",
        }
    }

    /// Raw WH_* id for this kind. `None` has no id.
    pub fn raw_id(&self) -> Option<i32> {
        match self {
            Self::None => Option::None,
            Self::CallWndProc => Some(4),
            Self::Cbt => Some(5),
            Self::GetMessage => Some(3),
            Self::Keyboard => Some(2),
            Self::Mouse => Some(7),
            Self::Shell => Some(10),
            Self::KeyboardLowLevel => Some(13),
            Self::MouseLowLevel => Some(14),
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(windows)]
impl From<HookKind> for windows::Win32::UI::WindowsAndMessaging::WINDOWS_HOOK_ID {
    fn from(value: HookKind) -> Self {
        use windows::Win32::UI::WindowsAndMessaging::*;

        match value {
            // Callers must reject the sentinel before reaching the OS; map it
            // to an id SetWindowsHookExW refuses so a slip stays an error.
            HookKind::None => WINDOWS_HOOK_ID(i32::MIN),
            HookKind::CallWndProc => WH_CALLWNDPROC,
            HookKind::Cbt => WH_CBT,
            HookKind::GetMessage => WH_GETMESSAGE,
            HookKind::Keyboard => WH_KEYBOARD,
            HookKind::Mouse => WH_MOUSE,
            HookKind::Shell => WH_SHELL,
            HookKind::KeyboardLowLevel => WH_KEYBOARD_LL,
            HookKind::MouseLowLevel => WH_MOUSE_LL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(HookKind::parse("Keyboard"), HookKind::Keyboard);
        assert_eq!(HookKind::parse("keyboard"), HookKind::Keyboard);
        assert_eq!(HookKind::parse("KEYBOARD"), HookKind::Keyboard);
        assert_eq!(HookKind::parse("mOuSeLoWlEvEl"), HookKind::MouseLowLevel);
    }

    #[test]
    fn test_parse_unknown_yields_sentinel() {
        assert_eq!(HookKind::parse("not-a-kind"), HookKind::None);
        assert_eq!(HookKind::parse(""), HookKind::None);
    }

    #[test]
    fn test_parse_round_trips_canonical_names() {
        for kind in [
            HookKind::CallWndProc,
            HookKind::Cbt,
            HookKind::GetMessage,
            HookKind::Keyboard,
            HookKind::Mouse,
            HookKind::Shell,
            HookKind::KeyboardLowLevel,
            HookKind::MouseLowLevel,
        ] {
            assert_eq!(HookKind::parse(kind.name()), kind);
            assert_eq!(kind.to_string(), kind.name());
        }
    }

    #[test]
    fn test_sentinel_has_no_raw_id() {
        assert_eq!(HookKind::None.raw_id(), None);
        assert_eq!(HookKind::MouseLowLevel.raw_id(), Some(14));
        assert_eq!(HookKind::Keyboard.raw_id(), Some(2));
    }
}
