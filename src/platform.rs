//! Platform-specific configuration

use crossterm::event::KeyModifiers;

/// Platform-appropriate modifier for the save/quit shortcuts
/// - macOS: SUPER (Cmd key)
/// - Linux/Windows: CONTROL (Ctrl key)
#[cfg(target_os = "macos")]
pub const SHORTCUT_MODIFIER: KeyModifiers = KeyModifiers::SUPER;

#[cfg(not(target_os = "macos"))]
pub const SHORTCUT_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

/// Save draft shortcut display
/// Ctrl+S works on all platforms
pub const SAVE_DRAFT_SHORTCUT: &str = "Ctrl+S";

/// Quit shortcut display
/// - macOS: "Cmd+Q"
/// - Linux/Windows: "Ctrl+Q"
#[cfg(target_os = "macos")]
pub const QUIT_SHORTCUT: &str = "Cmd+Q";

#[cfg(not(target_os = "macos"))]
pub const QUIT_SHORTCUT: &str = "Ctrl+Q";
