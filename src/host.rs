//! Interfaces the launcher exposes to plugins.
//!
//! The launcher's windows are external collaborators: plugins only see the
//! selectable item collection, the context-menu extension point, and a few
//! UI services through [`HostWindow`] and [`SettingsWindow`].

use std::fmt;
use std::rc::Rc;

use crate::ui_queue::UiHandle;
use crate::updates::ItemSettingsForm;

/// A library item as shown in the launcher's item grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Display title; also the key plugins persist settings under.
    pub title: String,
    /// Launcher-assigned identifier, when the item has one.
    pub id: Option<String>,
}

impl Item {
    pub fn new(title: impl Into<String>, id: Option<String>) -> Self {
        Self {
            title: title.into(),
            id,
        }
    }
}

/// Status indicator shown next to an item's title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Badge {
    /// No indicator; removes any existing one.
    None,
    /// The installed version matches the latest known version.
    Ready,
    /// A newer version is available.
    UpdateAvailable { latest: String },
}

impl Badge {
    /// Text rendered inside the badge, if any.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Badge::None => None,
            Badge::Ready => Some("Ready"),
            Badge::UpdateAvailable { .. } => Some("New version"),
        }
    }

    /// Tooltip rendered for the badge, if any.
    pub fn tooltip(&self) -> Option<&'static str> {
        match self {
            Badge::None => None,
            Badge::Ready => Some("Game is ready to play"),
            Badge::UpdateAvailable { .. } => Some("A newer version is available"),
        }
    }
}

/// Callback run when a menu entry is activated.
pub type MenuAction = Rc<dyn Fn(&mut dyn HostWindow)>;

/// Builds a submenu's children each time the submenu is opened.
pub type SubmenuBuilder = Rc<dyn Fn(&dyn HostWindow) -> Vec<MenuEntry>>;

/// An entry contributed to the item context menu.
#[derive(Clone)]
pub enum MenuEntry {
    Separator,
    Action { label: String, activate: MenuAction },
    Submenu { label: String, build: SubmenuBuilder },
}

impl MenuEntry {
    pub fn action(label: impl Into<String>, activate: impl Fn(&mut dyn HostWindow) + 'static) -> Self {
        MenuEntry::Action {
            label: label.into(),
            activate: Rc::new(activate),
        }
    }

    pub fn submenu(
        label: impl Into<String>,
        build: impl Fn(&dyn HostWindow) -> Vec<MenuEntry> + 'static,
    ) -> Self {
        MenuEntry::Submenu {
            label: label.into(),
            build: Rc::new(build),
        }
    }

    /// Label shown in the menu; separators have none.
    pub fn label(&self) -> Option<&str> {
        match self {
            MenuEntry::Separator => None,
            MenuEntry::Action { label, .. } | MenuEntry::Submenu { label, .. } => Some(label),
        }
    }
}

impl fmt::Debug for MenuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuEntry::Separator => f.write_str("Separator"),
            MenuEntry::Action { label, .. } => f.debug_struct("Action").field("label", label).finish(),
            MenuEntry::Submenu { label, .. } => {
                f.debug_struct("Submenu").field("label", label).finish()
            }
        }
    }
}

/// How the user closed a modal dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResponse {
    Accept,
    Cancel,
}

/// The launcher's main window, as seen by plugins.
///
/// Every method must be called on the UI thread.
pub trait HostWindow {
    /// All items currently in the library.
    fn items(&self) -> Vec<Item>;

    /// The item currently selected in the item grid.
    fn selected_item(&self) -> Option<Item>;

    /// Append an entry to the item context menu.
    fn add_menu_entry(&mut self, entry: MenuEntry);

    /// Replace the badge of the item titled `title`.
    ///
    /// Returns `false` if no visible item has that title.
    fn set_badge(&mut self, title: &str, badge: Badge) -> bool;

    /// Open a URL in the user's browser.
    fn open_url(&mut self, url: &str);

    /// Show a modal per-item settings dialog editing `form` in place.
    fn edit_item_settings(&mut self, form: &mut ItemSettingsForm) -> DialogResponse;

    /// Show a blocking error dialog.
    fn show_error(&mut self, message: &str, detail: &str);

    /// Handle for posting work back onto the UI thread.
    fn ui_handle(&self) -> UiHandle;
}

/// The launcher's settings window, as seen by plugins.
pub trait SettingsWindow {
    /// Append a titled section with descriptive text.
    fn add_section(&mut self, title: &str, body: &str);

    /// Handle for posting work back onto the UI thread.
    fn ui_handle(&self) -> UiHandle;
}
