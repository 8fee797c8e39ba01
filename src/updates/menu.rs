//! Item context-menu entries contributed by the update checker.

use std::rc::Rc;

use super::check::UpdateChecker;
use super::settings::ItemSettingsForm;
use crate::host::{DialogResponse, HostWindow, MenuEntry};

pub const SETTINGS_LABEL: &str = "Settings";
pub const ITEM_PAGE_LABEL: &str = "Item Page";
pub const CHECK_UPDATES_LABEL: &str = "Check Updates";

const SAVE_FAILED: &str = "Failed to save update settings.";

/// Submenu whose children are rebuilt from the selection each time it opens.
pub fn item_submenu(label: &str, checker: UpdateChecker) -> MenuEntry {
    let checker = Rc::new(checker);
    MenuEntry::submenu(label, move |window| children(&checker, window))
}

fn children(checker: &Rc<UpdateChecker>, window: &dyn HostWindow) -> Vec<MenuEntry> {
    let mut entries = vec![action(checker, SETTINGS_LABEL, edit_settings)];

    let configured = window
        .selected_item()
        .is_some_and(|item| checker.is_configured(&item));
    if configured {
        entries.push(action(checker, ITEM_PAGE_LABEL, open_item_page));
        entries.push(action(checker, CHECK_UPDATES_LABEL, check_selected));
    }

    entries
}

fn action(
    checker: &Rc<UpdateChecker>,
    label: &str,
    run: fn(&UpdateChecker, &mut dyn HostWindow),
) -> MenuEntry {
    let checker = checker.clone();
    MenuEntry::action(label, move |window| run(&checker, window))
}

fn edit_settings(checker: &UpdateChecker, window: &mut dyn HostWindow) {
    let Some(item) = window.selected_item() else {
        return;
    };

    let mut form = ItemSettingsForm::open(checker, &item);
    if window.edit_item_settings(&mut form) != DialogResponse::Accept {
        return;
    }

    if let Err(e) = form.save(checker.store()) {
        tracing::warn!(item = %item.title, error = %e, "Failed to save update settings");
        window.show_error(SAVE_FAILED, &e.to_string());
    }
}

fn open_item_page(checker: &UpdateChecker, window: &mut dyn HostWindow) {
    let url = checker.item_page(window.selected_item().as_ref());
    window.open_url(&url);
}

fn check_selected(checker: &UpdateChecker, window: &mut dyn HostWindow) {
    let Some(item) = window.selected_item() else {
        return;
    };

    if let Err(e) = checker.spawn_check(item, window.ui_handle()) {
        tracing::warn!(error = %e, "Failed to start update check");
    }
}
