//! Run the plugin host against a terminal "window".
//!
//! Run with: cargo run --example headless_host -- [plugins-dir] [title=id ...]
//!
//! Loads plugins from the given directory (or the configured one), fires
//! the window lifecycle events and prints every badge plugins set.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use launcher_plugins::updates::ItemSettingsForm;
use launcher_plugins::{
    Badge, Config, DialogResponse, HostWindow, Item, MenuEntry, PluginCatalog, PluginHost,
    SettingsWindow, UiHandle, UiQueue,
};

struct TerminalWindow {
    items: Vec<Item>,
    menu: Vec<MenuEntry>,
    handle: UiHandle,
    badges_left: usize,
}

impl HostWindow for TerminalWindow {
    fn items(&self) -> Vec<Item> {
        self.items.clone()
    }

    fn selected_item(&self) -> Option<Item> {
        self.items.first().cloned()
    }

    fn add_menu_entry(&mut self, entry: MenuEntry) {
        self.menu.push(entry);
    }

    fn set_badge(&mut self, title: &str, badge: Badge) -> bool {
        self.badges_left = self.badges_left.saturating_sub(1);
        let tooltip = badge.tooltip().unwrap_or("no badge");
        match &badge {
            Badge::UpdateAvailable { latest } => println!("  {title}: new version {latest} ({tooltip})"),
            other => println!("  {title}: {} ({tooltip})", other.label().unwrap_or("-")),
        }
        self.items.iter().any(|i| i.title == title)
    }

    fn open_url(&mut self, url: &str) {
        println!("  open {url}");
    }

    fn edit_item_settings(&mut self, form: &mut ItemSettingsForm) -> DialogResponse {
        println!("  settings for {}: url={:?} installed={:?}", form.title, form.url, form.installed_version);
        DialogResponse::Cancel
    }

    fn show_error(&mut self, message: &str, detail: &str) {
        eprintln!("  error: {message} ({detail})");
    }

    fn ui_handle(&self) -> UiHandle {
        self.handle.clone()
    }
}

struct TerminalSettings {
    handle: UiHandle,
}

impl SettingsWindow for TerminalSettings {
    fn add_section(&mut self, title: &str, body: &str) {
        println!("  [{title}] {body}");
    }

    fn ui_handle(&self) -> UiHandle {
        self.handle.clone()
    }
}

fn print_menu(entries: &[MenuEntry], window: &dyn HostWindow, depth: usize) {
    for entry in entries {
        let indent = "  ".repeat(depth + 1);
        match entry {
            MenuEntry::Separator => println!("{indent}----"),
            MenuEntry::Action { label, .. } => println!("{indent}{label}"),
            MenuEntry::Submenu { label, build } => {
                println!("{indent}{label} >");
                print_menu(&build(window), window, depth + 1);
            }
        }
    }
}

fn main() {
    let mut config = Config::load();
    launcher_plugins::logging::init(&config.logging);

    let mut args: VecDeque<String> = std::env::args().skip(1).collect();
    if let Some(dir) = args.front().filter(|a| !a.contains('=')).cloned() {
        args.pop_front();
        config.plugins.directory = dir;
    }

    let items: Vec<Item> = if args.is_empty() {
        vec![Item::new("Demo Game", Some("demo-game".to_string()))]
    } else {
        args.iter()
            .map(|arg| match arg.split_once('=') {
                Some((title, id)) => Item::new(title, Some(id.to_string())),
                None => Item::new(arg.as_str(), None),
            })
            .collect()
    };

    let plugins_dir = config.plugins.plugins_dir();
    println!("=== Plugin host ===\n");
    println!("Plugins directory: {}", plugins_dir.display());

    let mut host = PluginHost::start(config, PluginCatalog::builtin());
    println!("Loaded plugins: {:?}\n", host.plugin_ids());

    let queue = UiQueue::new();
    let mut window = TerminalWindow {
        badges_left: items.len(),
        items,
        menu: Vec::new(),
        handle: queue.handle(),
    };
    let mut settings = TerminalSettings {
        handle: queue.handle(),
    };

    host.host_window_built(&mut window);
    host.settings_window_built(&mut settings);

    println!("Context menu:");
    print_menu(&window.menu.clone(), &window, 0);

    if host.registry().is_empty() {
        return;
    }

    println!("\nBadges:");
    let deadline = Instant::now() + Duration::from_secs(30);
    while window.badges_left > 0 && Instant::now() < deadline {
        queue.run_pending(&mut window);
        std::thread::sleep(Duration::from_millis(50));
    }
}
