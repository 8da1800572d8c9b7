use crate::style::Theme;
use eframe::egui;
use filebrowser::config::Config;
use filebrowser::io::{spawn_worker, DirectoryWatcher, EntryDetails, IoCommand, IoResult};
use filebrowser::state::SortOptions;
use filebrowser::{Entry, Error, IconChoice, IconMap, Listing, NavigationError, Navigator, PARENT_MARKER};
use std::path::Path;
use std::sync::mpsc::{Receiver, Sender};

pub struct FileBrowser {
    // Worker channel
    commands: Sender<IoCommand>,
    results: Receiver<IoResult>,

    // Latest snapshot from the worker
    pub(crate) listing: Option<Listing>,
    pub(crate) selected_index: Option<usize>,
    pub(crate) details: Option<EntryDetails>,

    // Presentation
    pub(crate) icons: IconMap<String>,
    pub(crate) folder_icon: String,
    pub(crate) file_icon: String,
    pub(crate) font_size: f32,
    pub(crate) icon_size: f32,
    pub(crate) sort: SortOptions,

    pub(crate) error_message: Option<String>,
    watcher: Option<DirectoryWatcher>,
}

impl FileBrowser {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config, navigator: Navigator) -> Self {
        Theme::from_config(&config.theme.mode).apply(&cc.egui_ctx);

        let sort = navigator.sort_options();
        let ctx = cc.egui_ctx.clone();
        let (commands, results) = spawn_worker(navigator, move || ctx.request_repaint());

        let icons: IconMap<String> = config.icons.extensions.into_iter().collect();
        tracing::debug!(count = icons.len(), "registered icon keys");

        let mut app = Self {
            commands,
            results,
            listing: None,
            selected_index: None,
            details: None,
            icons,
            folder_icon: config.icons.folder,
            file_icon: config.icons.file,
            font_size: config.font.font_size,
            icon_size: config.font.icon_size,
            sort,
            error_message: None,
            watcher: None,
        };
        app.send(IoCommand::List);
        app
    }

    fn send(&mut self, cmd: IoCommand) {
        if self.commands.send(cmd).is_err() {
            tracing::error!("navigation worker is gone");
            self.error_message = Some("Navigation worker stopped".to_string());
        }
    }

    pub(crate) fn is_at_root(&self) -> bool {
        self.listing.as_ref().map(|l| l.at_root).unwrap_or(true)
    }

    pub(crate) fn selected_entry(&self) -> Option<&Entry> {
        let listing = self.listing.as_ref()?;
        listing.entries.get(self.selected_index?)
    }

    pub(crate) fn icon_for(&self, entry: &Entry) -> &str {
        if entry.is_parent() {
            return "⬆";
        }
        match self.icons.choose(entry) {
            IconChoice::Folder => self.folder_icon.as_str(),
            IconChoice::Mapped(glyph) => glyph.as_str(),
            IconChoice::Fallback => self.file_icon.as_str(),
        }
    }

    fn poll_results(&mut self) {
        while let Ok(result) = self.results.try_recv() {
            match result {
                IoResult::Listed(listing) => self.apply_listing(listing),
                IoResult::FileSelected(path) => self.open_file(&path),
                IoResult::Described(details) => self.apply_details(details),
                // Up is disabled at the root, so this only comes from a stale key press
                IoResult::Failed {
                    error: Error::Navigation(NavigationError::AtRoot),
                    ..
                } => {}
                IoResult::Failed { error, listing } => {
                    // The worker moved to recover; drop the stale snapshot first
                    if let Some(listing) = listing {
                        self.apply_listing(listing);
                    }
                    self.error_message = Some(error.to_string());
                }
            }
        }
    }

    fn apply_listing(&mut self, listing: Listing) {
        let same_dir = self
            .listing
            .as_ref()
            .map(|l| l.path == listing.path)
            .unwrap_or(false);

        self.selected_index = match (listing.entries.len(), same_dir) {
            (0, _) => None,
            (len, true) => Some(self.selected_index.unwrap_or(0).min(len - 1)),
            (_, false) => Some(0),
        };
        if !same_dir {
            self.error_message = None;
        }

        let watching = self.watcher.as_ref().map(|w| w.path() == listing.path).unwrap_or(false);
        if !watching {
            self.rewatch(&listing.path);
        }

        self.listing = Some(listing);
        self.request_details();
    }

    fn apply_details(&mut self, details: EntryDetails) {
        let matches = self
            .selected_entry()
            .map(|e| details.path.file_name().map(|n| n.to_string_lossy() == e.file_name()).unwrap_or(false))
            .unwrap_or(false);
        if matches {
            self.details = Some(details);
        }
    }

    fn rewatch(&mut self, path: &Path) {
        let commands = self.commands.clone();
        self.watcher = match DirectoryWatcher::watch(path, move || {
            let _ = commands.send(IoCommand::List);
        }) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not watch directory");
                None
            }
        };
    }

    fn request_details(&mut self) {
        self.details = None;
        let name = match self.selected_entry() {
            Some(entry) if !entry.is_parent() => entry.name.clone(),
            _ => return,
        };
        self.send(IoCommand::Describe(name));
    }

    fn open_file(&mut self, path: &Path) {
        tracing::info!(path = %path.display(), "opening file");
        if let Err(e) = open::that(path) {
            self.error_message = Some(format!("Could not open file: {}", e));
        }
    }

    pub(crate) fn select(&mut self, index: usize) {
        if self.selected_index != Some(index) {
            self.selected_index = Some(index);
            self.request_details();
        }
    }

    pub(crate) fn activate(&mut self, index: usize) {
        let name = match self.listing.as_ref().and_then(|l| l.entries.get(index)) {
            Some(entry) => entry.name.clone(),
            None => return,
        };
        self.send(IoCommand::Descend(name));
    }

    pub(crate) fn go_up(&mut self) {
        if !self.is_at_root() {
            self.send(IoCommand::Descend(PARENT_MARKER.to_string()));
        }
    }

    pub(crate) fn go_home(&mut self) {
        self.send(IoCommand::Reset);
    }

    pub(crate) fn refresh(&mut self) {
        self.send(IoCommand::List);
    }

    pub(crate) fn cycle_sort(&mut self) {
        self.sort.cycle_sort_by();
        self.send(IoCommand::Sort(self.sort));
    }

    pub(crate) fn toggle_order(&mut self) {
        self.sort.toggle_order();
        self.send(IoCommand::Sort(self.sort));
    }

    fn handle_input(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.key_pressed(egui::Key::Backspace)) {
            self.go_up();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Home)) {
            self.go_home();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::F5)) {
            self.refresh();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::S)) {
            self.cycle_sort();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::O)) {
            self.toggle_order();
        }

        let len = self.listing.as_ref().map(|l| l.entries.len()).unwrap_or(0);
        if len == 0 {
            return;
        }
        let current = self.selected_index.unwrap_or(0);

        if ctx.input(|i| i.key_pressed(egui::Key::ArrowDown)) {
            self.select((current + 1).min(len - 1));
        }
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowUp)) {
            self.select(current.saturating_sub(1));
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
            if let Some(idx) = self.selected_index {
                self.activate(idx);
            }
        }
    }
}

impl eframe::App for FileBrowser {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results();
        self.handle_input(ctx);

        self.render_top_bar(ctx);
        self.render_bottom_bar(ctx);
        self.render_entries(ctx);
    }
}
