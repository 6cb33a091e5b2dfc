use anyhow::Result;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Instant;

use super::filter;
use super::jobs::{self, LoadEvent};
use crate::clipboard::{self, CopyStatus};
use crate::config::NbConfig;
use crate::github::ActivityOutcome;
use crate::index::{self, ChapterEntry, FileRef};
use crate::loader::{CacheEntry, ContentLoader, FileContent, LoadOutcome};
use crate::source::Fetcher;
use crate::theme::{Theme, ThemeController};

// ── Enums ──

/// What the main pane shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    /// Index into `App::chapters`
    Chapter(usize),
}

/// Which pane receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Toc,
    Content,
}

/// Whether we're navigating or typing in the search box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    Loading,
    Ready,
    /// Fetch failed; the TOC stays empty
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityState {
    Disabled,
    Loading,
    Ready(ActivityOutcome),
}

/// File panel selection: one active panel at most, which may be collapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelState {
    active: Option<usize>,
    open: bool,
}

impl PanelState {
    /// Clicking a panel: collapse the previous active one, toggle this one.
    /// Returns whether `idx` is open afterwards.
    pub fn toggle(&mut self, idx: usize) -> bool {
        if self.active == Some(idx) {
            self.open = !self.open;
        } else {
            self.active = Some(idx);
            self.open = true;
        }
        self.open
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn open_panel(&self) -> Option<usize> {
        if self.open {
            self.active
        } else {
            None
        }
    }

    pub fn is_open(&self, idx: usize) -> bool {
        self.open_panel() == Some(idx)
    }

    pub fn reset(&mut self) {
        *self = PanelState::default();
    }
}

// ── App ──

pub struct App {
    pub config: NbConfig,

    /// Where notes are read from (directory or base URL)
    pub source_label: String,

    /// Parsed table of contents
    pub chapters: Vec<ChapterEntry>,
    pub index_state: IndexState,

    pub view: View,
    pub focus: Focus,

    /// Cursor position within the visible (filtered) TOC
    pub toc_cursor: usize,

    /// Cursor position within the current chapter's file list
    pub file_cursor: usize,

    pub panels: PanelState,

    /// Vertical scroll offset inside the open panel
    pub panel_scroll: u16,

    /// Fetched file contents
    pub loader: ContentLoader,

    pub activity: ActivityState,

    pub input_mode: InputMode,
    pub search_query: String,

    pub theme: ThemeController,

    /// Copy button state for the open panel
    pub copy_status: CopyStatus,

    /// Transient notification text
    pub message: Option<String>,

    /// Ticks since the notification was posted (for auto-clearing)
    pub message_ticks: u8,

    pub should_quit: bool,

    fetcher: Arc<dyn Fetcher>,
    jobs: Sender<LoadEvent>,
    repo_slug: Option<String>,
}

impl App {
    pub fn new(
        config: NbConfig,
        fetcher: Arc<dyn Fetcher>,
        theme: ThemeController,
        jobs: Sender<LoadEvent>,
        repo_slug: Option<String>,
    ) -> Self {
        App {
            source_label: fetcher.describe(),
            config,
            chapters: Vec::new(),
            index_state: IndexState::Loading,
            view: View::Home,
            focus: Focus::Toc,
            toc_cursor: 0,
            file_cursor: 0,
            panels: PanelState::default(),
            panel_scroll: 0,
            loader: ContentLoader::new(),
            activity: ActivityState::Disabled,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            theme,
            copy_status: CopyStatus::Idle,
            message: None,
            message_ticks: 0,
            should_quit: false,
            fetcher,
            jobs,
            repo_slug,
        }
    }

    /// Fire the startup fetches: index and activity feed run side by side.
    pub fn start(&mut self) {
        self.reload_index();
        if self.config.activity.enabled {
            self.activity = ActivityState::Loading;
            jobs::spawn_activity(
                self.config.activity.clone(),
                self.repo_slug.clone(),
                self.jobs.clone(),
            );
        }
    }

    pub fn reload_index(&mut self) {
        self.index_state = IndexState::Loading;
        jobs::spawn_index(
            Arc::clone(&self.fetcher),
            self.config.source.index.clone(),
            self.jobs.clone(),
        );
    }

    /// Land a background result
    pub fn apply(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Index(Ok(chapters)) => {
                tracing::info!(chapters = chapters.len(), "index parsed");
                self.replace_chapters(chapters);
                self.index_state = IndexState::Ready;
            }
            LoadEvent::Index(Err(reason)) => {
                tracing::error!(index = %self.config.source.index, error = %reason, "error generating TOC");
                self.replace_chapters(Vec::new());
                self.index_state = IndexState::Unavailable;
            }
            LoadEvent::Activity(outcome) => {
                self.activity = ActivityState::Ready(outcome);
            }
            LoadEvent::File { key, seq, outcome } => {
                if let LoadOutcome::Failed(err) = &outcome {
                    tracing::debug!(path = err.path(), "load failed");
                }
                if !self.loader.complete(&key, seq, outcome) {
                    tracing::debug!(path = %key, seq, "dropping superseded file result");
                }
            }
        }
    }

    /// Swap in a freshly parsed index. Cached content and panel selection go with the old one;
    /// the open chapter survives if a chapter with the same title still exists.
    fn replace_chapters(&mut self, chapters: Vec<ChapterEntry>) {
        let current_title = self.current_chapter().map(|c| c.title.clone());
        self.chapters = chapters;
        self.loader.clear();
        self.panels.reset();
        self.panel_scroll = 0;
        self.copy_status = CopyStatus::Idle;

        self.view = match current_title {
            Some(title) => match self.chapters.iter().position(|c| c.title == title) {
                Some(i) => View::Chapter(i),
                None => View::Home,
            },
            None => View::Home,
        };
        if self.view == View::Home {
            self.focus = Focus::Toc;
        }
        self.clamp_cursors();
    }

    fn clamp_cursors(&mut self) {
        let toc_len = self.visible_toc().len();
        if self.toc_cursor >= toc_len {
            self.toc_cursor = toc_len.saturating_sub(1);
        }
        let file_len = self.current_chapter().map(|c| c.files.len()).unwrap_or(0);
        if self.file_cursor >= file_len {
            self.file_cursor = file_len.saturating_sub(1);
        }
    }

    // ── TOC ──

    /// Chapter indices that pass the search filter
    pub fn visible_toc(&self) -> Vec<usize> {
        filter::visible_chapters(&self.chapters, &self.search_query)
    }

    pub fn selected_toc_chapter(&self) -> Option<usize> {
        self.visible_toc().get(self.toc_cursor).copied()
    }

    pub fn toc_next(&mut self) {
        let len = self.visible_toc().len();
        if len > 0 && self.toc_cursor + 1 < len {
            self.toc_cursor += 1;
        }
    }

    pub fn toc_prev(&mut self) {
        self.toc_cursor = self.toc_cursor.saturating_sub(1);
    }

    /// Show the chapter under the TOC cursor
    pub fn open_selected_chapter(&mut self) {
        let Some(idx) = self.selected_toc_chapter() else {
            return;
        };
        self.view = View::Chapter(idx);
        self.focus = Focus::Content;
        self.file_cursor = 0;
        self.panels.reset();
        self.panel_scroll = 0;
        self.copy_status = CopyStatus::Idle;
    }

    pub fn current_chapter(&self) -> Option<&ChapterEntry> {
        match self.view {
            View::Chapter(i) => self.chapters.get(i),
            View::Home => None,
        }
    }

    pub fn go_home(&mut self) {
        self.view = View::Home;
        self.focus = Focus::Toc;
        self.panels.reset();
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match (self.focus, self.view) {
            (Focus::Toc, View::Chapter(_)) => Focus::Content,
            _ => Focus::Toc,
        };
    }

    // ── Files & panels ──

    pub fn file_next(&mut self) {
        let len = self.current_chapter().map(|c| c.files.len()).unwrap_or(0);
        if len > 0 && self.file_cursor + 1 < len {
            self.file_cursor += 1;
        }
    }

    pub fn file_prev(&mut self) {
        self.file_cursor = self.file_cursor.saturating_sub(1);
    }

    pub fn toggle_selected_file(&mut self) {
        self.toggle_file(self.file_cursor);
    }

    /// Open or collapse a file panel. Opening an uncached file starts its one fetch.
    pub fn toggle_file(&mut self, idx: usize) {
        let Some(file) = self.current_chapter().and_then(|c| c.files.get(idx)).cloned() else {
            return;
        };
        self.file_cursor = idx;
        let opened = self.panels.toggle(idx);
        self.panel_scroll = 0;
        self.copy_status = CopyStatus::Idle;
        if !opened {
            return;
        }
        if let Some(seq) = self.loader.begin(&file) {
            tracing::debug!(path = %file.encoded_path, seq, "fetching file");
            jobs::spawn_file(Arc::clone(&self.fetcher), file, seq, self.jobs.clone());
        }
    }

    /// File shown in the open panel
    pub fn active_file(&self) -> Option<&FileRef> {
        let idx = self.panels.open_panel()?;
        self.current_chapter()?.files.get(idx)
    }

    pub fn active_entry(&self) -> Option<&CacheEntry> {
        self.loader.get(self.active_file()?)
    }

    pub fn active_content(&self) -> Option<&FileContent> {
        self.loader.content(self.active_file()?)
    }

    /// Drop the open panel's cached result and fetch it once more
    pub fn reload_active(&mut self) {
        let Some(file) = self.active_file().cloned() else {
            self.notify("No file open");
            return;
        };
        self.loader.invalidate(&file.encoded_path);
        if let Some(seq) = self.loader.begin(&file) {
            jobs::spawn_file(Arc::clone(&self.fetcher), file.clone(), seq, self.jobs.clone());
        }
        self.notify(&format!("Reloading {}", file.display_name));
    }

    pub fn scroll_panel(&mut self, delta: i32) {
        let max = self
            .active_content()
            .map(|c| c.raw.lines().count().saturating_sub(1))
            .unwrap_or(0)
            .min(u16::MAX as usize) as u16;
        let next = (self.panel_scroll as i32 + delta).clamp(0, max as i32);
        self.panel_scroll = next as u16;
    }

    // ── Clipboard ──

    /// Copy the open panel's original (unescaped) text
    pub fn copy_active(&mut self) {
        self.copy_active_with(clipboard::copy_to_clipboard, Instant::now());
    }

    pub fn copy_active_with(&mut self, copy: impl FnOnce(&str) -> Result<()>, now: Instant) {
        let Some(content) = self.active_content() else {
            self.notify("Nothing to copy yet");
            return;
        };
        match copy(&content.raw) {
            Ok(()) => {
                self.copy_status = CopyStatus::Copied(now);
            }
            Err(e) => {
                tracing::error!(error = %format!("{:#}", e), "failed to copy text");
                self.copy_status = CopyStatus::Failed(now);
            }
        }
    }

    // ── Search ──

    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
        self.focus = Focus::Toc;
    }

    pub fn search_push(&mut self, c: char) {
        self.search_query.push(c);
        self.toc_cursor = 0;
    }

    pub fn search_pop(&mut self) {
        self.search_query.pop();
        self.toc_cursor = 0;
    }

    /// Esc: leave search and show everything again
    pub fn search_cancel(&mut self) {
        self.search_query.clear();
        self.input_mode = InputMode::Normal;
        self.clamp_cursors();
    }

    /// Enter: keep the filter, go back to navigating
    pub fn search_confirm(&mut self) {
        self.input_mode = InputMode::Normal;
        self.clamp_cursors();
    }

    // ── Theme ──

    pub fn current_theme(&self) -> Theme {
        self.theme.current()
    }

    pub fn toggle_theme(&mut self) {
        match self.theme.toggle() {
            Ok(theme) => self.notify(&format!("Theme: {}", theme.label())),
            Err(e) => {
                tracing::warn!(error = %format!("{:#}", e), "could not save theme preference");
                let label = self.theme.current().label();
                self.notify(&format!("Theme: {} (not saved)", label));
            }
        }
    }

    // ── Watch ──

    /// Local files changed on disk (paths relative to the notes root)
    pub fn files_changed(&mut self, paths: &[String]) {
        let index_key = index::encode_path(&self.config.source.index);
        let keys: Vec<String> = paths.iter().map(|p| index::encode_path(p)).collect();

        if keys.iter().any(|k| *k == index_key) {
            self.reload_index();
            self.notify("Index changed · reloading");
            return;
        }

        let active_key = self.active_file().map(|f| f.encoded_path.clone());
        let mut dropped = 0usize;
        for key in &keys {
            if self.loader.invalidate(key) {
                dropped += 1;
            }
        }
        if dropped == 0 {
            return;
        }
        let active_changed = active_key
            .as_deref()
            .is_some_and(|k| keys.iter().any(|c| c == k));
        if let Some(file) = self.active_file().cloned().filter(|_| active_changed) {
            if let Some(seq) = self.loader.begin(&file) {
                jobs::spawn_file(Arc::clone(&self.fetcher), file, seq, self.jobs.clone());
            }
        }
        self.notify(&format!(
            "{} file{} changed",
            dropped,
            if dropped == 1 { "" } else { "s" }
        ));
    }

    // ── Notifications ──

    pub fn notify(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_ticks = 0;
    }

    /// Called on every event loop iteration: clears stale notifications and copy labels
    pub fn tick(&mut self) {
        if self.message.is_some() {
            self.message_ticks += 1;
            if self.message_ticks > 20 {
                self.message = None;
                self.message_ticks = 0;
            }
        }
        self.copy_status = self.copy_status.settle(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FetchResponse;
    use crate::theme::ThemeStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc::{self, Receiver};
    use std::time::Duration;

    const INDEX: &str = "### [Chapter 1 - Arrays] 📦\n\
                         - [sort.cpp](./arrays/sort.cpp)\n\
                         - [search.cpp](./arrays/search.cpp)\n\
                         ### [Chapter 2 - Control Flow] 🔀\n\
                         - [if.cpp](./Control Flow/if.cpp)\n";

    /// Serves `<path>` bodies from a fixed list; everything else is 404.
    struct FakeFetcher {
        calls: Arc<AtomicUsize>,
        files: Vec<(&'static str, &'static str)>,
    }

    impl Fetcher for FakeFetcher {
        fn fetch(&self, encoded_path: &str) -> anyhow::Result<FetchResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .files
                .iter()
                .find(|(p, _)| *p == encoded_path)
                .map(|(_, body)| FetchResponse::ok(*body))
                .unwrap_or_else(|| FetchResponse::status(404)))
        }
        fn describe(&self) -> String {
            "fake".into()
        }
    }

    struct Harness {
        app: App,
        rx: Receiver<LoadEvent>,
        calls: Arc<AtomicUsize>,
        _dir: tempfile::TempDir,
    }

    impl Harness {
        fn new() -> Self {
            let calls = Arc::new(AtomicUsize::new(0));
            let fetcher = FakeFetcher {
                calls: Arc::clone(&calls),
                files: vec![
                    ("README.md", INDEX),
                    ("arrays/sort.cpp", "#include <algorithm>"),
                    ("arrays/search.cpp", "int find();"),
                ],
            };
            let dir = tempfile::tempdir().unwrap();
            let theme = ThemeController::load(ThemeStore::at(dir.path().join("state.toml")), None);
            let (tx, rx) = mpsc::channel();
            let mut config = NbConfig::default();
            config.activity.enabled = false;
            let app = App::new(config, Arc::new(fetcher), theme, tx, None);
            Harness { app, rx, calls, _dir: dir }
        }

        /// Wait for exactly one background result and apply it
        fn pump(&mut self) {
            let event = self.rx.recv_timeout(Duration::from_secs(5)).expect("job result");
            self.app.apply(event);
        }

        fn assert_idle(&self) {
            assert!(self.rx.recv_timeout(Duration::from_millis(150)).is_err());
        }

        fn fetches(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn started() -> Self {
            let mut h = Harness::new();
            h.app.start();
            h.pump();
            h
        }
    }

    // ── PanelState ──

    #[test]
    fn panel_toggle_same_collapses() {
        let mut p = PanelState::default();
        assert!(p.toggle(0));
        assert!(!p.toggle(0));
        assert_eq!(p.open_panel(), None);
        assert_eq!(p.active(), Some(0));
        assert!(p.toggle(0));
    }

    #[test]
    fn opening_b_collapses_a() {
        let mut p = PanelState::default();
        p.toggle(0);
        assert!(p.toggle(1));
        assert!(!p.is_open(0));
        assert!(p.is_open(1));
        assert_eq!(p.active(), Some(1));
    }

    // ── Startup / index ──

    #[test]
    fn start_loads_index() {
        let h = Harness::started();
        assert_eq!(h.app.index_state, IndexState::Ready);
        assert_eq!(h.app.chapters.len(), 2);
        assert_eq!(h.app.activity, ActivityState::Disabled);
    }

    #[test]
    fn index_failure_leaves_empty_toc_without_message() {
        let mut h = Harness::new();
        h.app.apply(LoadEvent::Index(Err("README.md returned status 404".into())));
        assert_eq!(h.app.index_state, IndexState::Unavailable);
        assert!(h.app.chapters.is_empty());
        assert!(h.app.message.is_none());
    }

    #[test]
    fn reparse_replaces_index_and_keeps_open_chapter() {
        let mut h = Harness::started();
        h.app.toc_cursor = 1;
        h.app.open_selected_chapter();
        h.app.toggle_file(0);
        h.pump();

        let reparsed = crate::index::parse_index(
            "### [Chapter 1 - Control Flow] 🔀\n- [if.cpp](./Control Flow/if.cpp)\n",
        );
        h.app.apply(LoadEvent::Index(Ok(reparsed)));
        assert_eq!(h.app.view, View::Chapter(0));
        assert_eq!(h.app.loader.len(), 0);
        assert_eq!(h.app.panels.open_panel(), None);
    }

    // ── Panels & caching ──

    #[test]
    fn opening_a_then_b_leaves_one_active() {
        let mut h = Harness::started();
        h.app.open_selected_chapter();
        h.app.toggle_file(0);
        h.pump();
        h.app.toggle_file(1);
        h.pump();
        assert_eq!(h.app.panels.open_panel(), Some(1));
        assert!(!h.app.panels.is_open(0));
        assert_eq!(h.app.active_file().unwrap().display_name, "search.cpp");
    }

    #[test]
    fn reopening_cached_panel_does_not_refetch() {
        let mut h = Harness::started();
        h.app.open_selected_chapter();
        let after_index = h.fetches();

        h.app.toggle_file(0);
        h.pump();
        assert_eq!(h.fetches(), after_index + 1);

        h.app.toggle_file(0); // collapse
        h.app.toggle_file(0); // reopen
        h.app.toggle_file(1);
        h.pump();
        h.app.toggle_file(0); // back to A, still cached
        h.assert_idle();
        assert_eq!(h.fetches(), after_index + 2);
        assert_eq!(h.app.active_content().unwrap().raw, "#include <algorithm>");
        assert_eq!(h.app.active_content().unwrap().escaped, "#include &lt;algorithm&gt;");
    }

    #[test]
    fn cache_survives_chapter_switch() {
        let mut h = Harness::started();
        h.app.open_selected_chapter();
        h.app.toggle_file(0);
        h.pump();
        h.app.go_home();
        h.app.open_selected_chapter();
        h.app.toggle_file(0);
        h.assert_idle();
        assert!(h.app.active_content().is_some());
    }

    #[test]
    fn missing_file_shows_status_and_path() {
        let mut h = Harness::started();
        h.app.toc_cursor = 1;
        h.app.open_selected_chapter();
        h.app.toggle_file(0);
        h.pump();
        match h.app.active_entry() {
            Some(CacheEntry::Ready(LoadOutcome::Failed(err))) => {
                let text = err.lines().join("\n");
                assert!(text.contains("404"));
                assert!(text.contains("Control%20Flow/if.cpp"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn result_for_closed_panel_is_still_cached() {
        let mut h = Harness::started();
        h.app.open_selected_chapter();
        h.app.toggle_file(0);
        h.app.toggle_file(0); // closed before the fetch lands
        h.pump();
        let file = h.app.chapters[0].files[0].clone();
        assert!(h.app.loader.content(&file).is_some());
    }

    #[test]
    fn reload_active_fetches_again() {
        let mut h = Harness::started();
        h.app.open_selected_chapter();
        h.app.toggle_file(0);
        h.pump();
        let before = h.fetches();
        h.app.reload_active();
        h.pump();
        assert_eq!(h.fetches(), before + 1);
    }

    #[test]
    fn late_result_from_superseded_fetch_is_ignored() {
        let mut h = Harness::started();
        h.app.open_selected_chapter();
        h.app.toggle_file(0);
        h.app.reload_active(); // first fetch still in flight

        let mut seqs: Vec<u64> = (0..2)
            .map(|_| match h.rx.recv_timeout(Duration::from_secs(5)).expect("job result") {
                LoadEvent::File { seq, .. } => seq,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        seqs.sort();

        let key = h.app.active_file().unwrap().encoded_path.clone();
        let text = |t: &str| LoadOutcome::Loaded(FileContent::new(t.to_string()));
        h.app.apply(LoadEvent::File { key: key.clone(), seq: seqs[1], outcome: text("NEW") });
        h.app.apply(LoadEvent::File { key, seq: seqs[0], outcome: text("OLD") });
        assert_eq!(h.app.active_content().unwrap().raw, "NEW");
    }

    // ── Copy ──

    #[test]
    fn copy_uses_unescaped_text() {
        let mut h = Harness::started();
        h.app.open_selected_chapter();
        h.app.toggle_file(0);
        h.pump();
        let mut copied = String::new();
        let now = Instant::now();
        h.app.copy_active_with(
            |text| {
                copied = text.to_string();
                Ok(())
            },
            now,
        );
        assert_eq!(copied, "#include <algorithm>");
        assert_eq!(h.app.copy_status, CopyStatus::Copied(now));
    }

    #[test]
    fn copy_failure_is_reported_and_retryable() {
        let mut h = Harness::started();
        h.app.open_selected_chapter();
        h.app.toggle_file(0);
        h.pump();
        let now = Instant::now();
        h.app.copy_active_with(|_| anyhow::bail!("no clipboard"), now);
        assert_eq!(h.app.copy_status.label(now), "Failed to copy");
        h.app.copy_active_with(|_| Ok(()), now);
        assert_eq!(h.app.copy_status.label(now), "Copied!");
    }

    #[test]
    fn copy_without_content_notifies() {
        let mut h = Harness::started();
        h.app.copy_active_with(|_| panic!("must not copy"), Instant::now());
        assert_eq!(h.app.message.as_deref(), Some("Nothing to copy yet"));
    }

    // ── Search ──

    #[test]
    fn search_filters_toc_per_keystroke() {
        let mut h = Harness::started();
        h.app.start_search();
        for c in "FLOW".chars() {
            h.app.search_push(c);
        }
        assert_eq!(h.app.visible_toc(), vec![1]);
        h.app.open_selected_chapter();
        assert_eq!(h.app.current_chapter().unwrap().title, "Control Flow");
        h.app.search_cancel();
        assert_eq!(h.app.visible_toc(), vec![0, 1]);
        assert_eq!(h.app.input_mode, InputMode::Normal);
    }

    // ── Theme ──

    #[test]
    fn toggle_theme_notifies() {
        let mut h = Harness::new();
        assert_eq!(h.app.current_theme(), Theme::Light);
        h.app.toggle_theme();
        assert_eq!(h.app.current_theme(), Theme::Dark);
        assert_eq!(h.app.message.as_deref(), Some("Theme: dark"));
    }

    // ── Watch ──

    #[test]
    fn index_change_triggers_reparse() {
        let mut h = Harness::started();
        h.app.files_changed(&["README.md".to_string()]);
        assert_eq!(h.app.index_state, IndexState::Loading);
        h.pump();
        assert_eq!(h.app.index_state, IndexState::Ready);
    }

    #[test]
    fn changed_open_file_is_refetched() {
        let mut h = Harness::started();
        h.app.open_selected_chapter();
        h.app.toggle_file(0);
        h.pump();
        let before = h.fetches();
        h.app.files_changed(&["arrays/sort.cpp".to_string()]);
        h.pump();
        assert_eq!(h.fetches(), before + 1);
    }

    #[test]
    fn unrelated_change_is_ignored() {
        let mut h = Harness::started();
        h.app.files_changed(&["other/thing.txt".to_string()]);
        h.assert_idle();
        assert!(h.app.message.is_none());
    }
}
