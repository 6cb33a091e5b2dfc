mod app;
mod clipboard;
mod config;
mod export;
mod github;
mod index;
mod loader;
mod logging;
mod source;
mod theme;
mod ui;
mod watch;

use anyhow::Result;
use app::{App, Focus, InputMode, LoadEvent};
use clap::{Parser, Subcommand};
use config::NbConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use source::Fetcher;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::time::Duration;
use theme::{ThemeController, ThemeStore};
use watch::{FileWatcher, WatchEvent};

/// Terminal browser for chapter-indexed code notes
#[derive(Parser)]
#[command(name = "nb", version, about, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Notes directory or http(s) base URL (defaults to current directory)
    source: Option<String>,

    /// Index document path relative to the source (default: README.md)
    #[arg(long, global = true)]
    index: Option<String>,

    /// Skip the recent-activity request
    #[arg(long, global = true)]
    no_activity: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the parsed table of contents and exit
    Toc {
        /// Notes directory or http(s) base URL
        source: Option<String>,
    },
    /// Write a static single-page HTML snapshot
    Export {
        /// Notes directory or http(s) base URL
        source: Option<String>,

        /// Output HTML file
        #[arg(long, short)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = match logging::init_tracing(logging::default_log_path()) {
        Ok(path) => path,
        Err(err) => {
            eprintln!("warning: logging disabled: {:#}", err);
            None
        }
    };

    let source_arg = match &cli.command {
        Some(Command::Toc { source }) | Some(Command::Export { source, .. }) => source.clone(),
        None => cli.source.clone(),
    }
    .unwrap_or_else(|| ".".to_string());

    let fetcher: Arc<dyn Fetcher> = Arc::from(source::open_source(&source_arg)?);
    let mut config = config::load_config(fetcher.local_root());
    if let Some(index) = cli.index {
        config.source.index = index;
    }
    if cli.no_activity {
        config.activity.enabled = false;
    }
    tracing::info!(source = %fetcher.describe(), index = %config.source.index, "starting");

    match cli.command {
        Some(Command::Toc { .. }) => print_toc(fetcher.as_ref(), &config),
        Some(Command::Export { out, .. }) => run_export(fetcher.as_ref(), &config, &out),
        None => run_tui(fetcher, config, log_path),
    }
}

fn print_toc(fetcher: &dyn Fetcher, config: &NbConfig) -> Result<()> {
    let chapters = app::jobs::load_index(fetcher, &config.source.index)
        .map_err(|e| anyhow::anyhow!("Could not load index: {}", e))?;
    for chapter in &chapters {
        println!("{}", chapter.label());
        for file in &chapter.files {
            println!("    {} -> {}", file.display_name, file.encoded_path);
        }
    }
    Ok(())
}

fn run_export(fetcher: &dyn Fetcher, config: &NbConfig, out: &Path) -> Result<()> {
    let chapters = match app::jobs::load_index(fetcher, &config.source.index) {
        Ok(chapters) => chapters,
        Err(reason) => {
            tracing::error!(error = %reason, "error generating TOC");
            eprintln!("warning: index unavailable ({}), exporting without chapters", reason);
            Vec::new()
        }
    };
    let activity = if config.activity.enabled {
        let outcome = match github::resolve_repo_slug(&config.activity, fetcher.local_root()) {
            Some(slug) => github::fetch_recent_commits(&config.activity, &slug),
            None => github::ActivityOutcome::Failed("no repository configured".to_string()),
        };
        Some(outcome)
    } else {
        None
    };
    let html = export::render_page(config, &chapters, fetcher, activity.as_ref());
    export::write_page(out, &html)?;
    eprintln!("Wrote {} ({} chapters)", out.display(), chapters.len());
    Ok(())
}

fn run_tui(fetcher: Arc<dyn Fetcher>, config: NbConfig, log_path: Option<PathBuf>) -> Result<()> {
    let theme = ThemeController::load(ThemeStore::default_location(), theme::os_preference());
    let repo_slug = if config.activity.enabled {
        github::resolve_repo_slug(&config.activity, fetcher.local_root())
    } else {
        None
    };
    let watch_root = fetcher.local_root().map(Path::to_path_buf);

    let (job_tx, job_rx) = mpsc::channel::<LoadEvent>();
    let mut app = App::new(config, fetcher, theme, job_tx, repo_slug);
    app.start();

    // Load syntax highlighting (once, reused for all files)
    let highlighter = ui::highlight::Highlighter::new();

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let result = run_app(&mut terminal, &mut app, &highlighter, job_rx, watch_root.as_deref());

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %format!("{:#}", err), "event loop failed");
        eprintln!("Error: {:?}", err);
    }
    if let Some(path) = log_path {
        tracing::info!(log = %path.display(), "exiting");
    }

    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    hl: &ui::highlight::Highlighter,
    job_rx: mpsc::Receiver<LoadEvent>,
    watch_root: Option<&Path>,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    // Channel for file watch events (local sources only)
    let (watch_tx, watch_rx) = mpsc::channel::<WatchEvent>();
    let _watcher: Option<FileWatcher> = match watch_root {
        Some(root) => match FileWatcher::new(root, 300, watch_tx) {
            Ok(w) => Some(w),
            Err(e) => {
                tracing::warn!(error = %e, "file watching unavailable");
                None
            }
        },
        None => None,
    };

    loop {
        // Draw
        terminal.draw(|f| ui::draw(f, app, hl))?;

        // Poll for events with a timeout (lets us land background results too)
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.input_mode {
                        InputMode::Search => handle_search_input(app, key),
                        InputMode::Normal => handle_normal_input(app, key),
                    }
                }
            }
        }

        // Land finished fetches (non-blocking)
        while let Ok(event) = job_rx.try_recv() {
            app.apply(event);
        }

        if let Ok(WatchEvent::FilesChanged(paths)) = watch_rx.try_recv() {
            app.files_changed(&paths);
        }

        // Expire notifications and the copy label
        app.tick();

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.search_cancel(),
        KeyCode::Enter => app.search_confirm(),
        KeyCode::Backspace => app.search_pop(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.search_push(c),
        _ => {}
    }
}

fn handle_normal_input(app: &mut App, key: KeyEvent) {
    // ── Global keys ──
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return;
        }
        // Focus search (only reachable outside the search box)
        KeyCode::Char('/') => {
            app.start_search();
            return;
        }
        KeyCode::Char('t') => {
            app.toggle_theme();
            return;
        }
        KeyCode::Char('H') => {
            app.go_home();
            return;
        }
        KeyCode::Char('R') => {
            app.reload_index();
            app.notify("Reloading index");
            return;
        }
        KeyCode::Tab => {
            app.toggle_focus();
            return;
        }
        _ => {}
    }

    match app.focus {
        Focus::Toc => match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.toc_next(),
            KeyCode::Char('k') | KeyCode::Up => app.toc_prev(),
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.open_selected_chapter(),
            KeyCode::Esc => app.go_home(),
            _ => {}
        },
        Focus::Content => match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.file_next(),
            KeyCode::Char('k') | KeyCode::Up => app.file_prev(),
            KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected_file(),
            KeyCode::Char('y') => app.copy_active(),
            KeyCode::Char('r') => app.reload_active(),
            KeyCode::Char('J') => app.scroll_panel(1),
            KeyCode::Char('K') => app.scroll_panel(-1),
            KeyCode::PageDown => app.scroll_panel(10),
            KeyCode::PageUp => app.scroll_panel(-10),
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => app.focus = Focus::Toc,
            _ => {}
        },
    }
}
