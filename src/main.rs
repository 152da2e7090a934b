//! uscode: a terminal browser for the 1925 US Code.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uscode::app_state::{AppState, View};
use uscode::config::Config;
use uscode::corpus::{Corpus, DirCorpus};
use uscode::outline::Outline;
use uscode::session::{LoadTicket, Session};
use uscode::title::TitleId;
use uscode::{batch, loader};

#[derive(Parser)]
#[command(name = "uscode")]
#[command(about = "Browse and search the 1925 US Code", long_about = None)]
struct Args {
    /// Directory holding one XML document per title
    #[arg(value_name = "CORPUS_DIR")]
    corpus_dir: Option<PathBuf>,

    /// Title number to open (or restrict batch output to)
    #[arg(long, short = 't', value_name = "N")]
    title: Option<String>,

    /// Print sections matching QUERY as JSON instead of starting the browser
    #[arg(long, short = 's', value_name = "QUERY")]
    search: Option<String>,

    /// Print the outline of --title as JSON instead of starting the browser
    #[arg(long, requires = "title")]
    outline: bool,

    /// Filename pattern of title documents, with {} for the title number
    #[arg(long, value_name = "PATTERN")]
    pattern: Option<String>,
}

type LoadMessage = (LoadTicket, uscode::error::Result<Outline>);
type SharedCorpus = Arc<dyn Corpus + Send + Sync>;

fn main() -> io::Result<()> {
    let args = Args::parse();
    let mut cfg = Config::load();

    // Override config with command line args
    if let Some(dir) = args.corpus_dir {
        cfg.corpus_dir = dir.display().to_string();
    }
    if let Some(pattern) = args.pattern {
        cfg.file_pattern = pattern;
    }

    let interactive = args.search.is_none() && !args.outline;
    init_tracing(&cfg, interactive)?;

    let corpus: SharedCorpus = Arc::new(DirCorpus::new(&cfg.corpus_dir, &cfg.file_pattern));
    let title = args.title.map(TitleId::new);

    if let Some(query) = args.search {
        return print_search(&*corpus, title.as_ref(), &query);
    }
    if args.outline {
        if let Some(title) = title.as_ref() {
            return print_outline(&*corpus, title);
        }
    }

    let titles = corpus.titles().map_err(|err| {
        io::Error::new(
            err.kind(),
            format!("cannot list corpus directory {}: {err}", cfg.corpus_dir),
        )
    })?;
    if titles.is_empty() {
        eprintln!("No title documents found in {}", cfg.corpus_dir);
        return Ok(());
    }

    let mut state = AppState::new(titles, Session::new(cfg.cache_outlines), cfg.wrap_width);
    let (tx, rx) = mpsc::channel();

    // Open the requested title directly
    if let Some(title) = title {
        if let Some(position) = state.titles.iter().position(|t| t.id == title) {
            state.current_title_index = position;
            if let Some(ticket) = state.select_title() {
                spawn_load(&corpus, ticket, &tx);
            }
        } else {
            state.message = Some(format!("{title} is not in the corpus"));
        }
    }

    run_tui(state, &corpus, &tx, &rx)
}

/// Route tracing to stderr in batch mode, or to the configured log file in the browser.
fn init_tracing(cfg: &Config, interactive: bool) -> io::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_filter));

    if !interactive {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    } else if let Some(path) = cfg.log_file() {
        let file = File::create(path)?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    }
    Ok(())
}

fn print_search(corpus: &dyn Corpus, title: Option<&TitleId>, query: &str) -> io::Result<()> {
    let batch = batch::search_corpus(corpus, title, query)?;
    for err in &batch.failures {
        eprintln!("Error: {err}");
    }

    let json = serde_json::to_string_pretty(&batch.hits).map_err(io::Error::other)?;
    println!("{json}");

    if batch.is_total_failure() {
        return Err(io::Error::other("no title could be loaded"));
    }
    Ok(())
}

fn print_outline(corpus: &dyn Corpus, title: &TitleId) -> io::Result<()> {
    let outline = loader::load_title(corpus, title).map_err(io::Error::other)?;
    let json = serde_json::to_string_pretty(&outline).map_err(io::Error::other)?;
    println!("{json}");
    Ok(())
}

/// Load a title off the UI thread; the session decides whether the result still applies.
fn spawn_load(corpus: &SharedCorpus, ticket: LoadTicket, tx: &mpsc::Sender<LoadMessage>) {
    let corpus = Arc::clone(corpus);
    let tx = tx.clone();
    thread::spawn(move || {
        let result = loader::load_title(&*corpus, &ticket.title);
        // The receiver is gone only once the browser has quit.
        let _ = tx.send((ticket, result));
    });
}

fn run_tui(
    mut app: AppState,
    corpus: &SharedCorpus,
    tx: &mpsc::Sender<LoadMessage>,
    rx: &mpsc::Receiver<LoadMessage>,
) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, corpus, tx, rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

#[allow(clippy::too_many_lines)]
fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    corpus: &SharedCorpus,
    tx: &mpsc::Sender<LoadMessage>,
    rx: &mpsc::Receiver<LoadMessage>,
) -> io::Result<()> {
    loop {
        while let Ok((ticket, result)) = rx.try_recv() {
            app.apply_load(&ticket, result);
        }

        terminal.draw(|f| uscode::ui::draw(f, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.current_view {
            View::TitleList => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Up | KeyCode::Char('k') => app.prev_title(),
                KeyCode::Down | KeyCode::Char('j') => app.next_title(),
                KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
                    if let Some(ticket) = app.select_title() {
                        spawn_load(corpus, ticket, tx);
                    }
                }
                _ => {}
            },
            View::Outline => match key.code {
                KeyCode::Char('q') | KeyCode::Left | KeyCode::Char('h') => app.close_title(),
                KeyCode::Esc => {
                    app.clear_search();
                    app.message = None;
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.go_to_section(app.navigate_to_prev_chapter());
                    } else {
                        app.go_to_section(app.find_prev_section());
                    }
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.go_to_section(app.navigate_to_next_chapter());
                    } else {
                        app.go_to_section(app.find_next_section());
                    }
                }
                KeyCode::PageUp => app.go_to_section(app.navigate_to_prev_chapter()),
                KeyCode::PageDown => app.go_to_section(app.navigate_to_next_chapter()),
                KeyCode::Home => app.go_to_section(app.navigate_to_first()),
                KeyCode::End => app.go_to_section(app.navigate_to_last()),
                KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.enter_detail_view(),
                KeyCode::Char('/') => app.start_search(),
                KeyCode::Char('n') => app.go_to_section(app.find_next_hit()),
                KeyCode::Char('N') => app.go_to_section(app.find_prev_hit()),
                _ => {}
            },
            View::Detail => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => app.exit_detail_view(),
                KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
                KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
                KeyCode::Left | KeyCode::Char('h') => app.go_to_section(app.find_prev_section()),
                KeyCode::Right | KeyCode::Char('l') => app.go_to_section(app.find_next_section()),
                KeyCode::Char('/') => app.start_search(),
                KeyCode::Char('n') => app.go_to_section(app.find_next_hit()),
                KeyCode::Char('N') => app.go_to_section(app.find_prev_hit()),
                _ => {}
            },
            View::Search => match key.code {
                KeyCode::Char(c) => app.search_buffer.push(c),
                KeyCode::Backspace => {
                    app.search_buffer.pop();
                }
                KeyCode::Enter => app.submit_search(),
                KeyCode::Esc => app.cancel_search(),
                _ => {}
            },
        }
    }
}
