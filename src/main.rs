//! quiet-hn — the Hacker News front page without the noise.
//!
//! ## Architecture overview
//!
//! ```text
//!                ┌────────────┐  run()   ┌─────────────┐  Payload  ┌───────────┐
//!  source/ ────► │ pipeline   │ ───────► │ collector   │ ────────► │ render.rs │ ──► server.rs (HTTP)
//!  (HN API)      │ (tasks)    │ (append) │ (mutex)     │           └───────────┘
//!                └────────────┘          └─────────────┘  Payload  ┌───────────┐
//!                                                         ───────► │ poll.rs   │ ──► app/ui/input (TUI)
//!                                                                  └───────────┘
//! ```
//!
//! * **`source/`** — the `ItemSource` trait, item types, the story filter and
//!   the Hacker News client.
//! * **`collector`** — bounded, lock-guarded accumulator and rank restoration.
//! * **`pipeline`** — one batch: top ids → concurrent resolution → ordered
//!   payload.
//! * **`render`** — HTML page and RSS channel output.
//! * **`server`** — axum routes that run a batch per request.
//! * **`poll`**, **`app`**, **`ui`**, **`input`** — the `--tui` terminal view.
//! * **`config`** — command-line flags.
//! * **`main`** — wires everything together.

mod app;
mod collector;
mod config;
mod input;
mod pipeline;
mod poll;
mod render;
mod server;
mod source;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::Level;

use app::App;
use config::Args;
use pipeline::Pipeline;
use poll::PollMsg;
use source::HnClient;

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let args = Args::parse();

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    let source = HnClient::new(&args.api_base, args.timeout())?;
    let pipeline = Pipeline::new(Arc::new(source), args.num_stories, args.policy());

    if args.tui {
        // The blocking UI loop owns this thread; batches run on runtime
        // workers.  stdout belongs to the terminal view, so no log subscriber.
        let _enter = runtime.enter();
        return run_tui(pipeline, args.refresh_interval());
    }

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    runtime.block_on(server::serve(args.listen_addr(), pipeline))
}

/// Terminal view event loop.
///
/// Runs at ~10 fps (100 ms tick).  Each iteration:
///   1. Drain any batches from the poller.
///   2. Render the UI.
///   3. Poll for keyboard input (non-blocking, up to tick_rate).
fn run_tui(pipeline: Pipeline, refresh_interval: Duration) -> Result<()> {
    install_panic_hook();

    let mut poller = poll::spawn(pipeline, refresh_interval);
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new();
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Ok(msg) = poller.rx.try_recv() {
            match msg {
                PollMsg::Stories(payload) => app.show_batch(payload),
                PollMsg::Error(e) => app.show_error(e),
            }
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.take_refresh_request() {
            poller.refresh();
        }

        if app.quit {
            break;
        }
    }

    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
