// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! # Game Music Player TUI.
//!
//! A terminal front end for the `playdeck` music player, useful for trying
//! out playlists before wiring them into a game.
//!
//! Every playlist named in the configuration file is stored in the player at
//! startup. One of them is loaded and started, and the main loop then polls
//! the keyboard, drives [`MusicPlayer::update`] and redraws the interface on
//! every tick.
//!
//! ## Architecture
//!
//! Everything runs on the main thread: the player is polled cooperatively,
//! exactly as a game loop would poll it. The application follows a strict
//! setup-run-teardown pattern so that the terminal state is restored even
//! when the run loop fails.

mod events;
mod render;
mod theme;
mod util;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use playdeck::{
    MpvChannel, MusicPlayer,
    config::{self, AppConfig},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{io, time::Duration};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::theme::Theme;

const TICK_RATE: Duration = Duration::from_millis(100);

/// Application state.
struct App {
    pub config: AppConfig,
    pub theme: Theme,

    pub player: MusicPlayer<String, MpvChannel>,

    /// Names of the successfully stored playlists, in configuration order.
    pub playlist_names: Vec<String>,
    /// Names of the loaded playlists, the live one last.
    pub playlist_stack: Vec<String>,

    pub last_error: Option<String>,
    pub should_quit: bool,
}

impl App {
    /// Creates the audio channel and stores every configured playlist.
    ///
    /// Playlists that fail to build or turn out to be empty are skipped with
    /// a warning rather than failing startup.
    pub fn new(config: AppConfig) -> Result<Self> {
        let channel = MpvChannel::new().context("Failed to initialise MPV")?;
        let mut player = MusicPlayer::new(channel);

        let mut playlist_names = Vec::new();
        for (name, playlist_config) in &config.playlists {
            match playlist_config.build() {
                Ok(playlist) if playlist.is_empty() => {
                    warn!(playlist = %name, "Skipping playlist with no tracks");
                }
                Ok(playlist) => {
                    player.store_playlist(name.clone(), playlist);
                    playlist_names.push(name.clone());
                }
                Err(e) => warn!(playlist = %name, "Skipping playlist: {}", e),
            }
        }

        player
            .set_volume(config.startup_volume())
            .context("Failed to set initial volume")?;

        Ok(Self {
            config,
            theme: Theme::default(),
            player,
            playlist_names,
            playlist_stack: Vec::new(),
            last_error: None,
            should_quit: false,
        })
    }

    /// Loads a stored playlist using the configured loop and shuffle flags.
    pub fn load_playlist(&mut self, name: &str, save_current: bool) -> playdeck::Result<()> {
        let name = name.to_string();
        let result = self.player.load_playlist(
            &name,
            self.config.looped,
            self.config.shuffle,
            save_current,
        );

        // Only a missing or empty playlist leaves the previous session live
        if !matches!(
            result,
            Err(playdeck::Error::PlaylistNotFound(_) | playdeck::Error::EmptyPlaylist(_))
        ) {
            self.playlist_stack
                .truncate(self.player.num_saved_playlists());
            self.playlist_stack.push(name);
        }

        result
    }

    /// Records a recoverable player error for display.
    pub fn report(&mut self, error: playdeck::Error) {
        warn!("{}", error);
        self.last_error = Some(error.to_string());
    }
}

/// The entry point of the application.
///
/// Loads the configuration, stores the configured playlists, starts the
/// startup playlist, and runs the interface until the user quits.
fn main() -> Result<()> {
    init_tracing();

    let config = config::load_config();

    let mut app = App::new(config).context("Failed to initialise application")?;

    if app.playlist_names.is_empty() {
        let path = config::config_path().context("Failed to locate configuration file")?;
        anyhow::bail!("No playlists configured, add some to {}", path.display());
    }

    let startup = std::env::args()
        .nth(1)
        .or_else(|| app.config.startup_playlist.clone())
        .or_else(|| app.playlist_names.first().cloned())
        .context("No startup playlist")?;

    info!(playlist = %startup, "starting");

    if let Err(e) = app
        .load_playlist(&startup, false)
        .and_then(|_| app.player.play())
    {
        app.report(e);
    }

    let mut terminal = setup_terminal()?;
    let res = run(&mut terminal, &mut app);
    restore_terminal(&mut terminal);

    app.config.volume = app.player.volume();
    if let Err(e) = config::save_config(&app.config) {
        warn!("Failed to save configuration: {}", e);
    }

    res.context("Application error occurred")
}

/// Sends log output to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Prepares the terminal for the TUI application.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This function is "best-effort" and does not return a result, as it is
/// called during cleanup.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
}

/// The main loop: handle input, poll the player, redraw.
///
/// Player errors are recoverable and are shown in the interface; only
/// terminal failures end the loop with an error.
fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while !app.should_quit {
        if event::poll(TICK_RATE).context("Failed to poll terminal events")? {
            if let Event::Key(key) = event::read().context("Failed to read terminal event")? {
                if key.kind == KeyEventKind::Press {
                    events::process_key_event(app, key);
                }
            }
        }

        if let Err(e) = app.player.update() {
            app.report(e);
        }

        terminal
            .draw(|f| render::draw(f, app))
            .context("Failed to draw interface")?;
    }

    Ok(())
}
