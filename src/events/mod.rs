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

//! Keyboard input handling.
//!
//! Translates key presses into [`MusicPlayer`](playdeck::MusicPlayer) calls.
//! Navigation keys are ignored while no playlist is loaded, since the player
//! treats navigating an empty session as a programming error.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use playdeck::MusicStatus;

use crate::App;

const VOLUME_DELTA: f32 = 5.0;
const FINE_VOLUME_DELTA: f32 = 1.0;

/// Maps keyboard input to playback commands.
///
/// * **Application Control**: `q` / `Esc` quit.
/// * **Playback**: `space` play or pause, `s` stop the song, `S` stop the
///   playlist, `n` / `p` next and previous track.
/// * **Volume**: `+` / `-`, with `Alt` for fine steps.
/// * **Nesting**: `Tab` loads the next stored playlist on top of the current
///   one, `Backspace` returns to the one underneath.
///
/// Player errors are reported to the application rather than returned.
pub(crate) fn process_key_event(app: &mut App, key: KeyEvent) {
    app.last_error = None;

    let loaded = app.player.status() != MusicStatus::Empty;

    let result = match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => {
            app.should_quit = true;
            Ok(())
        }

        (KeyCode::Char(' '), _) => match app.player.status() {
            MusicStatus::Playing => app.player.pause(),
            _ => app.player.play(),
        },
        (KeyCode::Char('s'), _) => app.player.stop_song(),
        (KeyCode::Char('S'), _) if loaded => app.player.stop_playlist(),
        (KeyCode::Char('n'), _) | (KeyCode::Right, _) if loaded => app.player.next_song(),
        (KeyCode::Char('p'), _) | (KeyCode::Left, _) if loaded => app.player.previous_song(),

        (KeyCode::Char('+'), KeyModifiers::ALT) | (KeyCode::Char('='), KeyModifiers::ALT) => {
            adjust_volume(app, FINE_VOLUME_DELTA)
        }
        (KeyCode::Char('-'), KeyModifiers::ALT) => adjust_volume(app, -FINE_VOLUME_DELTA),
        (KeyCode::Char('+'), _) | (KeyCode::Char('='), _) => adjust_volume(app, VOLUME_DELTA),
        (KeyCode::Char('-'), _) => adjust_volume(app, -VOLUME_DELTA),

        (KeyCode::Tab, _) => push_next_playlist(app),
        (KeyCode::Backspace, _) => pop_playlist(app),

        _ => Ok(()),
    };

    if let Err(e) = result {
        app.report(e);
    }
}

fn adjust_volume(app: &mut App, delta: f32) -> playdeck::Result<()> {
    let volume = (app.player.volume() + delta).clamp(0.0, 100.0);
    app.player.set_volume(volume)
}

/// Loads the stored playlist after the live one, saving the live one so that
/// it can be resumed, and starts playing it.
fn push_next_playlist(app: &mut App) -> playdeck::Result<()> {
    let Some(name) = next_playlist_name(&app.playlist_names, app.playlist_stack.last()) else {
        return Ok(());
    };

    app.load_playlist(&name, true)?;
    app.player.play()
}

fn pop_playlist(app: &mut App) -> playdeck::Result<()> {
    let result = app.player.pop_current_playlist();

    let live = usize::from(app.player.status() != MusicStatus::Empty);
    app.playlist_stack
        .truncate(app.player.num_saved_playlists() + live);

    result
}

fn next_playlist_name(names: &[String], current: Option<&String>) -> Option<String> {
    let next = current
        .and_then(|current| names.iter().position(|name| name == current))
        .map_or(0, |index| (index + 1) % names.len());

    names.get(next).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        vec!["menu".to_string(), "field".to_string(), "boss".to_string()]
    }

    #[test]
    fn next_playlist_cycles_through_names() {
        let names = names();

        assert_eq!(
            next_playlist_name(&names, Some(&"menu".to_string())).as_deref(),
            Some("field")
        );
        assert_eq!(
            next_playlist_name(&names, Some(&"boss".to_string())).as_deref(),
            Some("menu")
        );
    }

    #[test]
    fn next_playlist_starts_at_first_name() {
        let names = names();

        assert_eq!(next_playlist_name(&names, None).as_deref(), Some("menu"));
        assert_eq!(
            next_playlist_name(&names, Some(&"unknown".to_string())).as_deref(),
            Some("menu")
        );
        assert_eq!(next_playlist_name(&[], None), None);
    }
}
