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

//! User interface rendering logic.
//!
//! This module translates the [`App`] state into `ratatui` widgets: the
//! working sequence of the live playlist, the player panel, and a footer
//! with key help or the most recent error.

mod icons;
mod player;
mod playlist;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
};

use crate::{
    App,
    render::{player::draw_player, playlist::draw_playlist},
};

const KEY_HELP: &str =
    "space play/pause  s stop  S restart  n/p next/prev  +/- volume  tab nest  bksp resume  q quit";

/// Renders the user interface to the terminal frame.
///
/// Called on every tick of the main loop.
pub(crate) fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(area);

    draw_playlist(f, outer[0], app);
    draw_player(f, outer[1], app);

    let footer = match &app.last_error {
        Some(error) => Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
        None => Paragraph::new(KEY_HELP).style(Style::default().fg(app.theme.border_colour)),
    };
    f.render_widget(footer, outer[2]);
}
