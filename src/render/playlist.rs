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

//! UI rendering logic for the playlist view.
//!
//! Lists the working sequence of the live playlist in play order, with the
//! current track highlighted. The header names the nested playlists, bottom
//! first, and the loop and shuffle flags.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Padding},
};

use crate::{
    App,
    render::icons::{ICON_LOOP, ICON_SHUFFLE},
    util::format::track_name,
};

pub(crate) fn draw_playlist(f: &mut Frame, area: Rect, app: &App) {
    let tracks = app.player.working_sequence();

    let mut header = if app.playlist_stack.is_empty() {
        " No playlist ".to_string()
    } else {
        format!(
            " {} | {} tracks ",
            app.playlist_stack.join(" > "),
            tracks.len()
        )
    };

    if app.player.is_looped() {
        header.push_str(ICON_LOOP);
        header.push(' ');
    }
    if app.player.is_shuffled() {
        header.push_str(ICON_SHUFFLE);
        header.push(' ');
    }

    let block = Block::default()
        .title(header)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_colour))
        .padding(Padding::horizontal(1));

    let items: Vec<ListItem> = tracks
        .iter()
        .enumerate()
        .map(|(index, track)| ListItem::new(format!("{:>3}  {}", index + 1, track_name(track))))
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .fg(app.theme.accent_colour)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default().with_selected(app.player.current_position());

    f.render_stateful_widget(list, area, &mut state);
}
