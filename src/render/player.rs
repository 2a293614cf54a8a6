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

//! Render the player panel.
//!
//! Shows the playback status, the current track and its elapsed time, and a
//! volume gauge.

use playdeck::{AudioChannel, MusicStatus};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};

use crate::{
    App,
    render::icons::{ICON_PAUSE, ICON_PLAY, ICON_PREV, ICON_STOP},
    util::format::{format_time, track_name},
};

/// Renders the player panel including track info and volume.
pub(crate) fn draw_player(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(app.theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner_area);

    let info_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(12)])
        .split(chunks[0]);

    let status = app.player.status();
    let icon = match status {
        MusicStatus::Playing => ICON_PLAY,
        MusicStatus::Paused => ICON_PAUSE,
        MusicStatus::PlaylistStopped => ICON_PREV,
        MusicStatus::SongStopped | MusicStatus::Empty => ICON_STOP,
    };

    let bold = Style::default().add_modifier(Modifier::BOLD);

    let title = match app.player.current_track() {
        Some(track) => track_name(track),
        None => "Nothing loaded".to_string(),
    };

    let track_line = Line::from(vec![
        Span::styled(format!(" {} ", icon), bold).fg(Color::White),
        Span::styled(title, bold).fg(app.theme.accent_colour),
        Span::raw(format!("  {:?}", status)),
    ]);
    f.render_widget(Paragraph::new(track_line), info_chunks[0]);

    if status != MusicStatus::Empty {
        let elapsed = format_time(app.player.channel().elapsed());
        let time = Paragraph::new(Span::styled(elapsed, bold).fg(app.theme.accent_colour))
            .alignment(Alignment::Right);
        f.render_widget(time, info_chunks[1]);
    }

    let volume_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(26)])
        .split(chunks[2]);

    let volume_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(5)])
        .split(volume_layout[1]);

    let volume = app.player.volume().clamp(0.0, 100.0);

    let volume_gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(app.theme.accent_colour)
                .bg(app.theme.gauge_track_colour),
        )
        .ratio(f64::from(volume) / 100.0)
        .label("")
        .use_unicode(true);
    f.render_widget(volume_gauge, volume_chunks[0]);

    let volume_label = Paragraph::new(format!(" {:.0}%", volume))
        .alignment(Alignment::Right)
        .fg(Color::White);
    f.render_widget(volume_label, volume_chunks[1]);
}
