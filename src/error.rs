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

//! Error types for playlist management and audio playback.
//!
//! Caller misuse (for example navigating with no playlist loaded, or a volume
//! outside `0..=100`) is treated as a bug and panics. Everything that can go
//! wrong because of external data, such as an unknown playlist key or a track
//! file that cannot be opened, is reported through [`Error`].

use std::path::PathBuf;

/// Errors reported by the playlist session manager and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),

    #[error("Playlist has no tracks: {0}")]
    EmptyPlaylist(String),

    /// A track could not be bound to the audio channel.
    #[error("Failed to open track {}: {reason}", path.display())]
    MediaOpen { path: PathBuf, reason: String },

    /// The audio engine rejected a command.
    #[error("Audio engine failure: {0}")]
    Engine(String),

    #[error("Failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to scan music directory")]
    Walk(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
