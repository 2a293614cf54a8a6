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

//! Immutable playlists of track files.
//!
//! A [`Playlist`] is an ordered list of audio file paths. It can be built
//! directly from paths, read from an M3U file, or discovered by scanning a
//! directory tree. Once handed to the
//! [`MusicPlayer`](crate::player::MusicPlayer) it is never modified.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// File extensions picked up by [`Playlist::from_dir`].
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "ogg", "oga", "opus", "flac", "wav", "m4a"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    tracks: Vec<PathBuf>,
}

impl Playlist {
    pub fn new<I, P>(tracks: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        tracks.into_iter().collect()
    }

    /// Reads an M3U (or M3U8) playlist file.
    ///
    /// Blank lines and `#` directives are skipped. Relative entries are
    /// resolved against the directory containing the playlist file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read.
    pub fn from_m3u(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));

        let playlist: Playlist = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| {
                let entry = PathBuf::from(line);
                if entry.is_relative() {
                    base.join(entry)
                } else {
                    entry
                }
            })
            .collect();

        debug!(path = %path.display(), tracks = playlist.len(), "read m3u playlist");

        Ok(playlist)
    }

    /// Recursively scans a directory for audio files.
    ///
    /// Tracks are ordered by path so that albums laid out as one directory per
    /// album, with numbered filenames, play in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Walk`] if the directory, or any directory below it,
    /// cannot be read.
    pub fn from_dir(root: &Path) -> Result<Self> {
        let mut tracks = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() && is_audio_file(entry.path()) {
                tracks.push(entry.into_path());
            }
        }

        debug!(root = %root.display(), tracks = tracks.len(), "scanned music directory");

        Ok(Self { tracks })
    }

    pub fn tracks(&self) -> &[PathBuf] {
        &self.tracks
    }

    pub fn track(&self, index: usize) -> Option<&Path> {
        self.tracks.get(index).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for Playlist {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            tracks: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl Extend<PathBuf> for Playlist {
    fn extend<I: IntoIterator<Item = PathBuf>>(&mut self, iter: I) {
        self.tracks.extend(iter);
    }
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            AUDIO_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}
