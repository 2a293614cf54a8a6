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

//! Application configuration.
//!
//! This module manages the configuration file, which names the playlists the
//! player knows about and the playback settings it starts with.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{error::Result, playlist::Playlist};

const CONFIG_NAME: &str = "playdeck";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,
    pub volume: f32,
    pub looped: bool,
    pub shuffle: bool,
    /// Playlist loaded at startup, the first configured playlist if unset.
    pub startup_playlist: Option<String>,
    pub playlists: BTreeMap<String, PlaylistConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            volume: 80.0,
            looped: true,
            shuffle: false,
            startup_playlist: None,
            playlists: BTreeMap::new(),
        }
    }
}

/// Where the tracks of one playlist come from.
///
/// Sources are concatenated in field order: explicit tracks, then the M3U
/// file, then each directory scan.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PlaylistConfig {
    pub tracks: Vec<String>,
    pub m3u: Option<String>,
    pub dirs: Vec<String>,
}

impl PlaylistConfig {
    /// Resolves every source into a single [`Playlist`].
    ///
    /// # Errors
    ///
    /// Returns an error if the M3U file cannot be read or a directory cannot
    /// be scanned.
    pub fn build(&self) -> Result<Playlist> {
        let mut playlist = Playlist::new(&self.tracks);

        if let Some(m3u) = &self.m3u {
            playlist.extend(Playlist::from_m3u(Path::new(m3u))?.tracks().iter().cloned());
        }

        for dir in &self.dirs {
            playlist.extend(Playlist::from_dir(Path::new(dir))?.tracks().iter().cloned());
        }

        Ok(playlist)
    }
}

impl AppConfig {
    /// The configured volume, usable with
    /// [`MusicPlayer::set_volume`](crate::MusicPlayer::set_volume).
    ///
    /// Out-of-range values are clamped and a non-finite value (for example a
    /// hand-edited `volume = nan`) falls back to the default.
    pub fn startup_volume(&self) -> f32 {
        if self.volume.is_finite() {
            self.volume.clamp(0.0, 100.0)
        } else {
            AppConfig::default().volume
        }
    }
}

pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}

pub fn save_config(cfg: &AppConfig) -> std::result::Result<(), confy::ConfyError> {
    confy::store(CONFIG_NAME, None, cfg)
}

pub fn load_config_from(path: &Path) -> AppConfig {
    confy::load_path(path).unwrap_or_default()
}

pub fn save_config_to(path: &Path, cfg: &AppConfig) -> std::result::Result<(), confy::ConfyError> {
    confy::store_path(path, cfg)
}

/// Location of the configuration file, created with defaults on first load.
pub fn config_path() -> std::result::Result<PathBuf, confy::ConfyError> {
    confy::get_configuration_file_path(CONFIG_NAME, None)
}
