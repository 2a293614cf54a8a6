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

//! The streamed-audio channel consumed by the music player.

use std::{path::Path, time::Duration};

use crate::error::Result;

/// Represents the current playback status of the audio engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    Playing,
    Paused,
    /// Nothing is playing: either [`AudioChannel::stop`] was called, nothing
    /// is bound, or the bound track played through to its end.
    Stopped,
}

/// A single streamed-audio output that plays one track at a time.
///
/// Binding a new track with [`open`](AudioChannel::open) replaces whatever was
/// bound before, so at most one stream is ever open.
pub trait AudioChannel {
    /// Binds the channel to the file at `path`, leaving it at rest at the
    /// start of the track.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MediaOpen`](crate::Error::MediaOpen) if the file is
    /// missing or cannot be decoded.
    fn open(&mut self, path: &Path) -> Result<()>;

    fn play(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    /// Stops playback and rewinds to the start of the bound track.
    fn stop(&mut self) -> Result<()>;

    /// Moves the playback position to `offset` from the start of the track.
    fn seek(&mut self, offset: Duration) -> Result<()>;

    fn elapsed(&self) -> Duration;

    fn status(&mut self) -> PlayerState;

    /// Volume in the range `0..=100`.
    fn volume(&self) -> f32;

    fn set_volume(&mut self, volume: f32) -> Result<()>;
}
