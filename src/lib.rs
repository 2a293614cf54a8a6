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

//! # Game music playback.
//!
//! A playlist-driven music player for games, built around a single streamed
//! audio channel.
//!
//! * [`Playlist`]: an immutable, ordered list of track files.
//! * [`MusicPlayer`]: stores playlists by key, plays one at a time with
//!   loop and shuffle options, and keeps a stack of suspended playlists that
//!   can be resumed exactly where they left off.
//! * [`AudioChannel`]: the audio engine seam, implemented for `libmpv` by
//!   [`MpvChannel`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use playdeck::{MpvChannel, MusicPlayer, Playlist};
//!
//! # fn main() -> playdeck::Result<()> {
//! let mut player = MusicPlayer::new(MpvChannel::new()?);
//! player.store_playlist("overworld", Playlist::new(["field.ogg", "town.ogg"]));
//! player.store_playlist("boss", Playlist::new(["boss.ogg"]));
//!
//! player.load_playlist(&"overworld", true, true, false)?;
//! player.play()?;
//!
//! // Boss fight: remember where the overworld music was
//! player.load_playlist(&"boss", true, false, true)?;
//! player.play()?;
//!
//! // Back to the overworld, paused where it left off
//! player.pop_current_playlist()?;
//! player.play()?;
//!
//! loop {
//!     player.update()?;
//!     // ... rest of the frame
//! #   break;
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod player;
pub mod playlist;

pub use error::{Error, Result};
pub use player::{AudioChannel, MpvChannel, MusicPlayer, MusicStatus, PlayerState};
pub use playlist::Playlist;
