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

//! Playlist playback control and state management.
//!
//! This module provides [`MusicPlayer`], the high-level interface the game
//! loop uses to control background music. The player keeps a store of named
//! playlists, one live playback session, and a stack of suspended sessions
//! so that a nested playlist (a boss fight, a cut-scene) can be played and
//! the previous music resumed from where it left off afterwards.
//!
//! # Architecture
//!
//! The player never decodes audio itself. It drives a single
//! [`AudioChannel`], binding one track at a time and polling it from
//! [`MusicPlayer::update`] to find out when a track has finished. There are
//! no threads and no callbacks: every state change happens synchronously
//! inside a method call made by the host.
//!
//! The live session references tracks of a stored [`Playlist`] by index, so
//! shuffling only reorders the indices and the stored playlist is never
//! touched.

mod backend;
mod channel;

use std::{collections::BTreeMap, fmt::Debug, path::Path, sync::Arc, time::Duration};

use rand::{rng, seq::SliceRandom};
use tracing::{debug, info, warn};

pub use backend::MpvChannel;
pub use channel::{AudioChannel, PlayerState};

use crate::{
    error::{Error, Result},
    playlist::Playlist,
};

/// Represents the current status of the music player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MusicStatus {
    Playing,
    Paused,
    /// Stopped at the start of the current track.
    SongStopped,
    /// Stopped at the start of the current playlist.
    PlaylistStopped,
    /// No playlist loaded.
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Direction {
    Forward,
    Backward,
}

/// The working set of a playback session.
#[derive(Debug, Clone)]
struct Cursor {
    playlist: Arc<Playlist>,
    /// Play order, as indices into `playlist`.
    order: Vec<usize>,
    position: usize,
    looped: bool,
    shuffle: bool,
}

impl Cursor {
    fn new(playlist: Arc<Playlist>, looped: bool, shuffle: bool) -> Self {
        let mut cursor = Self {
            order: (0..playlist.len()).collect(),
            playlist,
            position: 0,
            looped,
            shuffle,
        };

        if shuffle {
            cursor.shuffle();
        }

        cursor
    }

    fn shuffle(&mut self) {
        let mut rng = rng();
        self.order.shuffle(&mut rng);
    }

    fn current_track(&self) -> Option<&Path> {
        self.order
            .get(self.position)
            .and_then(|&index| self.playlist.track(index))
    }

    /// The position one step away in `direction`, or `None` when stepping
    /// off either end of a playlist that does not loop.
    fn step(&self, direction: Direction) -> Option<usize> {
        let len = self.order.len();
        match direction {
            Direction::Forward if self.position + 1 < len => Some(self.position + 1),
            Direction::Backward if self.position > 0 => Some(self.position - 1),
            Direction::Forward if self.looped => Some(0),
            Direction::Backward if self.looped => Some(len - 1),
            _ => None,
        }
    }
}

/// A suspended session, restored by [`MusicPlayer::pop_current_playlist`].
#[derive(Debug, Clone)]
struct SavedMusicState {
    cursor: Cursor,
    elapsed: Duration,
}

/// Stores playlists and plays them through a single audio channel.
///
/// Playlists are moved into the player with
/// [`store_playlist`](Self::store_playlist) and can then be loaded any number
/// of times by key. [`update`](Self::update) must be called regularly, for
/// example once per frame, so that the next track starts when the current one
/// ends.
///
/// Calling [`next_song`](Self::next_song),
/// [`previous_song`](Self::previous_song) or
/// [`stop_playlist`](Self::stop_playlist) with no playlist loaded, or setting
/// a volume outside `0..=100`, is a programming error and panics.
pub struct MusicPlayer<K, C> {
    channel: C,
    status: MusicStatus,
    stored_playlists: BTreeMap<K, Arc<Playlist>>,
    cursor: Option<Cursor>,
    saved_states: Vec<SavedMusicState>,
    /// Whether the channel currently holds the track under the cursor.
    track_bound: bool,
}

impl<K, C> MusicPlayer<K, C>
where
    K: Ord + Debug,
    C: AudioChannel,
{
    /// Creates an empty player that takes exclusive ownership of `channel`.
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            status: MusicStatus::Empty,
            stored_playlists: BTreeMap::new(),
            cursor: None,
            saved_states: Vec::new(),
            track_bound: false,
        }
    }

    /// Stores a playlist for later use, replacing any playlist already stored
    /// under `id`.
    ///
    /// A session that is already playing the replaced playlist keeps playing
    /// its original tracks.
    pub fn store_playlist(&mut self, id: K, playlist: Playlist) {
        debug!(playlist = ?id, tracks = playlist.len(), "stored playlist");
        self.stored_playlists.insert(id, Arc::new(playlist));
    }

    pub fn stored_playlist(&self, id: &K) -> Option<&Playlist> {
        self.stored_playlists.get(id).map(Arc::as_ref)
    }

    /// Loads a stored playlist, leaving it in
    /// [`MusicStatus::PlaylistStopped`] with its first track bound to the
    /// channel.
    ///
    /// # Arguments
    ///
    /// * `id` - The key the playlist was stored under.
    /// * `looped` - Whether playback wraps around at either end.
    /// * `shuffle` - Whether the play order is shuffled, now and on every
    ///   [`stop_playlist`](Self::stop_playlist).
    /// * `save_current` - Whether the current session, if any, is pushed onto
    ///   the saved-state stack rather than discarded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PlaylistNotFound`] or [`Error::EmptyPlaylist`] without
    /// changing any state, or [`Error::MediaOpen`] if the first track cannot
    /// be opened (the playlist is loaded regardless).
    pub fn load_playlist(
        &mut self,
        id: &K,
        looped: bool,
        shuffle: bool,
        save_current: bool,
    ) -> Result<()> {
        let playlist = self
            .stored_playlists
            .get(id)
            .cloned()
            .ok_or_else(|| Error::PlaylistNotFound(format!("{:?}", id)))?;

        if playlist.is_empty() {
            return Err(Error::EmptyPlaylist(format!("{:?}", id)));
        }

        if self.status != MusicStatus::Empty {
            let elapsed = self.channel.elapsed();
            self.channel.stop()?;

            if let Some(cursor) = self.cursor.take() {
                if save_current {
                    debug!(?elapsed, position = cursor.position, "saved current playlist");
                    self.saved_states.push(SavedMusicState { cursor, elapsed });
                }
            }
        }

        self.cursor = Some(Cursor::new(playlist, looped, shuffle));
        self.status = MusicStatus::PlaylistStopped;

        info!(
            playlist = ?id,
            looped,
            shuffle,
            saved = self.saved_states.len(),
            "loaded playlist"
        );

        self.open_current_song_file()
    }

    /// Starts or resumes playback of the current track.
    ///
    /// Does nothing if no playlist is loaded. If the current track failed to
    /// open earlier, opening it is attempted again first.
    pub fn play(&mut self) -> Result<()> {
        if self.status == MusicStatus::Empty {
            return Ok(());
        }

        if !self.track_bound {
            self.open_current_song_file()?;
        }

        self.channel.play()?;
        self.status = MusicStatus::Playing;

        Ok(())
    }

    /// Pauses playback. Does nothing unless currently playing.
    pub fn pause(&mut self) -> Result<()> {
        if self.status != MusicStatus::Playing {
            return Ok(());
        }

        self.channel.pause()?;
        self.status = MusicStatus::Paused;

        Ok(())
    }

    /// Stops playback and rewinds to the start of the current track.
    pub fn stop_song(&mut self) -> Result<()> {
        if self.status == MusicStatus::Empty {
            return Ok(());
        }

        self.channel.stop()?;
        self.status = MusicStatus::SongStopped;

        Ok(())
    }

    /// Stops playback and returns to the start of the playlist, reshuffling
    /// first if shuffle is on.
    ///
    /// # Panics
    ///
    /// Panics if no playlist is loaded.
    pub fn stop_playlist(&mut self) -> Result<()> {
        self.assert_loaded("stop_playlist");

        self.channel.stop()?;

        if let Some(cursor) = self.cursor.as_mut() {
            if cursor.shuffle {
                cursor.shuffle();
            }
            cursor.position = 0;
        }
        self.status = MusicStatus::PlaylistStopped;

        self.open_current_song_file()
    }

    /// Moves to the next track, keeping the current status.
    ///
    /// If the player is playing, the new track starts immediately. Moving
    /// past the last track of a playlist that does not loop stops the
    /// playlist on the last track instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MediaOpen`] if the new track cannot be opened. The
    /// player then stays on that track in [`MusicStatus::SongStopped`].
    ///
    /// # Panics
    ///
    /// Panics if no playlist is loaded.
    pub fn next_song(&mut self) -> Result<()> {
        self.assert_loaded("next_song");
        let autoplay = self.status == MusicStatus::Playing;
        self.skip(Direction::Forward, autoplay)
    }

    /// Moves to the previous track, keeping the current status.
    ///
    /// The mirror image of [`next_song`](Self::next_song).
    ///
    /// # Panics
    ///
    /// Panics if no playlist is loaded.
    pub fn previous_song(&mut self) -> Result<()> {
        self.assert_loaded("previous_song");
        let autoplay = self.status == MusicStatus::Playing;
        self.skip(Direction::Backward, autoplay)
    }

    /// Checks whether the current track has finished and, if so, plays the
    /// next one.
    ///
    /// Should be called often, for example once per frame. At the end of a
    /// playlist that does not loop the player stops on the last track with
    /// [`MusicStatus::PlaylistStopped`].
    pub fn update(&mut self) -> Result<()> {
        if self.status != MusicStatus::Playing || self.channel.status() != PlayerState::Stopped {
            return Ok(());
        }

        debug!(position = ?self.current_position(), "track finished");

        self.skip(Direction::Forward, true)
    }

    /// Discards the current session and resumes the most recently saved one,
    /// if any.
    ///
    /// The stored playlist itself stays available for loading. A restored
    /// session resumes at the track and offset it was saved at, in
    /// [`MusicStatus::Paused`]. With nothing saved the player becomes
    /// [`MusicStatus::Empty`].
    pub fn pop_current_playlist(&mut self) -> Result<()> {
        if self.status != MusicStatus::Empty {
            self.channel.stop()?;
        }
        self.cursor = None;
        self.track_bound = false;

        let Some(saved) = self.saved_states.pop() else {
            info!("no saved playlist to resume");
            self.status = MusicStatus::Empty;
            return Ok(());
        };

        info!(
            elapsed = ?saved.elapsed,
            position = saved.cursor.position,
            remaining = self.saved_states.len(),
            "resuming saved playlist"
        );

        self.cursor = Some(saved.cursor);
        self.status = MusicStatus::Paused;

        if let Err(e) = self.open_current_song_file() {
            self.status = MusicStatus::SongStopped;
            return Err(e);
        }

        self.channel.seek(saved.elapsed)
    }

    /// Volume in the range `0..=100`.
    pub fn volume(&self) -> f32 {
        self.channel.volume()
    }

    /// # Panics
    ///
    /// Panics if `volume` is outside `0..=100`.
    pub fn set_volume(&mut self, volume: f32) -> Result<()> {
        assert!(
            (0.0..=100.0).contains(&volume),
            "Volume must be between 0-100 in MusicPlayer::set_volume, got {}",
            volume
        );

        self.channel.set_volume(volume)
    }

    pub fn status(&self) -> MusicStatus {
        self.status
    }

    pub fn num_saved_playlists(&self) -> usize {
        self.saved_states.len()
    }

    pub fn current_track(&self) -> Option<&Path> {
        self.cursor.as_ref().and_then(Cursor::current_track)
    }

    pub fn current_position(&self) -> Option<usize> {
        self.cursor.as_ref().map(|cursor| cursor.position)
    }

    /// The tracks of the current session in play order.
    pub fn working_sequence(&self) -> Vec<&Path> {
        self.cursor
            .as_ref()
            .map(|cursor| {
                cursor
                    .order
                    .iter()
                    .filter_map(|&index| cursor.playlist.track(index))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_looped(&self) -> bool {
        self.cursor.as_ref().is_some_and(|cursor| cursor.looped)
    }

    pub fn is_shuffled(&self) -> bool {
        self.cursor.as_ref().is_some_and(|cursor| cursor.shuffle)
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    fn assert_loaded(&self, operation: &str) {
        assert_ne!(
            self.status,
            MusicStatus::Empty,
            "MusicPlayer::{} called with no playlist loaded",
            operation
        );
    }

    fn skip(&mut self, direction: Direction, autoplay: bool) -> Result<()> {
        let Some(position) = self
            .cursor
            .as_ref()
            .and_then(|cursor| cursor.step(direction))
        else {
            debug!(?direction, "reached end of playlist");
            self.channel.stop()?;
            self.status = MusicStatus::PlaylistStopped;
            return Ok(());
        };

        if let Some(cursor) = self.cursor.as_mut() {
            cursor.position = position;
        }

        if let Err(e) = self.open_current_song_file() {
            self.status = MusicStatus::SongStopped;
            return Err(e);
        }

        if autoplay {
            self.channel.play()?;
        }

        Ok(())
    }

    // Binds the channel to the track under the cursor, replacing the previous
    // binding. The channel is left stopped if the track cannot be opened.
    fn open_current_song_file(&mut self) -> Result<()> {
        self.track_bound = false;

        let Some(track) = self.cursor.as_ref().and_then(Cursor::current_track) else {
            return Ok(());
        };

        if let Err(e) = self.channel.open(track) {
            warn!(track = %track.display(), "Failed to open track: {}", e);

            // The previous track may still be bound and playing
            if let Err(stop_err) = self.channel.stop() {
                warn!("Failed to stop channel after open failure: {}", stop_err);
            }

            return Err(e);
        }

        self.track_bound = true;

        Ok(())
    }
}

#[cfg(test)]
mod tests;
