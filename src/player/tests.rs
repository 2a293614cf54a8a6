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

use std::{collections::HashSet, path::PathBuf};

use super::*;

/// Scripted stand-in for an audio engine.
#[derive(Debug)]
struct FakeChannel {
    state: PlayerState,
    bound: Option<PathBuf>,
    elapsed: Duration,
    volume: f32,
    opened: Vec<PathBuf>,
    unopenable: HashSet<PathBuf>,
}

impl FakeChannel {
    fn new() -> Self {
        Self {
            state: PlayerState::Stopped,
            bound: None,
            elapsed: Duration::ZERO,
            volume: 100.0,
            opened: Vec::new(),
            unopenable: HashSet::new(),
        }
    }

    fn unopenable(tracks: &[&str]) -> Self {
        Self {
            unopenable: tracks.iter().map(PathBuf::from).collect(),
            ..Self::new()
        }
    }

    /// Simulates the bound track playing through to its end.
    fn finish_track(&mut self) {
        self.state = PlayerState::Stopped;
        self.elapsed = Duration::ZERO;
    }

    fn advance(&mut self, by: Duration) {
        self.elapsed += by;
    }
}

impl AudioChannel for FakeChannel {
    fn open(&mut self, path: &Path) -> Result<()> {
        if self.unopenable.contains(path) {
            return Err(Error::MediaOpen {
                path: path.to_path_buf(),
                reason: "corrupt".to_string(),
            });
        }

        self.bound = Some(path.to_path_buf());
        self.opened.push(path.to_path_buf());
        self.state = PlayerState::Stopped;
        self.elapsed = Duration::ZERO;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.state = PlayerState::Playing;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.state = PlayerState::Paused;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.state = PlayerState::Stopped;
        self.elapsed = Duration::ZERO;
        Ok(())
    }

    fn seek(&mut self, offset: Duration) -> Result<()> {
        self.elapsed = offset;
        Ok(())
    }

    fn elapsed(&self) -> Duration {
        self.elapsed
    }

    fn status(&mut self) -> PlayerState {
        self.state
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.volume = volume;
        Ok(())
    }
}

fn player_with(playlists: &[(u32, &[&str])]) -> MusicPlayer<u32, FakeChannel> {
    player_on(FakeChannel::new(), playlists)
}

fn player_on(channel: FakeChannel, playlists: &[(u32, &[&str])]) -> MusicPlayer<u32, FakeChannel> {
    let mut player = MusicPlayer::new(channel);
    for (id, tracks) in playlists {
        player.store_playlist(*id, Playlist::new(tracks.iter().copied()));
    }
    player
}

fn sorted(tracks: Vec<&Path>) -> Vec<PathBuf> {
    let mut tracks: Vec<PathBuf> = tracks.into_iter().map(Path::to_path_buf).collect();
    tracks.sort();
    tracks
}

const ABC: &[&str] = &["a", "b", "c"];
const EIGHT: &[&str] = &["1", "2", "3", "4", "5", "6", "7", "8"];
const BOSS: &[&str] = &["boss"];
const NO_TRACKS: &[&str] = &[];

#[test]
fn new_player_is_empty() {
    let mut player = player_with(&[]);

    assert_eq!(player.status(), MusicStatus::Empty);
    assert_eq!(player.num_saved_playlists(), 0);
    assert_eq!(player.current_track(), None);
    assert!(player.working_sequence().is_empty());

    player.play().unwrap();
    player.pause().unwrap();
    player.stop_song().unwrap();
    assert_eq!(player.status(), MusicStatus::Empty);
    assert_eq!(player.channel().state, PlayerState::Stopped);
}

#[test]
fn load_leaves_first_track_bound_and_stopped() {
    let mut player = player_with(&[(1, ABC)]);

    player.load_playlist(&1, false, false, false).unwrap();

    assert_eq!(player.status(), MusicStatus::PlaylistStopped);
    assert_eq!(player.current_position(), Some(0));
    assert_eq!(player.current_track(), Some(Path::new("a")));
    assert_eq!(player.channel().bound, Some(PathBuf::from("a")));
    assert_eq!(player.channel().state, PlayerState::Stopped);
    assert!(!player.is_looped());
    assert!(!player.is_shuffled());
}

#[test]
fn load_unknown_playlist_fails_without_state_change() {
    let mut player = player_with(&[(1, ABC)]);

    let err = player.load_playlist(&7, false, false, false).unwrap_err();

    assert!(matches!(err, Error::PlaylistNotFound(ref id) if id == "7"));
    assert_eq!(player.status(), MusicStatus::Empty);
}

#[test]
fn load_empty_playlist_fails() {
    let mut player = player_with(&[(1, NO_TRACKS)]);

    let err = player.load_playlist(&1, false, false, false).unwrap_err();

    assert!(matches!(err, Error::EmptyPlaylist(_)));
    assert_eq!(player.status(), MusicStatus::Empty);
}

#[test]
fn load_reproduces_stored_tracks() {
    let mut player = player_with(&[(1, EIGHT)]);

    for shuffle in [false, true] {
        player.load_playlist(&1, false, shuffle, false).unwrap();

        assert_eq!(player.is_shuffled(), shuffle);
        assert_eq!(
            sorted(player.working_sequence()),
            sorted(EIGHT.iter().map(Path::new).collect())
        );
    }
}

#[test]
fn unshuffled_load_keeps_stored_order() {
    let mut player = player_with(&[(1, EIGHT)]);

    player.load_playlist(&1, true, false, false).unwrap();

    let expected: Vec<&Path> = EIGHT.iter().map(Path::new).collect();
    assert_eq!(player.working_sequence(), expected);
}

#[test]
fn stop_playlist_reshuffles_without_touching_stored_playlist() {
    let mut player = player_with(&[(1, EIGHT)]);
    let stored = player.stored_playlist(&1).cloned().unwrap();

    player.load_playlist(&1, false, true, false).unwrap();
    let first_order = sorted(player.working_sequence());
    let mut orders = HashSet::new();

    for _ in 0..20 {
        player.stop_playlist().unwrap();

        assert_eq!(player.status(), MusicStatus::PlaylistStopped);
        assert_eq!(player.current_position(), Some(0));
        assert_eq!(sorted(player.working_sequence()), first_order);
        orders.insert(
            player
                .working_sequence()
                .into_iter()
                .map(Path::to_path_buf)
                .collect::<Vec<_>>(),
        );
    }

    assert!(orders.len() > 1, "stop_playlist never reshuffled");
    assert_eq!(player.stored_playlist(&1), Some(&stored));
}

#[test]
fn stop_playlist_rebinds_first_track() {
    let mut player = player_with(&[(1, ABC)]);
    player.load_playlist(&1, false, false, false).unwrap();
    player.play().unwrap();
    player.next_song().unwrap();

    player.stop_playlist().unwrap();

    assert_eq!(player.status(), MusicStatus::PlaylistStopped);
    assert_eq!(player.current_track(), Some(Path::new("a")));
    assert_eq!(player.channel().bound, Some(PathBuf::from("a")));
    assert_eq!(player.channel().state, PlayerState::Stopped);
}

#[test]
fn looped_playlist_wraps_forwards_and_backwards() {
    let mut player = player_with(&[(1, ABC)]);
    player.load_playlist(&1, true, false, false).unwrap();

    for _ in 0..ABC.len() {
        player.next_song().unwrap();
    }
    assert_eq!(player.current_position(), Some(0));

    player.previous_song().unwrap();
    assert_eq!(player.current_position(), Some(2));
    assert_eq!(player.current_track(), Some(Path::new("c")));
    assert_eq!(player.status(), MusicStatus::PlaylistStopped);
}

#[test]
fn unlooped_playlist_clamps_at_both_ends() {
    let mut player = player_with(&[(1, ABC)]);
    player.load_playlist(&1, false, false, false).unwrap();
    player.play().unwrap();

    player.previous_song().unwrap();
    assert_eq!(player.status(), MusicStatus::PlaylistStopped);
    assert_eq!(player.current_position(), Some(0));

    player.play().unwrap();
    player.next_song().unwrap();
    player.next_song().unwrap();
    assert_eq!(player.status(), MusicStatus::Playing);
    assert_eq!(player.current_position(), Some(2));

    player.next_song().unwrap();
    assert_eq!(player.status(), MusicStatus::PlaylistStopped);
    assert_eq!(player.current_position(), Some(2));
    assert_eq!(player.channel().state, PlayerState::Stopped);
}

#[test]
fn navigation_preserves_status() {
    let mut player = player_with(&[(1, ABC)]);
    player.load_playlist(&1, true, false, false).unwrap();

    player.play().unwrap();
    player.next_song().unwrap();
    assert_eq!(player.status(), MusicStatus::Playing);
    assert_eq!(player.channel().bound, Some(PathBuf::from("b")));
    assert_eq!(player.channel().state, PlayerState::Playing);

    player.pause().unwrap();
    player.next_song().unwrap();
    assert_eq!(player.status(), MusicStatus::Paused);
    assert_eq!(player.channel().bound, Some(PathBuf::from("c")));
    assert_eq!(player.channel().state, PlayerState::Stopped);

    player.stop_song().unwrap();
    player.previous_song().unwrap();
    assert_eq!(player.status(), MusicStatus::SongStopped);
    assert_eq!(player.channel().bound, Some(PathBuf::from("b")));
    assert_eq!(player.channel().state, PlayerState::Stopped);
}

#[test]
fn status_transitions() {
    let mut player = player_with(&[(1, ABC)]);
    player.load_playlist(&1, false, false, false).unwrap();

    player.pause().unwrap();
    assert_eq!(player.status(), MusicStatus::PlaylistStopped);

    player.play().unwrap();
    assert_eq!(player.status(), MusicStatus::Playing);

    player.pause().unwrap();
    assert_eq!(player.status(), MusicStatus::Paused);
    assert_eq!(player.channel().state, PlayerState::Paused);

    player.play().unwrap();
    player.channel_mut().advance(Duration::from_secs(30));
    player.stop_song().unwrap();
    assert_eq!(player.status(), MusicStatus::SongStopped);
    assert_eq!(player.channel().elapsed, Duration::ZERO);

    player.pause().unwrap();
    assert_eq!(player.status(), MusicStatus::SongStopped);

    player.stop_playlist().unwrap();
    assert_eq!(player.status(), MusicStatus::PlaylistStopped);
}

#[test]
fn update_plays_through_unlooped_playlist() {
    let mut player = player_with(&[(1, ABC)]);
    player.load_playlist(&1, false, false, false).unwrap();
    player.play().unwrap();

    player.channel_mut().finish_track();
    player.update().unwrap();
    assert_eq!(player.current_track(), Some(Path::new("b")));
    assert_eq!(player.status(), MusicStatus::Playing);
    assert_eq!(player.channel().state, PlayerState::Playing);

    player.channel_mut().finish_track();
    player.update().unwrap();
    assert_eq!(player.current_track(), Some(Path::new("c")));
    assert_eq!(player.status(), MusicStatus::Playing);

    player.channel_mut().finish_track();
    player.update().unwrap();
    assert_eq!(player.status(), MusicStatus::PlaylistStopped);
    assert_eq!(player.current_position(), Some(2));

    player.update().unwrap();
    assert_eq!(player.current_position(), Some(2));

    let opened: Vec<PathBuf> = ABC.iter().map(PathBuf::from).collect();
    assert_eq!(player.channel().opened, opened);
}

#[test]
fn update_wraps_looped_playlist() {
    let mut player = player_with(&[(1, ABC)]);
    player.load_playlist(&1, true, false, false).unwrap();
    player.play().unwrap();
    player.previous_song().unwrap();
    assert_eq!(player.current_position(), Some(2));

    player.channel_mut().finish_track();
    player.update().unwrap();

    assert_eq!(player.current_position(), Some(0));
    assert_eq!(player.status(), MusicStatus::Playing);
    assert_eq!(player.channel().state, PlayerState::Playing);
}

#[test]
fn update_ignores_unfinished_or_idle_tracks() {
    let mut player = player_with(&[(1, ABC)]);
    player.update().unwrap();

    player.load_playlist(&1, false, false, false).unwrap();
    player.update().unwrap();
    assert_eq!(player.current_position(), Some(0));

    player.play().unwrap();
    player.update().unwrap();
    assert_eq!(player.current_position(), Some(0));

    player.pause().unwrap();
    player.channel_mut().finish_track();
    player.update().unwrap();
    assert_eq!(player.current_position(), Some(0));
    assert_eq!(player.status(), MusicStatus::Paused);
}

#[test]
fn save_and_pop_restores_position_and_elapsed_time() {
    let mut player = player_with(&[(1, ABC), (2, BOSS)]);
    player.load_playlist(&1, false, false, false).unwrap();
    player.play().unwrap();
    player.next_song().unwrap();
    player.channel_mut().advance(Duration::from_secs(42));

    player.load_playlist(&2, true, false, true).unwrap();
    assert_eq!(player.num_saved_playlists(), 1);
    assert_eq!(player.current_track(), Some(Path::new("boss")));
    assert!(player.is_looped());

    player.play().unwrap();
    player.pop_current_playlist().unwrap();

    assert_eq!(player.status(), MusicStatus::Paused);
    assert_eq!(player.num_saved_playlists(), 0);
    assert_eq!(player.current_position(), Some(1));
    assert_eq!(player.current_track(), Some(Path::new("b")));
    assert_eq!(player.channel().bound, Some(PathBuf::from("b")));
    assert_eq!(player.channel().elapsed, Duration::from_secs(42));
    assert!(!player.is_looped());

    player.play().unwrap();
    assert_eq!(player.status(), MusicStatus::Playing);
}

#[test]
fn restored_shuffle_keeps_its_order() {
    let mut player = player_with(&[(1, EIGHT), (2, ABC)]);
    player.load_playlist(&1, false, true, false).unwrap();
    let order: Vec<PathBuf> = player
        .working_sequence()
        .into_iter()
        .map(Path::to_path_buf)
        .collect();

    player.load_playlist(&2, false, false, true).unwrap();
    player.pop_current_playlist().unwrap();

    let restored: Vec<PathBuf> = player
        .working_sequence()
        .into_iter()
        .map(Path::to_path_buf)
        .collect();
    assert_eq!(restored, order);
    assert!(player.is_shuffled());
}

#[test]
fn saved_state_depth_tracks_unmatched_saves() {
    let mut player = player_with(&[(1, ABC), (2, ABC), (3, ABC)]);

    // Nothing to save while empty
    player.load_playlist(&1, false, false, true).unwrap();
    assert_eq!(player.num_saved_playlists(), 0);

    player.load_playlist(&2, false, false, true).unwrap();
    player.load_playlist(&3, false, false, true).unwrap();
    assert_eq!(player.num_saved_playlists(), 2);

    // Loading without saving discards the current session
    player.load_playlist(&1, false, false, false).unwrap();
    assert_eq!(player.num_saved_playlists(), 2);

    player.pop_current_playlist().unwrap();
    assert_eq!(player.num_saved_playlists(), 1);
    player.pop_current_playlist().unwrap();
    assert_eq!(player.num_saved_playlists(), 0);
    assert_eq!(player.status(), MusicStatus::Paused);

    player.pop_current_playlist().unwrap();
    assert_eq!(player.status(), MusicStatus::Empty);
    assert_eq!(player.current_track(), None);
}

#[test]
fn popped_playlist_stays_stored() {
    let mut player = player_with(&[(1, ABC)]);
    player.load_playlist(&1, false, false, false).unwrap();

    player.pop_current_playlist().unwrap();
    assert_eq!(player.status(), MusicStatus::Empty);

    player.load_playlist(&1, false, false, false).unwrap();
    assert_eq!(player.status(), MusicStatus::PlaylistStopped);
}

#[test]
fn overwriting_a_stored_playlist_leaves_live_session_alone() {
    let mut player = player_with(&[(1, ABC)]);
    player.load_playlist(&1, false, false, false).unwrap();

    player.store_playlist(1, Playlist::new(["x"]));

    assert_eq!(player.working_sequence().len(), 3);
    player.next_song().unwrap();
    assert_eq!(player.current_track(), Some(Path::new("b")));
    assert_eq!(player.stored_playlist(&1).map(Playlist::len), Some(1));
}

#[test]
fn unopenable_track_stops_the_song_and_can_be_skipped() {
    let mut player = player_on(FakeChannel::unopenable(&["b"]), &[(1, ABC)]);
    player.load_playlist(&1, false, false, false).unwrap();
    player.play().unwrap();

    player.channel_mut().finish_track();
    let err = player.update().unwrap_err();

    assert!(matches!(err, Error::MediaOpen { ref path, .. } if path == Path::new("b")));
    assert_eq!(player.status(), MusicStatus::SongStopped);
    assert_eq!(player.current_position(), Some(1));

    // Still unbound, so update must not keep advancing
    player.update().unwrap();
    assert_eq!(player.current_position(), Some(1));

    assert!(player.play().is_err());
    assert_eq!(player.status(), MusicStatus::SongStopped);

    player.next_song().unwrap();
    assert_eq!(player.current_track(), Some(Path::new("c")));
    player.play().unwrap();
    assert_eq!(player.status(), MusicStatus::Playing);
}

#[test]
fn unopenable_first_track_still_loads() {
    let mut player = player_on(FakeChannel::unopenable(&["a"]), &[(1, ABC)]);

    assert!(player.load_playlist(&1, false, false, false).is_err());
    assert_eq!(player.status(), MusicStatus::PlaylistStopped);

    player.next_song().unwrap();
    player.play().unwrap();
    assert_eq!(player.channel().bound, Some(PathBuf::from("b")));
}

#[test]
fn failed_skip_while_playing_stops_the_channel() {
    let mut player = player_on(FakeChannel::unopenable(&["b"]), &[(1, ABC)]);
    player.load_playlist(&1, false, false, false).unwrap();
    player.play().unwrap();

    let err = player.next_song().unwrap_err();

    assert!(matches!(err, Error::MediaOpen { ref path, .. } if path == Path::new("b")));
    assert_eq!(player.status(), MusicStatus::SongStopped);
    assert_eq!(player.current_position(), Some(1));
    assert_eq!(player.channel().state, PlayerState::Stopped);
}

#[test]
fn failed_previous_song_while_playing_stops_the_channel() {
    let mut player = player_on(FakeChannel::unopenable(&["c"]), &[(1, ABC)]);
    player.load_playlist(&1, true, false, false).unwrap();
    player.play().unwrap();

    let err = player.previous_song().unwrap_err();

    assert!(matches!(err, Error::MediaOpen { ref path, .. } if path == Path::new("c")));
    assert_eq!(player.status(), MusicStatus::SongStopped);
    assert_eq!(player.current_position(), Some(2));
    assert_eq!(player.channel().state, PlayerState::Stopped);

    // Stays put until the caller moves on
    player.update().unwrap();
    assert_eq!(player.current_position(), Some(2));
}

#[test]
fn failed_restore_stops_on_the_saved_track() {
    let mut player = player_with(&[(1, ABC), (2, BOSS)]);
    player.load_playlist(&1, false, false, false).unwrap();
    player.play().unwrap();
    player.next_song().unwrap();
    player.channel_mut().advance(Duration::from_secs(42));

    player.load_playlist(&2, true, false, true).unwrap();
    player.play().unwrap();
    player.channel_mut().unopenable.insert(PathBuf::from("b"));

    let err = player.pop_current_playlist().unwrap_err();

    assert!(matches!(err, Error::MediaOpen { ref path, .. } if path == Path::new("b")));
    assert_eq!(player.status(), MusicStatus::SongStopped);
    assert_eq!(player.current_position(), Some(1));
    assert_eq!(player.current_track(), Some(Path::new("b")));
    assert_eq!(player.num_saved_playlists(), 0);
    assert_eq!(player.channel().state, PlayerState::Stopped);

    player.channel_mut().unopenable.clear();
    player.play().unwrap();
    assert_eq!(player.status(), MusicStatus::Playing);
    assert_eq!(player.channel().bound, Some(PathBuf::from("b")));
}

#[test]
fn volume_passes_through() {
    let mut player = player_with(&[]);

    player.set_volume(35.0).unwrap();
    assert_eq!(player.volume(), 35.0);

    player.set_volume(0.0).unwrap();
    player.set_volume(100.0).unwrap();
    assert_eq!(player.channel().volume, 100.0);
}

#[test]
#[should_panic(expected = "Volume must be between 0-100")]
fn volume_above_range_panics() {
    let mut player = player_with(&[]);
    let _ = player.set_volume(100.5);
}

#[test]
#[should_panic(expected = "Volume must be between 0-100")]
fn negative_volume_panics() {
    let mut player = player_with(&[]);
    let _ = player.set_volume(-1.0);
}

#[test]
#[should_panic(expected = "no playlist loaded")]
fn next_song_without_playlist_panics() {
    let mut player = player_with(&[(1, ABC)]);
    let _ = player.next_song();
}

#[test]
#[should_panic(expected = "no playlist loaded")]
fn previous_song_after_final_pop_panics() {
    let mut player = player_with(&[(1, ABC)]);
    player.load_playlist(&1, false, false, false).unwrap();
    player.pop_current_playlist().unwrap();
    let _ = player.previous_song();
}

#[test]
#[should_panic(expected = "no playlist loaded")]
fn stop_playlist_without_playlist_panics() {
    let mut player = player_with(&[]);
    let _ = player.stop_playlist();
}
