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

//! MPV-backed audio channel.
//!
//! [`MpvChannel`] drives a local `libmpv` context synchronously from the
//! caller's thread. The context is configured with no video output and with
//! `keep-open`, so a track that plays through to its end stays bound and can
//! be rewound or seeked rather than being unloaded.
//!
//! Opening a file waits, for a bounded time, until MPV reports the file as
//! loaded or failed. Any other MPV events are drained and discarded whenever
//! the status is polled.

use std::{
    fmt::Debug,
    path::Path,
    time::{Duration, Instant},
};

use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    player::channel::{AudioChannel, PlayerState},
};

const OPEN_TIMEOUT: Duration = Duration::from_secs(5);

/// Seconds to block in a single `wait_event` call while opening a file.
const OPEN_POLL_SECS: f64 = 0.05;

pub struct MpvChannel {
    handler: mpv::MpvHandler,
    /// Set by [`AudioChannel::stop`] and by opening a file, cleared by
    /// [`AudioChannel::play`].
    stopped: bool,
}

impl MpvChannel {
    /// Creates a new MPV context for audio-only playback.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`] if the MPV context cannot be built.
    pub fn new() -> Result<Self> {
        let mut builder = mpv::MpvHandlerBuilder::new().map_err(engine("create MPV builder"))?;
        builder
            .set_option("vo", "null")
            .map_err(engine("set no video output"))?;
        builder
            .set_option("keep-open", "yes")
            .map_err(engine("set keep-open"))?;
        let handler = builder.build().map_err(engine("build MPV handler"))?;

        Ok(Self {
            handler,
            stopped: true,
        })
    }

    fn await_file_loaded(&mut self, path: &Path) -> Result<()> {
        let deadline = Instant::now() + OPEN_TIMEOUT;

        while Instant::now() < deadline {
            match self.handler.wait_event(OPEN_POLL_SECS) {
                Some(mpv::Event::FileLoaded) => return Ok(()),
                Some(mpv::Event::EndFile(Ok(mpv::EndFileReason::MPV_END_FILE_REASON_ERROR))) => {
                    return Err(media_open(path, "MPV could not decode the file"));
                }
                Some(mpv::Event::EndFile(Err(e))) => {
                    return Err(media_open(path, &format!("{:?}", e)));
                }
                Some(mpv::Event::Shutdown) => {
                    return Err(Error::Engine("MPV shut down".to_string()));
                }
                _ => {}
            }
        }

        Err(media_open(path, "timed out waiting for MPV to load the file"))
    }

    fn drain_events(&mut self) {
        while self.handler.wait_event(0.0).is_some() {}
    }

    fn flag(&self, name: &str) -> bool {
        self.handler.get_property::<bool>(name).unwrap_or(false)
    }
}

impl AudioChannel for MpvChannel {
    fn open(&mut self, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(media_open(path, "no such file"));
        }

        let filename = path
            .to_str()
            .ok_or_else(|| media_open(path, "path contains invalid UTF-8"))?;

        self.handler
            .set_property("pause", true)
            .map_err(engine("pause before load"))?;
        self.handler
            .command(&["loadfile", filename, "replace"])
            .map_err(|e| media_open(path, &format!("{:?}", e)))?;
        self.stopped = true;

        self.await_file_loaded(path)?;

        debug!(path = %path.display(), "bound track to MPV");

        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.handler
            .set_property("pause", false)
            .map_err(engine("unpause"))?;
        self.stopped = false;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.handler
            .set_property("pause", true)
            .map_err(engine("pause"))
    }

    fn stop(&mut self) -> Result<()> {
        self.handler
            .set_property("pause", true)
            .map_err(engine("pause"))?;
        self.stopped = true;

        // Nothing to rewind when no file is bound
        if self.flag("idle-active") {
            return Ok(());
        }

        self.handler
            .command(&["seek", "0", "absolute"])
            .map_err(engine("rewind"))
    }

    fn seek(&mut self, offset: Duration) -> Result<()> {
        self.handler
            .command(&["seek", &offset.as_secs_f64().to_string(), "absolute"])
            .map_err(engine("seek"))
    }

    fn elapsed(&self) -> Duration {
        match self.handler.get_property::<f64>("time-pos") {
            Ok(seconds) if seconds.is_finite() && seconds > 0.0 => {
                Duration::from_secs_f64(seconds)
            }
            _ => Duration::ZERO,
        }
    }

    fn status(&mut self) -> PlayerState {
        self.drain_events();

        if self.stopped || self.flag("idle-active") || self.flag("eof-reached") {
            PlayerState::Stopped
        } else if self.flag("pause") {
            PlayerState::Paused
        } else {
            PlayerState::Playing
        }
    }

    fn volume(&self) -> f32 {
        match self.handler.get_property::<f64>("volume") {
            Ok(volume) => volume as f32,
            Err(e) => {
                warn!("Failed to read MPV volume: {:?}", e);
                0.0
            }
        }
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.handler
            .set_property("volume", f64::from(volume))
            .map_err(engine("set volume"))
    }
}

fn engine<E: Debug>(operation: &'static str) -> impl FnOnce(E) -> Error {
    move |e| Error::Engine(format!("Failed to {}: {:?}", operation, e))
}

fn media_open(path: &Path, reason: &str) -> Error {
    Error::MediaOpen {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
