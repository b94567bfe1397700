use core::convert::TryFrom;

use crate::error::Error;
use crate::time::FrameRate;

/// Settings fixed when the synchronizer is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub frame_rate: FrameRate,
    /// Send our own timecode as quarter frames after every frame while running.
    pub transmit_quarter_frames: bool,
    /// Let MIDI Start/Continue/Stop bytes on the input drive the transport.
    pub follow_realtime: bool,
}

impl Config {
    pub fn with_fps(fps: u8) -> Result<Self, Error> {
        Ok(Self {
            frame_rate: FrameRate::try_from(fps)?,
            ..Self::default()
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_rate: FrameRate::default(),
            transmit_quarter_frames: true,
            follow_realtime: true,
        }
    }
}
