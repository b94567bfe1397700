//! Timecode values, frame rates and the counter that rolls them over.
use core::convert::TryFrom;
use core::fmt;

use crate::consts;
use crate::error::Error;

/// The frame rates the generator can run at. Drop-frame rates are not supported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameRate {
    Fps24,
    Fps25,
    Fps30,
}

impl FrameRate {
    pub const fn fps(self) -> u8 {
        match self {
            FrameRate::Fps24 => 24,
            FrameRate::Fps25 => 25,
            FrameRate::Fps30 => 30,
        }
    }

    /// The rate the bit-cell timer has to fire at: one tick per cell, 80 cells per frame.
    pub const fn bit_rate_hz(self) -> u32 {
        self.fps() as u32 * consts::BITS_PER_FRAME as u32
    }

    /// The two bit rate code carried in the hours-high quarter-frame message. 29.97 drop-frame
    /// (code 2) has no counterpart here.
    pub const fn mtc_rate_code(self) -> u8 {
        match self {
            FrameRate::Fps24 => 0,
            FrameRate::Fps25 => 1,
            FrameRate::Fps30 => 3,
        }
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        FrameRate::Fps30
    }
}

impl TryFrom<u8> for FrameRate {
    type Error = Error;

    fn try_from(fps: u8) -> Result<Self, Self::Error> {
        match fps {
            24 => Ok(FrameRate::Fps24),
            25 => Ok(FrameRate::Fps25),
            30 => Ok(FrameRate::Fps30),
            other => Err(Error::UnsupportedFrameRate(other)),
        }
    }
}

/// An hours:minutes:seconds:frames value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimecodeValue {
    hours: u8,
    minutes: u8,
    seconds: u8,
    frames: u8,
}

impl TimecodeValue {
    pub const ZERO: TimecodeValue = TimecodeValue::from_raw(0, 0, 0, 0);

    /// Builds a value, checking every field against the 24 hour clock and the frame rate.
    pub fn new(
        hours: u8,
        minutes: u8,
        seconds: u8,
        frames: u8,
        rate: FrameRate,
    ) -> Result<Self, Error> {
        if hours >= consts::HOURS_PER_DAY {
            return Err(Error::HoursOutOfRange(hours));
        }
        if minutes >= consts::MINUTES_PER_HOUR {
            return Err(Error::MinutesOutOfRange(minutes));
        }
        if seconds >= consts::SECONDS_PER_MINUTE {
            return Err(Error::SecondsOutOfRange(seconds));
        }
        if frames >= rate.fps() {
            return Err(Error::FramesOutOfRange(frames));
        }
        Ok(Self::from_raw(hours, minutes, seconds, frames))
    }

    /// Builds a value without range checks. Callers bound each field by its wire bit width.
    pub(crate) const fn from_raw(hours: u8, minutes: u8, seconds: u8, frames: u8) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            frames,
        }
    }

    pub fn hours(&self) -> u8 {
        self.hours
    }

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    pub fn frames(&self) -> u8 {
        self.frames
    }
}

impl fmt::Display for TimecodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds, self.frames
        )
    }
}

/// The running timecode. Both the bit-cell tick and a completed quarter-frame reassembly write
/// it; callers must not let `increment` and `set_from` interleave.
#[derive(Clone, Copy, Debug)]
pub struct TimecodeCounter {
    value: TimecodeValue,
    rate: FrameRate,
}

impl TimecodeCounter {
    pub const fn new(rate: FrameRate) -> Self {
        Self {
            value: TimecodeValue::ZERO,
            rate,
        }
    }

    pub fn value(&self) -> TimecodeValue {
        self.value
    }

    /// Advances one frame, carrying into seconds, minutes and hours. Hours wrap silently after
    /// 23. Each carry checks against the limit rather than for equality, so a value loaded from
    /// the wire with a field past its limit rolls over on the next step.
    pub fn increment(&mut self) {
        let v = &mut self.value;
        v.frames += 1;
        if v.frames < self.rate.fps() {
            return;
        }
        v.frames = 0;

        v.seconds += 1;
        if v.seconds < consts::SECONDS_PER_MINUTE {
            return;
        }
        v.seconds = 0;

        v.minutes += 1;
        if v.minutes < consts::MINUTES_PER_HOUR {
            return;
        }
        v.minutes = 0;

        v.hours += 1;
        if v.hours >= consts::HOURS_PER_DAY {
            v.hours = 0;
        }
    }

    /// Replaces all four fields at once.
    pub fn set_from(&mut self, value: TimecodeValue) {
        self.value = value;
    }
}
