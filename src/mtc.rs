//! MIDI timecode quarter-frame messages.
//!
//! A quarter-frame message is the status byte `0xF1` followed by a data byte `0nnndddd`, where
//! `nnn` is the slot (0..7) and `dddd` the nibble. Eight messages carry one timecode: frames,
//! seconds, minutes and hours, each as a low then a high nibble.
use embedded_hal::serial;
use log::{debug, trace};

use crate::consts;
use crate::time::{FrameRate, TimecodeValue};

/// Something the receiver pulled off the wire that the rest of the system has to act on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Message {
    /// Slot 7 arrived and the eight slots were reassembled into a timecode.
    Timecode(TimecodeValue),
    Start,
    Continue,
    Stop,
}

/// Reassembles quarter-frame messages into timecode values.
///
/// Slots keep whatever was last written to them. Only slot 7 triggers a reassembly, and it uses
/// the other seven slots as they stand, even if they came from an earlier transfer.
#[derive(Clone, Debug, Default)]
pub struct QuarterFrameReceiver {
    slots: [u8; consts::QUARTER_FRAME_SLOTS],
    awaiting_data: bool,
}

impl QuarterFrameReceiver {
    pub const fn new() -> Self {
        Self {
            slots: [0; consts::QUARTER_FRAME_SLOTS],
            awaiting_data: false,
        }
    }

    pub fn slots(&self) -> &[u8; consts::QUARTER_FRAME_SLOTS] {
        &self.slots
    }

    /// Feeds one byte from the serial input.
    pub fn receive(&mut self, byte: u8) -> Option<Message> {
        match byte {
            // Realtime bytes can land anywhere, including between a status and its data byte.
            consts::START => Some(Message::Start),
            consts::CONTINUE => Some(Message::Continue),
            consts::STOP => Some(Message::Stop),
            b if b >= consts::REALTIME_MIN => None,
            consts::MTC_QUARTER_FRAME => {
                self.awaiting_data = true;
                None
            }
            b if b >= consts::STATUS_MIN => {
                self.awaiting_data = false;
                None
            }
            data if self.awaiting_data => {
                self.awaiting_data = false;
                self.store(data)
            }
            stray => {
                trace!("ignoring data byte {:#04x} outside a quarter frame", stray);
                None
            }
        }
    }

    fn store(&mut self, data: u8) -> Option<Message> {
        let slot = (data >> consts::SLOT_SHIFT) & consts::SLOT_MASK;
        self.slots[slot as usize] = data & consts::NIBBLE_MASK;
        if slot != consts::LAST_SLOT {
            return None;
        }

        let value = assemble(&self.slots);
        debug!("quarter frames reassembled to {}", value);
        Some(Message::Timecode(value))
    }
}

fn field(low: u8, high: u8, high_mask: u8) -> u8 {
    ((high & high_mask) << 4) | low
}

/// Builds a timecode from the eight slot nibbles.
pub fn assemble(slots: &[u8; consts::QUARTER_FRAME_SLOTS]) -> TimecodeValue {
    let frames = field(slots[0], slots[1], consts::FRAMES_HIGH_MASK);
    let seconds = field(slots[2], slots[3], consts::SECONDS_HIGH_MASK);
    let minutes = field(slots[4], slots[5], consts::MINUTES_HIGH_MASK);
    let hours = field(slots[6], slots[7], consts::HOURS_HIGH_MASK);
    TimecodeValue::from_raw(hours, minutes, seconds, frames)
}

/// Splits a timecode into the eight quarter-frame data bytes, slot 0 first. The rate code rides
/// above the hours bit in slot 7.
pub fn split(value: &TimecodeValue, rate: FrameRate) -> [u8; consts::QUARTER_FRAME_SLOTS] {
    let hours_high = (value.hours() >> 4) | (rate.mtc_rate_code() << consts::RATE_CODE_SHIFT);
    let nibbles = [
        value.frames() & consts::NIBBLE_MASK,
        value.frames() >> 4,
        value.seconds() & consts::NIBBLE_MASK,
        value.seconds() >> 4,
        value.minutes() & consts::NIBBLE_MASK,
        value.minutes() >> 4,
        value.hours() & consts::NIBBLE_MASK,
        hours_high,
    ];

    let mut data = [0u8; consts::QUARTER_FRAME_SLOTS];
    for (slot, (byte, nibble)) in data.iter_mut().zip(nibbles.iter()).enumerate() {
        *byte = ((slot as u8) << consts::SLOT_SHIFT) | (nibble & consts::NIBBLE_MASK);
    }
    data
}

/// Sends timecode as quarter-frame messages on a serial output.
pub struct QuarterFrameTransmitter<W> {
    serial: W,
    rate: FrameRate,
}

impl<W> QuarterFrameTransmitter<W>
where
    W: serial::Write<u8>,
{
    pub fn new(serial: W, rate: FrameRate) -> Self {
        Self { serial, rate }
    }

    /// Writes all eight messages, blocking on each byte until the output takes it. A write
    /// error abandons the rest of the frame.
    pub fn transmit(&mut self, value: &TimecodeValue) -> Result<(), W::Error> {
        for data in split(value, self.rate).iter() {
            nb::block!(self.serial.write(consts::MTC_QUARTER_FRAME))?;
            nb::block!(self.serial.write(*data))?;
        }
        Ok(())
    }

    pub fn release(self) -> W {
        self.serial
    }
}
