//! The LTC line encoder.
//!
//! Every bit-cell tick emits one level for the whole cell: `High` for a one bit, `Low` for a zero
//! bit. This is a duty-cycle level code, not biphase-mark; receivers on the other end of the
//! line decode it with the same field layout as [`bit_at`]. The last cell of every frame is held
//! at `Ground` and is where the counter steps to the next frame.
use embedded_hal::PwmPin;

use crate::consts;
use crate::time::{TimecodeCounter, TimecodeValue};

/// The three levels the line output can sit at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineLevel {
    Ground,
    Low,
    High,
}

impl LineLevel {
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            LineLevel::High
        } else {
            LineLevel::Low
        }
    }

    /// PWM duty for this level given the channel's maximum duty.
    pub fn duty(self, max_duty: u16) -> u16 {
        let quarters = match self {
            LineLevel::Ground => 0,
            LineLevel::Low => consts::LOW_DUTY_QUARTERS,
            LineLevel::High => consts::HIGH_DUTY_QUARTERS,
        };
        (u32::from(max_duty) * u32::from(quarters) / 4) as u16
    }
}

/// Returns the bit carried by cell `slot` of the frame for `value`.
///
/// Frames occupy cells 0..32 but only cycle through their low four bits, so each of those is
/// sent eight times and bit 4 of the frame number never reaches the line. Seconds and minutes
/// get eight cells each, hours the remaining 32 cells repeating an eight bit window.
pub fn bit_at(value: &TimecodeValue, slot: u8) -> bool {
    let bit = if slot < consts::SECONDS_START {
        value.frames() >> ((slot - consts::FRAMES_START) % consts::FRAMES_WINDOW)
    } else if slot < consts::MINUTES_START {
        value.seconds() >> (slot - consts::SECONDS_START)
    } else if slot < consts::HOURS_START {
        value.minutes() >> (slot - consts::MINUTES_START)
    } else {
        value.hours() >> ((slot - consts::HOURS_START) % consts::HOURS_WINDOW)
    };
    bit & 1 == 1
}

fn read_field(levels: &[LineLevel], start: u8, width: u8) -> Option<u8> {
    let mut field = 0u8;
    for i in 0..width {
        match levels[(start + i) as usize] {
            LineLevel::High => field |= 1 << i,
            LineLevel::Low => {}
            LineLevel::Ground => return None,
        }
    }
    Some(field)
}

/// Recovers a timecode from one frame's worth of line levels, starting at cell 0. Returns `None`
/// if fewer than a frame of levels is given or a data cell reads as ground.
pub fn decode(levels: &[LineLevel]) -> Option<TimecodeValue> {
    if levels.len() < consts::BITS_PER_FRAME as usize {
        return None;
    }
    let frames = read_field(levels, consts::FRAMES_START, consts::FRAMES_WINDOW)?;
    let seconds = read_field(
        levels,
        consts::SECONDS_START,
        consts::MINUTES_START - consts::SECONDS_START,
    )?;
    let minutes = read_field(
        levels,
        consts::MINUTES_START,
        consts::HOURS_START - consts::MINUTES_START,
    )?;
    let hours = read_field(levels, consts::HOURS_START, consts::HOURS_WINDOW)?;
    Some(TimecodeValue::from_raw(hours, minutes, seconds, frames))
}

/// What one bit-cell tick produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub level: LineLevel,
    pub frame_complete: bool,
}

/// Walks the bit cursor through the 80 cells of a frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct LineLevelEncoder {
    cursor: u8,
}

impl LineLevelEncoder {
    pub const fn new() -> Self {
        Self { cursor: 0 }
    }

    /// The cell the next tick will emit. Always below `BITS_PER_FRAME`.
    pub fn cursor(&self) -> u8 {
        self.cursor
    }

    /// Emits the current cell and moves on. On the ground cell the cursor wraps to 0 and the
    /// counter is incremented; that is the only place the encoder touches the counter.
    pub fn advance(&mut self, counter: &mut TimecodeCounter) -> Step {
        if self.cursor == consts::GROUND_SLOT {
            self.cursor = 0;
            counter.increment();
            return Step {
                level: LineLevel::Ground,
                frame_complete: true,
            };
        }

        let level = LineLevel::from_bit(bit_at(&counter.value(), self.cursor));
        self.cursor += 1;
        Step {
            level,
            frame_complete: false,
        }
    }
}

/// The line output, driven through a PWM channel.
pub struct LineOutput<P> {
    pin: P,
    max_duty: u16,
}

impl<P> LineOutput<P>
where
    P: PwmPin<Duty = u16>,
{
    /// Takes the channel, enables it and parks it at ground.
    pub fn new(mut pin: P) -> Self {
        let max_duty = pin.get_max_duty();
        pin.set_duty(0);
        pin.enable();
        Self { pin, max_duty }
    }

    pub fn write(&mut self, level: LineLevel) {
        self.pin.set_duty(level.duty(self.max_duty));
    }

    pub fn release(mut self) -> P {
        self.pin.disable();
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::FrameRate;

    struct RecordingPwm {
        enabled: bool,
        duty: u16,
        writes: Vec<u16>,
    }

    impl RecordingPwm {
        fn new() -> Self {
            RecordingPwm {
                enabled: false,
                duty: 0,
                writes: Vec::new(),
            }
        }
    }

    impl PwmPin for RecordingPwm {
        type Duty = u16;

        fn disable(&mut self) {
            self.enabled = false;
        }

        fn enable(&mut self) {
            self.enabled = true;
        }

        fn get_duty(&self) -> u16 {
            self.duty
        }

        fn get_max_duty(&self) -> u16 {
            480
        }

        fn set_duty(&mut self, duty: u16) {
            self.duty = duty;
            self.writes.push(duty);
        }
    }

    fn run_frame(counter: &mut TimecodeCounter, encoder: &mut LineLevelEncoder) -> Vec<Step> {
        (0..consts::BITS_PER_FRAME)
            .map(|_| encoder.advance(counter))
            .collect()
    }

    #[test]
    fn frame_round_trips_through_reference_decoder() {
        let rate = FrameRate::Fps30;
        let value = TimecodeValue::new(12, 34, 56, 7, rate).unwrap();
        let mut counter = TimecodeCounter::new(rate);
        counter.set_from(value);
        let mut encoder = LineLevelEncoder::new();

        let levels: Vec<LineLevel> = run_frame(&mut counter, &mut encoder)
            .iter()
            .map(|step| step.level)
            .collect();

        assert_eq!(decode(&levels), Some(value));
    }

    #[test]
    fn eighty_ticks_increment_once() {
        let rate = FrameRate::Fps25;
        let mut counter = TimecodeCounter::new(rate);
        let mut encoder = LineLevelEncoder::new();

        let steps = run_frame(&mut counter, &mut encoder);

        assert_eq!(steps.iter().filter(|s| s.frame_complete).count(), 1);
        assert_eq!(steps.last().map(|s| s.level), Some(LineLevel::Ground));
        assert!(steps[..79].iter().all(|s| s.level != LineLevel::Ground));
        assert_eq!(encoder.cursor(), 0);
        assert_eq!(counter.value(), TimecodeValue::new(0, 0, 0, 1, rate).unwrap());
    }

    #[test]
    fn counter_holds_until_ground_cell() {
        let rate = FrameRate::Fps24;
        let mut counter = TimecodeCounter::new(rate);
        let mut encoder = LineLevelEncoder::new();
        for _ in 0..consts::GROUND_SLOT {
            assert!(!encoder.advance(&mut counter).frame_complete);
        }
        assert_eq!(encoder.cursor(), consts::GROUND_SLOT);
        assert_eq!(counter.value(), TimecodeValue::ZERO);
    }

    #[test]
    fn frame_bits_repeat_four_bit_window() {
        let value = TimecodeValue::new(0, 0, 0, 0b1_0110, FrameRate::Fps30).unwrap();
        let bits: Vec<bool> = (0..consts::SECONDS_START).map(|s| bit_at(&value, s)).collect();
        for chunk in bits.chunks(4) {
            assert_eq!(chunk, &[false, true, true, false]);
        }
    }

    #[test]
    fn seconds_minutes_hours_land_in_their_cells() {
        let value =
            TimecodeValue::new(0b1_0111, 0b10_1010, 0b11_0001, 0, FrameRate::Fps30).unwrap();
        assert!(bit_at(&value, 32));
        assert!(!bit_at(&value, 33));
        assert!(bit_at(&value, 36));
        assert!(bit_at(&value, 37));
        assert!(!bit_at(&value, 40));
        assert!(bit_at(&value, 41));
        assert!(bit_at(&value, 45));
        assert!(bit_at(&value, 48));
        assert!(bit_at(&value, 52));
        assert!(!bit_at(&value, 51));
        assert!(bit_at(&value, 56));
        assert!(bit_at(&value, 60));
    }

    #[test]
    fn decode_rejects_short_or_grounded_input() {
        assert_eq!(decode(&[LineLevel::Low; 40]), None);
        let mut levels = [LineLevel::Low; 80];
        levels[33] = LineLevel::Ground;
        assert_eq!(decode(&levels), None);
        levels[33] = LineLevel::Low;
        assert_eq!(decode(&levels), Some(TimecodeValue::ZERO));
    }

    #[test]
    fn levels_map_to_duty() {
        assert_eq!(LineLevel::Ground.duty(480), 0);
        assert_eq!(LineLevel::Low.duty(480), 120);
        assert_eq!(LineLevel::High.duty(480), 360);
    }

    #[test]
    fn line_output_starts_grounded_and_writes_once_per_level() {
        let mut output = LineOutput::new(RecordingPwm::new());
        output.write(LineLevel::High);
        output.write(LineLevel::Low);
        output.write(LineLevel::Ground);

        let pwm = output.release();
        assert!(!pwm.enabled);
        assert_eq!(pwm.writes, vec![0, 360, 120, 0]);
    }
}
