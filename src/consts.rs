// A list of constants used to index into the LTC frame. Each field owns the bit cells from its
// start up to the next field's start.
pub const FRAMES_START: u8 = 0;
pub const SECONDS_START: u8 = 32;
pub const MINUTES_START: u8 = 40;
pub const HOURS_START: u8 = 48;
pub const BITS_PER_FRAME: u8 = 80;

// The last bit cell of every frame carries the ground level while the counter steps forward.
pub const GROUND_SLOT: u8 = BITS_PER_FRAME - 1;

// Frames repeat a four bit window across their 32 cells, hours an eight bit window.
pub const FRAMES_WINDOW: u8 = 4;
pub const HOURS_WINDOW: u8 = 8;

// Rollover limits for the fields that don't depend on the frame rate.
pub const SECONDS_PER_MINUTE: u8 = 60;
pub const MINUTES_PER_HOUR: u8 = 60;
pub const HOURS_PER_DAY: u8 = 24;

// MIDI status bytes we care about.
pub const MTC_QUARTER_FRAME: u8 = 0xF1;
pub const TIMING_CLOCK: u8 = 0xF8;
pub const START: u8 = 0xFA;
pub const CONTINUE: u8 = 0xFB;
pub const STOP: u8 = 0xFC;
pub const STATUS_MIN: u8 = 0x80;
pub const REALTIME_MIN: u8 = 0xF8;

// Quarter-frame data byte layout: 0nnndddd.
pub const QUARTER_FRAME_SLOTS: usize = 8;
pub const SLOT_SHIFT: u8 = 4;
pub const SLOT_MASK: u8 = 0x07;
pub const NIBBLE_MASK: u8 = 0x0F;
pub const LAST_SLOT: u8 = 7;

// Bits of each high nibble that belong to the field. Frames and hours carry one, seconds and
// minutes carry two.
pub const FRAMES_HIGH_MASK: u8 = 0x01;
pub const SECONDS_HIGH_MASK: u8 = 0x03;
pub const MINUTES_HIGH_MASK: u8 = 0x03;
pub const HOURS_HIGH_MASK: u8 = 0x01;

// The frame-rate code sits above the hours bit in the hours-high nibble.
pub const RATE_CODE_SHIFT: u8 = 1;

// MIDI runs at 31.25 kbit/s.
pub const MIDI_BAUD: u32 = 31_250;

// The sysclock is set to run at 48MHz. The PWM carrier has to sit well above the fastest bit
// rate (30fps * 80 cells = 2.4kHz) so the filtered output settles inside one cell.
pub const SYSCLK_MHZ: u32 = 48;
pub const PCLK1_MHZ: u32 = 24;
pub const PWM_CARRIER_KHZ: u32 = 100;

// Duty cycles of the two data levels, in quarters of the full PWM range.
pub const LOW_DUTY_QUARTERS: u16 = 1;
pub const HIGH_DUTY_QUARTERS: u16 = 3;
