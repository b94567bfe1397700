//! Linear timecode generator that chases MIDI timecode.
//!
//! The crate is split the same way the firmware is driven: a fast timer tick feeds the LTC
//! encoder, serial receive interrupts feed the quarter-frame receiver, and the foreground loop
//! handles transport buttons and quarter-frame transmission. Everything here is `no_std` so the
//! core can be tested on the host.
#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod consts;
pub mod error;
pub mod ltc;
pub mod mtc;
pub mod sync;
pub mod time;
pub mod transport;

pub use config::Config;
pub use error::Error;
pub use ltc::{LineLevel, LineLevelEncoder, LineOutput};
pub use mtc::{Message, QuarterFrameReceiver, QuarterFrameTransmitter};
pub use sync::Synchronizer;
pub use time::{FrameRate, TimecodeCounter, TimecodeValue};
pub use transport::{Signal, TransportController, TransportState};
