//! The single owner of all timecode state.
//!
//! The bit-cell timer interrupt calls [`Synchronizer::on_tick`], the serial receive interrupt
//! calls [`Synchronizer::on_byte`], and the foreground loop calls [`Synchronizer::signal`] and
//! [`Synchronizer::take_completed_frame`]. Every entry point takes `&mut self`, so the firmware
//! keeps the synchronizer in a `Mutex<RefCell<..>>` and only touches it inside a critical
//! section. That is what keeps `increment` and `set_from` from interleaving.
use log::debug;

use crate::config::Config;
use crate::ltc::{LineLevel, LineLevelEncoder};
use crate::mtc::{Message, QuarterFrameReceiver};
use crate::time::{TimecodeCounter, TimecodeValue};
use crate::transport::{Signal, TransportController, TransportState};

pub struct Synchronizer {
    config: Config,
    counter: TimecodeCounter,
    encoder: LineLevelEncoder,
    receiver: QuarterFrameReceiver,
    transport: TransportController,
    completed_frame: Option<TimecodeValue>,
}

impl Synchronizer {
    pub fn new(config: Config) -> Self {
        Self {
            counter: TimecodeCounter::new(config.frame_rate),
            encoder: LineLevelEncoder::new(),
            receiver: QuarterFrameReceiver::new(),
            transport: TransportController::new(),
            completed_frame: None,
            config,
        }
    }

    pub fn timecode(&self) -> TimecodeValue {
        self.counter.value()
    }

    pub fn transport_state(&self) -> TransportState {
        self.transport.state()
    }

    pub fn cursor(&self) -> u8 {
        self.encoder.cursor()
    }

    /// One bit-cell tick. Returns the level to put on the line. Unless running, the line sits at
    /// ground and neither the cursor nor the counter move.
    pub fn on_tick(&mut self) -> LineLevel {
        if !self.transport.is_running() {
            return LineLevel::Ground;
        }

        let step = self.encoder.advance(&mut self.counter);
        if step.frame_complete && self.config.transmit_quarter_frames {
            self.completed_frame = Some(self.counter.value());
        }
        step.level
    }

    /// One byte from the serial input.
    pub fn on_byte(&mut self, byte: u8) {
        let message = match self.receiver.receive(byte) {
            Some(message) => message,
            None => return,
        };

        match message {
            Message::Timecode(value) => {
                self.counter.set_from(value);
                self.completed_frame = None;
                self.transport.handle(Signal::Start);
            }
            Message::Start if self.config.follow_realtime => {
                self.transport.handle(Signal::Start);
            }
            Message::Continue if self.config.follow_realtime => {
                self.transport.handle(Signal::Resume);
            }
            Message::Stop if self.config.follow_realtime => {
                self.transport.handle(Signal::Stop);
                self.completed_frame = None;
            }
            ignored => debug!("ignoring {:?}", ignored),
        }
    }

    /// A transport input from the local controls.
    pub fn signal(&mut self, signal: Signal) -> TransportState {
        let state = self.transport.handle(signal);
        if !self.transport.is_running() {
            self.completed_frame = None;
        }
        state
    }

    /// Moves the local timecode to `value` without touching the transport. A frame still waiting
    /// to be transmitted is dropped.
    pub fn locate(&mut self, value: TimecodeValue) {
        self.counter.set_from(value);
        self.completed_frame = None;
    }

    /// The most recently completed frame's timecode, if one is waiting to be transmitted and the
    /// transport is still running.
    pub fn take_completed_frame(&mut self) -> Option<TimecodeValue> {
        let frame = self.completed_frame.take();
        if self.transport.is_running() {
            frame
        } else {
            None
        }
    }
}
