//! Transport state: whether the line encoder runs and frames go out.
use log::debug;

/// Logical transport inputs, already debounced by whoever produces them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    Start,
    Stop,
    Pause,
    Resume,
    /// A single pause/resume button.
    TogglePause,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Running,
    Paused,
}

impl Default for TransportState {
    fn default() -> Self {
        TransportState::Stopped
    }
}

impl TransportState {
    pub fn transition(self, signal: Signal) -> TransportState {
        match (self, signal) {
            (TransportState::Stopped, Signal::Start) => TransportState::Running,
            (TransportState::Stopped, _) => TransportState::Stopped,

            (TransportState::Running, Signal::Pause) => TransportState::Paused,
            (TransportState::Running, Signal::TogglePause) => TransportState::Paused,
            (TransportState::Running, Signal::Stop) => TransportState::Stopped,
            (TransportState::Running, _) => TransportState::Running,

            (TransportState::Paused, Signal::Start) => TransportState::Running,
            (TransportState::Paused, Signal::Resume) => TransportState::Running,
            (TransportState::Paused, Signal::TogglePause) => TransportState::Running,
            (TransportState::Paused, Signal::Stop) => TransportState::Stopped,
            (TransportState::Paused, Signal::Pause) => TransportState::Paused,
        }
    }
}

/// Owns the transport state. Stopping leaves the timecode and bit cursor where they are; a later
/// start picks up from there.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransportController {
    state: TransportState,
}

impl TransportController {
    pub const fn new() -> Self {
        Self {
            state: TransportState::Stopped,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn handle(&mut self, signal: Signal) -> TransportState {
        let next = self.state.transition(signal);
        if next != self.state {
            debug!("transport {:?} -> {:?} on {:?}", self.state, next, signal);
        }
        self.state = next;
        next
    }

    /// True while the encoder may advance and frames may be transmitted.
    pub fn is_running(&self) -> bool {
        self.state == TransportState::Running
    }

    pub fn is_started(&self) -> bool {
        self.state != TransportState::Stopped
    }

    pub fn is_paused(&self) -> bool {
        self.state == TransportState::Paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_SIGNALS: [Signal; 5] = [
        Signal::Start,
        Signal::Stop,
        Signal::Pause,
        Signal::Resume,
        Signal::TogglePause,
    ];

    #[test]
    fn full_cycle() {
        let mut transport = TransportController::new();
        assert_eq!(transport.handle(Signal::Start), TransportState::Running);
        assert_eq!(transport.handle(Signal::Pause), TransportState::Paused);
        assert_eq!(transport.handle(Signal::Resume), TransportState::Running);
        assert_eq!(transport.handle(Signal::Stop), TransportState::Stopped);
    }

    #[test]
    fn stop_from_paused() {
        let mut transport = TransportController::new();
        transport.handle(Signal::Start);
        transport.handle(Signal::Pause);
        assert!(transport.is_paused());
        assert!(transport.is_started());
        assert_eq!(transport.handle(Signal::Stop), TransportState::Stopped);
        assert!(!transport.is_started());
    }

    #[test]
    fn only_start_leaves_stopped() {
        for &signal in ALL_SIGNALS.iter() {
            let next = TransportState::Stopped.transition(signal);
            if signal == Signal::Start {
                assert_eq!(next, TransportState::Running);
            } else {
                assert_eq!(next, TransportState::Stopped);
            }
        }
    }

    #[test]
    fn start_resumes_paused() {
        assert_eq!(
            TransportState::Paused.transition(Signal::Start),
            TransportState::Running
        );
    }

    #[test]
    fn toggle_flips_between_running_and_paused() {
        let mut transport = TransportController::new();
        transport.handle(Signal::Start);
        assert_eq!(transport.handle(Signal::TogglePause), TransportState::Paused);
        assert!(!transport.is_running());
        assert_eq!(transport.handle(Signal::TogglePause), TransportState::Running);
        assert!(transport.is_running());
    }

    #[test]
    fn redundant_signals_hold_state() {
        assert_eq!(
            TransportState::Running.transition(Signal::Start),
            TransportState::Running
        );
        assert_eq!(
            TransportState::Running.transition(Signal::Resume),
            TransportState::Running
        );
        assert_eq!(
            TransportState::Paused.transition(Signal::Pause),
            TransportState::Paused
        );
    }
}
