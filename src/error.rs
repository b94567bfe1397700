use core::fmt;

/// Errors raised while building timecode state. The runtime paths never fail: bad bytes on the
/// wire are dropped and the counter arithmetic is total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    UnsupportedFrameRate(u8),
    HoursOutOfRange(u8),
    MinutesOutOfRange(u8),
    SecondsOutOfRange(u8),
    FramesOutOfRange(u8),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedFrameRate(fps) => write!(f, "unsupported frame rate: {} fps", fps),
            Error::HoursOutOfRange(v) => write!(f, "hours out of range: {}", v),
            Error::MinutesOutOfRange(v) => write!(f, "minutes out of range: {}", v),
            Error::SecondsOutOfRange(v) => write!(f, "seconds out of range: {}", v),
            Error::FramesOutOfRange(v) => write!(f, "frames out of range: {}", v),
        }
    }
}
