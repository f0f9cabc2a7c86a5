use serde::{Deserialize, Serialize};

/// How long the backend asks the user to wait before requesting another SMS.
///
/// Comes from the `Retry-After` header of a rate-limited send request. It is advisory:
/// nothing on the client blocks a resubmission, the backend stays the only authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RetryWindow {
    seconds: u64,
}

/// Unit a [`RetryWindow`] is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUnit {
    /// Less than a minute.
    Seconds,
    /// Less than an hour.
    Minutes,
    /// An hour or more.
    Hours,
}

impl RetryWindow {
    /// Creates a window of `seconds`.
    #[must_use]
    pub const fn from_secs(seconds: u64) -> Self {
        Self { seconds }
    }

    /// Parses the delay-seconds form of a `Retry-After` header value.
    ///
    /// The HTTP-date form is not used by the verification backend and yields `None`.
    #[must_use]
    pub fn from_header(value: &str) -> Option<Self> {
        value.trim().parse().ok().map(Self::from_secs)
    }

    /// Scales the window to the unit it is displayed in, rounding half up.
    ///
    /// Seconds below a minute, minutes below an hour, hours otherwise.
    #[must_use]
    pub const fn scaled(&self) -> (u64, WaitUnit) {
        let seconds = self.seconds;
        if seconds < 60 {
            (seconds, WaitUnit::Seconds)
        } else if seconds < 60 * 60 {
            (round_half_up(seconds, 60), WaitUnit::Minutes)
        } else {
            (round_half_up(seconds, 60 * 60), WaitUnit::Hours)
        }
    }
}

/// `value / unit` rounded half up, without an intermediate sum that could overflow.
const fn round_half_up(value: u64, unit: u64) -> u64 {
    let whole = value / unit;
    if value % unit >= unit / 2 {
        whole + 1
    } else {
        whole
    }
}
