//! Frame pacing over the host's clock.

use crate::time::{TimeDuration, TimeInstant};

/// Result of polling a [`FrameTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FramePoll<D> {
    /// A frame should be rendered now.
    Due,
    /// The next frame is due after this delay.
    Wait(D),
    /// The timer is not running.
    Stopped,
}

/// Repeating frame gate owned by one animation.
///
/// The first poll after [`start`](Self::start) is due immediately; afterwards a
/// frame is due once the period has elapsed since the previous due frame.
/// Missed frames are dropped rather than queued.
#[derive(Clone, Copy)]
pub struct FrameTimer<I: TimeInstant> {
    period: Option<I::Duration>,
    last_frame: Option<I>,
}

impl<I: TimeInstant> FrameTimer<I> {
    pub const fn new() -> Self {
        Self {
            period: None,
            last_frame: None,
        }
    }

    /// Starts (or restarts) the timer with the given frame period.
    pub fn start(&mut self, period: I::Duration) {
        self.period = Some(period);
        self.last_frame = None;
    }

    /// Stops the timer. Safe to call when already stopped.
    pub fn stop(&mut self) {
        self.period = None;
        self.last_frame = None;
    }

    pub fn is_running(&self) -> bool {
        self.period.is_some()
    }

    pub fn period(&self) -> Option<I::Duration> {
        self.period
    }

    /// Time left until the next frame is due, without consuming it.
    ///
    /// `None` when stopped; `ZERO` when a frame is already due.
    pub fn until_next(&self, now: I) -> Option<I::Duration> {
        let period = self.period?;
        match self.last_frame {
            None => Some(I::Duration::ZERO),
            Some(last) => Some(period.saturating_sub(now.duration_since(last))),
        }
    }

    /// Checks whether a frame is due at `now`, consuming it if so.
    pub fn poll(&mut self, now: I) -> FramePoll<I::Duration> {
        let Some(period) = self.period else {
            return FramePoll::Stopped;
        };

        match self.last_frame {
            None => {
                self.last_frame = Some(now);
                FramePoll::Due
            }
            Some(last) => {
                let since = now.duration_since(last);
                if since.as_millis() >= period.as_millis() {
                    self.last_frame = Some(now);
                    FramePoll::Due
                } else {
                    FramePoll::Wait(period.saturating_sub(since))
                }
            }
        }
    }
}

impl<I: TimeInstant> Default for FrameTimer<I> {
    fn default() -> Self {
        Self::new()
    }
}
