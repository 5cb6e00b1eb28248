//! Command-based control for animations.
//!
//! Lets a task that owns an [`Animation`](crate::Animation) receive control
//! requests over a channel and apply them with
//! [`Animation::handle_action`](crate::Animation::handle_action).

use crate::segment::Segment;
use crate::time::TimeDuration;
use heapless::Vec;

/// Maximum number of segments callbacks can queue in one batch.
pub const CONTROL_CAPACITY: usize = 4;

/// Actions for controlling an animation.
#[derive(Debug, Clone)]
pub enum AnimationAction<V, D: TimeDuration, const N: usize> {
    /// Queue a segment, starting it if idle.
    Enqueue(Segment<V, D, N>),
    /// Pause playback.
    Pause,
    /// Resume paused playback.
    Resume,
    /// Stop and flush the queue.
    Stop,
    /// Change the playback rate.
    Speed(f32),
}

/// Command targeting a specific device.
#[derive(Debug, Clone)]
pub struct AnimationCommand<Id, V, D: TimeDuration, const N: usize> {
    pub device_id: Id,
    pub action: AnimationAction<V, D, N>,
}

impl<Id, V, D: TimeDuration, const N: usize> AnimationCommand<Id, V, D, N> {
    /// Creates command.
    pub fn new(device_id: Id, action: AnimationAction<V, D, N>) -> Self {
        Self { device_id, action }
    }
}

/// Handle passed to `on_complete` and `on_loop` callbacks.
///
/// Requests are applied to the animation once every pending callback has run:
/// a stop first, then the queued segments in order.
#[derive(Debug)]
pub struct Controls<V, D: TimeDuration, const N: usize> {
    queued: Vec<Segment<V, D, N>, CONTROL_CAPACITY>,
    stop: bool,
}

impl<V, D: TimeDuration, const N: usize> Controls<V, D, N> {
    pub(crate) fn new() -> Self {
        Self {
            queued: Vec::new(),
            stop: false,
        }
    }

    /// Queues a segment behind the animation's current queue.
    ///
    /// Hands the segment back if this batch already holds
    /// [`CONTROL_CAPACITY`] segments.
    pub fn enqueue(&mut self, segment: Segment<V, D, N>) -> Result<(), Segment<V, D, N>> {
        self.queued.push(segment)
    }

    /// Stops the animation and flushes its queue.
    ///
    /// Segments queued earlier in this batch are discarded too.
    pub fn stop(&mut self) {
        self.queued.clear();
        self.stop = true;
    }

    pub(crate) fn into_parts(self) -> (bool, Vec<Segment<V, D, N>, CONTROL_CAPACITY>) {
        (self.stop, self.queued)
    }
}
