//! Keyframe animation engine with queueing, pausing and speed control.
//!
//! Provides [`Animation`], which tweens one device's output through a queue of
//! [`Segment`]s, and the [`Animatable`] trait devices implement to be animated.

use crate::command::{AnimationAction, Controls};
use crate::easing::Easing;
use crate::keyframe::{Frame, KeyFrame, Tween};
use crate::segment::{Callback, Segment, SegmentBuilder, SegmentError};
use crate::time::{TimeDuration, TimeInstant, TimeSource, millis_between};
use crate::timer::{FramePoll, FrameTimer};
use heapless::{Deque, Vec};

/// Maximum number of callbacks waiting for the next tick.
const DEFERRED_CAPACITY: usize = 8;

/// Trait for devices whose output can be animated.
///
/// Implement this for anything with a single tweenable output: an LED's
/// brightness, a servo's angle, an RGB LED's color.
pub trait Animatable {
    /// The value being animated.
    type Value: Tween;

    /// Error raised by the hardware when rendering fails.
    type Error;

    /// The value the device is currently showing.
    ///
    /// Used to resolve [`KeyFrame::Current`] and [`KeyFrame::Step`] when a segment starts.
    fn current(&self) -> Self::Value;

    /// Maps a keyframe value into the device's valid range.
    fn normalize(&self, value: Self::Value) -> Self::Value {
        value
    }

    /// Pushes a tweened value to the hardware.
    fn render(&mut self, value: Self::Value) -> Result<(), Self::Error>;
}

/// The current state of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnimationState {
    /// Nothing playing and nothing queued.
    Idle,
    /// A segment is playing.
    Playing,
    /// A segment is held at its current position.
    Paused,
}

/// Timing information returned by [`Animation::service`].
///
/// Indicates when the animation needs to be serviced again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceTiming<D> {
    /// Service again after this delay. `ZERO` means callbacks or a fresh
    /// segment are waiting and the next call should come right away.
    Delay(D),

    /// Animation is paused. No servicing needed until it is resumed.
    Paused,

    /// Nothing left to play. No servicing needed until a segment is enqueued.
    Complete,
}

/// Errors that can occur during animation operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationError<E> {
    /// The segment failed validation.
    Segment(SegmentError),

    /// The segment queue is full.
    QueueFull,

    /// Operation called from an invalid state.
    InvalidState {
        /// Human-readable description of the expected state
        expected: &'static str,
        /// The actual current state
        actual: AnimationState,
    },

    /// Speed factor was NaN or infinite.
    InvalidSpeed,

    /// The device failed to render a frame.
    Render(E),
}

impl<E: core::fmt::Display> core::fmt::Display for AnimationError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AnimationError::Segment(err) => write!(f, "invalid segment: {}", err),
            AnimationError::QueueFull => write!(f, "segment queue is full"),
            AnimationError::InvalidState { expected, actual } => {
                write!(
                    f,
                    "invalid state: expected {}, but animation is {:?}",
                    expected, actual
                )
            }
            AnimationError::InvalidSpeed => write!(f, "speed must be a finite number"),
            AnimationError::Render(err) => write!(f, "render failed: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug + core::fmt::Display> std::error::Error for AnimationError<E> {}

impl<E> From<SegmentError> for AnimationError<E> {
    fn from(err: SegmentError) -> Self {
        AnimationError::Segment(err)
    }
}

/// A user callback waiting for the next tick.
enum Deferred<V, D: TimeDuration, const N: usize> {
    Complete(Callback<V, D, N>),
    Loop { callback: Callback<V, D, N>, passes: u32 },
}

/// Where a segment is along its timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    progress: f32,
    pass: i64,
    finished: bool,
}

/// The segment currently playing, with its keyframes resolved.
struct Active<V, I: TimeInstant, const N: usize> {
    segment: Segment<V, I::Duration, N>,
    frames: Vec<Frame<V>, N>,
    started: I,
    elapsed_before: f32,
    passes: i64,
}

impl<V: Tween, I: TimeInstant, const N: usize> Active<V, I, N> {
    fn elapsed(&self, now: I, speed: f32) -> f32 {
        millis_between(self.started, now) * speed + self.elapsed_before
    }

    /// Folds elapsed time at `speed` into the base so the clock can restart at `now`.
    fn rebase(&mut self, now: I, speed: f32) {
        self.elapsed_before = self.elapsed(now, speed);
        self.started = now;
    }

    fn position(&self, now: I, speed: f32) -> Position {
        calculate_progress(
            self.elapsed(now, speed),
            self.segment.duration().as_millis() as f32,
            self.segment.is_looping(),
            self.segment.is_metronomic(),
            speed,
        )
    }
}

/// Tweens a single device through a queue of keyframe segments.
///
/// The animation owns its device and borrows a time source. Progress is derived
/// from elapsed wall-clock time rather than tick counts, so irregular servicing
/// only lowers the frame rate; it never distorts timing.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `A` - Animated device type
/// * `T` - Time source implementation type
/// * `N` - Maximum number of keyframes per segment
/// * `Q` - Maximum number of queued segments
pub struct Animation<'t, I, A, T, const N: usize, const Q: usize>
where
    I: TimeInstant,
    A: Animatable,
    T: TimeSource<I>,
{
    target: A,
    time_source: &'t T,
    state: AnimationState,
    queue: Deque<Segment<A::Value, I::Duration, N>, Q>,
    active: Option<Active<A::Value, I, N>>,
    speed: f32,
    timer: FrameTimer<I>,
    deferred: Vec<Deferred<A::Value, I::Duration, N>, DEFERRED_CAPACITY>,
    progress: Option<f32>,
}

impl<'t, I, A, T, const N: usize, const Q: usize> Animation<'t, I, A, T, N, Q>
where
    I: TimeInstant,
    A: Animatable,
    T: TimeSource<I>,
{
    /// Creates an idle animation for `target`.
    pub fn new(target: A, time_source: &'t T) -> Self {
        Self {
            target,
            time_source,
            state: AnimationState::Idle,
            queue: Deque::new(),
            active: None,
            speed: 1.0,
            timer: FrameTimer::new(),
            deferred: Vec::new(),
            progress: None,
        }
    }

    /// Handles an animation action by dispatching to the appropriate method.
    ///
    /// # Returns
    /// * `Ok(ServiceTiming)` - When to service next
    /// * `Err` - Operation failed (invalid state, full queue, render error)
    pub fn handle_action(
        &mut self,
        action: AnimationAction<A::Value, I::Duration, N>,
    ) -> Result<ServiceTiming<I::Duration>, AnimationError<A::Error>> {
        match action {
            AnimationAction::Enqueue(segment) => {
                self.enqueue(segment)?;
                self.service()
            }
            AnimationAction::Pause => {
                self.pause()?;
                Ok(ServiceTiming::Paused)
            }
            AnimationAction::Resume => {
                self.resume()?;
                self.service()
            }
            AnimationAction::Stop => {
                self.stop();
                Ok(ServiceTiming::Complete)
            }
            AnimationAction::Speed(factor) => {
                self.set_speed(factor)?;
                self.service()
            }
        }
    }

    /// Builds a segment and enqueues it.
    ///
    /// # Errors
    /// * `Segment` - The builder's segment failed validation; nothing is queued
    /// * `QueueFull` - No room in the queue
    pub fn animate(
        &mut self,
        builder: SegmentBuilder<A::Value, I::Duration, N>,
    ) -> Result<(), AnimationError<A::Error>> {
        let segment = builder.build()?;
        self.enqueue(segment)
    }

    /// Queues a segment, starting it immediately when idle.
    ///
    /// Segments queued while paused wait until the animation is resumed.
    pub fn enqueue(
        &mut self,
        segment: Segment<A::Value, I::Duration, N>,
    ) -> Result<(), AnimationError<A::Error>> {
        match self.state {
            AnimationState::Idle => {
                let now = self.time_source.now();
                self.play(segment, now);
                self.state = AnimationState::Playing;
                debug!("animation: idle -> playing");
            }
            AnimationState::Playing | AnimationState::Paused => {
                if self.queue.push_back(segment).is_err() {
                    return Err(AnimationError::QueueFull);
                }
                trace!("animation: queued segment, {} waiting", self.queue.len());
            }
        }
        Ok(())
    }

    /// Services the animation, rendering a frame if one is due.
    ///
    /// Call this from the main loop or a timer task. Callbacks deferred by the
    /// previous frame run first.
    ///
    /// # Returns
    /// - `Ok(ServiceTiming::Delay(d))` - Playing; service again after `d`
    /// - `Ok(ServiceTiming::Paused)` - Paused; nothing to do until resumed
    /// - `Ok(ServiceTiming::Complete)` - Idle; nothing to do until a segment is queued
    /// - `Err(AnimationError::Render(_))` - The device failed to render
    pub fn service(&mut self) -> Result<ServiceTiming<I::Duration>, AnimationError<A::Error>> {
        self.run_deferred()?;

        match self.state {
            AnimationState::Idle => return Ok(ServiceTiming::Complete),
            AnimationState::Paused => return Ok(ServiceTiming::Paused),
            AnimationState::Playing => {}
        }

        let now = self.time_source.now();
        match self.timer.poll(now) {
            FramePoll::Due => self.advance(now)?,
            FramePoll::Wait(delay) => return Ok(ServiceTiming::Delay(delay)),
            FramePoll::Stopped => {}
        }

        Ok(self.next_timing(now))
    }

    /// Renders one frame now, regardless of the frame timer.
    ///
    /// Runs deferred callbacks first. Does nothing while idle or paused.
    pub fn tick(&mut self) -> Result<(), AnimationError<A::Error>> {
        self.run_deferred()?;

        if self.state != AnimationState::Playing {
            return Ok(());
        }

        let now = self.time_source.now();
        self.advance(now)
    }

    /// Holds the current segment at its current position.
    ///
    /// Must be called from `Playing` state.
    pub fn pause(&mut self) -> Result<(), AnimationError<A::Error>> {
        if self.state != AnimationState::Playing {
            return Err(AnimationError::InvalidState {
                expected: "Playing",
                actual: self.state,
            });
        }

        let now = self.time_source.now();
        if let Some(active) = self.active.as_mut() {
            active.rebase(now, self.speed);
        }
        self.timer.stop();
        self.state = AnimationState::Paused;
        debug!("animation: playing -> paused");
        Ok(())
    }

    /// Continues a paused segment from where it was paused.
    ///
    /// Must be called from `Paused` state.
    pub fn resume(&mut self) -> Result<(), AnimationError<A::Error>> {
        if self.state != AnimationState::Paused {
            return Err(AnimationError::InvalidState {
                expected: "Paused",
                actual: self.state,
            });
        }

        let now = self.time_source.now();
        if let Some(active) = self.active.as_mut() {
            active.started = now;
            self.timer.start(active.segment.frame_period());
        }
        self.state = AnimationState::Playing;
        debug!("animation: paused -> playing");
        Ok(())
    }

    /// Stops playback and discards every queued segment.
    ///
    /// The device keeps its last rendered value. Can be called from any state,
    /// any number of times. Callbacks already deferred still run on the next tick.
    pub fn stop(&mut self) {
        self.queue.clear();
        self.active = None;
        self.timer.stop();
        self.progress = None;
        if self.state != AnimationState::Idle {
            debug!("animation: {} -> idle (stopped)", self.state);
        }
        self.state = AnimationState::Idle;
    }

    /// Returns the playback rate multiplier.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Sets the playback rate multiplier.
    ///
    /// Takes effect from now on: progress already made is kept. `0.0` freezes
    /// motion and negative factors play backwards.
    pub fn set_speed(&mut self, speed: f32) -> Result<(), AnimationError<A::Error>> {
        if !speed.is_finite() {
            return Err(AnimationError::InvalidSpeed);
        }

        let now = self.time_source.now();
        if let Some(active) = self.active.as_mut() {
            if self.state == AnimationState::Playing {
                active.rebase(now, self.speed);
            }
            // A pass boundary belongs to the pass being entered in the new direction.
            let before = active.position(active.started, self.speed).pass;
            let after = active.position(active.started, speed).pass;
            active.passes += after - before;
        }
        self.speed = speed;
        debug!("animation: speed set to {}", speed);
        Ok(())
    }

    /// Returns the current state of the animation.
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Returns true if a segment is playing.
    pub fn is_running(&self) -> bool {
        self.state == AnimationState::Playing
    }

    /// Returns true if the animation is paused.
    pub fn is_paused(&self) -> bool {
        self.state == AnimationState::Paused
    }

    /// Number of segments waiting behind the current one.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Progress of the current segment at the last rendered frame.
    pub fn progress(&self) -> Option<f32> {
        self.progress
    }

    /// Returns a reference to the segment currently playing, if any.
    pub fn current_segment(&self) -> Option<&Segment<A::Value, I::Duration, N>> {
        self.active.as_ref().map(|active| &active.segment)
    }

    pub fn target(&self) -> &A {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut A {
        &mut self.target
    }

    /// Consumes the animation, returning the device.
    pub fn into_target(self) -> A {
        self.target
    }

    /// Makes `segment` current: resolves its keyframes and restarts the frame timer.
    fn play(&mut self, segment: Segment<A::Value, I::Duration, N>, now: I) {
        let frames = resolve_frames(&self.target, segment.key_frames());
        let elapsed_before = if self.speed < 0.0 {
            segment.duration().as_millis() as f32
        } else {
            0.0
        };

        self.timer.start(segment.frame_period());
        let mut active = Active {
            segment,
            frames,
            started: now,
            elapsed_before,
            passes: 0,
        };
        active.passes = active.position(now, self.speed).pass;
        self.active = Some(active);
        self.progress = None;
        trace!("animation: segment started");
    }

    /// Moves past a finished segment.
    fn next(&mut self, now: I) {
        if let Some(finished) = self.active.take() {
            if let Some(callback) = finished.segment.on_complete() {
                defer(&mut self.deferred, Deferred::Complete(callback));
            }
        }

        match self.queue.pop_front() {
            Some(segment) => self.play(segment, now),
            None => {
                self.timer.stop();
                self.state = AnimationState::Idle;
                debug!("animation: playing -> idle (queue drained)");
            }
        }
    }

    /// Computes and renders the frame for `now`.
    fn advance(&mut self, now: I) -> Result<(), AnimationError<A::Error>> {
        let speed = self.speed;
        let Some(active) = self.active.as_mut() else {
            return Ok(());
        };

        let position = active.position(now, speed);

        if active.segment.is_looping() && position.pass != active.passes {
            let passes = position.pass.abs_diff(active.passes);
            active.passes = position.pass;
            if let Some(callback) = active.segment.on_loop() {
                let passes = u32::try_from(passes).unwrap_or(u32::MAX);
                defer(&mut self.deferred, Deferred::Loop { callback, passes });
            }
        }

        let cue_points = active.segment.cue_points();
        let (left, right) = find_indices(cue_points, position.progress);
        let value = tweened_value(
            &active.frames,
            cue_points,
            active.segment.easing(),
            position.progress,
            left,
            right,
        );

        self.progress = Some(position.progress);
        self.target.render(value).map_err(AnimationError::Render)?;

        if position.finished {
            self.next(now);
        }
        Ok(())
    }

    fn next_timing(&self, now: I) -> ServiceTiming<I::Duration> {
        match self.state {
            AnimationState::Playing => {
                ServiceTiming::Delay(self.timer.until_next(now).unwrap_or(I::Duration::ZERO))
            }
            AnimationState::Paused => ServiceTiming::Paused,
            AnimationState::Idle if !self.deferred.is_empty() => {
                ServiceTiming::Delay(I::Duration::ZERO)
            }
            AnimationState::Idle => ServiceTiming::Complete,
        }
    }

    /// Runs deferred callbacks, then applies what they requested.
    fn run_deferred(&mut self) -> Result<(), AnimationError<A::Error>> {
        if self.deferred.is_empty() {
            return Ok(());
        }

        let pending = core::mem::take(&mut self.deferred);
        let mut controls = Controls::new();
        for deferred in pending {
            match deferred {
                Deferred::Complete(callback) => callback(&mut controls),
                Deferred::Loop { callback, passes } => {
                    for _ in 0..passes {
                        callback(&mut controls);
                    }
                }
            }
        }

        let (stop, queued) = controls.into_parts();
        if stop {
            self.stop();
        }
        for segment in queued {
            self.enqueue(segment)?;
        }
        Ok(())
    }
}

fn defer<V, D: TimeDuration, const N: usize>(
    deferred: &mut Vec<Deferred<V, D, N>, DEFERRED_CAPACITY>,
    callback: Deferred<V, D, N>,
) {
    // Consecutive loop passes with the same callback collapse into one entry.
    if let (
        Some(Deferred::Loop { callback: pending, passes }),
        Deferred::Loop { callback: incoming, passes: more },
    ) = (deferred.last_mut(), &callback)
    {
        if core::ptr::fn_addr_eq(*pending, *incoming) {
            *passes = passes.saturating_add(*more);
            return;
        }
    }

    if deferred.push(callback).is_err() {
        warn!("animation: deferred callback queue full, dropping callback");
    }
}

/// Resolves keyframes against the device into concrete values.
fn resolve_frames<A: Animatable, const N: usize>(
    target: &A,
    key_frames: &[KeyFrame<A::Value>],
) -> Vec<Frame<A::Value>, N> {
    let start = target.current();
    let mut frames: Vec<Frame<A::Value>, N> = key_frames
        .iter()
        .map(|key_frame| Frame {
            value: start,
            easing: key_frame.easing(),
        })
        .collect();

    for (index, key_frame) in key_frames.iter().enumerate() {
        let previous = index.checked_sub(1).map_or(start, |i| frames[i].value);
        frames[index].value = match *key_frame {
            KeyFrame::Current => previous,
            KeyFrame::Step(delta) => target.normalize(previous.offset(delta)),
            KeyFrame::Absolute { value, .. } => target.normalize(value),
            KeyFrame::Copy { index: source, .. } => frames[source].value,
        };
    }

    frames
}

/// Maps elapsed milliseconds to a position along a segment of `duration` ms.
///
/// Non-looping segments clamp to `[0, 1]` and finish at 1 (or at 0 when playing
/// backwards). Looping segments wrap every pass; metronomic ones run the odd
/// passes backwards.
fn calculate_progress(
    elapsed: f32,
    duration: f32,
    looping: bool,
    metronomic: bool,
    speed: f32,
) -> Position {
    let cycles = elapsed / duration;

    if !looping {
        let finished = if speed < 0.0 {
            cycles <= 0.0
        } else {
            cycles >= 1.0
        };
        return Position {
            progress: cycles.clamp(0.0, 1.0),
            pass: 0,
            finished,
        };
    }

    // Playing backwards, a whole number of cycles is the end of the lower pass.
    let whole = if speed < 0.0 {
        libm::ceilf(cycles) - 1.0
    } else {
        libm::floorf(cycles)
    };
    let pass = whole as i64;
    let fraction = cycles - whole;
    let progress = if metronomic && pass.rem_euclid(2) == 1 {
        1.0 - fraction
    } else {
        fraction
    };

    Position {
        progress,
        pass,
        finished: false,
    }
}

/// Finds the cue points bracketing `progress`.
///
/// Returns `(i, i)` when `progress` sits exactly on cue point `i`. Of several
/// equal cue points the last one wins, so a repeated final cue still reaches
/// the last keyframe.
fn find_indices(cue_points: &[f32], progress: f32) -> (usize, usize) {
    let upper = cue_points.partition_point(|&cue| cue <= progress);
    match upper {
        0 => (0, 0),
        upper if upper == cue_points.len() => (upper - 1, upper - 1),
        upper if cue_points[upper - 1] == progress => (upper - 1, upper - 1),
        upper => (upper - 1, upper),
    }
}

/// Interpolates between the frames at `left` and `right`.
///
/// The right frame's easing, when set, overrides the segment easing for the interval.
fn tweened_value<V: Tween>(
    frames: &[Frame<V>],
    cue_points: &[f32],
    easing: Easing,
    progress: f32,
    left: usize,
    right: usize,
) -> V {
    let from = frames[left];
    if left == right {
        return from.value;
    }

    let to = frames[right];
    let span = cue_points[right] - cue_points[left];
    let local = if span > 0.0 {
        (progress - cue_points[left]) / span
    } else {
        0.0
    };

    let easing = to.easing.unwrap_or(easing);
    from.value.tween(to.value, easing.apply(local))
}
