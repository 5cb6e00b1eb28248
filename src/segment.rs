use crate::command::Controls;
use crate::easing::Easing;
use crate::keyframe::KeyFrame;
use crate::time::TimeDuration;
use heapless::Vec;

/// Segment duration used when the builder is not given one.
pub const DEFAULT_DURATION_MS: u64 = 1000;

/// Frame rate used when the builder is not given one.
pub const DEFAULT_FPS: u16 = 30;

/// Callback fired after a segment finishes or completes a loop pass.
///
/// Callbacks are deferred to the next `tick`/`service` call, so they never run
/// inside the animation's own completion logic. The [`Controls`] handle lets a
/// callback queue follow-up segments or stop the animation.
pub type Callback<V, D, const N: usize> = fn(&mut Controls<V, D, N>);

/// Segment validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SegmentError {
    /// No keyframes provided.
    EmptyKeyFrames,

    /// Duration of zero.
    ZeroDuration,

    /// Frame rate of zero.
    ZeroFrameRate,

    /// Explicit cue points do not pair up with the keyframes.
    CuePointMismatch { key_frames: usize, cue_points: usize },

    /// A cue point lies outside `[0, 1]`, or the first is not 0 or the last is not 1.
    CuePointOutOfRange,

    /// Cue points decrease somewhere.
    CuePointsOutOfOrder,

    /// A `Copy` keyframe refers to itself or to a later keyframe.
    InvalidCopyIndex { frame: usize, index: usize },

    /// Segment capacity exceeded.
    CapacityExceeded,
}

impl core::fmt::Display for SegmentError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SegmentError::EmptyKeyFrames => {
                write!(f, "segment must have at least one keyframe")
            }
            SegmentError::ZeroDuration => {
                write!(f, "segment duration must be greater than zero")
            }
            SegmentError::ZeroFrameRate => {
                write!(f, "segment frame rate must be greater than zero")
            }
            SegmentError::CuePointMismatch {
                key_frames,
                cue_points,
            } => {
                write!(
                    f,
                    "{} keyframes cannot pair with {} cue points",
                    key_frames, cue_points
                )
            }
            SegmentError::CuePointOutOfRange => {
                write!(f, "cue points must run from 0.0 to 1.0")
            }
            SegmentError::CuePointsOutOfOrder => {
                write!(f, "cue points must be non-decreasing")
            }
            SegmentError::InvalidCopyIndex { frame, index } => {
                write!(
                    f,
                    "keyframe {} copies keyframe {}, which does not precede it",
                    frame, index
                )
            }
            SegmentError::CapacityExceeded => {
                write!(f, "segment capacity exceeded")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SegmentError {}

/// One queued unit of animation: keyframes placed on cue points, played over a duration.
///
/// Built and validated through [`SegmentBuilder`]; immutable afterwards.
///
/// # Type Parameters
/// * `V` - The animated value (e.g. `f32` degrees, `Srgb`)
/// * `D` - The duration type
/// * `N` - Maximum number of keyframes
#[derive(Debug, Clone)]
pub struct Segment<V, D: TimeDuration, const N: usize> {
    duration: D,
    cue_points: Vec<f32, N>,
    key_frames: Vec<KeyFrame<V>, N>,
    easing: Easing,
    looping: bool,
    metronomic: bool,
    fps: u16,
    on_complete: Option<Callback<V, D, N>>,
    on_loop: Option<Callback<V, D, N>>,
}

impl<V: Copy, D: TimeDuration, const N: usize> Segment<V, D, N> {
    /// Creates a new segment builder.
    pub fn builder() -> SegmentBuilder<V, D, N> {
        SegmentBuilder::new()
    }

    pub fn duration(&self) -> D {
        self.duration
    }

    pub fn cue_points(&self) -> &[f32] {
        &self.cue_points
    }

    pub fn key_frames(&self) -> &[KeyFrame<V>] {
        &self.key_frames
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Whether a looping segment reverses direction on every pass.
    pub fn is_metronomic(&self) -> bool {
        self.metronomic
    }

    pub fn fps(&self) -> u16 {
        self.fps
    }

    /// Interval between frames at this segment's frame rate.
    pub fn frame_period(&self) -> D {
        D::from_millis((1000 / u64::from(self.fps)).max(1))
    }

    pub fn on_complete(&self) -> Option<Callback<V, D, N>> {
        self.on_complete
    }

    pub fn on_loop(&self) -> Option<Callback<V, D, N>> {
        self.on_loop
    }
}

/// Builder for constructing validated segments.
#[derive(Debug)]
pub struct SegmentBuilder<V, D: TimeDuration, const N: usize> {
    duration: D,
    cue_points: Option<Vec<f32, N>>,
    key_frames: Vec<KeyFrame<V>, N>,
    easing: Easing,
    looping: bool,
    metronomic: bool,
    fps: u16,
    on_complete: Option<Callback<V, D, N>>,
    on_loop: Option<Callback<V, D, N>>,
}

impl<V: Copy, D: TimeDuration, const N: usize> SegmentBuilder<V, D, N> {
    /// Creates a builder with the default duration, easing and frame rate.
    pub fn new() -> Self {
        Self {
            duration: D::from_millis(DEFAULT_DURATION_MS),
            cue_points: None,
            key_frames: Vec::new(),
            easing: Easing::Linear,
            looping: false,
            metronomic: false,
            fps: DEFAULT_FPS,
            on_complete: None,
            on_loop: None,
        }
    }

    pub fn duration(mut self, duration: D) -> Self {
        self.duration = duration;
        self
    }

    /// Appends a keyframe.
    ///
    /// # Errors
    /// Returns `CapacityExceeded` if `N` keyframes are already present.
    pub fn key_frame(mut self, frame: KeyFrame<V>) -> Result<Self, SegmentError> {
        self.key_frames
            .push(frame)
            .map_err(|_| SegmentError::CapacityExceeded)?;
        Ok(self)
    }

    /// Appends several keyframes.
    pub fn key_frames(mut self, frames: &[KeyFrame<V>]) -> Result<Self, SegmentError> {
        self.key_frames
            .extend_from_slice(frames)
            .map_err(|_| SegmentError::CapacityExceeded)?;
        Ok(self)
    }

    /// Sets explicit cue points, one per keyframe.
    ///
    /// Without explicit cue points, keyframes are spread evenly over the segment.
    pub fn cue_points(mut self, points: &[f32]) -> Result<Self, SegmentError> {
        let points = Vec::from_slice(points).map_err(|_| SegmentError::CapacityExceeded)?;
        self.cue_points = Some(points);
        Ok(self)
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Repeats the segment until the animation is stopped.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Reverses direction every pass instead of restarting. Only meaningful when looping.
    pub fn metronomic(mut self, metronomic: bool) -> Self {
        self.metronomic = metronomic;
        self
    }

    pub fn fps(mut self, fps: u16) -> Self {
        self.fps = fps;
        self
    }

    pub fn on_complete(mut self, callback: Callback<V, D, N>) -> Self {
        self.on_complete = Some(callback);
        self
    }

    pub fn on_loop(mut self, callback: Callback<V, D, N>) -> Self {
        self.on_loop = Some(callback);
        self
    }

    /// Builds and validates the segment.
    ///
    /// # Errors
    /// * `EmptyKeyFrames` - No keyframes were added
    /// * `ZeroDuration` / `ZeroFrameRate` - Non-positive timing
    /// * `CuePointMismatch` - Explicit cue points and keyframes differ in length
    /// * `CuePointOutOfRange` / `CuePointsOutOfOrder` - Malformed cue points
    /// * `InvalidCopyIndex` - A `Copy` keyframe looks forward
    /// * `CapacityExceeded` - No room for the implied starting keyframe
    pub fn build(self) -> Result<Segment<V, D, N>, SegmentError> {
        let SegmentBuilder {
            duration,
            cue_points,
            mut key_frames,
            easing,
            looping,
            metronomic,
            fps,
            on_complete,
            on_loop,
        } = self;

        if key_frames.is_empty() {
            return Err(SegmentError::EmptyKeyFrames);
        }
        if duration.as_millis() == 0 {
            return Err(SegmentError::ZeroDuration);
        }
        if fps == 0 {
            return Err(SegmentError::ZeroFrameRate);
        }

        let cue_points = match cue_points {
            Some(points) => {
                if points.len() != key_frames.len() {
                    return Err(SegmentError::CuePointMismatch {
                        key_frames: key_frames.len(),
                        cue_points: points.len(),
                    });
                }
                validate_cue_points(&points)?;
                points
            }
            None => {
                // A lone keyframe is a target: tween toward it from wherever the device is.
                if key_frames.len() == 1 {
                    key_frames
                        .insert(0, KeyFrame::Current)
                        .map_err(|_| SegmentError::CapacityExceeded)?;
                }
                even_cue_points(key_frames.len())?
            }
        };

        for (frame, key_frame) in key_frames.iter().enumerate() {
            if let KeyFrame::Copy { index, .. } = key_frame {
                if *index >= frame {
                    return Err(SegmentError::InvalidCopyIndex {
                        frame,
                        index: *index,
                    });
                }
            }
        }

        Ok(Segment {
            duration,
            cue_points,
            key_frames,
            easing,
            looping,
            metronomic,
            fps,
            on_complete,
            on_loop,
        })
    }
}

impl<V: Copy, D: TimeDuration, const N: usize> Default for SegmentBuilder<V, D, N> {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_cue_points(points: &[f32]) -> Result<(), SegmentError> {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return Err(SegmentError::CuePointOutOfRange);
    };
    if first != 0.0 || last != 1.0 || points.len() < 2 {
        return Err(SegmentError::CuePointOutOfRange);
    }
    if points.iter().any(|p| !(0.0..=1.0).contains(p)) {
        return Err(SegmentError::CuePointOutOfRange);
    }
    if points.windows(2).any(|pair| pair[1] < pair[0]) {
        return Err(SegmentError::CuePointsOutOfOrder);
    }
    Ok(())
}

fn even_cue_points<const N: usize>(count: usize) -> Result<Vec<f32, N>, SegmentError> {
    let last = (count - 1) as f32;
    let mut points = Vec::new();
    for i in 0..count {
        points
            .push(i as f32 / last)
            .map_err(|_| SegmentError::CapacityExceeded)?;
    }
    Ok(points)
}
