//! Integration tests for Segment construction and validation

mod common;
use common::*;

use keyframe_animator::{
    DEFAULT_DURATION_MS, DEFAULT_FPS, Easing, KeyFrame, Segment, SegmentError, TimeDuration,
};

type TestSegment<const N: usize> = Segment<f32, TestDuration, N>;

#[test]
fn builder_applies_defaults() {
    let segment = TestSegment::<4>::builder()
        .key_frames(&[KeyFrame::to(0.0), KeyFrame::to(1.0)])
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(segment.duration(), TestDuration(DEFAULT_DURATION_MS));
    assert_eq!(segment.fps(), DEFAULT_FPS);
    assert_eq!(segment.easing(), Easing::Linear);
    assert!(!segment.is_looping());
    assert!(!segment.is_metronomic());
    assert!(segment.on_complete().is_none());
    assert!(segment.on_loop().is_none());
}

#[test]
fn omitted_cue_points_are_spread_evenly() {
    let segment = TestSegment::<8>::builder()
        .key_frames(&[
            KeyFrame::to(0.0),
            KeyFrame::to(1.0),
            KeyFrame::to(2.0),
            KeyFrame::to(3.0),
            KeyFrame::to(4.0),
        ])
        .unwrap()
        .build()
        .unwrap();

    let expected = [0.0, 0.25, 0.5, 0.75, 1.0];
    assert_eq!(segment.cue_points().len(), expected.len());
    for (cue, expected) in segment.cue_points().iter().zip(expected) {
        assert!(approx(*cue, expected));
    }
}

#[test]
fn single_keyframe_starts_from_current_value() {
    let segment = TestSegment::<4>::builder()
        .key_frame(KeyFrame::to(180.0))
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(
        segment.key_frames(),
        &[KeyFrame::Current, KeyFrame::to(180.0)]
    );
    assert_eq!(segment.cue_points(), &[0.0, 1.0]);
}

#[test]
fn single_keyframe_needs_room_for_starting_frame() {
    let result = TestSegment::<1>::builder()
        .key_frame(KeyFrame::to(1.0))
        .unwrap()
        .build();
    assert_eq!(result.unwrap_err(), SegmentError::CapacityExceeded);
}

#[test]
fn explicit_cue_points_are_kept() {
    let segment = TestSegment::<4>::builder()
        .key_frames(&[KeyFrame::to(0.0), KeyFrame::to(1.0), KeyFrame::to(0.0)])
        .unwrap()
        .cue_points(&[0.0, 0.1, 1.0])
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(segment.cue_points(), &[0.0, 0.1, 1.0]);
}

#[test]
fn builder_rejects_empty_keyframes() {
    let result = TestSegment::<4>::builder().build();
    assert_eq!(result.unwrap_err(), SegmentError::EmptyKeyFrames);
}

#[test]
fn builder_rejects_zero_duration() {
    let result = TestSegment::<4>::builder()
        .duration(TestDuration::ZERO)
        .key_frame(KeyFrame::to(1.0))
        .unwrap()
        .build();
    assert_eq!(result.unwrap_err(), SegmentError::ZeroDuration);
}

#[test]
fn builder_rejects_zero_fps() {
    let result = TestSegment::<4>::builder()
        .key_frame(KeyFrame::to(1.0))
        .unwrap()
        .fps(0)
        .build();
    assert_eq!(result.unwrap_err(), SegmentError::ZeroFrameRate);
}

#[test]
fn builder_rejects_mismatched_cue_points() {
    let result = TestSegment::<4>::builder()
        .key_frame(KeyFrame::to(0.0))
        .unwrap()
        .cue_points(&[0.0, 1.0])
        .unwrap()
        .build();
    assert_eq!(
        result.unwrap_err(),
        SegmentError::CuePointMismatch {
            key_frames: 1,
            cue_points: 2,
        }
    );
}

#[test]
fn builder_rejects_cue_points_not_spanning_unit_interval() {
    let frames = [KeyFrame::to(0.0), KeyFrame::to(1.0)];

    for cues in [[0.1, 1.0], [0.0, 0.9], [0.0, 1.5], [-0.5, 1.0]] {
        let result = TestSegment::<4>::builder()
            .key_frames(&frames)
            .unwrap()
            .cue_points(&cues)
            .unwrap()
            .build();
        assert_eq!(result.unwrap_err(), SegmentError::CuePointOutOfRange);
    }
}

#[test]
fn builder_rejects_decreasing_cue_points() {
    let result = TestSegment::<4>::builder()
        .key_frames(&[KeyFrame::to(0.0), KeyFrame::to(1.0), KeyFrame::to(2.0), KeyFrame::to(3.0)])
        .unwrap()
        .cue_points(&[0.0, 0.6, 0.4, 1.0])
        .unwrap()
        .build();
    assert_eq!(result.unwrap_err(), SegmentError::CuePointsOutOfOrder);
}

#[test]
fn repeated_cue_points_are_allowed_inside_the_span() {
    let result = TestSegment::<4>::builder()
        .key_frames(&[KeyFrame::to(0.0), KeyFrame::to(1.0), KeyFrame::to(2.0)])
        .unwrap()
        .cue_points(&[0.0, 0.5, 0.5])
        .unwrap()
        .build();
    // Last cue must still be 1.0
    assert_eq!(result.unwrap_err(), SegmentError::CuePointOutOfRange);

    let result = TestSegment::<4>::builder()
        .key_frames(&[KeyFrame::to(0.0), KeyFrame::to(1.0), KeyFrame::to(2.0), KeyFrame::to(3.0)])
        .unwrap()
        .cue_points(&[0.0, 0.5, 0.5, 1.0])
        .unwrap()
        .build();
    assert!(result.is_ok());
}

#[test]
fn builder_rejects_forward_copy() {
    let result = TestSegment::<4>::builder()
        .key_frames(&[
            KeyFrame::to(0.0),
            KeyFrame::Copy {
                index: 1,
                easing: None,
            },
        ])
        .unwrap()
        .build();
    assert_eq!(
        result.unwrap_err(),
        SegmentError::InvalidCopyIndex { frame: 1, index: 1 }
    );
}

#[test]
fn builder_reports_capacity_overflow() {
    let result = TestSegment::<2>::builder()
        .key_frame(KeyFrame::to(0.0))
        .unwrap()
        .key_frame(KeyFrame::to(1.0))
        .unwrap()
        .key_frame(KeyFrame::to(2.0));
    assert!(matches!(result, Err(SegmentError::CapacityExceeded)));

    let result = TestSegment::<2>::builder().cue_points(&[0.0, 0.5, 1.0]);
    assert!(matches!(result, Err(SegmentError::CapacityExceeded)));
}

#[test]
fn frame_period_follows_fps() {
    let segment = TestSegment::<4>::builder()
        .key_frame(KeyFrame::to(1.0))
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(segment.frame_period(), TestDuration(33));

    let segment = TestSegment::<4>::builder()
        .key_frame(KeyFrame::to(1.0))
        .unwrap()
        .fps(50)
        .build()
        .unwrap();
    assert_eq!(segment.frame_period(), TestDuration(20));

    // Frame rates above 1 kHz still yield a non-zero period
    let segment = TestSegment::<4>::builder()
        .key_frame(KeyFrame::to(1.0))
        .unwrap()
        .fps(5000)
        .build()
        .unwrap();
    assert_eq!(segment.frame_period(), TestDuration(1));
}

#[test]
fn errors_render_human_readable_messages() {
    let message = format!(
        "{}",
        SegmentError::CuePointMismatch {
            key_frames: 3,
            cue_points: 2,
        }
    );
    assert_eq!(message, "3 keyframes cannot pair with 2 cue points");
    assert_eq!(
        format!("{}", SegmentError::ZeroDuration),
        "segment duration must be greater than zero"
    );
}
