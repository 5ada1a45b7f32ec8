mod common;

use common::{attentive, distracted, face};
use readfocus_lib::geometry::{eye_aspect_ratio, head_pose_deviation, mouth_opening_ratio};
use readfocus_lib::session::{percentages, select_best, summarize, SessionMeta};
use readfocus_lib::{
    DocumentId, EngineError, FrameClassifier, FrameMetrics, IndicatorName, LandmarkSet,
    PerIndicator, Point, SessionAccumulator, SessionCounters,
};

fn run_session(frames: &[LandmarkSet]) -> SessionAccumulator {
    let classifier = FrameClassifier::default();
    let mut acc = SessionAccumulator::new();
    for landmarks in frames {
        let metrics = FrameMetrics::measure(landmarks).unwrap();
        acc.record(&classifier.classify(&metrics)).unwrap();
    }
    acc.close();
    acc
}

fn meta(document_id: DocumentId) -> SessionMeta {
    let now = chrono::Utc::now();
    SessionMeta {
        session_id: "scenario".into(),
        document_id,
        started_at: now,
        finished_at: now,
    }
}

#[test]
fn metrics_follow_landmark_geometry() {
    let set = face(0.35, -6.0, 12.0);
    let metrics = FrameMetrics::measure(&set).unwrap();

    assert!((metrics.avg_ear - 0.35).abs() < 1e-9);
    assert!((metrics.head_pose_deviation - 6.0).abs() < 1e-9);
    assert!((metrics.mouth_opening_ratio - 12.0).abs() < 1e-9);

    assert!((head_pose_deviation(&set.nose, &set.jaw).unwrap() - 6.0).abs() < 1e-9);
    assert!((mouth_opening_ratio(&set.mouth).unwrap() - 12.0).abs() < 1e-9);
}

#[test]
fn closed_eye_has_zero_aspect_ratio() {
    let eye = vec![
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(20.0, 0.0),
        Point::new(30.0, 0.0),
        Point::new(20.0, 0.0),
        Point::new(10.0, 0.0),
    ];
    assert_eq!(eye_aspect_ratio(&eye).unwrap(), 0.0);
}

#[test]
fn malformed_landmarks_are_rejected() {
    let mut set = attentive();
    set.jaw.truncate(10);
    assert!(matches!(
        FrameMetrics::measure(&set),
        Err(EngineError::MalformedInput { .. })
    ));

    let mut set = attentive();
    set.right_eye.push(Point::new(0.0, 0.0));
    assert!(matches!(
        FrameMetrics::measure(&set),
        Err(EngineError::MalformedInput { .. })
    ));
}

#[test]
fn typical_session_ranks_eye_openness_first() {
    // 8 of 10 frames with open eyes, 5 facing forward, 5 with closed mouth
    let frames: Vec<LandmarkSet> = (0..10)
        .map(|i| {
            let ear = if i < 8 { 0.35 } else { 0.1 };
            let nose_offset = if i < 5 { 3.0 } else { 30.0 };
            let lip_gap = if i >= 5 { 8.0 } else { 40.0 };
            face(ear, nose_offset, lip_gap)
        })
        .collect();

    let acc = run_session(&frames);
    let summary = summarize(&acc, meta(DocumentId::Medium)).unwrap();

    assert_eq!(summary.total_frames, 10);
    assert_eq!(summary.percentages.eye_openness, 80.0);
    assert_eq!(summary.percentages.head_pose, 50.0);
    assert_eq!(summary.percentages.mouth_closure, 50.0);
    assert_eq!(summary.best, IndicatorName::EyeOpenness);
}

#[test]
fn empty_session_reports_zeros() {
    let acc = run_session(&[]);
    let summary = summarize(&acc, meta(DocumentId::Short)).unwrap();

    assert_eq!(summary.total_frames, 0);
    assert_eq!(summary.percentages, PerIndicator::default());
    assert_eq!(summary.best, IndicatorName::EyeOpenness);
}

#[test]
fn fully_distracted_session_still_picks_first_indicator() {
    let acc = run_session(&vec![distracted(); 6]);
    let summary = summarize(&acc, meta(DocumentId::Long)).unwrap();

    assert_eq!(summary.total_frames, 6);
    assert_eq!(summary.best_percentage(), 0.0);
    assert_eq!(summary.best, IndicatorName::EyeOpenness);
}

#[test]
fn percentages_stay_in_range() {
    for total in [1u64, 3, 7, 250] {
        for satisfied in [0, total / 2, total] {
            let counters = SessionCounters {
                total_frames: total,
                satisfied_frames: PerIndicator {
                    eye_openness: satisfied,
                    head_pose: total - satisfied,
                    mouth_closure: total,
                },
            };
            let pct = percentages(&counters);
            for (_, value) in pct.iter() {
                assert!((0.0..=100.0).contains(value), "{value} out of range");
            }
            assert_eq!(pct.mouth_closure, 100.0);
        }
    }
}

#[test]
fn best_is_a_maximum_and_ties_keep_enumeration_order() {
    let pct = PerIndicator {
        eye_openness: 40.0,
        head_pose: 70.0,
        mouth_closure: 70.0,
    };
    let best = select_best(&pct);
    assert_eq!(best, IndicatorName::HeadPose);
    assert!(pct.iter().all(|(_, value)| *pct.get(best) >= *value));
}
