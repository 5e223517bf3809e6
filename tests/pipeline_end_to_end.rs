use stardist_nms::{
    polygon_to_world, ClipperNonZero, DistView, LabelAllocator, NmsConfig, NmsParams, ProbView,
    StarDistError, StarDistNms,
};

/// Paints `objects` (i, j, score, radius) into a `[W, H]` / `[W, H, R]` prediction.
/// Pixels within `radius` of an object centre get a weaker, decaying score.
fn synth(
    width: usize,
    height: usize,
    nrays: usize,
    objects: &[(usize, usize, f32, f32)],
) -> (Vec<f32>, Vec<f32>) {
    let mut prob = vec![0.0f32; width * height];
    let mut dist = vec![0.0f32; width * height * nrays];
    for &(ci, cj, score, radius) in objects {
        for i in 0..width {
            for j in 0..height {
                let di = i as f32 - ci as f32;
                let dj = j as f32 - cj as f32;
                let r = (di * di + dj * dj).sqrt();
                if r > radius - 1.0 {
                    continue;
                }
                let s = score * (1.0 - r / radius);
                let idx = i * height + j;
                if s > prob[idx] {
                    prob[idx] = s;
                    for k in 0..nrays {
                        let phi = 2.0 * std::f32::consts::PI * k as f32 / nrays as f32;
                        // Distance from (i, j) to the circle around the centre along phi.
                        let (sin, cos) = phi.sin_cos();
                        let b = di * cos + dj * sin;
                        let c = di * di + dj * dj - radius * radius;
                        dist[idx * nrays + k] = -b + (b * b - c).sqrt();
                    }
                }
            }
        }
    }
    (prob, dist)
}

#[test]
fn separated_blobs_yield_one_detection_each() {
    let (w, h, r) = (40, 32, 16);
    let objects = [(10, 10, 0.95, 5.0), (28, 20, 0.9, 6.0), (10, 25, 0.85, 4.0)];
    let (prob, dist) = synth(w, h, r, &objects);
    let prob = ProbView::new(&prob, w, h).unwrap();
    let dist = DistView::new(&dist, w, h, r).unwrap();

    let nms = StarDistNms::new().with_config(NmsConfig {
        prob_thresh: 0.3,
        nms_thresh: 0.3,
        ..NmsConfig::default()
    });
    let seg = nms.segment(prob, dist).unwrap();
    assert!(seg.candidates().len() > objects.len());

    let det = seg.detections();
    assert_eq!(det.len(), objects.len());
    let scores: Vec<f32> = det.iter().map(|c| c.score).collect();
    assert_eq!(scores, vec![0.95, 0.9, 0.85]);

    for (cand, &(ci, cj, _, radius)) in det.iter().zip(&objects) {
        assert_eq!(cand.origin.x, ci as i64 * 100);
        assert_eq!(cand.origin.y, cj as i64 * 100);
        let expected = std::f64::consts::PI * (radius as f64 * 100.0).powi(2);
        assert!((cand.area - expected).abs() / expected < 0.05);
        let world = polygon_to_world(&cand.polygon);
        assert_eq!(world.len(), r);
        assert!((world[0][0] - (ci as f32 + radius + 0.5)).abs() < 0.02);
    }
}

#[test]
fn paint_order_puts_best_winner_last_with_smallest_label() {
    let (w, h, r) = (30, 30, 8);
    let objects = [(8, 8, 0.9, 4.0), (20, 20, 0.8, 4.0)];
    let (prob, dist) = synth(w, h, r, &objects);
    let seg = StarDistNms::new()
        .segment(
            ProbView::new(&prob, w, h).unwrap(),
            DistView::new(&dist, w, h, r).unwrap(),
        )
        .unwrap();
    let det = seg.detections();
    assert_eq!(det.len(), 2);

    let mut labels = LabelAllocator::new();
    let painted = det.paint_order(&mut labels);
    let order: Vec<(u16, f32)> = painted.iter().map(|(id, c)| (*id, c.score)).collect();
    assert_eq!(order, vec![(2, 0.8), (1, 0.9)]);
    assert_eq!(labels.issued(), 2);
}

#[test]
fn timelapse_frames_are_independent_and_labels_continue() {
    let (w, h, r) = (24, 24, 8);
    let (p0, d0) = synth(w, h, r, &[(8, 8, 0.9, 4.0)]);
    let (p1, d1) = synth(w, h, r, &[(6, 6, 0.9, 3.0), (16, 16, 0.8, 4.0)]);
    let prob: Vec<f32> = p0.iter().chain(&p1).copied().collect();
    let dist: Vec<f32> = d0.iter().chain(&d1).copied().collect();

    let probs = ProbView::frames(&prob, &[2, w, h]).unwrap();
    let dists = DistView::frames(&dist, &[2, w, h, r]).unwrap();
    let nms = StarDistNms::new();
    let frames = nms.segment_frames(&probs, &dists).unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].winners().len(), 1);
    assert_eq!(frames[1].winners().len(), 2);

    let single = nms.segment(probs[1], dists[1]).unwrap();
    assert_eq!(single.winners(), frames[1].winners());

    let mut labels = LabelAllocator::new();
    let f0: Vec<u16> = frames[0]
        .detections()
        .paint_order(&mut labels)
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    let f1: Vec<u16> = frames[1]
        .detections()
        .paint_order(&mut labels)
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    assert_eq!(f0, vec![1]);
    assert_eq!(f1, vec![3, 2]);

    let err = nms.segment_frames(&probs, &dists[..1]).unwrap_err();
    assert_eq!(
        err,
        StarDistError::ShapeMismatch {
            prob: vec![2],
            dist: vec![1],
        }
    );
}

#[test]
fn resuppress_replaces_previous_outcome() {
    let (w, h, r) = (20, 20, 8);
    let (prob, dist) = synth(w, h, r, &[(10, 10, 0.9, 5.0)]);
    let mut seg = StarDistNms::new()
        .with_config(NmsConfig {
            prob_thresh: 0.2,
            ..NmsConfig::default()
        })
        .segment(
            ProbView::new(&prob, w, h).unwrap(),
            DistView::new(&dist, w, h, r).unwrap(),
        )
        .unwrap();
    assert_eq!(seg.winners().len(), 1);
    let n = seg.candidates().len();
    assert!(n > 1);

    seg.resuppress(
        &NmsParams {
            overlap_thresh: 0.0,
            parallel: false,
        },
        &ClipperNonZero,
    )
    .unwrap();
    assert_eq!(seg.winners().len(), 1);
    assert_eq!(seg.outcome().suppressed().iter().filter(|&&s| s).count(), n - 1);
}
