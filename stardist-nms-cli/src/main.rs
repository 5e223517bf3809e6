use clap::Parser;
use serde::{Deserialize, Serialize};
use stardist_nms::{
    bbox_to_world, point_to_world, polygon_to_world, DistView, LabelAllocator, NmsConfig,
    ProbView, Segmentation, StarDistNms, StarDistResult,
};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "StarDist polygon NMS CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct NmsConfigJson {
    prob_thresh: f32,
    nms_thresh: f64,
    boundary: usize,
    parallel: bool,
}

impl Default for NmsConfigJson {
    fn default() -> Self {
        let cfg = NmsConfig::default();
        Self {
            prob_thresh: cfg.prob_thresh,
            nms_thresh: cfg.nms_thresh,
            boundary: cfg.boundary,
            parallel: cfg.parallel,
        }
    }
}

impl From<NmsConfigJson> for NmsConfig {
    fn from(value: NmsConfigJson) -> Self {
        Self {
            prob_thresh: value.prob_thresh,
            nms_thresh: value.nms_thresh,
            boundary: value.boundary,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    prediction_path: String,
    output_path: Option<String>,
    nms: NmsConfigJson,
}

#[derive(Debug, Deserialize)]
struct Array {
    shape: Vec<usize>,
    data: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    prob: Array,
    dist: Array,
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    label: u16,
    score: f32,
    origin: [f32; 2],
    bbox: [f32; 4],
    polygon: Vec<[f32; 2]>,
}

#[derive(Debug, Serialize)]
struct FrameRecord {
    frame: usize,
    num_candidates: usize,
    detections: Vec<DetectionRecord>,
}

#[derive(Debug, Serialize)]
struct Output {
    frames: Vec<FrameRecord>,
    num_labels: u64,
    labels_wrapped: bool,
}

fn frame_record(frame: usize, seg: &Segmentation, labels: &mut LabelAllocator) -> FrameRecord {
    let det = seg.detections();
    let mut detections: Vec<DetectionRecord> = det
        .paint_order(labels)
        .into_iter()
        .map(|(label, cand)| DetectionRecord {
            label,
            score: cand.score,
            origin: point_to_world(cand.origin),
            bbox: bbox_to_world(&cand.bbox),
            polygon: polygon_to_world(&cand.polygon),
        })
        .collect();
    // Report best-first; paint order is the reverse.
    detections.reverse();
    FrameRecord {
        frame,
        num_candidates: det.num_candidates(),
        detections,
    }
}

fn parse_config(text: &str) -> Result<Config, Box<dyn std::error::Error>> {
    let config: Config = serde_json::from_str(text)?;
    if config.prediction_path.is_empty() {
        return Err("prediction_path must be set in the config".into());
    }
    Ok(config)
}

/// A 3-axis probability array is a timelapse `[T, W, H]`; otherwise a single frame.
fn segment_prediction(
    nms: &StarDistNms,
    prediction: &Prediction,
) -> StarDistResult<Vec<Segmentation>> {
    if prediction.prob.shape.len() == 3 {
        let probs = ProbView::frames(&prediction.prob.data, &prediction.prob.shape)?;
        let dists = DistView::frames(&prediction.dist.data, &prediction.dist.shape)?;
        nms.segment_frames(&probs, &dists)
    } else {
        let prob = ProbView::from_shape(&prediction.prob.data, &prediction.prob.shape)?;
        let dist = DistView::from_shape(&prediction.dist.data, &prediction.dist.shape)?;
        Ok(vec![nms.segment(prob, dist)?])
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("stardist_nms=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config = parse_config(&config_text)?;

    let prediction_text = fs::read_to_string(&config.prediction_path)?;
    let prediction: Prediction = serde_json::from_str(&prediction_text)?;

    let nms = StarDistNms::new().with_config(config.nms.into());
    let segmentations = segment_prediction(&nms, &prediction)?;

    let mut labels = LabelAllocator::new();
    let frames = segmentations
        .iter()
        .enumerate()
        .map(|(frame, seg)| frame_record(frame, seg, &mut labels))
        .collect();
    let output = Output {
        frames,
        num_labels: labels.issued(),
        labels_wrapped: labels.has_wrapped(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stardist_nms::StarDistError;

    const SIDE: usize = 12;
    const RAYS: usize = 4;

    /// One frame with unit-radius peaks at (3, 3) scoring 0.9 and (8, 8) scoring 0.8.
    fn frame() -> (Vec<f32>, Vec<f32>) {
        let mut prob = vec![0.0f32; SIDE * SIDE];
        prob[3 * SIDE + 3] = 0.9;
        prob[8 * SIDE + 8] = 0.8;
        (prob, vec![1.0f32; SIDE * SIDE * RAYS])
    }

    fn prediction(frames: usize, dist_frames: usize) -> Prediction {
        let (prob, dist) = frame();
        let (prob_shape, dist_shape) = if frames == 0 {
            (vec![SIDE, SIDE], vec![SIDE, SIDE, RAYS])
        } else {
            (
                vec![frames, SIDE, SIDE],
                vec![dist_frames, SIDE, SIDE, RAYS],
            )
        };
        Prediction {
            prob: Array {
                shape: prob_shape,
                data: prob.repeat(frames.max(1)),
            },
            dist: Array {
                shape: dist_shape,
                data: dist.repeat(dist_frames.max(1)),
            },
        }
    }

    #[test]
    fn frame_record_lists_best_first_with_ascending_labels() {
        let segs = segment_prediction(&StarDistNms::new(), &prediction(0, 0)).unwrap();
        assert_eq!(segs.len(), 1);

        let mut labels = LabelAllocator::new();
        let record = frame_record(0, &segs[0], &mut labels);
        assert_eq!(record.num_candidates, 2);
        let got: Vec<(u16, f32)> = record
            .detections
            .iter()
            .map(|d| (d.label, d.score))
            .collect();
        assert_eq!(got, vec![(1, 0.9), (2, 0.8)]);
        assert_eq!(record.detections[0].origin, [3.5, 3.5]);
        assert_eq!(labels.issued(), 2);
    }

    #[test]
    fn three_axis_probability_is_a_timelapse() {
        let segs = segment_prediction(&StarDistNms::new(), &prediction(2, 2)).unwrap();
        assert_eq!(segs.len(), 2);

        let mut labels = LabelAllocator::new();
        let records: Vec<FrameRecord> = segs
            .iter()
            .enumerate()
            .map(|(frame, seg)| frame_record(frame, seg, &mut labels))
            .collect();
        let ids: Vec<Vec<u16>> = records
            .iter()
            .map(|r| r.detections.iter().map(|d| d.label).collect())
            .collect();
        assert_eq!(ids, vec![vec![1, 2], vec![3, 4]]);
    }

    #[test]
    fn timelapse_frame_count_mismatch_is_rejected() {
        let err = segment_prediction(&StarDistNms::new(), &prediction(2, 3)).unwrap_err();
        assert_eq!(
            err,
            StarDistError::ShapeMismatch {
                prob: vec![2],
                dist: vec![3],
            }
        );
    }

    #[test]
    fn config_requires_prediction_path() {
        assert!(parse_config("{}").is_err());
        assert!(parse_config(r#"{"nms": {"nms_thresh": 0.3}}"#).is_err());

        let text = r#"{"prediction_path": "pred.json", "nms": {"nms_thresh": 0.3}}"#;
        let config = parse_config(text).unwrap();
        let nms: NmsConfig = config.nms.into();
        assert_eq!(nms.nms_thresh, 0.3);
        assert_eq!(nms.prob_thresh, NmsConfig::default().prob_thresh);
        assert!(config.output_path.is_none());
    }

    #[test]
    fn example_config_parses() {
        let config = parse_config(EXAMPLE_JSON).unwrap();
        assert!(!config.prediction_path.is_empty());
    }
}
