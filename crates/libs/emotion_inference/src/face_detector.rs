use crate::error::{InferenceError, Result};
use crate::frame::{FaceRect, Frame};
use ndarray::Array4;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;

// Detector contract: input resolution and decision thresholds are fixed
// properties of the model artifact, not tunables.
const INPUT_WIDTH: u32 = 320;
const INPUT_HEIGHT: u32 = 240;
const SCORE_THRESHOLD: f32 = 0.7;
const IOU_THRESHOLD: f32 = 0.3;
/// Boxes smaller than this on either edge (in frame pixels) are noise.
const MIN_FACE_EDGE: u32 = 24;

/// Finds face bounding boxes in a frame.
///
/// Implementations must be deterministic for a given frame and model; an
/// empty result is a valid outcome, not an error.
pub trait FaceLocator: Send + Sync {
    fn locate(&self, frame: &Frame) -> Result<Vec<FaceRect>>;
}

/// ONNX face detector (UltraFace-style: one score tensor, one box tensor of
/// normalized corner coordinates).
pub struct OnnxFaceDetector {
    session: Mutex<Session>,
}

impl OnnxFaceDetector {
    pub fn load(model_path: &Path) -> Result<Self> {
        let session = Session::builder()
            .and_then(|builder| builder.with_intra_threads(1))
            .and_then(|builder| builder.commit_from_file(model_path))
            .map_err(|e| InferenceError::ModelLoad(format!("face detector: {e}")))?;
        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl FaceLocator for OnnxFaceDetector {
    fn locate(&self, frame: &Frame) -> Result<Vec<FaceRect>> {
        let input = preprocess(frame)?;
        let tensor = Tensor::from_array(input)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| InferenceError::InferenceFailed("detector session poisoned".into()))?;
        let outputs = session.run(ort::inputs![tensor])?;

        let mut output_iter = outputs.iter();
        let (_, scores_value) = output_iter
            .next()
            .ok_or_else(|| InferenceError::InferenceFailed("detector produced no outputs".into()))?;
        let (_, boxes_value) = output_iter.next().ok_or_else(|| {
            InferenceError::InferenceFailed("detector produced no box output".into())
        })?;

        let (_, scores) = scores_value.try_extract_tensor::<f32>()?;
        let (_, boxes) = boxes_value.try_extract_tensor::<f32>()?;

        Ok(decode_detections(
            scores,
            boxes,
            frame.width,
            frame.height,
        ))
    }
}

/// Resizes to the detector's input resolution and normalizes each channel to
/// roughly [-1, 1], laid out as `[batch, channel, height, width]`.
fn preprocess(frame: &Frame) -> Result<Array4<f32>> {
    let image = frame.to_rgb_image()?;
    let resized = image::imageops::resize(
        &image,
        INPUT_WIDTH,
        INPUT_HEIGHT,
        image::imageops::FilterType::Triangle,
    );

    let mut input = Array4::<f32>::zeros((1, 3, INPUT_HEIGHT as usize, INPUT_WIDTH as usize));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for channel in 0..3 {
            input[[0, channel, y as usize, x as usize]] =
                (f32::from(pixel[channel]) - 127.0) / 128.0;
        }
    }
    Ok(input)
}

/// Thresholds the per-anchor face scores, suppresses overlapping boxes, and
/// maps the survivors back to frame pixel coordinates.
fn decode_detections(scores: &[f32], boxes: &[f32], width: u32, height: u32) -> Vec<FaceRect> {
    let anchor_count = (scores.len() / 2).min(boxes.len() / 4);
    let mut candidates: Vec<(f32, [f32; 4])> = Vec::new();

    for anchor in 0..anchor_count {
        let face_score = scores[anchor * 2 + 1];
        if face_score < SCORE_THRESHOLD {
            continue;
        }
        candidates.push((
            face_score,
            [
                boxes[anchor * 4],
                boxes[anchor * 4 + 1],
                boxes[anchor * 4 + 2],
                boxes[anchor * 4 + 3],
            ],
        ));
    }

    candidates.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    non_max_suppression(&candidates)
        .iter()
        .filter_map(|raw| to_frame_rect(raw, width, height))
        .collect()
}

/// Greedy NMS over score-sorted candidates.
fn non_max_suppression(candidates: &[(f32, [f32; 4])]) -> Vec<[f32; 4]> {
    let mut kept: Vec<[f32; 4]> = Vec::new();
    for (_, candidate) in candidates {
        if kept
            .iter()
            .all(|existing| iou(existing, candidate) < IOU_THRESHOLD)
        {
            kept.push(*candidate);
        }
    }
    kept
}

fn iou(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    let overlap_width = (a[2].min(b[2]) - a[0].max(b[0])).max(0.0);
    let overlap_height = (a[3].min(b[3]) - a[1].max(b[1])).max(0.0);
    let intersection = overlap_width * overlap_height;
    let area_a = (a[2] - a[0]).max(0.0) * (a[3] - a[1]).max(0.0);
    let area_b = (b[2] - b[0]).max(0.0) * (b[3] - b[1]).max(0.0);
    let union = area_a + area_b - intersection;
    if union <= 0.0 { 0.0 } else { intersection / union }
}

fn to_frame_rect(raw: &[f32; 4], width: u32, height: u32) -> Option<FaceRect> {
    let x1 = (raw[0].clamp(0.0, 1.0) * width as f32) as u32;
    let y1 = (raw[1].clamp(0.0, 1.0) * height as f32) as u32;
    let x2 = (raw[2].clamp(0.0, 1.0) * width as f32) as u32;
    let y2 = (raw[3].clamp(0.0, 1.0) * height as f32) as u32;
    let rect = FaceRect {
        x: x1,
        y: y1,
        width: x2.saturating_sub(x1),
        height: y2.saturating_sub(y1),
    };
    (rect.width >= MIN_FACE_EDGE && rect.height >= MIN_FACE_EDGE).then_some(rect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        assert_eq!(iou(&[0.0, 0.0, 0.1, 0.1], &[0.5, 0.5, 0.6, 0.6]), 0.0);
    }

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let b = [0.2, 0.2, 0.4, 0.4];
        assert!((iou(&b, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn nms_drops_heavily_overlapping_boxes() {
        let candidates = vec![
            (0.95, [0.10, 0.10, 0.30, 0.30]),
            (0.90, [0.11, 0.11, 0.31, 0.31]), // same face
            (0.80, [0.60, 0.60, 0.80, 0.80]), // different face
        ];
        let kept = non_max_suppression(&candidates);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0], [0.10, 0.10, 0.30, 0.30]);
    }

    #[test]
    fn decode_scales_boxes_to_frame_pixels() {
        // one anchor above threshold, one below
        let scores = [0.1, 0.92, 0.8, 0.2];
        let boxes = [0.25, 0.25, 0.75, 0.75, 0.0, 0.0, 1.0, 1.0];
        let rects = decode_detections(&scores, &boxes, 640, 480);
        assert_eq!(
            rects,
            vec![FaceRect {
                x: 160,
                y: 120,
                width: 320,
                height: 240
            }]
        );
    }

    #[test]
    fn decode_drops_tiny_boxes() {
        let scores = [0.0, 0.99];
        let boxes = [0.50, 0.50, 0.51, 0.51];
        assert!(decode_detections(&scores, &boxes, 640, 480).is_empty());
    }
}
