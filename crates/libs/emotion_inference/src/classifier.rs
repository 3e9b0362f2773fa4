use crate::error::{InferenceError, Result};
use crate::frame::{FaceRect, Frame};
use common_types::Emotion;
use ndarray::Array4;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;

/// Side length of the square grayscale crop the emotion model expects.
const INPUT_SIZE: u32 = 48;

/// Classifies the emotion shown in one face region of a frame.
pub trait EmotionClassifier: Send + Sync {
    fn classify(&self, frame: &Frame, face: FaceRect) -> Result<Emotion>;
}

/// ONNX emotion classifier over 48x48 grayscale crops.
pub struct OnnxEmotionClassifier {
    session: Mutex<Session>,
}

impl OnnxEmotionClassifier {
    pub fn load(model_path: &Path) -> Result<Self> {
        let session = Session::builder()
            .and_then(|builder| builder.with_intra_threads(1))
            .and_then(|builder| builder.commit_from_file(model_path))
            .map_err(|e| InferenceError::ModelLoad(format!("emotion classifier: {e}")))?;
        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl EmotionClassifier for OnnxEmotionClassifier {
    fn classify(&self, frame: &Frame, face: FaceRect) -> Result<Emotion> {
        let input = preprocess_face(frame, face)?;
        let tensor = Tensor::from_array(input)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| InferenceError::InferenceFailed("classifier session poisoned".into()))?;
        let outputs = session.run(ort::inputs![tensor])?;

        let (_, probabilities_value) = outputs.iter().next().ok_or_else(|| {
            InferenceError::InferenceFailed("classifier produced no outputs".into())
        })?;
        let (_, probabilities) = probabilities_value.try_extract_tensor::<f32>()?;

        let index = argmax(probabilities).ok_or_else(|| {
            InferenceError::InferenceFailed("classifier returned no probabilities".into())
        })?;
        Emotion::from_index(index).ok_or_else(|| {
            InferenceError::InferenceFailed(format!("classifier index {index} outside label set"))
        })
    }
}

/// Reproduces the preprocessing the model was trained with: crop the face,
/// grayscale, resize to 48x48, scale intensities to [0, 1], and shape as
/// `[batch, height, width, channel]`. Any deviation silently degrades the
/// model, so this stays in one place.
pub fn preprocess_face(frame: &Frame, face: FaceRect) -> Result<Array4<f32>> {
    if face.width == 0 || face.height == 0 {
        return Err(InferenceError::InvalidImage(
            "empty face region".to_string(),
        ));
    }
    let image = frame.to_rgb_image()?;
    let crop = image::imageops::crop_imm(&image, face.x, face.y, face.width, face.height).to_image();
    let gray = image::imageops::grayscale(&crop);
    let resized = image::imageops::resize(
        &gray,
        INPUT_SIZE,
        INPUT_SIZE,
        image::imageops::FilterType::Triangle,
    );

    let mut input = Array4::<f32>::zeros((1, INPUT_SIZE as usize, INPUT_SIZE as usize, 1));
    for (x, y, pixel) in resized.enumerate_pixels() {
        input[[0, y as usize, x as usize, 0]] = f32::from(pixel[0]) / 255.0;
    }
    Ok(input)
}

fn argmax(values: &[f32]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_picks_highest_probability() {
        assert_eq!(argmax(&[0.1, 0.05, 0.7, 0.15]), Some(2));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn preprocess_produces_normalized_48x48_batch() {
        let frame = Frame::new(100, 80, vec![200; 100 * 80 * 3]).expect("frame");
        let face = FaceRect {
            x: 10,
            y: 10,
            width: 60,
            height: 60,
        };
        let input = preprocess_face(&frame, face).expect("preprocess");
        assert_eq!(input.shape(), &[1, 48, 48, 1]);
        for value in &input {
            assert!((0.0..=1.0).contains(value));
        }
    }

    #[test]
    fn preprocess_rejects_empty_region() {
        let frame = Frame::new(10, 10, vec![0; 300]).expect("frame");
        let face = FaceRect {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        };
        assert!(preprocess_face(&frame, face).is_err());
    }
}
