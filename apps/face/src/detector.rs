//! Face detection worker. The cascade detector needs `&mut self` per call,
//! so one dedicated thread owns it for the life of the process and requests
//! reach it over a channel. Detection is serialized; handlers await their
//! reply on a oneshot.

use crossbeam_channel::{Receiver, Sender};
use image::GrayImage;
use rustface::ImageData;
use serde::Serialize;
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::errors::DetectError;

// Detector parameters, fixed at load time. The defaults the model was
// published with; tightening them trades recall for speed.
const MIN_FACE_SIZE: u32 = 20;
const SCORE_THRESH: f64 = 2.0;
const PYRAMID_SCALE_FACTOR: f32 = 0.8;
const SLIDE_WINDOW_STEP: u32 = 4;

/// One detected face in pixel coordinates of the submitted frame.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FaceBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

struct DetectJob {
    frame: GrayImage,
    reply: oneshot::Sender<Vec<FaceBox>>,
}

/// Cheap, cloneable handle to the detection worker.
#[derive(Clone)]
pub struct DetectorHandle {
    jobs: Sender<DetectJob>,
}

impl DetectorHandle {
    /// Queues a grayscale frame for detection and waits for the boxes.
    pub async fn detect(&self, frame: GrayImage) -> Result<Vec<FaceBox>, DetectError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.jobs
            .send(DetectJob {
                frame,
                reply: reply_tx,
            })
            .map_err(|_| DetectError::WorkerGone)?;
        reply_rx.await.map_err(|_| DetectError::WorkerGone)
    }
}

/// Spawns the worker thread and blocks until it has loaded the model.
/// Returns an error if the model cannot be read, so a service that cannot
/// detect never starts listening.
pub fn spawn(model_path: &str) -> anyhow::Result<DetectorHandle> {
    let (job_tx, job_rx) = crossbeam_channel::unbounded::<DetectJob>();
    let (ready_tx, ready_rx) = crossbeam_channel::bounded::<Result<(), String>>(1);
    let path = model_path.to_string();

    std::thread::Builder::new()
        .name("face-detector".to_string())
        .spawn(move || run_worker(&path, &ready_tx, &job_rx))?;

    match ready_rx.recv() {
        Ok(Ok(())) => Ok(DetectorHandle { jobs: job_tx }),
        Ok(Err(e)) => anyhow::bail!("failed to load face model from {model_path}: {e}"),
        Err(_) => anyhow::bail!("face detection worker exited before signalling readiness"),
    }
}

fn run_worker(model_path: &str, ready: &Sender<Result<(), String>>, jobs: &Receiver<DetectJob>) {
    // The detector is created on this thread because the trait object is
    // not Send; the ready channel carries any load failure back out.
    let mut detector = match rustface::create_detector(model_path) {
        Ok(detector) => detector,
        Err(e) => {
            let _ = ready.send(Err(e.to_string()));
            return;
        }
    };
    detector.set_min_face_size(MIN_FACE_SIZE);
    detector.set_score_thresh(SCORE_THRESH);
    detector.set_pyramid_scale_factor(PYRAMID_SCALE_FACTOR);
    detector.set_slide_window_step(SLIDE_WINDOW_STEP, SLIDE_WINDOW_STEP);
    let _ = ready.send(Ok(()));
    info!("detection worker ready");

    while let Ok(job) = jobs.recv() {
        let faces = detect_faces(&mut *detector, &job.frame);
        debug!("found {} face(s)", faces.len());
        // A dropped receiver means the request was abandoned; skip the reply.
        let _ = job.reply.send(faces);
    }
}

fn detect_faces(detector: &mut dyn rustface::Detector, frame: &GrayImage) -> Vec<FaceBox> {
    let (width, height) = frame.dimensions();
    let mut image = ImageData::new(frame.as_raw(), width, height);
    detector
        .detect(&mut image)
        .iter()
        .map(|face| {
            let bbox = face.bbox();
            FaceBox {
                x: bbox.x(),
                y: bbox.y(),
                width: bbox.width(),
                height: bbox.height(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_face_box_serialization() {
        let face = FaceBox {
            x: 12,
            y: 34,
            width: 56,
            height: 78,
        };
        assert_eq!(
            serde_json::to_value(face).unwrap(),
            json!({ "x": 12, "y": 34, "width": 56, "height": 78 })
        );
    }

    #[test]
    fn test_spawn_fails_on_missing_model() {
        let result = spawn("/definitely/not/a/model.bin");
        assert!(result.is_err());
        let message = result.err().unwrap().to_string();
        assert!(message.contains("failed to load face model"), "{message}");
    }
}
