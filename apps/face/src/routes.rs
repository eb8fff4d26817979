use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use base64::Engine;
use image::GrayImage;
use serde_json::{json, Value};
use tracing::debug;

use crate::detector::FaceBox;
use crate::errors::DetectError;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/detect", post(detect_handler))
        .with_state(state)
}

/// POST /detect
/// JSON body `{"image": <base64 frame, data-URL prefix optional>}`. Replies
/// with the detected boxes and their count; a frame with no faces is a
/// success with an empty list, not an error.
pub async fn detect_handler(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, DetectError> {
    let Json(body) = body.map_err(|e| DetectError::Body(e.to_string()))?;
    let data = body
        .get("image")
        .and_then(Value::as_str)
        .ok_or(DetectError::MissingImage)?;

    let frame = decode_frame(data)?;
    debug!("decoded {}x{} frame", frame.width(), frame.height());

    let faces = state.detector.detect(frame).await?;
    Ok(Json(detection_response(&faces)))
}

fn detection_response(faces: &[FaceBox]) -> Value {
    json!({
        "success": true,
        "faces": faces,
        "count": faces.len()
    })
}

/// Decodes a base64 frame into the grayscale image the detector wants.
/// Frames arrive either bare or as the `canvas.toDataURL()` form with a
/// `data:image/...;base64,` prefix.
fn decode_frame(data: &str) -> Result<GrayImage, DetectError> {
    let encoded = strip_data_url(data);
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| DetectError::Base64(e.to_string()))?;
    let image =
        image::load_from_memory(&bytes).map_err(|e| DetectError::Image(e.to_string()))?;
    Ok(image.to_luma8())
}

/// Base64 never contains a comma, so anything before the first one is a
/// data-URL prefix to drop.
fn strip_data_url(data: &str) -> &str {
    match data.split_once(',') {
        Some((_, rest)) => rest,
        None => data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn png_base64() -> String {
        let frame = GrayImage::from_pixel(4, 3, Luma([140u8]));
        let mut cursor = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageLuma8(frame)
            .write_to(&mut cursor, image::ImageOutputFormat::Png)
            .unwrap();
        base64::engine::general_purpose::STANDARD.encode(cursor.into_inner())
    }

    #[test]
    fn test_strip_data_url_prefix() {
        assert_eq!(strip_data_url("data:image/jpeg;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_url("AAAA"), "AAAA");
    }

    #[test]
    fn test_decode_bare_base64_frame() {
        let frame = decode_frame(&png_base64()).unwrap();
        assert_eq!(frame.dimensions(), (4, 3));
    }

    #[test]
    fn test_decode_data_url_frame() {
        let data = format!("data:image/png;base64,{}", png_base64());
        let frame = decode_frame(&data).unwrap();
        assert_eq!(frame.dimensions(), (4, 3));
    }

    #[test]
    fn test_invalid_base64_error() {
        let err = decode_frame("data:image/png;base64,!!!not-base64!!!").unwrap_err();
        assert!(matches!(err, DetectError::Base64(_)));
    }

    #[test]
    fn test_undecodable_image_error() {
        let data = base64::engine::general_purpose::STANDARD.encode(b"not an image");
        let err = decode_frame(&data).unwrap_err();
        assert!(matches!(err, DetectError::Image(_)));
    }

    #[test]
    fn test_zero_faces_success_shape() {
        assert_eq!(
            detection_response(&[]),
            json!({ "success": true, "faces": [], "count": 0 })
        );
    }

    #[test]
    fn test_boxes_listed_with_count() {
        let faces = [FaceBox {
            x: 10,
            y: 20,
            width: 64,
            height: 64,
        }];
        let body = detection_response(&faces);
        assert_eq!(body["count"], 1);
        assert_eq!(body["faces"][0]["width"], 64);
    }
}
