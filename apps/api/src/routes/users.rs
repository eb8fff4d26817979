use std::collections::HashMap;

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::UserInfo;
use crate::state::AppState;

const USER_INFO_TABLE: &str = "user_info";
const AVATAR_BUCKET: &str = "avatars";

struct AvatarUpload {
    filename: String,
    content_type: String,
    bytes: Bytes,
}

/// POST /save-personal-info
/// Multipart form: profile text fields plus an optional `avatar` file part.
/// The avatar is uploaded to storage first so its public URL lands on the
/// row; an upload failure aborts before anything is written to the table.
pub async fn save_personal_info(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut avatar: Option<AvatarUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == "avatar" {
            let filename = sanitize_filename(field.file_name().unwrap_or("avatar"));
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(bad_multipart)?;
            // An empty file part means no avatar was picked.
            if !bytes.is_empty() {
                avatar = Some(AvatarUpload {
                    filename,
                    content_type,
                    bytes,
                });
            }
        } else {
            let value = field.text().await.map_err(bad_multipart)?;
            fields.insert(name, value);
        }
    }

    if !fields.contains_key("full_name") || !fields.contains_key("email") {
        return Err(AppError::Validation(
            "Missing full_name or email in request".to_string(),
        ));
    }

    let user_id = Uuid::new_v4().to_string();

    let avatar_url = match avatar {
        Some(upload) => {
            let path = format!("avatars/{}/{}", user_id, upload.filename);
            let url = state
                .supabase
                .upload_file(
                    AVATAR_BUCKET,
                    &path,
                    upload.bytes.to_vec(),
                    &upload.content_type,
                )
                .await
                .map_err(|e| AppError::Storage(format!("Image upload failed: {e}")))?;
            Some(url)
        }
        None => None,
    };

    let mut take = |key: &str| fields.remove(key).unwrap_or_default();
    let row = UserInfo {
        user_id: user_id.clone(),
        full_name: take("full_name"),
        email: take("email"),
        phone_number: take("phone_number"),
        education_level: take("education_level"),
        field_of_study: take("field_of_study"),
        graduation_year: take("graduation_year"),
        work_experience: take("work_experience"),
        skills: take("skills"),
        avatar_url,
    };

    let value = serde_json::to_value(&row).map_err(|e| AppError::Internal(e.into()))?;
    state
        .supabase
        .insert_row(USER_INFO_TABLE, &value)
        .await
        .map_err(|e| AppError::database("Failed to save personal info", e))?;

    info!("saved personal info for user {user_id}");
    Ok(Json(json!({
        "message": "Personal info saved successfully",
        "user_id": user_id
    })))
}

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("invalid multipart request: {e}"))
}

/// Strips any path components and replaces everything outside
/// `[A-Za-z0-9._-]` with underscores. Storage paths embed the name verbatim,
/// so it must not be able to escape the user's avatar directory.
pub(crate) fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "avatar".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_simple_names() {
        assert_eq!(sanitize_filename("photo.png"), "photo.png");
        assert_eq!(sanitize_filename("head-shot_2.jpeg"), "head-shot_2.jpeg");
    }

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\pic.png"), "pic.png");
    }

    #[test]
    fn test_sanitize_replaces_odd_characters() {
        assert_eq!(sanitize_filename("my photo (1).png"), "my_photo__1_.png");
        assert_eq!(sanitize_filename("résumé.png"), "r_sum_.png");
    }

    #[test]
    fn test_sanitize_never_empty_or_hidden() {
        assert_eq!(sanitize_filename(""), "avatar");
        assert_eq!(sanitize_filename("..."), "avatar");
        assert_eq!(sanitize_filename(".bashrc"), "bashrc");
    }
}
