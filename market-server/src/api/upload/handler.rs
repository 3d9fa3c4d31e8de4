//! Image upload
//!
//! Accepts PNG, JPEG and WebP, re-encodes to JPEG and stores the result
//! under its SHA-256 so identical uploads share one file.

use std::io::Cursor;
use std::path::Path;

use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;
use sha2::{Digest, Sha256};
use shared::{ApiResponse, AppError, ErrorCode};

use crate::auth::CurrentUser;
use crate::core::ServerState;

const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

const JPEG_QUALITY: u8 = 85;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    /// Reference to store on the listing
    pub url: String,
    pub size: usize,
}

fn content_hash(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn check_extension(original_name: &str) -> Result<(), AppError> {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if SUPPORTED_FORMATS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!(
                "Unsupported file format '{}'. Supported: {}",
                ext,
                SUPPORTED_FORMATS.join(", ")
            ),
        ))
    }
}

/// Decode and re-encode as JPEG
fn reencode(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img = image::load_from_memory(data).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidImageFile, format!("Invalid image: {}", e))
    })?;

    let mut buffer = Vec::new();
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut buffer), JPEG_QUALITY);
    img.to_rgb8().write_with_encoder(encoder).map_err(|e| {
        AppError::with_message(
            ErrorCode::FileStorageFailed,
            format!("Failed to encode image: {}", e),
        )
    })?;
    Ok(buffer)
}

pub async fn upload(
    State(state): State<ServerState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse>>, AppError> {
    let limit = state.config.max_upload_bytes;

    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let original_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|e| {
            AppError::with_message(ErrorCode::FileTooLarge, format!("Upload rejected: {}", e))
        })?;
        file = Some((original_name, data.to_vec()));
        break;
    }

    let (original_name, data) = file.ok_or_else(|| {
        AppError::with_message(ErrorCode::NoFileProvided, "Multipart field 'file' is required")
    })?;
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::NoFileProvided));
    }
    if data.len() > limit {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!("File too large. Maximum size is {} bytes", limit),
        ));
    }
    check_extension(&original_name)?;

    let encoded = tokio::task::spawn_blocking(move || reencode(&data))
        .await
        .map_err(|e| AppError::internal(format!("Image task failed: {}", e)))??;

    let filename = format!("{}.jpg", content_hash(&encoded));
    let dir = state.config.uploads_dir();
    let path = dir.join(&filename);

    if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        tracing::info!(filename = %filename, "Duplicate image, reusing stored file");
    } else {
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::with_message(ErrorCode::FileStorageFailed, e.to_string())
        })?;
        tokio::fs::write(&path, &encoded).await.map_err(|e| {
            AppError::with_message(ErrorCode::FileStorageFailed, e.to_string())
        })?;
        tracing::info!(
            filename = %filename,
            original_name = %original_name,
            size = encoded.len(),
            uploader = %user.id,
            "Image stored"
        );
    }

    Ok(Json(ApiResponse::success(UploadResponse {
        url: format!("/uploads/{}", filename),
        size: encoded.len(),
        filename,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 40, 40]));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn png_is_reencoded_as_jpeg() {
        let jpeg = reencode(&png_bytes()).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        assert_eq!(
            image::guess_format(&jpeg).unwrap(),
            image::ImageFormat::Jpeg
        );
    }

    #[test]
    fn garbage_is_not_an_image() {
        let err = reencode(b"definitely not pixels").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidImageFile);
    }

    #[test]
    fn extensions_are_checked_case_insensitively() {
        assert!(check_extension("tomato.PNG").is_ok());
        assert!(check_extension("tomato.webp").is_ok());
        let err = check_extension("tomato.gif").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFileFormat);
        assert!(check_extension("no_extension").is_err());
    }

    #[test]
    fn identical_content_hashes_identically() {
        assert_eq!(content_hash(b"abc"), content_hash(b"abc"));
        assert_eq!(content_hash(b"abc").len(), 64);
    }
}
