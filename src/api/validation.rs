use std::path::Path;

use crate::api::errors::ApiError;

/// Checks the upload against the allowed extensions and returns the MIME
/// type to send to the model. A generic or missing content type is replaced
/// by the one implied by the extension.
pub(crate) fn validate_image_upload(
    filename: &str,
    content_type: Option<&str>,
    allowed_extensions: &[String],
) -> Result<&'static str, ApiError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| ApiError::BadRequest("File must have an extension".to_string()))?;

    if !allowed_extensions.iter().any(|allowed| allowed == &extension) {
        return Err(ApiError::BadRequest(format!("File extension '{extension}' is not allowed")));
    }

    let expected = mime_for_extension(&extension).ok_or_else(|| {
        ApiError::BadRequest(format!("File extension '{extension}' is not an image type"))
    })?;

    let mime = content_type.map(|value| value.trim().to_ascii_lowercase()).unwrap_or_default();
    if mime.is_empty() || mime == "application/octet-stream" || mime_matches(&mime, expected) {
        Ok(expected)
    } else {
        Err(ApiError::BadRequest(format!(
            "MIME type '{mime}' does not match extension '.{extension}'"
        )))
    }
}

/// Rejects payloads whose leading bytes are not an image of the declared type.
pub(crate) fn validate_image_signature(bytes: &[u8], mime: &str) -> Result<(), ApiError> {
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
    }

    let matches = match mime {
        "image/jpeg" => bytes.starts_with(&[0xFF, 0xD8, 0xFF]),
        "image/png" => bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
        "image/webp" => bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP",
        _ => false,
    };

    if matches {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!("File content is not a valid {mime} image")))
    }
}

fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

fn mime_matches(mime: &str, expected: &str) -> bool {
    mime == expected || (expected == "image/jpeg" && mime == "image/jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()]
    }

    #[test]
    fn accepts_matching_extension_and_mime() {
        assert_eq!(validate_image_upload("sheet.PNG", Some("image/png"), &allowed()).unwrap(), "image/png");
        assert_eq!(validate_image_upload("a.jpg", Some("image/jpg"), &allowed()).unwrap(), "image/jpeg");
    }

    #[test]
    fn derives_mime_when_content_type_is_generic() {
        let mime = validate_image_upload("a.jpeg", Some("application/octet-stream"), &allowed());
        assert_eq!(mime.unwrap(), "image/jpeg");
        assert_eq!(validate_image_upload("a.png", None, &allowed()).unwrap(), "image/png");
    }

    #[test]
    fn rejects_disallowed_extension() {
        let err = validate_image_upload("a.webp", Some("image/webp"), &allowed()).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(message) if message.contains("not allowed")));
        assert!(validate_image_upload("noext", Some("image/png"), &allowed()).is_err());
    }

    #[test]
    fn rejects_mismatched_mime() {
        let err = validate_image_upload("a.png", Some("image/jpeg"), &allowed()).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(message) if message.contains("does not match")));
    }

    #[test]
    fn signature_must_match_declared_type() {
        assert!(validate_image_signature(&[0xFF, 0xD8, 0xFF, 0xE0], "image/jpeg").is_ok());
        assert!(validate_image_signature(b"GIF89a", "image/png").is_err());
        assert!(validate_image_signature(&[], "image/png").is_err());
        assert!(validate_image_signature(b"RIFF\0\0\0\0WEBPVP8 ", "image/webp").is_ok());
    }
}
