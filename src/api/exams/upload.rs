use axum::extract::Multipart;

use crate::api::errors::ApiError;
use crate::schemas::grading::{Language, Strictness};

/// Fields of a grade/upload form. Only `file` is required.
#[derive(Debug)]
pub(super) struct SheetUpload {
    pub(super) file_name: String,
    pub(super) content_type: Option<String>,
    pub(super) bytes: Vec<u8>,
    pub(super) strictness: Strictness,
    pub(super) language: Language,
    pub(super) model: Option<String>,
}

pub(super) async fn read_sheet_upload(
    multipart: &mut Multipart,
    max_upload_size_mb: u64,
) -> Result<SheetUpload, ApiError> {
    let max_bytes = max_upload_size_mb * 1024 * 1024;
    let mut file: Option<(String, Option<String>, Vec<u8>)> = None;
    let mut strictness = Strictness::default();
    let mut language = Language::default();
    let mut model = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart data".to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("sheet.jpg").to_string();
                let content_type = field.content_type().map(str::to_string);
                let mut bytes = Vec::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|_| ApiError::BadRequest("Failed to read file".to_string()))?
                {
                    if bytes.len() as u64 + chunk.len() as u64 > max_bytes {
                        return Err(ApiError::BadRequest(format!(
                            "File size exceeds {max_upload_size_mb}MB limit"
                        )));
                    }
                    bytes.extend_from_slice(&chunk);
                }
                file = Some((file_name, content_type, bytes));
            }
            "strictness" => {
                strictness = read_text(field, "strictness")
                    .await?
                    .parse::<Strictness>()
                    .map_err(ApiError::BadRequest)?;
            }
            "language" => {
                language = read_text(field, "language")
                    .await?
                    .parse::<Language>()
                    .map_err(ApiError::BadRequest)?;
            }
            "model" => {
                let value = read_text(field, "model").await?;
                model = (!value.trim().is_empty()).then(|| value.trim().to_string());
            }
            _ => {}
        }
    }

    let (file_name, content_type, bytes) =
        file.ok_or_else(|| ApiError::BadRequest("File is required".to_string()))?;

    Ok(SheetUpload { file_name, content_type, bytes, strictness, language, model })
}

/// Name the sheet is stored under. The pair prefix keeps two students who
/// upload `sheet.jpg` from overwriting each other.
pub(super) fn stored_file_name(exam_id: i64, student_id: i64, original: &str) -> String {
    let path = std::path::Path::new(original);
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(sanitize)
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "sheet".to_string());

    match path.extension().and_then(|ext| ext.to_str()).map(sanitize) {
        Some(ext) if !ext.is_empty() => {
            format!("exam{exam_id}_student{student_id}_{stem}.{}", ext.to_ascii_lowercase())
        }
        _ => format!("exam{exam_id}_student{student_id}_{stem}"),
    }
}

fn sanitize(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-').collect()
}

async fn read_text(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, ApiError> {
    field.text().await.map_err(|_| ApiError::BadRequest(format!("Invalid {name} field")))
}
