use serde::Serialize;

use crate::features::files::models::File;

/// Row shown in the listing table. Carries metadata only; the bytes stay
/// behind the download/display routes.
#[derive(Debug, Serialize)]
pub struct FileRowDto {
    pub id: i64,
    pub name: String,
    pub content_type: String,
    pub size: usize,
    pub uploaded_at: String,
}

impl From<&File> for FileRowDto {
    fn from(file: &File) -> Self {
        Self {
            id: file.id,
            name: file.name.clone(),
            content_type: file.content_type.clone(),
            size: file.content.len(),
            uploaded_at: file.uploaded_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        }
    }
}
