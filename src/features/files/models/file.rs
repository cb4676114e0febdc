use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for uploaded files
///
/// Rows are insert-only: `id` and `uploaded_at` are assigned once at
/// creation and never change, and no update or delete path exists.
#[derive(Debug, Clone, FromRow)]
pub struct File {
    pub id: i64,
    pub name: String,
    pub content: Vec<u8>,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
}
