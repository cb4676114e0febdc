/// Number of most-recent uploads shown on the listing page
pub const RECENT_FILES_LIMIT: i64 = 5;
