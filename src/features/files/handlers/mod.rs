mod file_handler;

pub use file_handler::{display_file, download_file, upload_file, upload_page};
