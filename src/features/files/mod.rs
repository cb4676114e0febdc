pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validation;

pub use routes::{routes, FilesState};
pub use services::{FileRepository, FileService};
pub use validation::UploadPolicy;
