pub mod constants;
pub mod templates;
