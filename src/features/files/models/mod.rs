mod file;

pub use file::File;
