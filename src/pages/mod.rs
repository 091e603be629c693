pub mod download;
pub mod pack;
pub mod settings;
