pub mod checksum;
pub mod core_api;
pub mod creature;
pub mod error;
pub mod file;
pub mod game_version;
pub mod gender;
pub mod gift;
pub mod growth;
pub mod layout;
pub mod reader;
pub mod section;
pub mod slot;
pub mod species;
pub mod views;
