pub mod delete;
pub mod export;
pub mod import;
pub mod list;
pub mod mark;
pub mod progress;
pub mod score;
pub mod seed;
pub mod show;
pub mod verify;
