pub mod config;
pub mod failed;
pub mod logs;
pub mod persist;
pub mod utils;
