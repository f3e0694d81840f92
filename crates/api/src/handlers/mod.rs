pub mod actions;
pub mod categories;
pub mod config;
pub mod history;
pub mod scripts;
