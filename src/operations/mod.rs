pub mod browse;
pub mod fetch;
pub mod format;
pub mod modal;
pub mod print;
