pub mod app;
pub mod notify;
pub mod search;
pub mod ui;
