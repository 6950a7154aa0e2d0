pub mod app;
pub mod state;
