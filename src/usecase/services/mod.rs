pub mod import_service;
pub mod notify;
pub mod record_store;
pub mod view_model;
