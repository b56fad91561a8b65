pub mod app;
pub mod chat;
pub mod footer;
pub mod header;
pub mod metrics_form;
pub mod settings_modal;
pub mod transcript;
