/// Yew views of the library app
pub mod app;
pub mod components;
pub mod library;
pub mod story;
