// Presentation layer: askama-rendered dashboard and feedback pages.

pub mod form;
pub mod handlers;
pub mod views;
