pub mod catalog;
pub mod config;
pub mod events;
pub mod gui;
pub mod sys;
