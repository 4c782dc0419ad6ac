// src/app/mod.rs
mod actions;
mod input;
mod navigation_helpers;
pub mod state;

pub use state::{ActiveModal, App, MessageLevel, Row};
