mod header;
mod layout;
mod markdown;
mod modals;
mod sections;
mod status_bar;
mod theme;
mod tip_panel;

pub use layout::render_ui;
