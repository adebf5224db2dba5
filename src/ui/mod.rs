pub mod components;
pub mod data;
pub mod keymap;
pub mod session;
pub mod shortcuts;
pub mod tui;
pub mod view;
