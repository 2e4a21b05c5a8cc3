//! UI layer for the desktop GUI: single-window app shell rendering the query form and answer.

pub mod app;

pub use app::DesktopGuiApp;
