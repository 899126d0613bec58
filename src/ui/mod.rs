// Terminal UI using Ratatui

pub mod components;
pub mod events;
pub mod shell;
pub mod state;
pub mod theme;

pub use events::run_ui_with_options;
pub use shell::Shell;
pub use state::AppState;
pub use theme::Palette;
