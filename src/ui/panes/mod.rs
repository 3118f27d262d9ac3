//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`transcript`]: submitted lines and engine output, colored by channel
//! - [`state`]: Forth data stack and user words, or the Prolog database
//! - [`input`]: prompt and line editor
//! - [`status`]: status bar with keybindings and the last execution result
//!
//! Each pane module exports a stateless `render_*` function; scroll offsets
//! live in [`App`](crate::ui::App) and are clamped during rendering.

pub mod input;
pub mod state;
pub mod status;
pub mod transcript;

pub use input::render_input_pane;
pub use state::render_state_pane;
pub use status::render_status_bar;
pub use transcript::render_transcript_pane;
