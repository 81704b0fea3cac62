//! Process-wide runtime state.
//!
//! Only shutdown coordination lives here; sprite state is owned by the
//! session.

mod state;

pub use state::{is_shutdown, register_server, setup_shutdown_handler};
