// Server module entry point
// Listener setup, accept loop and per-connection tasks

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword; mount loop.rs under another name
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used items
pub use listener::create_reusable_listener;
pub use server_loop::start_server_loop;
pub use signal::start_signal_handler;
