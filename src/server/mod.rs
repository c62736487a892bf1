//! JSON-RPC tool server over stdio.
//!
//! ```text
//! stdin ──lines──► Handler::handle_line ──► Advisor ──► report::render_*
//!                        │
//! stdout ◄──lines── Response
//! ```

pub mod handler;
pub mod protocol;
mod transport;

pub use handler::{Handler, ANALYZE_TOOL, OPTIMIZE_TOOL, PROTOCOL_VERSION, SERVER_NAME};
pub use protocol::{Request, Response, RpcError};
pub use transport::{serve, serve_stdio};
