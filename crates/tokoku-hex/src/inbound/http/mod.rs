pub mod extract;
pub mod handlers;
pub mod response;
pub mod server;
pub mod state;

pub use server::{HttpServer, HttpServerConfig};
pub use state::AppState;
