//! Broadcast gateway: observer transport and the command/event protocol.

pub mod messages;
mod server;
mod session;

pub use server::run;
pub use session::Session;
