//! Line-delimited JSON transport: request/response DTOs and the read loop.

pub mod dto;
pub mod errors;
pub mod handler;

pub use errors::TransportError;
pub use handler::Handler;
