//! The bridge runtime: session lifecycle manager, message relay, and
//! the HTTP control surface.

pub mod api;
pub mod bootstrap;
pub mod relay;
pub mod session;
pub mod state;
pub mod transport;
