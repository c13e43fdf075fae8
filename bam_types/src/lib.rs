pub mod config;
pub mod datagram;
pub mod error;
pub mod version;
