pub mod fixtures;
pub mod verify;
