pub mod errors;
pub mod helpers;
pub mod sharing;
pub mod version_gating;
