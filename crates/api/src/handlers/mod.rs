pub mod themes;
pub mod transform;
