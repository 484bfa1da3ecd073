//! Value objects shared by every domain crate

pub mod address;
pub mod display_name;
pub mod email;
