pub mod analysis;
pub mod candidate;
pub mod config;
pub mod pain_point;
pub mod thread;
