pub mod batch;
pub mod catalog;
pub mod credentials;
pub mod pacing;
