pub mod config;
pub mod due;
pub mod list;
pub mod rate;
pub mod review;
pub mod stats;
