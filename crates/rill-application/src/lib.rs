pub mod config;
pub mod preparation;
pub mod shared;
pub mod training;
