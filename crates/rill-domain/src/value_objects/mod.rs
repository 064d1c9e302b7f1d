pub mod frame;
pub mod schema;
pub mod series;
