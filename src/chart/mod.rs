pub mod error;
pub mod renderer;
pub mod series;
