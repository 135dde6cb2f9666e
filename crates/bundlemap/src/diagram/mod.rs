//! Diagram output: shapes, flowchart text and legend

mod renderer;
mod shapes;

pub use renderer::*;
pub use shapes::*;
