pub mod pipeline;
pub mod ports;
pub mod use_cases;

pub use pipeline::{PipelineReport, ValidationPipeline};
