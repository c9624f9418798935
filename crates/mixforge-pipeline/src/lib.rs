//! Compilation and short-clip assembly pipeline.

pub mod batch;
pub mod compilation;
pub mod config;
pub mod describe;
pub mod error;
pub mod logging;
pub mod render;
pub mod short;

pub use batch::BatchProcessor;
pub use compilation::{
    load_compilation_info, save_compilation_info, CompilationAssembler, CompilationOutcome,
};
pub use config::{PipelineConfig, ShortConfig};
pub use error::{PipelineError, PipelineResult};
pub use logging::TrackLogger;
pub use render::render_with_fallback;
pub use short::{hook_start, ShortAssembler};
