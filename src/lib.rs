pub mod config;
pub mod data;
pub mod errors;
pub mod fetcher;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod recovery;
pub mod storage;
pub mod synthesizer;

pub use errors::{RecoveryError, Result};
pub use models::{ItemRarity, ItemRecord, SourceTag};
pub use pipeline::ResolutionPipeline;
pub use synthesizer::DefaultSynthesizer;
