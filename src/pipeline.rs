//! Ordered, short-circuiting resolution across source providers.
//!
//! Stages run strictly one after another in priority order. The first stage
//! that yields a record wins; a miss or any error moves on to the next stage.
//! When every stage misses, the [`DefaultSynthesizer`] produces the record,
//! so [`ResolutionPipeline::resolve`] always returns.

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::RecoveryConfig;
use crate::data::GameDataSet;
use crate::errors::Result;
use crate::fetcher::{HttpTransport, Transport};
use crate::models::{ItemRecord, SourceTag};
use crate::providers::{
    CommunityDbProvider, FallbackApiProvider, GameDataProvider, PrimaryApiProvider, SourceProvider,
};
use crate::synthesizer::DefaultSynthesizer;

pub struct ResolutionPipeline {
    stages: Vec<Box<dyn SourceProvider>>,
    synthesizer: DefaultSynthesizer,
}

impl ResolutionPipeline {
    pub fn new(stages: Vec<Box<dyn SourceProvider>>, synthesizer: DefaultSynthesizer) -> Self {
        Self { stages, synthesizer }
    }

    /// Primary API, fallback API, community database, static game data,
    /// then synthesis.
    pub fn standard(config: &RecoveryConfig, transport: Arc<dyn Transport>, dataset: GameDataSet) -> Self {
        let stages: Vec<Box<dyn SourceProvider>> = vec![
            Box::new(PrimaryApiProvider::new(
                transport.clone(),
                config.primary.clone(),
                &config.user_agent,
            )),
            Box::new(FallbackApiProvider::new(
                transport.clone(),
                config.fallback.clone(),
                &config.user_agent,
            )),
            Box::new(CommunityDbProvider::new(transport, config.community.clone())),
            Box::new(GameDataProvider::new(dataset)),
        ];
        Self::new(stages, DefaultSynthesizer::new())
    }

    /// The standard pipeline over real HTTP, with any extra game data loaded.
    pub async fn from_config(config: &RecoveryConfig) -> Result<Self> {
        let mut dataset = GameDataSet::builtin();
        if let Some(path) = &config.game_data_path {
            dataset.extend_from_file(path).await?;
        }
        if dataset.is_empty() {
            warn!("static game data is empty, unknown items go straight to defaults");
        } else {
            info!(items = dataset.len(), "static game data ready");
        }
        Ok(Self::standard(config, Arc::new(HttpTransport::new()), dataset))
    }

    /// Stage tags in the order they are tried, synthesizer last.
    pub fn stage_tags(&self) -> Vec<SourceTag> {
        self.stages
            .iter()
            .map(|stage| stage.tag())
            .chain(std::iter::once(self.synthesizer.tag()))
            .collect()
    }

    pub async fn resolve(&self, id: &str) -> ItemRecord {
        info!(id, "starting resolution");

        for stage in &self.stages {
            let tag = stage.tag();
            match stage.attempt(id).await {
                Ok(Some(record)) => {
                    if record.source() != tag {
                        warn!(id, stage = %tag, reported = %record.source(), "stage mislabelled its record");
                        return record.restamped(tag);
                    }
                    return record;
                }
                Ok(None) => {
                    info!(id, stage = %tag, "no result, moving to next stage");
                }
                Err(err) => {
                    warn!(id, stage = %tag, error = %err, "stage errored, moving to next stage");
                }
            }
        }

        warn!(id, "all sources failed, using default values");
        self.synthesizer.synthesize(id)
    }
}
