//! Source providers: the fallible stages of the resolution pipeline.
//!
//! Every provider maps its own response shape onto [`ItemRecord`] and absorbs
//! the expected failure modes (timeout, connection, bad status, malformed
//! payload, not found) into `Ok(None)`. `Err` is left for failures nobody
//! anticipated; the pipeline treats those as a miss too.

mod community;
mod fallback;
mod game_data;
mod primary;

use async_trait::async_trait;
use tracing::warn;

use crate::errors::Result;
use crate::models::{ItemRecord, SourceTag};

pub use community::CommunityDbProvider;
pub use fallback::FallbackApiProvider;
pub use game_data::GameDataProvider;
pub use primary::PrimaryApiProvider;

#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Tag stamped on every record this stage produces.
    fn tag(&self) -> SourceTag;

    async fn attempt(&self, id: &str) -> Result<Option<ItemRecord>>;
}

/// Collapses expected failures to "no result"; anything else propagates.
pub(crate) fn absorb_miss(
    tag: SourceTag,
    id: &str,
    outcome: Result<Option<ItemRecord>>,
) -> Result<Option<ItemRecord>> {
    match outcome {
        Err(err) if err.is_stage_miss() => {
            warn!(id, stage = %tag, error = %err, "source failed");
            Ok(None)
        }
        other => other,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::errors::Result;
    use crate::fetcher::{JsonRequest, Transport};

    type Responder = Box<dyn Fn(&JsonRequest) -> Result<serde_json::Value> + Send + Sync>;

    /// Transport that answers from a closure and remembers what it was asked.
    pub struct ScriptedTransport {
        responder: Responder,
        pub requests: Mutex<Vec<JsonRequest>>,
    }

    impl ScriptedTransport {
        pub fn new<F>(responder: F) -> Self
        where
            F: Fn(&JsonRequest) -> Result<serde_json::Value> + Send + Sync + 'static,
        {
            Self {
                responder: Box::new(responder),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn last_request(&self) -> Option<JsonRequest> {
            self.requests.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn get_json(&self, request: &JsonRequest) -> Result<serde_json::Value> {
            self.requests.lock().unwrap().push(request.clone());
            (self.responder)(request)
        }
    }
}
