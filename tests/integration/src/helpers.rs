//! Test helper utilities for integration tests

use futures::StreamExt;
use gateway_core::{ChatAdapter, FragmentStream, ProviderError, StreamFragment, TaggedFragment, TaggedFragmentStream};
use gateway_routing::GatewayManager;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Initialize tracing for tests (only once)
static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
});

/// Initialize tracing for tests
pub fn init_tracing() {
    Lazy::force(&TRACING);
}

/// Share an adapter as a trait object
pub fn shared<A: ChatAdapter + 'static>(adapter: A) -> Arc<dyn ChatAdapter> {
    Arc::new(adapter)
}

/// Build a manager over adapters in the given order
pub fn manager_with(adapters: Vec<Arc<dyn ChatAdapter>>) -> GatewayManager {
    GatewayManager::new(adapters, None).expect("at least one adapter")
}

/// Drain an adapter stream
pub async fn collect_fragments(stream: FragmentStream) -> Vec<Result<StreamFragment, ProviderError>> {
    stream.collect().await
}

/// Drain a manager stream
pub async fn collect_tagged(stream: TaggedFragmentStream) -> Vec<Result<TaggedFragment, ProviderError>> {
    stream.collect().await
}
