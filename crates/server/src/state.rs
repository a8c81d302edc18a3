//! Shared handler state

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use narration_config::NarrationSettings;
use narration_persistence::AssetStore;
use narration_pipeline::{NarrationPreparer, SpeechProvider};
use narration_text_processing::ContentRules;

#[derive(Clone)]
pub struct AppState {
    pub preparer: Arc<NarrationPreparer>,
    pub store: Arc<dyn AssetStore>,
    pub rules: Arc<ContentRules>,
    /// Absent when no Prometheus recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        settings: &NarrationSettings,
        store: Arc<dyn AssetStore>,
        provider: Arc<dyn SpeechProvider>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        let rules = ContentRules::from(&settings.normalizer);
        let preparer = NarrationPreparer::new(provider, store.clone(), rules.clone());
        Self {
            preparer: Arc::new(preparer),
            store,
            rules: Arc::new(rules),
            metrics,
        }
    }
}
