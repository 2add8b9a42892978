//! Channel classification registry
//!
//! Maps channel identifiers to their [`ErrorClassifier`]. Lookups never
//! fail: channels without a registered classifier get [`DefaultClassifier`],
//! so an unknown channel can never inflate its own success rate.

use super::classifier::{BUILTIN_CLASSIFIERS, DefaultClassifier, ErrorClassifier};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ClassifierRegistry {
    classifiers: HashMap<String, Arc<dyn ErrorClassifier>>,
    fallback: DefaultClassifier,
}

impl Default for ClassifierRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ClassifierRegistry {
    /// Registry with no channel-specific classifiers
    pub fn empty() -> Self {
        Self {
            classifiers: HashMap::new(),
            fallback: DefaultClassifier,
        }
    }

    /// Registry holding every built-in channel classifier
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for (channels, pattern) in BUILTIN_CLASSIFIERS {
            let classifier: Arc<dyn ErrorClassifier> = Arc::new(*pattern);
            for channel in channels.iter() {
                registry
                    .classifiers
                    .insert((*channel).to_string(), Arc::clone(&classifier));
            }
            debug!(
                "Built-in {} classifier serves {}",
                pattern.name(),
                channels.join(", ")
            );
        }
        registry
    }

    /// Register (or replace) the classifier for a channel
    pub fn register(
        &mut self,
        channel_type: impl Into<String>,
        classifier: impl ErrorClassifier + 'static,
    ) -> &mut Self {
        let channel_type = channel_type.into();
        debug!("Registering error classifier for channel {}", channel_type);
        self.classifiers.insert(channel_type, Arc::new(classifier));
        self
    }

    /// Classifier for a channel, falling back to the default classifier
    pub fn get_classifier(&self, channel_type: &str) -> &dyn ErrorClassifier {
        match self.classifiers.get(channel_type) {
            Some(classifier) => classifier.as_ref(),
            None => &self.fallback as &dyn ErrorClassifier,
        }
    }

    pub fn is_registered(&self, channel_type: &str) -> bool {
        self.classifiers.contains_key(channel_type)
    }

    /// Registered channel identifiers, sorted
    pub fn channels(&self) -> Vec<&str> {
        let mut channels: Vec<&str> = self.classifiers.keys().map(String::as_str).collect();
        channels.sort_unstable();
        channels
    }
}
