//! Session-scoped storage for the loaded rule collection.
//!
//! The cache starts empty, is filled by the first successful load and is only
//! ever replaced wholesale. Readers get a cheap [`Arc`] snapshot that stays
//! valid even if the collection is replaced afterwards.

use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::detect::{self, Assessment};
use crate::error::ValidationError;
use crate::scheme::SchemeRule;

#[cfg(feature = "fetch")]
use crate::fetch::{DictionaryClient, FetchError};

static GLOBAL: OnceLock<RuleCache> = OnceLock::new();

/// Holds the current scheme rule collection.
#[derive(Debug, Default)]
pub struct RuleCache {
    slot: RwLock<Option<Arc<[SchemeRule]>>>,
}

impl RuleCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide cache.
    pub fn global() -> &'static RuleCache {
        GLOBAL.get_or_init(RuleCache::new)
    }

    /// Returns a snapshot of the loaded rules, or `None` before the first load.
    pub fn get(&self) -> Option<Arc<[SchemeRule]>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns true once a rule collection has been stored.
    pub fn is_loaded(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Replaces the stored collection and returns the new snapshot.
    pub fn replace(&self, rules: Vec<SchemeRule>) -> Arc<[SchemeRule]> {
        let rules: Arc<[SchemeRule]> = Arc::from(rules);
        let previous = self
            .slot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(rules.clone());

        tracing::info!(
            schemes = rules.len(),
            replaced = previous.is_some(),
            "scheme rules stored"
        );
        rules
    }

    /// Detects the scheme of a card number against the current rules.
    pub fn detect(&self, card_number: &str) -> Option<SchemeRule> {
        let rules = self.get()?;
        detect::find_matching_card_scheme(card_number, &rules).cloned()
    }

    /// Runs the checksum and detection against the current rules.
    pub fn assess(&self, card_number: &str) -> Result<Assessment, ValidationError> {
        let rules = self.get();
        detect::assess(card_number, rules.as_deref().unwrap_or(&[]))
    }

    /// Returns true if the card number can be accepted given the current
    /// rules. See [`Assessment::is_acceptable`].
    pub fn accepts(&self, card_number: &str) -> Result<bool, ValidationError> {
        let rules = self.get();
        let assessment = detect::assess(card_number, rules.as_deref().unwrap_or(&[]))?;
        Ok(assessment.is_acceptable(rules.is_some_and(|r| !r.is_empty())))
    }

    /// Loads rules through `client` unless a non-empty collection is already
    /// stored.
    ///
    /// # Feature
    ///
    /// Requires the `fetch` feature.
    #[cfg(feature = "fetch")]
    pub async fn load_with(
        &self,
        client: &DictionaryClient,
    ) -> Result<Arc<[SchemeRule]>, FetchError> {
        if let Some(rules) = self.get().filter(|r| !r.is_empty()) {
            tracing::debug!("scheme rules already loaded");
            return Ok(rules);
        }
        self.reload_with(client).await
    }

    /// Fetches rules through `client` and replaces the stored collection.
    ///
    /// On failure the current collection is kept.
    ///
    /// # Feature
    ///
    /// Requires the `fetch` feature.
    #[cfg(feature = "fetch")]
    pub async fn reload_with(
        &self,
        client: &DictionaryClient,
    ) -> Result<Arc<[SchemeRule]>, FetchError> {
        let rules = client.fetch_rules().await?;
        Ok(self.replace(rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visa() -> SchemeRule {
        SchemeRule::new("visa", "Visa").lengths("16").ranges("4")
    }

    #[test]
    fn test_starts_empty() {
        let cache = RuleCache::new();
        assert!(!cache.is_loaded());
        assert!(cache.get().is_none());
        assert!(cache.detect("4111111111111111").is_none());
    }

    #[test]
    fn test_replace_and_detect() {
        let cache = RuleCache::new();
        cache.replace(vec![visa()]);
        assert!(cache.is_loaded());
        assert_eq!(cache.detect("4111111111111111").unwrap().id, "visa");
    }

    #[test]
    fn test_snapshot_survives_replacement() {
        let cache = RuleCache::new();
        cache.replace(vec![visa()]);
        let snapshot = cache.get().unwrap();

        cache.replace(Vec::new());
        assert_eq!(snapshot.len(), 1);
        assert!(cache.get().unwrap().is_empty());
    }

    #[test]
    fn test_accepts() {
        let cache = RuleCache::new();
        // No rules: checksum alone decides.
        assert_eq!(cache.accepts("0000000000000000"), Ok(true));
        assert_eq!(cache.accepts("4111111111111112"), Ok(false));

        cache.replace(vec![visa()]);
        assert_eq!(cache.accepts("4111111111111111"), Ok(true));
        assert_eq!(cache.accepts("0000000000000000"), Ok(false));
        assert!(cache.accepts("4111 1111").is_err());
    }

    #[test]
    fn test_assess_uses_current_rules() {
        let cache = RuleCache::new();
        assert!(cache.assess("4111111111111111").unwrap().scheme.is_none());
        cache.replace(vec![visa()]);
        assert!(cache.assess("4111111111111111").unwrap().scheme.is_some());
    }

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(RuleCache::global(), RuleCache::global()));
    }

    #[cfg(feature = "fetch")]
    fn unreachable_client() -> DictionaryClient {
        use crate::fetch::FetchConfig;
        use std::time::Duration;

        // Nothing listens on the discard port, so every fetch fails fast.
        let config = FetchConfig::default()
            .with_url("http://127.0.0.1:9/cards-dictionary.json")
            .with_timeout(Duration::from_millis(500))
            .with_max_attempts(1);
        DictionaryClient::new(config).unwrap()
    }

    #[cfg(feature = "fetch")]
    #[tokio::test]
    async fn test_load_with_keeps_loaded_rules() {
        let cache = RuleCache::new();
        cache.replace(vec![visa()]);
        let rules = cache.load_with(&unreachable_client()).await.unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[cfg(feature = "fetch")]
    #[tokio::test]
    async fn test_load_with_refetches_empty_collection() {
        let cache = RuleCache::new();
        cache.replace(Vec::new());
        assert!(cache.load_with(&unreachable_client()).await.is_err());
        assert!(cache.get().unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_readers() {
        let cache = Arc::new(RuleCache::new());
        cache.replace(vec![visa()]);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                std::thread::spawn(move || cache.detect("4111111111111111").map(|s| s.id))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().as_deref(), Some("visa"));
        }
    }
}
