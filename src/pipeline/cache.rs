use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::AlignmentError;
use crate::pipeline::traits::{ModelBundle, ModelLoader};

type CacheKey = (String, String);

/// Lazily populated `(language, device) -> model` table.
///
/// Entries are never evicted. Concurrent lookups share a read lock; a miss
/// loads outside the lock and the first inserted bundle wins.
pub struct ModelCache {
    loader: Box<dyn ModelLoader>,
    entries: RwLock<HashMap<CacheKey, Arc<ModelBundle>>>,
}

impl ModelCache {
    pub fn new(loader: Box<dyn ModelLoader>) -> Self {
        Self {
            loader,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get_or_load(
        &self,
        language_code: &str,
        device: &str,
    ) -> Result<Arc<ModelBundle>, AlignmentError> {
        let key = (language_code.to_string(), device.to_string());
        {
            let entries = self
                .entries
                .read()
                .map_err(|_| AlignmentError::runtime("model cache", "cache lock poisoned"))?;
            if let Some(bundle) = entries.get(&key) {
                return Ok(Arc::clone(bundle));
            }
        }

        let loaded = Arc::new(self.loader.load(language_code, device)?);
        let mut entries = self
            .entries
            .write()
            .map_err(|_| AlignmentError::runtime("model cache", "cache lock poisoned"))?;
        Ok(Arc::clone(entries.entry(key).or_insert(loaded)))
    }

    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::pipeline::traits::{Emission, EmissionModel};
    use crate::types::LabelVocabulary;

    struct SilentModel;

    impl EmissionModel for SilentModel {
        fn infer(&self, _samples: &[f32]) -> Result<Emission, AlignmentError> {
            Ok(Emission {
                log_probs: Vec::new(),
                vocab_size: 1,
            })
        }
    }

    struct CountingLoader(Arc<AtomicUsize>);

    impl ModelLoader for CountingLoader {
        fn load(&self, language_code: &str, _device: &str) -> Result<ModelBundle, AlignmentError> {
            if language_code == "broken" {
                return Err(AlignmentError::runtime("load", "no such model"));
            }
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(ModelBundle {
                model: Box::new(SilentModel),
                vocabulary: LabelVocabulary::new(HashMap::new(), 0),
            })
        }
    }

    fn cache() -> (ModelCache, Arc<AtomicUsize>) {
        let loads = Arc::new(AtomicUsize::new(0));
        (
            ModelCache::new(Box::new(CountingLoader(Arc::clone(&loads)))),
            loads,
        )
    }

    #[test]
    fn repeated_lookups_load_once() {
        let (cache, loads) = cache();
        let first = cache.get_or_load("en", "cpu").expect("load");
        let second = cache.get_or_load("en", "cpu").expect("load");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn device_is_part_of_the_key() {
        let (cache, loads) = cache();
        cache.get_or_load("en", "cpu").expect("load");
        cache.get_or_load("en", "cuda").expect("load");
        cache.get_or_load("fr", "cpu").expect("load");
        assert_eq!(loads.load(Ordering::SeqCst), 3);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let (cache, _) = cache();
        assert!(cache.get_or_load("broken", "cpu").is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_lookups_share_one_bundle() {
        let (cache, _) = cache();
        let cache = Arc::new(cache);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.get_or_load("en", "cpu").expect("load"))
            })
            .collect();
        let bundles: Vec<Arc<ModelBundle>> = handles
            .into_iter()
            .map(|h| h.join().expect("thread"))
            .collect();
        assert!(bundles.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(cache.len(), 1);
    }
}
