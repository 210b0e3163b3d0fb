// topoloc_core/src/estimation/shared.rs

//! A cloneable, lock-guarded handle for feeding one filter from several
//! producers.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::LocalizationError;
use crate::estimation::filters::BeliefFilter;
use crate::messages::Reading;
use crate::types::{Belief, NodeId};

/// Serializes every read-modify-write on the wrapped [`BeliefFilter`].
///
/// Each call holds the lock for the whole update, so concurrent observations
/// are fused one at a time.
#[derive(Debug, Clone)]
pub struct SharedBeliefFilter {
    inner: Arc<Mutex<BeliefFilter>>,
}

impl SharedBeliefFilter {
    pub fn new(filter: BeliefFilter) -> Self {
        Self {
            inner: Arc::new(Mutex::new(filter)),
        }
    }

    // The belief is only ever replaced wholesale, so a panic while the lock
    // was held cannot leave it half-written.
    fn lock(&self) -> MutexGuard<'_, BeliefFilter> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn update_belief(&self, reading: &Reading) -> Result<(), LocalizationError> {
        self.lock().update_belief(reading)
    }

    pub fn set_belief(&self, belief: Belief) -> Result<(), LocalizationError> {
        self.lock().set_belief(belief)
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    /// A copy of the current belief.
    pub fn belief_snapshot(&self) -> Belief {
        self.lock().belief().clone()
    }

    pub fn most_likely_node(&self) -> (NodeId, f64) {
        self.lock().most_likely_node()
    }

    pub fn update_count(&self) -> u64 {
        self.lock().update_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;
    use crate::models::likelihood::SensorLikelihoodModel;
    use approx::assert_abs_diff_eq;
    use std::thread;

    fn shared_filter() -> SharedBeliefFilter {
        let model = Arc::new(SensorLikelihoodModel::new(&MapConfig::default()).unwrap());
        SharedBeliefFilter::new(BeliefFilter::new(model))
    }

    #[test]
    fn concurrent_updates_are_all_applied() {
        let shared = shared_filter();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        shared.update_belief(&Reading::from([i % 2, 1, 0])).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.update_count(), 100);
        assert_abs_diff_eq!(shared.belief_snapshot().sum(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn handle_recovers_after_a_panic_while_locked() {
        let shared = shared_filter();
        let poisoner = shared.clone();
        let result = thread::spawn(move || {
            let _guard = poisoner.lock();
            panic!("producer crashed while holding the filter");
        })
        .join();
        assert!(result.is_err());
        assert!(shared.inner.is_poisoned());

        shared.update_belief(&Reading::from([1, 0, 0])).unwrap();
        assert_eq!(shared.update_count(), 1);
        assert_abs_diff_eq!(shared.belief_snapshot().sum(), 1.0, epsilon = 1e-9);

        let mut spike = Belief::zeros(18);
        spike[6] = 3.0;
        shared.set_belief(spike).unwrap();
        let snapshot = shared.belief_snapshot();
        assert_abs_diff_eq!(snapshot.sum(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(snapshot[6], 1.0, epsilon = 1e-12);

        let (node, p) = shared.most_likely_node();
        assert_eq!(node, NodeId(7));
        assert_abs_diff_eq!(p, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rejected_updates_do_not_count() {
        let shared = shared_filter();
        assert!(shared.update_belief(&Reading::from([9, 9, 9])).is_err());
        assert_eq!(shared.update_count(), 0);
        assert!(shared.set_belief(Belief::zeros(3)).is_err());

        shared.update_belief(&Reading::from([1, 0, 0])).unwrap();
        shared.reset();
        assert_eq!(shared.update_count(), 0);
    }
}
