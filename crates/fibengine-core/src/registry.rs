//! Calculator factory and registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::calculator::{Calculator, FibCalculator, FibError};
use crate::fastdoubling::{KaratsubaFastDoubling, OptimizedFastDoubling};
use crate::iterative::IterativeCalculator;
use crate::strategy::Strategy;

/// Factory trait for creating calculators.
pub trait CalculatorFactory: Send + Sync {
    /// Get or create the calculator for a strategy.
    fn get(&self, strategy: Strategy) -> Arc<dyn Calculator>;

    /// Get or create a calculator by name.
    fn get_by_name(&self, name: &str) -> Result<Arc<dyn Calculator>, FibError> {
        Ok(self.get(name.parse()?))
    }
}

/// Default factory with lazy creation and cache.
pub struct DefaultFactory {
    cache: RwLock<HashMap<Strategy, Arc<dyn Calculator>>>,
}

impl DefaultFactory {
    /// Create a new default factory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn create_calculator(strategy: Strategy) -> Arc<dyn Calculator> {
        match strategy {
            Strategy::Iterative => Arc::new(FibCalculator::new(Arc::new(IterativeCalculator::new()))),
            Strategy::FastDoubling => {
                Arc::new(FibCalculator::new(Arc::new(OptimizedFastDoubling::new())))
            }
            Strategy::Karatsuba => {
                Arc::new(FibCalculator::new(Arc::new(KaratsubaFastDoubling::new())))
            }
        }
    }
}

impl Default for DefaultFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorFactory for DefaultFactory {
    fn get(&self, strategy: Strategy) -> Arc<dyn Calculator> {
        // Check cache first
        if let Some(calc) = self.cache.read().get(&strategy) {
            return Arc::clone(calc);
        }

        // Create and cache; a racing writer may have inserted first.
        let mut cache = self.cache.write();
        Arc::clone(
            cache
                .entry(strategy)
                .or_insert_with(|| Self::create_calculator(strategy)),
        )
    }
}
