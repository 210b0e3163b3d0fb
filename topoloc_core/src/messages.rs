// topoloc_core/src/messages.rs

use nalgebra::DVector;

// =========================================================================
// == Observation Data Structures ==
// =========================================================================

/// The raw per-class outcome counts reported by the feature-extraction stage,
/// one entry per feature class, in class order.
///
/// Values are signed so a malformed sensor message can be represented and
/// rejected instead of silently wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Reading(pub Vec<i32>);

impl Reading {
    pub fn new(values: Vec<i32>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[i32] {
        &self.0
    }
}

impl<const N: usize> From<[i32; N]> for Reading {
    fn from(values: [i32; N]) -> Self {
        Self(values.to_vec())
    }
}

impl From<Vec<i32>> for Reading {
    fn from(values: Vec<i32>) -> Self {
        Self(values)
    }
}

/// The binary z-vector: one one-hot block per feature class, stacked in class
/// order so that `zᵀ · table` selects one likelihood row per class.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedReading(pub DVector<f64>);

impl EncodedReading {
    /// The "no information" encoding: outcome 0 in every block, which selects
    /// only uniform rows.
    pub fn no_information(features_order: &[usize]) -> Self {
        let mut z = DVector::<f64>::zeros(features_order.iter().sum());
        let mut offset = 0;
        for &cardinality in features_order {
            if cardinality > 0 {
                z[offset] = 1.0;
            }
            offset += cardinality;
        }
        Self(z)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_vector(&self) -> &DVector<f64> {
        &self.0
    }
}

// =========================================================================
// == Core Message and Input Enums ==
// =========================================================================

/// A timestamped reading as delivered by a sensor-processing stage.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureObservation {
    pub timestamp: f64,
    pub reading: Reading,
}

/// The universal input packet for all `Localizer` implementations.
pub enum ModuleInput<'a> {
    Observation { message: &'a FeatureObservation },
    /// Drop all accumulated evidence and return to the uniform belief.
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_information_marks_first_outcome_of_each_class() {
        let z = EncodedReading::no_information(&[2, 3, 3]);
        let expected = DVector::from_vec(vec![1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(z.as_vector(), &expected);
    }

    #[test]
    fn reading_from_array() {
        let reading = Reading::from([0, 1, 2]);
        assert_eq!(reading.values(), &[0, 1, 2]);
        assert_eq!(reading.len(), 3);
        assert!(!reading.is_empty());
    }
}
