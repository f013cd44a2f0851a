//! Fixed-length feature vector type.

use serde::{Deserialize, Serialize};

use crate::config::FEATURE_COUNT;
use crate::error::{Result, ScreenError};

/// An ordered sequence of exactly 45 finite floating-point values.
///
/// The constructor enforces both length and finiteness, so holding a
/// `FeatureVector` is proof the invariant holds; no partial vector can be
/// observed by any consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    /// Create a feature vector, validating length and finiteness.
    ///
    /// # Errors
    /// `InvalidVectorShape` if the input is not exactly 45 finite values.
    pub fn new(values: Vec<f32>) -> Result<Self> {
        if values.len() != FEATURE_COUNT {
            return Err(ScreenError::InvalidVectorShape {
                expected: FEATURE_COUNT,
                reason: format!("length {}", values.len()),
            });
        }
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(ScreenError::InvalidVectorShape {
                expected: FEATURE_COUNT,
                reason: format!("non-finite value at index {}", pos),
            });
        }
        Ok(FeatureVector(values))
    }

    /// Access the values as a slice
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Number of values, always 45
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Consume the vector, returning the raw values
    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }
}

impl AsRef<[f32]> for FeatureVector {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_exact_length() {
        let vector = FeatureVector::new(vec![0.5; FEATURE_COUNT]).unwrap();
        assert_eq!(vector.len(), FEATURE_COUNT);
        assert_eq!(vector.as_slice()[0], 0.5);
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(FeatureVector::new(vec![0.0; 44]).is_err());
        assert!(FeatureVector::new(vec![0.0; 46]).is_err());
        assert!(FeatureVector::new(Vec::new()).is_err());
    }

    #[test]
    fn test_rejects_non_finite() {
        let mut values = vec![0.0; FEATURE_COUNT];
        values[12] = f32::NAN;
        let err = FeatureVector::new(values).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_VECTOR_SHAPE");
        assert!(err.to_string().contains("12"));

        let mut values = vec![0.0; FEATURE_COUNT];
        values[44] = f32::INFINITY;
        assert!(FeatureVector::new(values).is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let vector = FeatureVector::new(vec![1.0; FEATURE_COUNT]).unwrap();
        let json = serde_json::to_string(&vector).unwrap();
        assert!(json.starts_with('['));
        let back: FeatureVector = serde_json::from_str(&json).unwrap();
        assert_eq!(vector, back);
    }
}
