//! Construction-time configuration and its validation.

use thiserror::Error;

/// Bucket count used by `ChainedHashMap::new`.
pub const DEFAULT_BUCKET_COUNT: usize = 10;

/// Maximum load factor used by `ChainedHashMap::new`.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 1.0;

/// Rejected construction parameters. Values are never coerced into range.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("initial bucket count must be at least 1")]
    ZeroBucketCount,
    #[error("max load factor must be finite and greater than 0, got {0}")]
    InvalidMaxLoadFactor(f64),
}

/// Sizing policy for a `ChainedHashMap`.
///
/// The map grows (doubles its bucket count) when an insertion finds
/// `len / bucket_count >= max_load_factor`. It never shrinks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapConfig {
    pub initial_bucket_count: usize,
    pub max_load_factor: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            initial_bucket_count: DEFAULT_BUCKET_COUNT,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}

impl MapConfig {
    pub fn new(initial_bucket_count: usize, max_load_factor: f64) -> Self {
        Self {
            initial_bucket_count,
            max_load_factor,
        }
    }

    pub fn with_initial_bucket_count(mut self, initial_bucket_count: usize) -> Self {
        self.initial_bucket_count = initial_bucket_count;
        self
    }

    pub fn with_max_load_factor(mut self, max_load_factor: f64) -> Self {
        self.max_load_factor = max_load_factor;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_bucket_count == 0 {
            return Err(ConfigError::ZeroBucketCount);
        }
        // NaN fails the `> 0.0` comparison as well.
        if !(self.max_load_factor.is_finite() && self.max_load_factor > 0.0) {
            return Err(ConfigError::InvalidMaxLoadFactor(self.max_load_factor));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let c = MapConfig::default();
        assert_eq!(c.initial_bucket_count, 10);
        assert_eq!(c.max_load_factor, 1.0);
        assert_eq!(c.validate(), Ok(()));
    }

    #[test]
    fn zero_buckets_rejected() {
        let c = MapConfig::default().with_initial_bucket_count(0);
        assert_eq!(c.validate(), Err(ConfigError::ZeroBucketCount));
    }

    #[test]
    fn bad_load_factors_rejected() {
        for lf in [0.0, -1.0, f64::INFINITY, f64::NEG_INFINITY] {
            let c = MapConfig::default().with_max_load_factor(lf);
            assert_eq!(c.validate(), Err(ConfigError::InvalidMaxLoadFactor(lf)));
        }
        let nan = MapConfig::default().with_max_load_factor(f64::NAN);
        assert!(matches!(
            nan.validate(),
            Err(ConfigError::InvalidMaxLoadFactor(v)) if v.is_nan()
        ));
    }

    #[test]
    fn builder_methods_set_fields() {
        let c = MapConfig::default()
            .with_initial_bucket_count(3)
            .with_max_load_factor(0.5);
        assert_eq!(c, MapConfig::new(3, 0.5));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn error_messages_name_the_problem() {
        assert_eq!(
            ConfigError::ZeroBucketCount.to_string(),
            "initial bucket count must be at least 1"
        );
        assert!(ConfigError::InvalidMaxLoadFactor(-2.0)
            .to_string()
            .contains("-2"));
    }
}
