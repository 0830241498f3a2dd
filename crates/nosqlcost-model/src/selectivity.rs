//! Best-effort filter selectivity.
//!
//! Priority order:
//! 1. an explicit selectivity, clamped into `[0, 1]`;
//! 2. for the `brand` key, `nb_apple_products / nb_products`;
//! 3. the reciprocal of a distinct-value count (`distinct_<key>`,
//!    `distinct_<key>s`, then `distinct_brands`);
//! 4. the configured default (1%).
//!
//! Derived values are floored at 1e-6. Missing statistics never fail; callers
//! who need precision pass an explicit selectivity.

use nosqlcost_core::config::SelectivityConfig;
use nosqlcost_core::stats::DomainStatistics;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectivitySource {
    Explicit,
    PopularSubset,
    DistinctValues,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectivityEstimate {
    pub value: f64,
    pub source: SelectivitySource,
}

/// Clamp into `[0, 1]`; NaN counts as 0.
pub fn clamp_selectivity(selectivity: f64) -> f64 {
    if selectivity.is_nan() {
        0.0
    } else {
        selectivity.clamp(0.0, 1.0)
    }
}

pub fn estimate(filter_key: &str, explicit: Option<f64>, stats: &DomainStatistics) -> f64 {
    estimate_with(&SelectivityConfig::default(), filter_key, explicit, stats).value
}

pub fn estimate_with(
    cfg: &SelectivityConfig,
    filter_key: &str,
    explicit: Option<f64>,
    stats: &DomainStatistics,
) -> SelectivityEstimate {
    if let Some(s) = explicit {
        return SelectivityEstimate {
            value: clamp_selectivity(s),
            source: SelectivitySource::Explicit,
        };
    }

    let key = filter_key.to_lowercase();

    if key == "brand" {
        let total = stats.first_positive(&["nb_products", "num_products"]);
        let popular = stats.first_positive(&["nb_apple_products", "num_apple_products"]);
        if let (Some(total), Some(popular)) = (total, popular) {
            return SelectivityEstimate {
                value: (popular / total).max(cfg.floor),
                source: SelectivitySource::PopularSubset,
            };
        }
    }

    let exact = format!("distinct_{key}");
    let plural = format!("distinct_{key}s");
    if let Some(distinct) = stats.first_positive(&[exact.as_str(), plural.as_str(), "distinct_brands"]) {
        return SelectivityEstimate {
            value: (1.0 / distinct).max(cfg.floor),
            source: SelectivitySource::DistinctValues,
        };
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(key = %filter_key, default = cfg.default_selectivity, "no statistics for filter key; using default selectivity");

    SelectivityEstimate {
        value: cfg.default_selectivity,
        source: SelectivitySource::Default,
    }
}
