use serde::{Deserialize, Serialize};

use super::Distribution;

/// Items whose connection count falls into `low..=high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryBin {
    pub low: usize,
    pub high: usize,
    pub items: usize,
}

impl SummaryBin {
    pub fn is_exact(&self) -> bool {
        self.low == self.high
    }
}

/// Compresses a distribution into at most `max_bins` bins.
///
/// Connection counts `0` and `1` always get a bin of their own; counts from `2` up to the
/// largest one present are split into equal-width ranges sharing the remaining bins.
pub fn summarize(distribution: &Distribution, max_bins: usize) -> Vec<SummaryBin> {
    let max_bins = max_bins.max(crate::MIN_SUMMARY_BINS);
    let items_at = |c: usize| distribution.get(&c).copied().unwrap_or(0);

    let mut summary = vec![
        SummaryBin {
            low: 0,
            high: 0,
            items: items_at(0),
        },
        SummaryBin {
            low: 1,
            high: 1,
            items: items_at(1),
        },
    ];

    let Some(&max_count) = distribution.keys().next_back().filter(|c| **c >= 2) else {
        return summary;
    };

    let span = max_count - 1;
    let width = span.div_ceil(max_bins - 2);
    let mut low = 2;
    while low <= max_count {
        let high = (low + width - 1).min(max_count);
        let items = distribution.range(low..=high).map(|(_, items)| items).sum();
        summary.push(SummaryBin { low, high, items });
        low = high + 1;
    }

    summary
}
