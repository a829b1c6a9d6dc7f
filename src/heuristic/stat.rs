use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::counts::AttrBin;
use super::{summarize, SummaryBin, UniqueValueCounts};
use crate::SettingsStats;

/// Connection count -> number of items having that many connections.
pub type Distribution = BTreeMap<usize, usize>;

const INDEX_LABEL: &str = "__index__";

/// Stands for the index in stat ids. Named attributes escape it along with `=` and `\`.
const INDEX_ID: char = '*';
const ID_SEPARATOR: char = '=';
const ID_ESCAPE: char = '\\';

/// Attribute a pair joins on: the item index or a named attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attr {
    Index,
    Named(String),
}

impl Attr {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index)
    }

    fn push_id_part(&self, id: &mut String) {
        match self {
            Self::Index => id.push(INDEX_ID),
            Self::Named(name) => {
                for c in name.chars() {
                    if matches!(c, INDEX_ID | ID_SEPARATOR | ID_ESCAPE) {
                        id.push(ID_ESCAPE);
                    }
                    id.push(c);
                }
            }
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index => f.write_str(INDEX_LABEL),
            Self::Named(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributePairStat {
    pub id: String,
    pub source_attr: Attr,
    pub target_attr: Attr,
    pub matches: usize,
    pub source_distribution: Distribution,
    pub target_distribution: Distribution,
    pub source_summary: Vec<SummaryBin>,
    pub target_summary: Vec<SummaryBin>,
    pub source_one_to_one_ness: f64,
    pub target_one_to_one_ness: f64,
}

impl AttributePairStat {
    /// Id of the stat joining `source` with `target`, distinct for every pair of attributes.
    ///
    /// Reads `source=target`, with the index written as `*` and any `*`, `=` or `\` in a name
    /// preceded by `\`.
    pub fn pair_id(source: &Attr, target: &Attr) -> String {
        let mut id = String::new();
        source.push_id_part(&mut id);
        id.push(ID_SEPARATOR);
        target.push_id_part(&mut id);
        id
    }

    /// Sum of both one-to-one-ness scores; `2.0` for a perfect one-to-one join.
    pub fn score(&self) -> f64 {
        self.source_one_to_one_ness + self.target_one_to_one_ness
    }

    fn compute(
        (source_attr, source): (&Attr, &AttrBin),
        (target_attr, target): (&Attr, &AttrBin),
        max_bins: usize,
    ) -> Self {
        let mut matches = 0;
        let mut source_connections: BTreeMap<&str, usize> = BTreeMap::new();
        let mut target_connections: BTreeMap<&str, usize> = BTreeMap::new();

        for (value, &source_items) in &source.values {
            let Some(&target_items) = target.values.get(value) else {
                continue;
            };
            matches += source_items * target_items;
            *source_connections.entry(value.as_str()).or_default() += target_items;
            *target_connections.entry(value.as_str()).or_default() += source_items;
        }

        let source_distribution = distribution(source, &source_connections);
        let target_distribution = distribution(target, &target_connections);

        Self {
            id: Self::pair_id(source_attr, target_attr),
            source_attr: source_attr.clone(),
            target_attr: target_attr.clone(),
            matches,
            source_summary: summarize(&source_distribution, max_bins),
            target_summary: summarize(&target_distribution, max_bins),
            source_one_to_one_ness: one_to_one_ness(&source_distribution),
            target_one_to_one_ness: one_to_one_ness(&target_distribution),
            source_distribution,
            target_distribution,
        }
    }
}

fn distribution(side: &AttrBin, connections: &BTreeMap<&str, usize>) -> Distribution {
    let mut dist = Distribution::new();
    dist.insert(0, side.unhashable);
    for (value, &items) in &side.values {
        let count = connections.get(value.as_str()).copied().unwrap_or(0);
        *dist.entry(count).or_default() += items;
    }
    dist
}

/// Items with one connection count fully, items with more count fractionally, unconnected
/// items count against.
fn one_to_one_ness(dist: &Distribution) -> f64 {
    dist.iter()
        .map(|(&connections, &items)| {
            if connections == 0 {
                -(items as f64)
            } else {
                items as f64 / connections as f64
            }
        })
        .sum()
}

/// Lazily computes one [`AttributePairStat`] per (source, target) attribute pair, the index
/// included on both sides, in source-major order.
pub struct AttributePairs {
    source: Vec<(Attr, AttrBin)>,
    target: Vec<(Attr, AttrBin)>,
    max_bins: usize,
    next: usize,
}

impl AttributePairs {
    pub fn new(
        source: UniqueValueCounts,
        target: UniqueValueCounts,
        settings: &SettingsStats,
    ) -> Self {
        Self {
            source: source.into_attr_bins(),
            target: target.into_attr_bins(),
            max_bins: settings.summary_bins(),
            next: 0,
        }
    }

    fn total(&self) -> usize {
        self.source.len() * self.target.len()
    }
}

impl Iterator for AttributePairs {
    type Item = AttributePairStat;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.total() {
            return None;
        }
        let (s, t) = (self.next / self.target.len(), self.next % self.target.len());
        self.next += 1;

        let (source_attr, source) = &self.source[s];
        let (target_attr, target) = &self.target[t];
        Some(AttributePairStat::compute(
            (source_attr, source),
            (target_attr, target),
            self.max_bins,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total() - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for AttributePairs {}

/// Computes every attribute pair stat at once.
pub fn attribute_pair_stats(
    source: &UniqueValueCounts,
    target: &UniqueValueCounts,
    settings: &SettingsStats,
) -> Vec<AttributePairStat> {
    AttributePairs::new(source.clone(), target.clone(), settings).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn stat(source: UniqueValueCounts, target: UniqueValueCounts, id: &str) -> AttributePairStat {
        attribute_pair_stats(&source, &target, &SettingsStats::default())
            .into_iter()
            .find(|s| s.id == id)
            .unwrap()
    }

    #[test]
    fn foreign_key_pair() {
        let source = UniqueValueCounts::default()
            .with_value("id", "1", 1)
            .with_value("id", "2", 1)
            .with_value("id", "3", 1);
        let target = UniqueValueCounts::default()
            .with_value("fk", "1", 2)
            .with_value("fk", "2", 1);

        let s = stat(source, target, "id=fk");
        assert_eq!(s.matches, 3);
        assert_eq!(s.source_distribution, Distribution::from([(0, 1), (1, 1), (2, 1)]));
        assert_eq!(s.source_one_to_one_ness, 0.5);
        assert_eq!(s.target_distribution, Distribution::from([(0, 0), (1, 3)]));
        assert_eq!(s.target_one_to_one_ness, 3.0);
        assert_eq!(s.score(), 3.5);
    }

    #[test]
    fn target_distribution_counts_target_items() {
        // "x" is rare on the source side and common on the target side
        let source = UniqueValueCounts::default().with_value("a", "x", 1);
        let target = UniqueValueCounts::default().with_value("b", "x", 5);

        let s = stat(source, target, "a=b");
        assert_eq!(s.source_distribution, Distribution::from([(0, 0), (5, 1)]));
        assert_eq!(s.target_distribution, Distribution::from([(0, 0), (1, 5)]));
    }

    #[test]
    fn unhashable_items_are_unconnected() {
        let source = UniqueValueCounts::default()
            .with_value("a", "x", 1)
            .with_unhashable("a", 2);
        let target = UniqueValueCounts::default().with_value("b", "x", 1);

        let s = stat(source, target, "a=b");
        assert_eq!(s.source_distribution, Distribution::from([(0, 2), (1, 1)]));
        assert_eq!(s.source_one_to_one_ness, -1.0);
    }

    #[test]
    fn zero_matches_score_negative() {
        let source = UniqueValueCounts::default().with_value("a", "x", 2);
        let target = UniqueValueCounts::default().with_value("b", "y", 3);

        let s = stat(source, target, "a=b");
        assert_eq!(s.matches, 0);
        assert_eq!(s.score(), -5.0);
    }

    #[test]
    fn index_pairs_are_labelled() {
        let source = UniqueValueCounts::default().with_index("0", 1);
        let target = UniqueValueCounts::default().with_value("b", "0", 1);

        let ids: Vec<_> = attribute_pair_stats(&source, &target, &SettingsStats::default())
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["*=*", "*=b"]);
    }

    #[test]
    fn separator_in_names_keeps_ids_apart() {
        let source = UniqueValueCounts::default()
            .with_value("a", "x", 1)
            .with_value("a=b", "x", 1);
        let target = UniqueValueCounts::default()
            .with_value("c", "x", 1)
            .with_value("b=c", "x", 1);

        let ids: HashSet<_> = attribute_pair_stats(&source, &target, &SettingsStats::default())
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids.len(), 9);
        assert!(ids.contains("a\\=b=c"));
        assert!(ids.contains("a=b\\=c"));
    }

    #[test]
    fn index_label_as_name_is_not_the_index() {
        let named = Attr::named(INDEX_LABEL);
        assert_ne!(
            AttributePairStat::pair_id(&named, &Attr::Index),
            AttributePairStat::pair_id(&Attr::Index, &Attr::Index)
        );
        assert_ne!(
            AttributePairStat::pair_id(&Attr::named("*"), &Attr::Index),
            AttributePairStat::pair_id(&Attr::Index, &Attr::Index)
        );
        assert_ne!(
            AttributePairStat::pair_id(&Attr::named("\\"), &Attr::named("=")),
            AttributePairStat::pair_id(&Attr::named("\\="), &Attr::named(""))
        );
    }

    #[test]
    fn iterator_reports_exact_length() {
        let source = UniqueValueCounts::default().with_value("a", "x", 1);
        let target = UniqueValueCounts::default()
            .with_value("b", "x", 1)
            .with_value("c", "x", 1);
        let mut pairs = AttributePairs::new(source, target, &SettingsStats::default());
        assert_eq!(pairs.len(), 6);
        pairs.next();
        assert_eq!(pairs.len(), 5);
    }
}
