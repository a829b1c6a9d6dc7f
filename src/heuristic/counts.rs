use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Attr;

/// Number of items per distinct value, for the index and for every attribute of a class.
///
/// Items whose value can't be hashed aren't binned; only their number per attribute is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UniqueValueCounts {
    pub index_bin: BTreeMap<String, usize>,
    pub bins: BTreeMap<String, BTreeMap<String, usize>>,
    pub unhashable: BTreeMap<String, usize>,
}

/// Values of one attribute, flattened out of [`UniqueValueCounts`].
#[derive(Debug, Clone, Default)]
pub(crate) struct AttrBin {
    pub(crate) values: BTreeMap<String, usize>,
    pub(crate) unhashable: usize,
}

impl UniqueValueCounts {
    /// Parses the JSON shape `{"indexBin": {..}, "bins": {attr: {..}}, "unhashable": {attr: n}}`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Serialization`] when the document doesn't have that shape.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_index(mut self, value: impl Into<String>, items: usize) -> Self {
        *self.index_bin.entry(value.into()).or_default() += items;
        self
    }

    pub fn with_value(
        mut self,
        attr: impl Into<String>,
        value: impl Into<String>,
        items: usize,
    ) -> Self {
        *self
            .bins
            .entry(attr.into())
            .or_default()
            .entry(value.into())
            .or_default() += items;
        self
    }

    pub fn with_unhashable(mut self, attr: impl Into<String>, items: usize) -> Self {
        *self.unhashable.entry(attr.into()).or_default() += items;
        self
    }

    /// Attributes with at least one binned or unhashable item, index excluded.
    pub fn attribute_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .bins
            .keys()
            .chain(self.unhashable.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// The index followed by every attribute.
    pub(crate) fn into_attr_bins(mut self) -> Vec<(Attr, AttrBin)> {
        let names: Vec<String> = self
            .attribute_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut out = Vec::with_capacity(names.len() + 1);
        out.push((
            Attr::Index,
            AttrBin {
                values: std::mem::take(&mut self.index_bin),
                unhashable: 0,
            },
        ));
        for name in names {
            let values = self.bins.remove(&name).unwrap_or_default();
            let unhashable = self.unhashable.get(&name).copied().unwrap_or(0);
            out.push((Attr::Named(name), AttrBin { values, unhashable }));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_payload() {
        let counts = UniqueValueCounts::from_json(
            r#"{"indexBin":{"0":1,"1":1},"bins":{"name":{"a":2}},"unhashable":{"tags":4}}"#,
        )
        .unwrap();
        assert_eq!(counts.index_bin.len(), 2);
        assert_eq!(counts.bins["name"]["a"], 2);
        assert_eq!(counts.attribute_names(), vec!["name", "tags"]);
    }

    #[test]
    fn flattening_puts_index_first() {
        let counts = UniqueValueCounts::default()
            .with_index("0", 1)
            .with_value("b", "x", 1)
            .with_value("a", "y", 2)
            .with_unhashable("a", 3);
        let flat = counts.into_attr_bins();
        let attrs: Vec<_> = flat.iter().map(|(a, _)| a.to_string()).collect();
        assert_eq!(attrs, vec!["__index__", "a", "b"]);
        assert_eq!(flat[1].1.unhashable, 3);
        assert_eq!(flat[1].1.values["y"], 2);
    }
}
