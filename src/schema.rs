//! Column inference for reports whose column set depends on the data.

use std::collections::BTreeSet;

use serde::Serialize;

/// Ordered, deduplicated column keys shared by every page of a report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ColumnSchema {
    keys: Vec<String>,
}

impl ColumnSchema {
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Short header labels `Act1..ActN`, one per key.
    pub fn labels(&self, prefix: &str) -> Vec<String> {
        (1..=self.keys.len())
            .map(|index| format!("{prefix}{index}"))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ColumnSchema {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let unique: BTreeSet<String> = iter.into_iter().map(Into::into).collect();
        Self {
            keys: unique.into_iter().collect(),
        }
    }
}

/// Scans every record once and returns the sorted set of keys it yields.
///
/// `extract` returns the keys of one record (e.g. every activity name across
/// all of a student's grade groups). The result does not depend on the order of
/// `records`.
pub fn infer_columns<'a, R, F, I>(records: &'a [R], extract: F) -> ColumnSchema
where
    F: Fn(&'a R) -> I,
    I: IntoIterator<Item = &'a str>,
{
    records.iter().flat_map(extract).collect()
}
