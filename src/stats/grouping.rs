//! Categorical Grouper Module
//! Splits a measurement by a categorical column, keeping first-seen label order.

use crate::data::{Category, FilteredView, Measure};
use crate::stats::BoxSummary;
use std::collections::HashMap;

/// Values of one category label, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    pub label: String,
    pub values: Vec<f64>,
}

impl CategoryGroup {
    pub fn summary(&self) -> Option<BoxSummary> {
        BoxSummary::from_values(&self.values)
    }
}

/// Insertion-ordered mapping label → values.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroups {
    pub category: Category,
    pub value: Measure,
    groups: Vec<CategoryGroup>,
    index: HashMap<String, usize>,
}

impl CategoryGroups {
    fn new(category: Category, value: Measure) -> Self {
        Self {
            category,
            value,
            groups: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn push(&mut self, label: &str, value: f64) {
        let idx = match self.index.get(label) {
            Some(&idx) => idx,
            None => {
                self.groups.push(CategoryGroup {
                    label: label.to_string(),
                    values: Vec::new(),
                });
                self.index.insert(label.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        self.groups[idx].values.push(value);
    }

    pub fn get(&self, label: &str) -> Option<&[f64]> {
        self.index
            .get(label)
            .map(|&idx| self.groups[idx].values.as_slice())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.iter().map(|g| g.label.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CategoryGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Box summary per label, in label order.
    pub fn summaries(&self) -> Vec<(String, BoxSummary)> {
        self.groups
            .iter()
            .filter_map(|g| g.summary().map(|s| (g.label.clone(), s)))
            .collect()
    }
}

/// Group the values of `value` by the label in `category`.
///
/// Rows missing either the label or the value are skipped.
pub fn group_by(view: FilteredView<'_>, category: Category, value: Measure) -> CategoryGroups {
    let mut groups = CategoryGroups::new(category, value);
    for obs in view {
        if let (Some(label), Some(v)) = (obs.category(category), obs.get(value)) {
            groups.push(label, v);
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{filter, Dataset, Observation};
    use chrono::{Duration, NaiveDate};

    fn dataset(rows: &[(Option<&str>, Option<f64>)]) -> Dataset {
        let start = NaiveDate::from_ymd_opt(2016, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, &(wd, pm))| {
                let mut obs = Observation::new(start + Duration::hours(i as i64));
                obs.wind_direction = wd.map(str::to_string);
                obs.set(Measure::Pm25, pm);
                obs
            })
            .collect();
        Dataset::from_observations(records)
    }

    #[test]
    fn groups_preserve_input_order() {
        let ds = dataset(&[
            (Some("N"), Some(5.0)),
            (Some("N"), Some(7.0)),
            (Some("SE"), Some(9.0)),
        ]);
        let groups = group_by(ds.view(), Category::WindDirection, Measure::Pm25);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups.get("N"), Some(&[5.0, 7.0][..]));
        assert_eq!(groups.get("SE"), Some(&[9.0][..]));
        assert_eq!(groups.labels().collect::<Vec<_>>(), vec!["N", "SE"]);
    }

    #[test]
    fn labels_follow_first_appearance() {
        let ds = dataset(&[
            (Some("SW"), Some(1.0)),
            (Some("E"), Some(2.0)),
            (Some("SW"), Some(3.0)),
            (Some("NNE"), Some(4.0)),
        ]);
        let groups = group_by(ds.view(), Category::WindDirection, Measure::Pm25);
        assert_eq!(groups.labels().collect::<Vec<_>>(), vec!["SW", "E", "NNE"]);
    }

    #[test]
    fn rows_missing_label_or_value_are_skipped() {
        let ds = dataset(&[
            (None, Some(5.0)),
            (Some("W"), None),
            (Some("W"), Some(8.0)),
        ]);
        let groups = group_by(ds.view(), Category::WindDirection, Measure::Pm25);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.get("W"), Some(&[8.0][..]));
        assert_eq!(groups.get("N"), None);
    }

    #[test]
    fn summaries_follow_label_order() {
        let ds = dataset(&[
            (Some("N"), Some(1.0)),
            (Some("S"), Some(10.0)),
            (Some("N"), Some(3.0)),
        ]);
        let summaries = group_by(ds.view(), Category::WindDirection, Measure::Pm25).summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].0, "N");
        assert_eq!(summaries[0].1.median, 2.0);
        assert_eq!(summaries[1].1.count, 1);
    }

    #[test]
    fn empty_view_gives_no_groups() {
        let ds = dataset(&[(Some("N"), Some(5.0))]);
        let groups = group_by(filter(&ds, 2020, 2021), Category::WindDirection, Measure::Pm25);
        assert!(groups.is_empty());
        assert!(groups.summaries().is_empty());
    }
}
