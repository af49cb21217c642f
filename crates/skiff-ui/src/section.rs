//! Identified row groups published to screens.

use serde::Serialize;

/// An identified, optionally titled group of rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionModel<Row> {
    /// Stable identifier used for diffing.
    pub id: String,
    /// Header text, when the section shows one.
    pub header: Option<String>,
    /// Rows in display order.
    pub rows: Vec<Row>,
}

impl<Row> SectionModel<Row> {
    /// Section without a header.
    #[must_use]
    pub fn plain(id: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            id: id.into(),
            header: None,
            rows,
        }
    }

    /// Section with a header.
    #[must_use]
    pub fn titled(id: impl Into<String>, header: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            id: id.into(),
            header: Some(header.into()),
            rows,
        }
    }
}

/// Position of a row inside a list of sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct IndexPath {
    /// Section offset.
    pub section: usize,
    /// Row offset within the section.
    pub row: usize,
}

impl IndexPath {
    /// Construct a path.
    #[must_use]
    pub const fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

/// Resolve `paths` against `sections`, skipping paths that point nowhere.
pub fn rows_at<'a, Row>(sections: &'a [SectionModel<Row>], paths: &[IndexPath]) -> Vec<&'a Row> {
    paths
        .iter()
        .filter_map(|path| sections.get(path.section)?.rows.get(path.row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_paths_are_ignored() {
        let sections = vec![
            SectionModel::plain("a", vec![1, 2]),
            SectionModel::titled("b", "B", vec![3]),
        ];
        let rows = rows_at(
            &sections,
            &[
                IndexPath::new(0, 1),
                IndexPath::new(1, 0),
                IndexPath::new(1, 5),
                IndexPath::new(7, 0),
            ],
        );
        assert_eq!(rows, vec![&2, &3]);
    }
}
