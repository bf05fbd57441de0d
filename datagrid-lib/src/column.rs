//! Column descriptors.
//!
//! A column projects a row into one rendered cell and knows how to render its
//! own header. The table never looks inside rows; it only calls these
//! renderers.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ColumnError;

type HeaderFn<C> = Arc<dyn Fn() -> C + Send + Sync>;
type CellFn<T, C> = Arc<dyn Fn(&T) -> C + Send + Sync>;

// =============================================================================
// ColumnWidth
// =============================================================================

/// Structural width hints for a column, in display cells.
///
/// These are the only layout contract the table has with its renderer:
/// header cells, skeleton cells and data cells of one column all carry the
/// same hints so nothing shifts when data arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnWidth {
    pub min: Option<u16>,
    pub ideal: Option<u16>,
    pub max: Option<u16>,
}

impl ColumnWidth {
    /// Resolve the width to use when `available` cells are offered.
    ///
    /// Falls back to `available` when no ideal width is set.
    pub fn resolve(&self, available: u16) -> u16 {
        let mut width = self.ideal.unwrap_or(available);
        if let Some(max) = self.max {
            width = width.min(max);
        }
        if let Some(min) = self.min {
            width = width.max(min);
        }
        width
    }

    fn check(&self, id: &str) -> Result<(), ColumnError> {
        let invalid = |reason| ColumnError::InvalidWidth {
            id: id.to_string(),
            reason,
        };
        if let (Some(min), Some(max)) = (self.min, self.max)
            && min > max
        {
            return Err(invalid("min width exceeds max width"));
        }
        if let (Some(min), Some(ideal)) = (self.min, self.ideal)
            && min > ideal
        {
            return Err(invalid("min width exceeds ideal width"));
        }
        if let (Some(ideal), Some(max)) = (self.ideal, self.max)
            && ideal > max
        {
            return Err(invalid("ideal width exceeds max width"));
        }
        Ok(())
    }
}

// =============================================================================
// Column
// =============================================================================

/// A table column definition.
///
/// `T` is the row type, `C` whatever the rendering layer accepts as cell
/// content.
///
/// # Example
///
/// ```
/// use datagrid_lib::column::Column;
///
/// struct Listing {
///     location: String,
/// }
///
/// let column: Column<Listing, String> =
///     Column::text("location", "Location", |l: &Listing| l.location.clone()).width(24);
/// assert_eq!(column.id(), "location");
/// ```
pub struct Column<T, C> {
    id: String,
    width: ColumnWidth,
    header: HeaderFn<C>,
    cell: CellFn<T, C>,
}

impl<T, C> Column<T, C> {
    /// Create a column from a header renderer and a cell renderer.
    pub fn new<H, F>(id: impl Into<String>, header: H, cell: F) -> Self
    where
        H: Fn() -> C + Send + Sync + 'static,
        F: Fn(&T) -> C + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            width: ColumnWidth::default(),
            header: Arc::new(header),
            cell: Arc::new(cell),
        }
    }

    /// Create a column whose header is fixed text.
    pub fn text<F>(id: impl Into<String>, header: impl Into<String>, cell: F) -> Self
    where
        C: From<String>,
        F: Fn(&T) -> C + Send + Sync + 'static,
    {
        let header = header.into();
        Self::new(id, move || C::from(header.clone()), cell)
    }

    /// Set the ideal width.
    pub fn width(mut self, width: u16) -> Self {
        self.width.ideal = Some(width);
        self
    }

    /// Set the minimum width.
    pub fn min_width(mut self, width: u16) -> Self {
        self.width.min = Some(width);
        self
    }

    /// Set the maximum width.
    pub fn max_width(mut self, width: u16) -> Self {
        self.width.max = Some(width);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn width_hint(&self) -> ColumnWidth {
        self.width
    }

    /// Render the header content.
    pub fn render_header(&self) -> C {
        (self.header)()
    }

    /// Render the cell content for a row.
    pub fn render_cell(&self, row: &T) -> C {
        (self.cell)(row)
    }
}

impl<T, C> Clone for Column<T, C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            width: self.width,
            header: Arc::clone(&self.header),
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T, C> fmt::Debug for Column<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Columns
// =============================================================================

/// An ordered, validated set of columns.
///
/// Construction is the only place column contracts are checked: ids are
/// unique, the set is non-empty and width hints are consistent. Once built,
/// rendering cannot fail.
pub struct Columns<T, C> {
    columns: Vec<Column<T, C>>,
}

impl<T, C> Columns<T, C> {
    pub fn new(columns: Vec<Column<T, C>>) -> Result<Self, ColumnError> {
        if columns.is_empty() {
            return Err(ColumnError::Empty);
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.id.as_str()) {
                return Err(ColumnError::DuplicateId(column.id.clone()));
            }
            column.width.check(&column.id)?;
        }

        Ok(Self { columns })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false; an empty set is rejected by [`Columns::new`].
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column<T, C>> {
        self.columns.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Column<T, C>> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Position of a column in left-to-right order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.id.as_str())
    }
}

impl<T, C> Clone for Columns<T, C> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
        }
    }
}

impl<T, C> fmt::Debug for Columns<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.columns.iter()).finish()
    }
}

impl<'a, T, C> IntoIterator for &'a Columns<T, C> {
    type Item = &'a Column<T, C>;
    type IntoIter = std::slice::Iter<'a, Column<T, C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(id: &str) -> Column<u32, String> {
        Column::text(id, id.to_uppercase(), |n: &u32| n.to_string())
    }

    #[test]
    fn test_rejects_empty_set() {
        let err = Columns::<u32, String>::new(Vec::new()).unwrap_err();
        assert_eq!(err, ColumnError::Empty);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = Columns::new(vec![col("a"), col("b"), col("a")]).unwrap_err();
        assert_eq!(err, ColumnError::DuplicateId("a".into()));
    }

    #[test]
    fn test_rejects_inconsistent_widths() {
        let err = Columns::new(vec![col("a").min_width(10).max_width(5)]).unwrap_err();
        assert!(matches!(err, ColumnError::InvalidWidth { ref id, .. } if id == "a"));

        let err = Columns::new(vec![col("a").width(20).max_width(5)]).unwrap_err();
        assert!(matches!(err, ColumnError::InvalidWidth { .. }));
    }

    #[test]
    fn test_preserves_order() {
        let columns = Columns::new(vec![col("c"), col("a"), col("b")]).unwrap();
        let ids: Vec<_> = columns.ids().collect();
        assert_eq!(ids, ["c", "a", "b"]);
        assert_eq!(columns.position("b"), Some(2));
    }

    #[test]
    fn test_renderers() {
        let columns = Columns::new(vec![col("n")]).unwrap();
        let column = columns.get("n").unwrap();
        assert_eq!(column.render_header(), "N");
        assert_eq!(column.render_cell(&42), "42");
    }

    #[test]
    fn test_resolve_width() {
        let width = ColumnWidth {
            min: Some(4),
            ideal: Some(10),
            max: Some(8),
        };
        assert_eq!(width.resolve(30), 8);
        assert_eq!(ColumnWidth::default().resolve(12), 12);
        let narrow = ColumnWidth {
            min: Some(6),
            ..Default::default()
        };
        assert_eq!(narrow.resolve(3), 6);
    }
}
