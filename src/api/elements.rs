use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::api::{ChartId, RangeSlider};
use crate::core::Dimensions;
use crate::error::{ChartError, ChartResult};

/// Accessible tabular view of the data a chart draws.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DataTable {
    /// Text of the disclosure toggle that reveals the table.
    pub summary: String,
    pub caption: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Whether the first cell of every row is a row header.
    pub row_headers: bool,
}

impl DataTable {
    #[must_use]
    pub fn new(summary: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            caption: caption.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = headers.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_row_headers(mut self) -> Self {
        self.row_headers = true;
        self
    }

    /// Appends a body row, which must have one cell per header.
    pub fn push_row(&mut self, row: Vec<String>) -> ChartResult<()> {
        if row.len() != self.headers.len() {
            return Err(ChartError::InvalidData(format!(
                "table row has {} cell(s) but {} header(s)",
                row.len(),
                self.headers.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cells of the column titled `header`.
    #[must_use]
    pub fn column(&self, header: &str) -> Option<Vec<&str>> {
        let index = self.headers.iter().position(|candidate| candidate == header)?;
        Some(self.rows.iter().map(|row| row[index].as_str()).collect())
    }
}

/// Drop-down choosing one of a fixed set of options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectControl {
    options: Vec<String>,
    selected: usize,
}

impl SelectControl {
    pub fn new(options: Vec<String>) -> ChartResult<Self> {
        if options.is_empty() {
            return Err(ChartError::InvalidData("select needs at least one option".to_owned()));
        }
        Ok(Self { options, selected: 0 })
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn selected_value(&self) -> &str {
        &self.options[self.selected]
    }

    /// Selects option `index`. Returns whether the selection changed.
    pub fn select(&mut self, index: usize) -> ChartResult<bool> {
        if index >= self.options.len() {
            return Err(ChartError::InvalidData(format!(
                "option {index} is out of bounds for {} option(s)",
                self.options.len()
            )));
        }
        let changed = index != self.selected;
        self.selected = index;
        Ok(changed)
    }
}

/// The canvas element of a chart, tagged with the chart id while on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasElement {
    pub dimensions: Dimensions,
    pub chart_id: Option<ChartId>,
}

/// Host page element owned by one chart.
#[derive(Debug)]
pub enum HostElement {
    Canvas(CanvasElement),
    Select(SelectControl),
    RangeSlider(RangeSlider),
    DataTable(DataTable),
}

impl HostElement {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            HostElement::Canvas(_) => "canvas",
            HostElement::Select(_) => "select",
            HostElement::RangeSlider(_) => "range_slider",
            HostElement::DataTable(_) => "data_table",
        }
    }
}

/// Ordered elements a chart mounts on setup and unmounts on destroy.
///
/// The canvas is always first. Behaviors append their controls while
/// preloading and the data table is appended last.
#[derive(Debug)]
pub struct ChartElements {
    items: Vec<HostElement>,
    mounted: bool,
}

impl ChartElements {
    #[must_use]
    pub fn new(canvas: Dimensions) -> Self {
        Self {
            items: vec![HostElement::Canvas(CanvasElement {
                dimensions: canvas,
                chart_id: None,
            })],
            mounted: false,
        }
    }

    pub fn push(&mut self, element: HostElement) {
        trace!(kind = element.kind(), "chart element added");
        self.items.push(element);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HostElement> {
        self.items.iter()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub(crate) fn mount(&mut self, id: ChartId) {
        for element in &mut self.items {
            if let HostElement::Canvas(canvas) = element {
                canvas.chart_id = Some(id);
            }
        }
        self.mounted = true;
    }

    pub(crate) fn unmount(&mut self) {
        self.mounted = false;
    }

    #[must_use]
    pub fn canvas(&self) -> Option<&CanvasElement> {
        self.items.iter().find_map(|element| match element {
            HostElement::Canvas(canvas) => Some(canvas),
            _ => None,
        })
    }

    #[must_use]
    pub fn slider(&self) -> Option<&RangeSlider> {
        self.items.iter().find_map(|element| match element {
            HostElement::RangeSlider(slider) => Some(slider),
            _ => None,
        })
    }

    pub fn slider_mut(&mut self) -> Option<&mut RangeSlider> {
        self.items.iter_mut().find_map(|element| match element {
            HostElement::RangeSlider(slider) => Some(slider),
            _ => None,
        })
    }

    #[must_use]
    pub fn select(&self) -> Option<&SelectControl> {
        self.items.iter().find_map(|element| match element {
            HostElement::Select(select) => Some(select),
            _ => None,
        })
    }

    pub fn select_mut(&mut self) -> Option<&mut SelectControl> {
        self.items.iter_mut().find_map(|element| match element {
            HostElement::Select(select) => Some(select),
            _ => None,
        })
    }

    #[must_use]
    pub fn data_table(&self) -> Option<&DataTable> {
        self.items.iter().find_map(|element| match element {
            HostElement::DataTable(table) => Some(table),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rows_must_match_headers() {
        let mut table = DataTable::new("Show data", "Data").with_headers(["Year", "Gap"]);
        table.push_row(vec!["1997".to_owned(), "17.5%".to_owned()]).expect("row");
        assert!(table.push_row(vec!["1998".to_owned()]).is_err());
        assert_eq!(table.column("Gap"), Some(vec!["17.5%"]));
    }

    #[test]
    fn select_rejects_unknown_options() {
        let mut select = SelectControl::new(vec!["Apple".to_owned(), "Google".to_owned()]).expect("select");
        assert!(select.select(1).expect("valid"));
        assert_eq!(select.selected_value(), "Google");
        assert!(!select.select(1).expect("same"));
        assert!(select.select(2).is_err());
    }

    #[test]
    fn mounting_tags_the_canvas() {
        let mut elements = ChartElements::new(Dimensions::default());
        elements.mount(ChartId::new(3));
        assert!(elements.is_mounted());
        assert_eq!(elements.canvas().and_then(|canvas| canvas.chart_id), Some(ChartId::new(3)));
        elements.unmount();
        assert!(!elements.is_mounted());
    }
}
