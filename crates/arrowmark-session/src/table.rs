use arrowmark_annotation::{Arrow, ArrowColor, ArrowObserver, ArrowPatch};
use arrowmark_base::Vec3;

/// One editable table line. Vectors are in volume order (z, y, x).
#[derive(Clone, Debug, PartialEq)]
pub struct ArrowRow {
    pub end: Vec3,
    pub direction: Vec3,
    pub color: ArrowColor,
    pub length: f64,
    pub edge_width: f64,
    pub opacity: f64,
}

impl From<&Arrow> for ArrowRow {
    fn from(arrow: &Arrow) -> Self {
        Self {
            end: arrow.end(),
            direction: arrow.direction(),
            color: arrow.color().clone(),
            length: arrow.length(),
            edge_width: arrow.edge_width(),
            opacity: arrow.opacity(),
        }
    }
}

/// A single cell group edited in the table.
#[derive(Clone, Debug, PartialEq)]
pub enum TableEdit {
    /// End and direction cells; the tail follows as `end - direction`.
    Vector { end: Vec3, direction: Vec3 },
    Color(ArrowColor),
    /// Rescales about the fixed end.
    Length(f64),
    Width(f64),
    Opacity(f64),
}

impl From<TableEdit> for ArrowPatch {
    fn from(edit: TableEdit) -> Self {
        let patch = ArrowPatch::new();
        match edit {
            TableEdit::Vector { end, direction } => patch.end(end).direction(direction),
            TableEdit::Color(color) => patch.color(color),
            TableEdit::Length(length) => patch.length(length),
            TableEdit::Width(width) => patch.edge_width(width),
            TableEdit::Opacity(opacity) => patch.opacity(opacity),
        }
    }
}

/// Table model kept in sync with the store it observes.
#[derive(Clone, Debug, Default)]
pub struct ArrowTable {
    rows: Vec<ArrowRow>,
    refreshes: usize,
}

impl ArrowTable {
    pub fn rows(&self) -> &[ArrowRow] {
        &self.rows
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes
    }
}

impl ArrowObserver for ArrowTable {
    fn arrows_changed(&mut self, arrows: &[Arrow]) {
        self.rows = arrows.iter().map(ArrowRow::from).collect();
        self.refreshes += 1;
    }
}
