use std::cmp::Ordering;

use crate::domain::entities::column::ColumnKey;
use crate::domain::entities::product::{CellValue, Product};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: ColumnKey,
    pub direction: SortDirection,
}

/// Removable sort: repeated activation of one header walks
/// none -> ascending -> descending -> none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    active: Option<SortSpec>,
}

impl SortState {
    pub fn active(&self) -> Option<SortSpec> {
        self.active
    }

    pub fn direction_of(&self, column: ColumnKey) -> Option<SortDirection> {
        self.active
            .filter(|spec| spec.column == column)
            .map(|spec| spec.direction)
    }

    #[must_use]
    pub fn activate(self, column: ColumnKey) -> Self {
        let active = match self.active {
            Some(SortSpec {
                column: current,
                direction: SortDirection::Asc,
            }) if current == column => Some(SortSpec {
                column,
                direction: SortDirection::Desc,
            }),
            Some(SortSpec {
                column: current,
                direction: SortDirection::Desc,
            }) if current == column => None,
            _ => Some(SortSpec {
                column,
                direction: SortDirection::Asc,
            }),
        };
        Self { active }
    }
}

fn compare_cells(left: CellValue<'_>, right: CellValue<'_>) -> Ordering {
    match (left, right) {
        (CellValue::Text(a), CellValue::Text(b)) => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
        (a, b) => a.cmp(&b),
    }
}

/// Stable in-place sort; rows with equal keys keep their relative order.
pub fn sort_products(records: &mut [Product], state: &SortState) {
    let Some(spec) = state.active() else {
        return;
    };
    records.sort_by(|a, b| {
        let ordering = compare_cells(a.cell(spec.column), b.cell(spec.column));
        match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}
