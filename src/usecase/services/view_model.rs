//! The table screen as a synchronous reducer.
//!
//! `reduce(state, action)` never mutates its input: every container (store,
//! filters, sort, selection) is replaced wholesale in the returned state, and
//! selection changes come back as events for the notification surface.

use tracing::{debug, warn};

use crate::config::ViewConfig;
use crate::domain::entities::column::{column_def, ColumnKey, FilterInputKind};
use crate::domain::entities::filter::{evaluate, FilterOperator, FilterState, FilterValue, MatchMode};
use crate::domain::entities::product::{Product, ProductId, RawProduct};
use crate::domain::entities::selection::{SelectionEvent, SelectionState};
use crate::domain::entities::sort::{sort_products, SortState};
use crate::domain::format::{parse_date_input, parse_flag_input, parse_quantity_input, FilterInputError};
use crate::usecase::ports::source::SourceError;
use crate::usecase::services::record_store::{LoadTicket, RecordStore};

#[derive(Debug, Clone)]
pub struct ViewState {
    pub config: ViewConfig,
    pub store: RecordStore,
    pub filters: FilterState,
    pub sort: SortState,
    pub selection: SelectionState,
    pub page: usize,
    pub rows_per_page: usize,
}

impl ViewState {
    pub fn new(config: ViewConfig) -> Self {
        let rows_per_page = config.rows_per_page.max(1);
        Self {
            config,
            store: RecordStore::default(),
            filters: FilterState::default(),
            sort: SortState::default(),
            selection: SelectionState::default(),
            page: 0,
            rows_per_page,
        }
    }
}

#[derive(Debug)]
pub enum ViewAction {
    BeginLoad,
    FinishLoad {
        ticket: LoadTicket,
        result: Result<Vec<RawProduct>, SourceError>,
    },
    SetGlobalFilter(String),
    SetFilterValue {
        column: ColumnKey,
        index: usize,
        value: Option<FilterValue>,
    },
    /// Raw text from a filter box, parsed by the column's input kind.
    SetFilterInput {
        column: ColumnKey,
        index: usize,
        input: String,
    },
    SetMatchMode {
        column: ColumnKey,
        index: usize,
        match_mode: MatchMode,
    },
    SetOperator {
        column: ColumnKey,
        operator: FilterOperator,
    },
    AddConstraint(ColumnKey),
    RemoveConstraint {
        column: ColumnKey,
        index: usize,
    },
    ClearFilters,
    ActivateSort(ColumnKey),
    ActivateRow(ProductId),
    ClearSelection,
    SetPage(usize),
    SetRowsPerPage(usize),
}

#[derive(Debug, Clone)]
pub struct Reduced {
    pub state: ViewState,
    pub events: Vec<SelectionEvent>,
    /// Filter input that could not be parsed; the constraint was left inactive.
    pub rejected: Option<FilterInputError>,
}

impl Reduced {
    fn state(state: ViewState) -> Self {
        Self {
            state,
            events: Vec::new(),
            rejected: None,
        }
    }
}

fn parse_filter_input(
    kind: FilterInputKind,
    input: &str,
) -> Result<Option<FilterValue>, FilterInputError> {
    let trimmed = input.trim();
    if input.is_empty() || (kind != FilterInputKind::Text && trimmed.is_empty()) {
        return Ok(None);
    }
    // Text is kept as typed; `Constraint::is_active` decides.
    let value = match kind {
        FilterInputKind::Text => FilterValue::Text(input.to_string()),
        FilterInputKind::Numeric => FilterValue::Number(parse_quantity_input(trimmed)?),
        FilterInputKind::Date => FilterValue::Date(parse_date_input(trimmed)?),
        FilterInputKind::TriState => FilterValue::Bool(parse_flag_input(trimmed)?),
    };
    Ok(Some(value))
}

fn with_filters(state: &ViewState, filters: FilterState) -> ViewState {
    ViewState {
        filters,
        page: 0,
        ..state.clone()
    }
}

pub fn reduce(state: &ViewState, action: ViewAction) -> Reduced {
    match action {
        ViewAction::BeginLoad => {
            let (store, ticket) = state.store.begin_load();
            debug!(?ticket, "product load started");
            Reduced::state(ViewState {
                store,
                ..state.clone()
            })
        }
        ViewAction::FinishLoad { ticket, result } => {
            let store = state.store.finish_load(ticket, result);
            let stale = state.selection.selected().is_some_and(|selected| {
                !store.products().iter().any(|product| product.id == selected.id)
            });
            let (selection, events) = if stale && !store.loading() {
                state.selection.clear()
            } else {
                (state.selection.clone(), Vec::new())
            };
            let next = ViewState {
                store,
                selection,
                ..state.clone()
            };
            let page = clamp_page(&next, next.page);
            Reduced {
                state: ViewState { page, ..next },
                events,
                rejected: None,
            }
        }
        ViewAction::SetGlobalFilter(keyword) => {
            let mut filters = state.filters.clone();
            filters.set_global(keyword);
            Reduced::state(with_filters(state, filters))
        }
        ViewAction::SetFilterValue {
            column,
            index,
            value,
        } => {
            let mut filters = state.filters.clone();
            if !filters.set_value(column, index, value) {
                return Reduced::state(state.clone());
            }
            Reduced::state(with_filters(state, filters))
        }
        ViewAction::SetFilterInput {
            column,
            index,
            input,
        } => {
            let Some(def) = column_def(column).filter(|def| def.filterable) else {
                return Reduced::state(state.clone());
            };
            let (value, rejected) = match parse_filter_input(def.input, &input) {
                Ok(value) => (value, None),
                Err(err) => {
                    warn!(column = column.field(), error = %err, "ignoring filter input");
                    (None, Some(err))
                }
            };
            let mut filters = state.filters.clone();
            if !filters.set_value(column, index, value) {
                return Reduced::state(state.clone());
            }
            Reduced {
                state: with_filters(state, filters),
                events: Vec::new(),
                rejected,
            }
        }
        ViewAction::SetMatchMode {
            column,
            index,
            match_mode,
        } => {
            let mut filters = state.filters.clone();
            if !filters.set_match_mode(column, index, match_mode) {
                return Reduced::state(state.clone());
            }
            Reduced::state(with_filters(state, filters))
        }
        ViewAction::SetOperator { column, operator } => {
            let mut filters = state.filters.clone();
            filters.set_operator(column, operator);
            Reduced::state(with_filters(state, filters))
        }
        ViewAction::AddConstraint(column) => {
            let mut filters = state.filters.clone();
            filters.add_constraint(column);
            Reduced::state(ViewState {
                filters,
                ..state.clone()
            })
        }
        ViewAction::RemoveConstraint { column, index } => {
            let mut filters = state.filters.clone();
            if !filters.remove_constraint(column, index) {
                return Reduced::state(state.clone());
            }
            Reduced::state(with_filters(state, filters))
        }
        ViewAction::ClearFilters => Reduced::state(with_filters(state, FilterState::default())),
        ViewAction::ActivateSort(column) => {
            if !column_def(column).is_some_and(|def| def.sortable) {
                return Reduced::state(state.clone());
            }
            Reduced::state(ViewState {
                sort: state.sort.activate(column),
                page: 0,
                ..state.clone()
            })
        }
        ViewAction::ActivateRow(id) => {
            let Some(product) = state.store.products().iter().find(|p| p.id == id) else {
                return Reduced::state(state.clone());
            };
            let (selection, events) = state.selection.activate(product);
            Reduced {
                state: ViewState {
                    selection,
                    ..state.clone()
                },
                events,
                rejected: None,
            }
        }
        ViewAction::ClearSelection => {
            let (selection, events) = state.selection.clear();
            Reduced {
                state: ViewState {
                    selection,
                    ..state.clone()
                },
                events,
                rejected: None,
            }
        }
        ViewAction::SetPage(page) => Reduced::state(ViewState {
            page: clamp_page(state, page),
            ..state.clone()
        }),
        ViewAction::SetRowsPerPage(rows) => {
            if !state.config.rows_per_page_options.contains(&rows) {
                return Reduced::state(state.clone());
            }
            Reduced::state(ViewState {
                rows_per_page: rows,
                page: 0,
                ..state.clone()
            })
        }
    }
}

/// Filtered then sorted rows, before paging.
pub fn visible_products(state: &ViewState) -> Vec<Product> {
    let mut rows = evaluate(state.store.products(), &state.filters);
    sort_products(&mut rows, &state.sort);
    rows
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub rows: Vec<Product>,
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
}

fn page_count(total: usize, rows_per_page: usize) -> usize {
    total.div_ceil(rows_per_page.max(1)).max(1)
}

fn clamp_page(state: &ViewState, page: usize) -> usize {
    if !state.config.paginator {
        return 0;
    }
    let total = visible_products(state).len();
    page.min(page_count(total, state.rows_per_page) - 1)
}

/// Pages strictly after filtering and sorting.
pub fn visible_page(state: &ViewState) -> Page {
    let rows = visible_products(state);
    let total = rows.len();
    if !state.config.paginator {
        return Page {
            rows,
            page: 0,
            page_count: 1,
            total,
        };
    }
    let rows_per_page = state.rows_per_page.max(1);
    let page_count = page_count(total, rows_per_page);
    let page = state.page.min(page_count - 1);
    let rows = rows
        .into_iter()
        .skip(page * rows_per_page)
        .take(rows_per_page)
        .collect();
    Page {
        rows,
        page,
        page_count,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: i64, name: &str, quantity: i64) -> RawProduct {
        RawProduct {
            id,
            code: format!("Q{id:02}"),
            name: name.to_string(),
            category: "Accessories".to_string(),
            quantity,
            date: "2024-04-01".to_string(),
            verified: id % 2 == 0,
        }
    }

    fn loaded(config: ViewConfig, rows: Vec<RawProduct>) -> ViewState {
        let state = reduce(&ViewState::new(config), ViewAction::BeginLoad).state;
        let ticket = state.store.pending().expect("load should be pending");
        reduce(
            &state,
            ViewAction::FinishLoad {
                ticket,
                result: Ok(rows),
            },
        )
        .state
    }

    fn many(count: i64) -> Vec<RawProduct> {
        (1..=count).map(|id| raw(id, &format!("Item {id}"), id)).collect()
    }

    #[test]
    fn invalid_numeric_input_leaves_rule_inactive() {
        let state = loaded(ViewConfig::default(), many(3));
        let reduced = reduce(
            &state,
            ViewAction::SetFilterInput {
                column: ColumnKey::Quantity,
                index: 0,
                input: "lots".to_string(),
            },
        );
        assert_eq!(
            reduced.rejected,
            Some(FilterInputError::InvalidQuantity("lots".to_string()))
        );
        assert!(reduced.state.filters.is_cleared());
        assert_eq!(visible_products(&reduced.state).len(), 3);
    }

    #[test]
    fn text_input_keeps_whitespace_as_typed() {
        let state = loaded(ViewConfig::default(), many(3));
        let reduced = reduce(
            &state,
            ViewAction::SetFilterInput {
                column: ColumnKey::Name,
                index: 0,
                input: "  ".to_string(),
            },
        );
        let filter = reduced.state.filters.column(ColumnKey::Name).expect("name filter");
        assert_eq!(filter.constraints[0].value, Some(FilterValue::Text("  ".to_string())));
        assert!(reduced.rejected.is_none());

        let cleared = reduce(
            &reduced.state,
            ViewAction::SetFilterInput {
                column: ColumnKey::Name,
                index: 0,
                input: String::new(),
            },
        );
        assert!(cleared.state.filters.is_cleared());
    }

    #[test]
    fn paging_applies_after_filter_and_sort() {
        let state = loaded(ViewConfig::default(), many(12));
        let state = reduce(&state, ViewAction::SetRowsPerPage(5)).state;
        let state = reduce(&state, ViewAction::ActivateSort(ColumnKey::Quantity)).state;
        let state = reduce(&state, ViewAction::ActivateSort(ColumnKey::Quantity)).state;

        let first = visible_page(&state);
        assert_eq!(first.total, 12);
        assert_eq!(first.page_count, 3);
        let quantities: Vec<i64> = first.rows.iter().map(|p| p.quantity).collect();
        assert_eq!(quantities, vec![12, 11, 10, 9, 8]);

        let last = visible_page(&reduce(&state, ViewAction::SetPage(99)).state);
        assert_eq!(last.page, 2);
        assert_eq!(last.rows.len(), 2);
    }

    #[test]
    fn filter_change_returns_to_first_page() {
        let state = loaded(ViewConfig::default(), many(30));
        let state = reduce(&state, ViewAction::SetPage(2)).state;
        assert_eq!(state.page, 2);
        let state = reduce(&state, ViewAction::SetGlobalFilter("item".to_string())).state;
        assert_eq!(state.page, 0);
    }

    #[test]
    fn unknown_page_size_is_ignored() {
        let state = loaded(ViewConfig::default(), many(3));
        let next = reduce(&state, ViewAction::SetRowsPerPage(7)).state;
        assert_eq!(next.rows_per_page, 10);
    }

    #[test]
    fn row_select_variant_shows_everything_on_one_page() {
        let state = loaded(ViewConfig::row_select(), many(40));
        let page = visible_page(&state);
        assert_eq!(page.page_count, 1);
        assert_eq!(page.rows.len(), 40);
    }

    #[test]
    fn activating_unknown_row_is_a_noop() {
        let state = loaded(ViewConfig::default(), many(2));
        let reduced = reduce(&state, ViewAction::ActivateRow(ProductId(77)));
        assert!(reduced.events.is_empty());
        assert_eq!(reduced.state.selection, SelectionState::default());
    }

    #[test]
    fn selection_survives_reload() {
        let state = loaded(ViewConfig::default(), many(2));
        let state = reduce(&state, ViewAction::ActivateRow(ProductId(2))).state;
        let state = reduce(&state, ViewAction::BeginLoad).state;
        assert!(state.store.loading());
        assert!(state.selection.is_selected(ProductId(2)));
    }

    fn reload(state: &ViewState, result: Result<Vec<RawProduct>, SourceError>) -> Reduced {
        let state = reduce(state, ViewAction::BeginLoad).state;
        let ticket = state.store.pending().expect("load should be pending");
        reduce(&state, ViewAction::FinishLoad { ticket, result })
    }

    #[test]
    fn reload_without_selected_row_unselects_it() {
        let state = loaded(ViewConfig::default(), many(2));
        let state = reduce(&state, ViewAction::ActivateRow(ProductId(1))).state;

        let kept = reload(&state, Ok(many(2)));
        assert!(kept.events.is_empty());
        assert!(kept.state.selection.is_selected(ProductId(1)));

        let reduced = reload(&state, Ok(vec![raw(2, "Item 2", 2)]));
        assert!(reduced.state.selection.selected().is_none());
        assert!(
            matches!(reduced.events.as_slice(), [SelectionEvent::Unselect(p)] if p.id == ProductId(1)),
            "events: {:?}",
            reduced.events
        );

        let next = reduce(&reduced.state, ViewAction::ActivateRow(ProductId(2)));
        assert!(
            matches!(next.events.as_slice(), [SelectionEvent::Select(p)] if p.id == ProductId(2)),
            "events: {:?}",
            next.events
        );
    }

    #[test]
    fn failed_reload_drops_selection() {
        let state = loaded(ViewConfig::default(), many(2));
        let state = reduce(&state, ViewAction::ActivateRow(ProductId(1))).state;

        let reduced = reload(&state, Err(SourceError::Message("offline".to_string())));
        assert!(reduced.state.store.products().is_empty());
        assert!(reduced.state.selection.selected().is_none());
        assert_eq!(reduced.events.len(), 1);
    }
}
