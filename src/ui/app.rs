use std::sync::Arc;
use std::time::Duration;

use dioxus::prelude::*;
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use tracing::{error, info};

use crate::config::{AppConfig, SourceConfig};
use crate::domain::entities::column::{product_columns, ColumnDef, ColumnKey, FilterInputKind};
use crate::domain::entities::filter::{next_tri_state, ColumnFilter, FilterOperator, FilterValue, MatchMode};
use crate::domain::entities::product::{CellValue, ProductId};
use crate::domain::entities::selection::SelectionEvent;
use crate::domain::entities::sort::SortDirection;
use crate::infra::open_source;
use crate::infra::sqlite::repo::SqliteCatalog;
use crate::ui::state::app_state::{AppState, Toast};
use crate::usecase::ports::source::{ProductSource, SourceError};
use crate::usecase::services::import_service::ImportService;
use crate::usecase::services::notify::Notification;
use crate::usecase::services::view_model::{reduce, visible_page, ViewAction, ViewState};

const HEADER_CELL_STYLE: &str =
    "border: 1px solid #bbb; padding: 6px; background: #f4f4f4; position: sticky; top: 0; text-align: left;";
const CELL_STYLE: &str = "border: 1px solid #bbb; padding: 4px;";

/// Signal handles every event handler needs. All fields are `Copy`.
#[derive(Clone, Copy, PartialEq)]
struct Handles {
    view: Signal<ViewState>,
    toasts: Signal<Vec<Toast>>,
    next_toast_id: Signal<u64>,
    status: Signal<String>,
}

impl Handles {
    fn dispatch(mut self, action: ViewAction) {
        let reduced = reduce(&self.view.peek(), action);
        let life_ms = reduced.state.config.toast_life_ms;
        self.view.set(reduced.state);

        if let Some(err) = reduced.rejected {
            self.status.set(format!("Filter ignored: {err}"));
        }
        for event in &reduced.events {
            match event {
                SelectionEvent::Select(product) => info!(id = %product.id, name = %product.name, "row selected"),
                SelectionEvent::Unselect(product) => info!(id = %product.id, name = %product.name, "row unselected"),
            }
            self.notify(Notification::from_event(event, life_ms));
        }
    }

    fn notify(mut self, notification: Notification) {
        let id = *self.next_toast_id.peek();
        self.next_toast_id.set(id + 1);
        let life_ms = notification.life_ms;
        self.toasts.write().push(Toast { id, notification });

        let mut toasts = self.toasts;
        spawn(async move {
            tokio::time::sleep(Duration::from_millis(life_ms)).await;
            toasts.write().retain(|toast| toast.id != id);
        });
    }

    fn start_load(mut self, source: Arc<dyn ProductSource>) {
        self.dispatch(ViewAction::BeginLoad);
        let Some(ticket) = self.view.peek().store.pending() else {
            return;
        };
        info!(source = %source.describe(), "loading products");
        self.status.set(format!("Loading {}", source.describe()));

        spawn(async move {
            let result = match tokio::task::spawn_blocking(move || source.fetch_products()).await {
                Ok(result) => result,
                Err(err) => Err(SourceError::Message(format!("fetch task failed: {err}"))),
            };
            self.dispatch(ViewAction::FinishLoad { ticket, result });

            let message = {
                let view = self.view.peek();
                match view.store.error() {
                    Some(err) => format!("Failed to load products: {err}"),
                    None if view.store.loading() => return,
                    None => format!("Loaded {} products", view.store.products().len()),
                }
            };
            self.status.set(message);
        });
    }
}

fn sort_marker(direction: Option<SortDirection>) -> &'static str {
    match direction {
        Some(SortDirection::Asc) => " ▲",
        Some(SortDirection::Desc) => " ▼",
        None => "",
    }
}

fn cell_style(cell: CellValue<'_>) -> String {
    match cell {
        CellValue::Bool(true) => format!("{CELL_STYLE} text-align: center; color: #16a34a;"),
        CellValue::Bool(false) => format!("{CELL_STYLE} text-align: center; color: #dc2626;"),
        CellValue::Number(_) => format!("{CELL_STYLE} text-align: right;"),
        CellValue::Text(_) | CellValue::Date(_) => CELL_STYLE.to_string(),
    }
}

fn match_mode_value(mode: MatchMode) -> &'static str {
    match mode {
        MatchMode::StartsWith => "startsWith",
        MatchMode::Contains => "contains",
        MatchMode::Equals => "equals",
        MatchMode::DateIs => "dateIs",
    }
}

fn parse_match_mode(value: &str) -> Option<MatchMode> {
    match value {
        "startsWith" => Some(MatchMode::StartsWith),
        "contains" => Some(MatchMode::Contains),
        "equals" => Some(MatchMode::Equals),
        "dateIs" => Some(MatchMode::DateIs),
        _ => None,
    }
}

#[component]
fn ConstraintInput(
    column: ColumnKey,
    kind: FilterInputKind,
    index: usize,
    match_mode: MatchMode,
    #[props(!optional)] current: Option<FilterValue>,
    handles: Handles,
) -> Element {
    let text = current.as_ref().map(FilterValue::display).unwrap_or_default();
    match kind {
        FilterInputKind::TriState => {
            let flag = match current {
                Some(FilterValue::Bool(flag)) => Some(flag),
                _ => None,
            };
            let label = match flag {
                None => "Any",
                Some(true) => "✔",
                Some(false) => "✘",
            };
            rsx! {
                button {
                    onclick: move |event| {
                        event.stop_propagation();
                        handles.dispatch(ViewAction::SetFilterValue {
                            column,
                            index,
                            value: next_tri_state(flag).map(FilterValue::Bool),
                        });
                    },
                    "{label}"
                }
            }
        }
        FilterInputKind::Text => rsx! {
            select {
                value: match_mode_value(match_mode),
                onchange: move |event| {
                    if let Some(match_mode) = parse_match_mode(&event.value()) {
                        handles.dispatch(ViewAction::SetMatchMode { column, index, match_mode });
                    }
                },
                option { value: "startsWith", "Starts with" }
                option { value: "contains", "Contains" }
                option { value: "equals", "Equals" }
            }
            input {
                value: text,
                placeholder: "Search",
                oninput: move |event| {
                    handles.dispatch(ViewAction::SetFilterInput { column, index, input: event.value() });
                },
            }
        },
        FilterInputKind::Numeric => rsx! {
            input {
                r#type: "number",
                value: text,
                onchange: move |event| {
                    handles.dispatch(ViewAction::SetFilterInput { column, index, input: event.value() });
                },
            }
        },
        FilterInputKind::Date => rsx! {
            input {
                value: text,
                placeholder: "dd.mm.yyyy",
                onchange: move |event| {
                    handles.dispatch(ViewAction::SetFilterInput { column, index, input: event.value() });
                },
            }
        },
    }
}

#[component]
fn FilterCell(def: ColumnDef, #[props(!optional)] filter: Option<ColumnFilter>, handles: Handles) -> Element {
    let Some(filter) = filter.filter(|_| def.filterable) else {
        return rsx! {};
    };
    let column = def.key;
    let kind = def.input;
    let operator_value = match filter.operator {
        FilterOperator::And => "and",
        FilterOperator::Or => "or",
    };
    let multiple = filter.constraints.len() > 1;

    rsx! {
        div { style: "display: flex; flex-direction: column; gap: 2px;",
            if multiple {
                select {
                    value: operator_value,
                    onchange: move |event| {
                        let operator = if event.value() == "or" {
                            FilterOperator::Or
                        } else {
                            FilterOperator::And
                        };
                        handles.dispatch(ViewAction::SetOperator { column, operator });
                    },
                    option { value: "and", "Match All" }
                    option { value: "or", "Match Any" }
                }
            }
            {filter.constraints.iter().enumerate().map(|(index, constraint)| {
                let current = constraint.value.clone();
                let match_mode = constraint.match_mode;
                rsx!(
                    div { style: "display: flex; gap: 2px;",
                        ConstraintInput { column, kind, index, match_mode, current, handles }
                        if index > 0 {
                            button {
                                onclick: move |_| {
                                    handles.dispatch(ViewAction::RemoveConstraint { column, index });
                                },
                                "×"
                            }
                        }
                    }
                )
            })}
            if kind != FilterInputKind::TriState {
                button {
                    onclick: move |_| handles.dispatch(ViewAction::AddConstraint(column)),
                    "+ Rule"
                }
            }
        }
    }
}

#[component]
pub fn App() -> Element {
    let config = use_hook(|| AppConfig::from_env().map_err(|err| format!("{err:#}")));
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            return rsx! {
                div {
                    p { "Configuration error: {err}" }
                }
            };
        }
    };

    let AppState {
        view,
        toasts,
        next_toast_id,
        mut busy,
        mut status,
    } = AppState::new(config.view.clone());
    let handles = Handles {
        view,
        toasts,
        next_toast_id,
        status,
    };

    let source_config = config.source.clone();
    let source = use_hook(move || open_source(&source_config).map_err(|err| format!("{err:#}")));
    let catalog_path = match &config.source {
        SourceConfig::Sqlite(path) => Some(path.clone()),
        _ => None,
    };
    let import_service = use_hook(move || {
        catalog_path
            .and_then(|path| SqliteCatalog::open(path).ok())
            .map(|catalog| Arc::new(ImportService::new(Arc::new(catalog))))
    });

    let source_for_init = source.clone();
    use_effect(move || match source_for_init.clone() {
        Ok(source) => handles.start_load(source),
        Err(err) => {
            error!("cannot open product source: {err}");
            status.set(format!("Cannot open product source: {err}"));
        }
    });

    let state = view();
    let page = visible_page(&state);
    let columns = product_columns();
    let action_column = state.config.action_column;
    let global_keyword = state.filters.global.clone();
    let filters_cleared = state.filters.is_cleared();
    let loading = state.store.loading();
    let load_error = state.store.error().map(str::to_string);
    let selected = state.selection.selected().cloned();
    let current_page = page.page;
    let display_page = current_page + 1;
    let page_count = page.page_count;
    let total = page.total;
    let rows_per_page = state.rows_per_page.to_string();
    let rows_per_page_options = state.config.rows_per_page_options.clone();

    let source_for_import = source.clone();
    let import_service_for_import = import_service.clone();
    let can_import = import_service.is_some();

    rsx! {
        div { style: "display: flex; flex-direction: column; height: 100vh; padding: 8px; box-sizing: border-box; font-family: sans-serif;",
            nav {
                style: "display: flex; gap: 8px; align-items: center; flex-wrap: wrap; padding: 8px 0;",
                if state.config.toolbar_actions {
                    button {
                        disabled: busy() || !can_import,
                        onclick: move |_| {
                            let Some(service) = import_service_for_import.clone() else {
                                status.set("Import needs the local catalog".to_string());
                                return;
                            };
                            let Some(file_path) = FileDialog::new()
                                .add_filter("Catalog", &["json", "csv"])
                                .pick_file() else {
                                status.set("Import cancelled".to_string());
                                return;
                            };

                            busy.set(true);
                            status.set(format!("Importing {}", file_path.display()));
                            match service.import_file(&file_path) {
                                Ok(count) => {
                                    status.set(format!("Imported {count} products"));
                                    if let Ok(source) = source_for_import.clone() {
                                        handles.start_load(source);
                                    }
                                }
                                Err(err) => {
                                    error!("import failed: {err:#}");
                                    status.set(format!("Import failed: {err:#}"));
                                }
                            }
                            busy.set(false);
                        },
                        "Import"
                    }
                }
                button {
                    disabled: filters_cleared,
                    onclick: move |_| handles.dispatch(ViewAction::ClearFilters),
                    "Clear"
                }
                div { style: "flex-grow: 1;" }
                input {
                    value: global_keyword,
                    placeholder: "Keyword Search",
                    oninput: move |event| handles.dispatch(ViewAction::SetGlobalFilter(event.value())),
                }
                span { " {status}" }
            }

            if loading {
                div { style: "padding: 4px 0; color: #555;", "Loading products…" }
            }
            if let Some(err) = load_error {
                div { style: "padding: 4px 0; color: #c00;", "Failed to load products: {err}" }
            }

            div { style: "flex: 1; overflow: auto;",
                table { style: "border-collapse: collapse; width: 100%; min-width: 50rem; background: #fff;",
                    thead {
                        tr {
                            {columns.iter().map(|def| {
                                let key = def.key;
                                let sortable = def.sortable;
                                let label = format!("{}{}", def.header, sort_marker(state.sort.direction_of(key)));
                                let style = format!("{HEADER_CELL_STYLE} width: {}; cursor: pointer;", def.width);
                                rsx!(
                                    th {
                                        style: "{style}",
                                        onclick: move |_| {
                                            if sortable {
                                                handles.dispatch(ViewAction::ActivateSort(key));
                                            }
                                        },
                                        "{label}"
                                    }
                                )
                            })}
                            if action_column {
                                th { style: "{HEADER_CELL_STYLE} min-width: 7rem;" }
                            }
                        }
                        tr {
                            {columns.iter().map(|def| {
                                let filter = state.filters.column(def.key).cloned();
                                rsx!(
                                    th { style: "{CELL_STYLE}",
                                        FilterCell { def: def.clone(), filter, handles }
                                    }
                                )
                            })}
                            if action_column {
                                th { style: "{CELL_STYLE}" }
                            }
                        }
                    }
                    tbody {
                        {page.rows.iter().map(|product| {
                            let id = product.id;
                            let row_style = if state.selection.is_selected(id) {
                                "background: #eef4ff; cursor: pointer;"
                            } else {
                                "cursor: pointer;"
                            };
                            let cells: Vec<(String, String)> = columns
                                .iter()
                                .map(|def| {
                                    let cell = product.cell(def.key);
                                    (cell_style(cell), cell.display())
                                })
                                .collect();
                            let import_service = import_service.clone();
                            let source = source.clone();
                            rsx!(
                                tr {
                                    key: "{id}",
                                    style: "{row_style}",
                                    onclick: move |_| handles.dispatch(ViewAction::ActivateRow(id)),
                                    for (style, text) in cells {
                                        td { style: "{style}", "{text}" }
                                    }
                                    if action_column {
                                        td { style: "{CELL_STYLE} text-align: center;",
                                            button {
                                                disabled: !can_import,
                                                onclick: move |event| {
                                                    event.stop_propagation();
                                                    delete_row(id, import_service.clone(), source.clone(), handles);
                                                },
                                                "Delete"
                                            }
                                        }
                                    }
                                }
                            )
                        })}
                    }
                }
            }

            if state.config.paginator {
                div { style: "display: flex; gap: 8px; align-items: center; margin-top: 8px;",
                    button {
                        disabled: current_page == 0,
                        onclick: move |_| handles.dispatch(ViewAction::SetPage(current_page.saturating_sub(1))),
                        "‹ Prev"
                    }
                    span { "Page {display_page} of {page_count} ({total} products)" }
                    button {
                        disabled: display_page >= page_count,
                        onclick: move |_| handles.dispatch(ViewAction::SetPage(current_page + 1)),
                        "Next ›"
                    }
                    select {
                        value: rows_per_page,
                        onchange: move |event| {
                            if let Ok(rows) = event.value().parse::<usize>() {
                                handles.dispatch(ViewAction::SetRowsPerPage(rows));
                            }
                        },
                        for rows in rows_per_page_options {
                            option { value: "{rows}", "{rows}" }
                        }
                    }
                }
            }

            if let Some(product) = selected {
                div { style: "display: flex; gap: 8px; align-items: center; margin-top: 8px;",
                    span { "Selected: {product.name} (#{product.id})" }
                    button {
                        onclick: move |_| handles.dispatch(ViewAction::ClearSelection),
                        "Unselect"
                    }
                }
            }

            div { style: "position: fixed; top: 16px; right: 16px; display: flex; flex-direction: column; gap: 8px; z-index: 1200;",
                {toasts().into_iter().map(|toast| {
                    let accent = toast.notification.severity.accent_color();
                    rsx!(
                        div {
                            key: "{toast.id}",
                            style: "min-width: 240px; background: #fff; border-left: 4px solid {accent}; box-shadow: 0 10px 24px rgba(0,0,0,0.15); padding: 8px 12px;",
                            div { style: "font-weight: 600;", "{toast.notification.summary}" }
                            div { "{toast.notification.detail}" }
                        }
                    )
                })}
            }
        }
    }
}

fn delete_row(
    id: ProductId,
    import_service: Option<Arc<ImportService>>,
    source: Result<Arc<dyn ProductSource>, String>,
    mut handles: Handles,
) {
    let Some(service) = import_service else {
        return;
    };
    let confirmed = MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title("Delete product")
        .set_description(format!("Delete product #{id} from the local catalog?"))
        .set_buttons(MessageButtons::YesNo)
        .show();
    if confirmed != MessageDialogResult::Yes {
        return;
    }

    match service.delete_product(id) {
        Ok(()) => {
            info!(%id, "product deleted");
            if let Ok(source) = source {
                handles.start_load(source);
            }
        }
        Err(err) => {
            error!("delete failed: {err:#}");
            handles.status.set(format!("Delete failed: {err:#}"));
        }
    }
}
