use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::entities::column::ColumnKey;
use crate::domain::entities::product::{CellValue, Product};
use crate::domain::format::format_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    StartsWith,
    Contains,
    Equals,
    DateIs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterOperator {
    #[default]
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Number(i64),
    Date(NaiveDate),
    Bool(bool),
}

impl FilterValue {
    /// Text shown back in the filter box.
    pub fn display(&self) -> String {
        match self {
            FilterValue::Text(text) => text.clone(),
            FilterValue::Number(number) => number.to_string(),
            FilterValue::Date(date) => format_date(*date),
            FilterValue::Bool(flag) => flag.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub value: Option<FilterValue>,
    pub match_mode: MatchMode,
}

impl Constraint {
    pub fn inactive(match_mode: MatchMode) -> Self {
        Self {
            value: None,
            match_mode,
        }
    }

    /// An empty text value counts as no value.
    pub fn is_active(&self) -> bool {
        match &self.value {
            None => false,
            Some(FilterValue::Text(text)) => !text.is_empty(),
            Some(_) => true,
        }
    }

    fn matches(&self, cell: CellValue<'_>) -> bool {
        let Some(value) = &self.value else {
            return true;
        };
        match (self.match_mode, value, cell) {
            (MatchMode::StartsWith, FilterValue::Text(needle), CellValue::Text(hay)) => {
                hay.to_lowercase().starts_with(&needle.to_lowercase())
            }
            (MatchMode::Contains, FilterValue::Text(needle), CellValue::Text(hay)) => {
                contains_ignore_case(hay, needle)
            }
            (MatchMode::Equals, FilterValue::Text(needle), CellValue::Text(hay)) => {
                hay.to_lowercase() == needle.to_lowercase()
            }
            (MatchMode::Equals, FilterValue::Number(expected), CellValue::Number(actual)) => {
                *expected == actual
            }
            (MatchMode::Equals, FilterValue::Bool(expected), CellValue::Bool(actual)) => {
                *expected == actual
            }
            (MatchMode::Equals | MatchMode::DateIs, FilterValue::Date(expected), CellValue::Date(actual)) => {
                *expected == actual
            }
            _ => false,
        }
    }
}

fn contains_ignore_case(hay: &str, needle: &str) -> bool {
    hay.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilter {
    pub operator: FilterOperator,
    pub constraints: Vec<Constraint>,
}

impl ColumnFilter {
    pub fn single(match_mode: MatchMode) -> Self {
        Self {
            operator: FilterOperator::And,
            constraints: vec![Constraint::inactive(match_mode)],
        }
    }

    pub fn is_active(&self) -> bool {
        self.constraints.iter().any(Constraint::is_active)
    }

    pub fn matches(&self, cell: CellValue<'_>) -> bool {
        let mut active = self.constraints.iter().filter(|c| c.is_active()).peekable();
        if active.peek().is_none() {
            return true;
        }
        match self.operator {
            FilterOperator::And => active.all(|c| c.matches(cell)),
            FilterOperator::Or => active.any(|c| c.matches(cell)),
        }
    }
}

/// Per-column rules plus the global keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub global: String,
    columns: BTreeMap<ColumnKey, ColumnFilter>,
}

impl Default for FilterState {
    fn default() -> Self {
        let columns = ColumnKey::ALL
            .into_iter()
            .map(|key| (key, ColumnFilter::single(default_match_mode(key))))
            .collect();
        Self {
            global: String::new(),
            columns,
        }
    }
}

pub fn default_match_mode(key: ColumnKey) -> MatchMode {
    match key {
        ColumnKey::Code | ColumnKey::Name | ColumnKey::Category => MatchMode::StartsWith,
        ColumnKey::Quantity | ColumnKey::Verified => MatchMode::Equals,
        ColumnKey::Begda => MatchMode::DateIs,
    }
}

impl FilterState {
    pub fn column(&self, key: ColumnKey) -> Option<&ColumnFilter> {
        self.columns.get(&key)
    }

    pub fn is_cleared(&self) -> bool {
        self.global.is_empty() && !self.columns.values().any(ColumnFilter::is_active)
    }

    pub fn set_global(&mut self, keyword: impl Into<String>) {
        self.global = keyword.into();
    }

    /// Returns false when the column has no constraint at `index`.
    pub fn set_value(&mut self, key: ColumnKey, index: usize, value: Option<FilterValue>) -> bool {
        match self
            .columns
            .get_mut(&key)
            .and_then(|filter| filter.constraints.get_mut(index))
        {
            Some(constraint) => {
                constraint.value = value;
                true
            }
            None => false,
        }
    }

    pub fn set_match_mode(&mut self, key: ColumnKey, index: usize, match_mode: MatchMode) -> bool {
        match self
            .columns
            .get_mut(&key)
            .and_then(|filter| filter.constraints.get_mut(index))
        {
            Some(constraint) => {
                constraint.match_mode = match_mode;
                true
            }
            None => false,
        }
    }

    pub fn set_operator(&mut self, key: ColumnKey, operator: FilterOperator) {
        if let Some(filter) = self.columns.get_mut(&key) {
            filter.operator = operator;
        }
    }

    /// Appends an inactive constraint using the column's default match mode.
    pub fn add_constraint(&mut self, key: ColumnKey) {
        self.columns
            .entry(key)
            .or_insert_with(|| ColumnFilter::single(default_match_mode(key)))
            .constraints
            .push(Constraint::inactive(default_match_mode(key)));
    }

    /// The first constraint of a column is never removed.
    pub fn remove_constraint(&mut self, key: ColumnKey, index: usize) -> bool {
        match self.columns.get_mut(&key) {
            Some(filter) if index > 0 && index < filter.constraints.len() => {
                filter.constraints.remove(index);
                true
            }
            _ => false,
        }
    }

    fn passes_global(&self, product: &Product) -> bool {
        let keyword = self.global.as_str();
        if keyword.is_empty() {
            return true;
        }
        ColumnKey::TEXT.iter().any(|key| match product.cell(*key) {
            CellValue::Text(text) => contains_ignore_case(text, keyword),
            _ => false,
        })
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.passes_global(product)
            && self
                .columns
                .iter()
                .all(|(key, filter)| filter.matches(product.cell(*key)))
    }
}

/// Keeps the records passing every active rule, in their original order.
pub fn evaluate(records: &[Product], state: &FilterState) -> Vec<Product> {
    records
        .iter()
        .filter(|product| state.matches(product))
        .cloned()
        .collect()
}

/// unset -> true -> false -> unset
pub fn next_tri_state(current: Option<bool>) -> Option<bool> {
    match current {
        None => Some(true),
        Some(true) => Some(false),
        Some(false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::product::ProductId;

    fn product(id: i64, code: &str, name: &str, quantity: i64) -> Product {
        Product {
            id: ProductId(id),
            code: code.to_string(),
            name: name.to_string(),
            category: "Fitness".to_string(),
            quantity,
            begda: NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
            verified: true,
        }
    }

    #[test]
    fn default_state_has_every_column_inactive() {
        let state = FilterState::default();
        assert!(state.is_cleared());
        for key in ColumnKey::ALL {
            let filter = state.column(key).expect("every column has a filter");
            assert_eq!(filter.constraints.len(), 1);
            assert_eq!(filter.constraints[0].match_mode, default_match_mode(key));
        }
    }

    #[test]
    fn text_rules_are_case_insensitive_prefix_matches() {
        let records = vec![product(1, "ab-1", "Yoga Mat", 3), product(2, "zz-9", "Yoga Set", 3)];
        let mut state = FilterState::default();
        state.set_value(ColumnKey::Code, 0, Some(FilterValue::Text("AB".to_string())));

        let ids: Vec<_> = evaluate(&records, &state).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![ProductId(1)]);
    }

    #[test]
    fn empty_text_value_is_vacuous() {
        let records = vec![product(1, "ab-1", "Yoga Mat", 3)];
        let mut state = FilterState::default();
        state.set_value(ColumnKey::Name, 0, Some(FilterValue::Text(String::new())));

        assert_eq!(evaluate(&records, &state).len(), 1);
        assert!(state.is_cleared());
    }

    #[test]
    fn global_keyword_is_matched_untrimmed() {
        let records = vec![product(1, "n1", "N1", 3), product(2, "x2", "Big N1 Kit", 3)];
        let mut state = FilterState::default();
        state.set_global("N1 ");

        let ids: Vec<_> = evaluate(&records, &state).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![ProductId(2)]);
        assert!(!state.is_cleared());
    }

    #[test]
    fn or_operator_accepts_any_active_constraint() {
        let records = vec![
            product(1, "a", "Alpha", 1),
            product(2, "b", "Beta", 2),
            product(3, "c", "Gamma", 3),
        ];
        let mut state = FilterState::default();
        state.add_constraint(ColumnKey::Quantity);
        state.set_operator(ColumnKey::Quantity, FilterOperator::Or);
        state.set_value(ColumnKey::Quantity, 0, Some(FilterValue::Number(1)));
        state.set_value(ColumnKey::Quantity, 1, Some(FilterValue::Number(3)));

        let ids: Vec<_> = evaluate(&records, &state).iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 3]);

        state.set_operator(ColumnKey::Quantity, FilterOperator::And);
        assert!(evaluate(&records, &state).is_empty(), "no quantity equals both 1 and 3");
    }

    #[test]
    fn first_constraint_cannot_be_removed() {
        let mut state = FilterState::default();
        assert!(!state.remove_constraint(ColumnKey::Code, 0));
        state.add_constraint(ColumnKey::Code);
        assert!(state.remove_constraint(ColumnKey::Code, 1));
        assert_eq!(state.column(ColumnKey::Code).map(|f| f.constraints.len()), Some(1));
    }

    #[test]
    fn contains_mode_matches_inside_value() {
        let records = vec![product(1, "a", "Blue Band", 1), product(2, "b", "Black Watch", 1)];
        let mut state = FilterState::default();
        state.set_match_mode(ColumnKey::Name, 0, MatchMode::Contains);
        state.set_value(ColumnKey::Name, 0, Some(FilterValue::Text("band".to_string())));

        let ids: Vec<_> = evaluate(&records, &state).iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn tri_state_cycles_through_unset() {
        assert_eq!(next_tri_state(None), Some(true));
        assert_eq!(next_tri_state(Some(true)), Some(false));
        assert_eq!(next_tri_state(Some(false)), None);
    }
}
