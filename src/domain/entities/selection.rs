use crate::domain::entities::product::{Product, ProductId};

/// Identifier and display name of a selected row, enough for a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedProduct {
    pub id: ProductId,
    pub name: String,
}

impl From<&Product> for SelectedProduct {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    Select(SelectedProduct),
    Unselect(SelectedProduct),
}

/// Single-select state. Rows are compared by id only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionState {
    selected: Option<SelectedProduct>,
}

impl SelectionState {
    pub fn selected(&self) -> Option<&SelectedProduct> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, id: ProductId) -> bool {
        self.selected.as_ref().is_some_and(|current| current.id == id)
    }

    /// Row activation with toggle semantics. Replacing a selection emits the
    /// unselect for the old row before the select for the new one.
    pub fn activate(&self, product: &Product) -> (SelectionState, Vec<SelectionEvent>) {
        match &self.selected {
            Some(current) if current.id == product.id => (
                SelectionState::default(),
                vec![SelectionEvent::Unselect(current.clone())],
            ),
            Some(current) => {
                let next = SelectedProduct::from(product);
                (
                    SelectionState {
                        selected: Some(next.clone()),
                    },
                    vec![
                        SelectionEvent::Unselect(current.clone()),
                        SelectionEvent::Select(next),
                    ],
                )
            }
            None => {
                let next = SelectedProduct::from(product);
                (
                    SelectionState {
                        selected: Some(next.clone()),
                    },
                    vec![SelectionEvent::Select(next)],
                )
            }
        }
    }

    pub fn clear(&self) -> (SelectionState, Vec<SelectionEvent>) {
        match &self.selected {
            Some(current) => (
                SelectionState::default(),
                vec![SelectionEvent::Unselect(current.clone())],
            ),
            None => (SelectionState::default(), Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn product(id: i64, name: &str) -> Product {
        Product {
            id: ProductId(id),
            code: format!("p{id}"),
            name: name.to_string(),
            category: "Accessories".to_string(),
            quantity: 1,
            begda: NaiveDate::from_ymd_opt(2023, 7, 1).expect("valid date"),
            verified: false,
        }
    }

    #[test]
    fn same_id_with_new_object_counts_as_same_row() {
        let (state, _) = SelectionState::default().activate(&product(4, "Lamp"));
        let (state, events) = state.activate(&product(4, "Lamp (renamed)"));

        assert_eq!(state.selected(), None);
        assert_eq!(
            events,
            vec![SelectionEvent::Unselect(SelectedProduct {
                id: ProductId(4),
                name: "Lamp".to_string()
            })]
        );
    }

    #[test]
    fn clearing_empty_selection_is_silent() {
        let (state, events) = SelectionState::default().clear();
        assert_eq!(state, SelectionState::default());
        assert!(events.is_empty());
    }

    #[test]
    fn is_selected_checks_id() {
        let (state, _) = SelectionState::default().activate(&product(9, "Desk"));
        assert!(state.is_selected(ProductId(9)));
        assert!(!state.is_selected(ProductId(8)));
    }
}
