use crate::domain::entities::selection::SelectionEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
}

impl Severity {
    pub fn accent_color(self) -> &'static str {
        match self {
            Severity::Info => "#3b82f6",
            Severity::Warn => "#f59e0b",
        }
    }
}

/// Toast payload. Fire-and-forget: nothing waits on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    pub life_ms: u64,
}

impl Notification {
    pub fn from_event(event: &SelectionEvent, life_ms: u64) -> Self {
        let (severity, summary, product) = match event {
            SelectionEvent::Select(product) => (Severity::Info, "Product Selected", product),
            SelectionEvent::Unselect(product) => (Severity::Warn, "Product Unselected", product),
        };
        Self {
            severity,
            summary: summary.to_string(),
            detail: format!("Id: {} Name: {}", product.id, product.name),
            life_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::product::ProductId;
    use crate::domain::entities::selection::SelectedProduct;

    #[test]
    fn unselect_is_a_warning_with_id_and_name() {
        let event = SelectionEvent::Unselect(SelectedProduct {
            id: ProductId(1000),
            name: "Bamboo Watch".to_string(),
        });
        let toast = Notification::from_event(&event, 3000);
        assert_eq!(toast.severity, Severity::Warn);
        assert_eq!(toast.summary, "Product Unselected");
        assert_eq!(toast.detail, "Id: 1000 Name: Bamboo Watch");
        assert_eq!(toast.life_ms, 3000);
    }
}
