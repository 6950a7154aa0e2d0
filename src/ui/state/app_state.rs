use dioxus::prelude::{use_signal, Signal};

use crate::config::ViewConfig;
use crate::usecase::services::notify::Notification;
use crate::usecase::services::view_model::ViewState;

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub notification: Notification,
}

pub struct AppState {
    pub view: Signal<ViewState>,
    pub toasts: Signal<Vec<Toast>>,
    pub next_toast_id: Signal<u64>,
    pub busy: Signal<bool>,
    pub status: Signal<String>,
}

impl AppState {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            view: use_signal(move || ViewState::new(config)),
            toasts: use_signal(Vec::<Toast>::new),
            next_toast_id: use_signal(|| 0_u64),
            busy: use_signal(|| false),
            status: use_signal(|| "Ready".to_string()),
        }
    }
}
