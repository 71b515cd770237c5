//! Root Dioxus application component
//!
//! This module contains the main App component that serves as the root of the UI tree.

use crate::inference::{load_cached, LoadError, ModelSlot};
use crate::session::Session;
use crate::storage::settings::{load_settings, AppSettings};
use crate::ui::QaView;
use dioxus::prelude::*;

/// Represents the current state of the model
#[derive(Clone, PartialEq, Debug)]
pub enum ModelState {
    NotLoaded,
    Loading,
    Loaded(String),
    Error(LoadError),
}

impl ModelState {
    pub fn is_ready(&self) -> bool {
        matches!(self, ModelState::Loaded(_))
    }
}

/// Global application state shared across components
#[derive(Clone, Copy)]
pub struct AppState {
    pub settings: Signal<AppSettings>,
    pub model_state: Signal<ModelState>,
    pub session: Signal<Session>,
}

impl AppState {
    pub fn new() -> Self {
        tracing::info!("AppState initialized");
        Self {
            settings: Signal::new(load_settings()),
            model_state: Signal::new(ModelState::NotLoaded),
            session: Signal::new(Session::new()),
        }
    }
}

#[component]
pub fn App() -> Element {
    let app_state = use_context_provider(AppState::new);

    use_effect(move || {
        let mut model_state = app_state.model_state;
        let config = app_state.settings.peek().model.clone();
        model_state.set(ModelState::Loading);

        spawn(async move {
            let path = config.model_path.display().to_string();
            let slot = tokio::task::spawn_blocking(move || load_cached(&config)).await;
            let state = match slot {
                Ok(ModelSlot::Loaded(_)) => ModelState::Loaded(path),
                Ok(ModelSlot::Failed(e)) => ModelState::Error(e),
                Ok(ModelSlot::NotAttempted) => ModelState::NotLoaded,
                Err(e) => {
                    tracing::error!("Model loading task failed: {}", e);
                    ModelState::Error(LoadError::Model(e.to_string()))
                }
            };
            model_state.set(state);
        });
    });

    rsx! {
        QaView {}
    }
}
