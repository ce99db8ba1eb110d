use std::sync::Arc;

use crate::config::Settings;
use crate::policy::UploadPolicy;
use crate::storage::layout::UploadClock;
use crate::storage::local::{ImageStore, LocalImageStore};

/// Shared state handed to every axum handler and Leptos server function.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub policy: Arc<UploadPolicy>,
    pub store: Arc<dyn ImageStore>,
    pub clock: Arc<UploadClock>,
    pub leptos_options: leptos::prelude::LeptosOptions,
}

impl axum::extract::FromRef<AppState> for leptos::prelude::LeptosOptions {
    fn from_ref(state: &AppState) -> Self {
        state.leptos_options.clone()
    }
}

impl AppState {
    /// Build state backed by the shared directory named in `settings`.
    pub fn new(settings: Settings, leptos_options: leptos::prelude::LeptosOptions) -> Self {
        let store: Arc<dyn ImageStore> = Arc::new(LocalImageStore::new(settings.upload_dir.clone()));
        Self::with_store(settings, store, leptos_options)
    }

    /// Build with an explicit store (useful for testing / DI).
    pub fn with_store(
        settings: Settings,
        store: Arc<dyn ImageStore>,
        leptos_options: leptos::prelude::LeptosOptions,
    ) -> Self {
        Self {
            policy: Arc::new(settings.policy()),
            settings: Arc::new(settings),
            store,
            clock: Arc::new(UploadClock::new()),
            leptos_options,
        }
    }
}
