pub mod app;
pub mod error;
pub mod gallery;
pub mod toast;
pub mod models {
    pub mod upload;
}
pub mod components {
    pub mod image_card;
    pub mod uploader;
}
pub mod api {
    pub mod errors;
    #[cfg(feature = "ssr")]
    pub mod images;
    #[cfg(feature = "ssr")]
    pub mod routes;
    #[cfg(feature = "ssr")]
    pub mod upload;
}
#[cfg(feature = "ssr")]
pub mod config;
#[cfg(feature = "ssr")]
pub mod policy;
#[cfg(feature = "ssr")]
pub mod state;
#[cfg(feature = "ssr")]
pub mod storage {
    pub mod layout;
    pub mod local;
}

#[cfg(feature = "hydrate")]
pub mod client;

/// WASM entry point: hydrates the server-rendered page.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(app::App);
}
