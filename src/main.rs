#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use axum::Router;
    use imgdrop::api::routes::api_router;
    use imgdrop::app::{shell, App};
    use imgdrop::config::Settings;
    use imgdrop::state::AppState;
    use leptos::prelude::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};
    use tower_http::services::ServeDir;
    use tower_http::trace::TraceLayer;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imgdrop=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting imgdrop server...");

    // Load Leptos options from Cargo.toml metadata
    let conf = get_configuration(None).context("Failed to load Leptos configuration")?;
    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;
    let site_root = leptos_options.site_root.to_string();

    let settings = Settings::from_env().context("Failed to load upload settings")?;

    tokio::fs::create_dir_all(&settings.upload_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create upload directory '{}'",
                settings.upload_dir.display()
            )
        })?;

    tracing::info!(
        upload_dir = %settings.upload_dir.display(),
        public_path = %settings.public_path,
        layout = ?settings.layout,
        max_file_size = settings.max_file_size,
        "Upload directory ready"
    );

    let app_state = AppState::new(settings, leptos_options.clone());

    // Generate the Leptos route list for SSR
    let routes = generate_route_list(App);

    let app = Router::new()
        // API routes
        .merge(api_router(&app_state))
        // Leptos SSR routes and server functions
        .leptos_routes_with_context(
            &app_state,
            routes,
            {
                let app_state = app_state.clone();
                move || provide_context(app_state.clone())
            },
            {
                let leptos_options = leptos_options.clone();
                move || shell(leptos_options.clone())
            },
        )
        // Compiled client assets
        .fallback_service(ServeDir::new(&site_root))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app.into_make_service())
        .await
        .context("Server error")?;

    Ok(())
}

// When compiled for WASM (client-side), there's no main function.
// The hydrate() function in lib.rs handles client-side initialization.
#[cfg(not(feature = "ssr"))]
fn main() {}
