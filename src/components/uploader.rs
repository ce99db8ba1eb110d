use leptos::html;
use leptos::prelude::*;

use crate::components::image_card::ImageCard;
use crate::gallery::{Gallery, UploadPhase};
#[cfg(feature = "hydrate")]
use crate::gallery::{UploadOutcome, TRANSPORT_FAILURE_MESSAGE};
use crate::models::upload::{format_size, ClientConfig, ImageInfo};
use crate::toast::use_toaster;

/// Server function exposing the settings the uploader page needs.
#[server(GetClientConfig, "/api")]
pub async fn get_client_config() -> Result<ClientConfig, ServerFnError> {
    let state = expect_context::<crate::state::AppState>();
    Ok(state.settings.client_config())
}

/// Drop-zone, file picker and the session gallery.
#[component]
pub fn ImageUploader() -> impl IntoView {
    #[cfg_attr(not(feature = "hydrate"), allow(unused_variables))]
    let toaster = use_toaster();
    let gallery = RwSignal::new(Gallery::default());
    let phase = RwSignal::new(UploadPhase::default());
    let drag_over = RwSignal::new(false);
    let file_input = NodeRef::<html::Input>::new();

    let client_config = Resource::new(|| (), |_| get_client_config());
    let public_origin = Signal::derive(move || {
        client_config
            .get()
            .and_then(Result::ok)
            .map(|config| config.public_origin)
            .unwrap_or_default()
    });

    #[cfg(feature = "hydrate")]
    let upload_file = move |file: web_sys::File| {
        match phase.try_update(|p| p.begin()) {
            Some(Ok(())) => {}
            Some(Err(busy)) => {
                toaster.info(busy);
                return;
            }
            None => return,
        }
        let loading = format!("Uploading {}...", file.name());

        leptos::task::spawn_local(async move {
            let task = async move {
                let response = crate::client::post_image(&file).await.map_err(|e| {
                    leptos::logging::warn!("upload request failed: {e}");
                    TRANSPORT_FAILURE_MESSAGE.to_string()
                })?;
                let uploaded_at = crate::client::locale_timestamp();
                let now_ms = crate::client::now_ms();
                match gallery.try_update(|g| g.record(response, uploaded_at, now_ms)) {
                    Some(UploadOutcome::Added(image)) => Ok::<_, String>(image),
                    Some(UploadOutcome::Rejected(message)) => Err(message),
                    None => Err(TRANSPORT_FAILURE_MESSAGE.to_string()),
                }
            };

            let _ = toaster
                .promise(loading, task, |image| format!("Uploaded {}", image.filename))
                .await;
            phase.try_update(|p| p.finish());
        });
    };

    let on_file_selected = move |ev: leptos::ev::Event| {
        #[cfg(feature = "hydrate")]
        {
            let input: web_sys::HtmlInputElement = event_target(&ev);
            if let Some(file) = input.files().and_then(|files| files.get(0)) {
                upload_file(file);
            }
            // Let the same file be picked again.
            input.set_value("");
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = ev;
    };

    // Only the first file of a multi-file drop is uploaded.
    let on_drop = move |ev: leptos::ev::DragEvent| {
        ev.prevent_default();
        drag_over.set(false);

        #[cfg(feature = "hydrate")]
        if let Some(file) = ev
            .data_transfer()
            .and_then(|transfer| transfer.files())
            .and_then(|files| files.get(0))
        {
            upload_file(file);
        }
    };

    let on_drag_over = move |ev: leptos::ev::DragEvent| {
        ev.prevent_default();
        drag_over.set(true);
    };

    let open_picker = move |_| {
        if let Some(input) = file_input.get() {
            input.click();
        }
    };

    view! {
        <div class="max-w-6xl mx-auto p-6">
            <h1 class="text-4xl font-bold text-center mb-8">"Image Uploader"</h1>

            <div
                class=move || {
                    if drag_over.get() {
                        "border-2 border-dashed rounded-xl p-8 text-center border-info bg-info/10"
                    } else {
                        "border-2 border-dashed rounded-xl p-8 text-center border-base-300 bg-base-200"
                    }
                }
                on:drop=on_drop
                on:dragover=on_drag_over
                on:dragleave=move |_| drag_over.set(false)
            >
                <p class="text-xl mb-4 font-medium">"Drag & drop an image, or"</p>

                <button
                    class="btn btn-primary"
                    prop:disabled=move || phase.get().is_uploading()
                    on:click=open_picker
                >
                    {move || {
                        if phase.get().is_uploading() {
                            view! {
                                <span class="loading loading-spinner loading-sm"></span>
                                "Uploading..."
                            }
                                .into_any()
                        } else {
                            view! { "Choose a file" }.into_any()
                        }
                    }}
                </button>

                <input
                    node_ref=file_input
                    type="file"
                    accept="image/*"
                    class="hidden"
                    on:change=on_file_selected
                />

                <Suspense fallback=|| ()>
                    {move || {
                        client_config
                            .get()
                            .and_then(Result::ok)
                            .map(|config| {
                                view! {
                                    <p class="text-sm opacity-70 mt-4">
                                        {format!(
                                            "Supported formats: {} (max {})",
                                            config.accepted_types,
                                            format_size(config.max_file_size),
                                        )}
                                    </p>
                                }
                            })
                    }}
                </Suspense>
            </div>

            <Show when=move || !gallery.with(Gallery::is_empty)>
                <section class="mt-12">
                    <h2 class="text-2xl font-bold mb-6">
                        {move || format!("Uploaded images ({})", gallery.with(Gallery::len))}
                    </h2>
                    <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
                        <For
                            each=move || gallery.with(|g| g.entries().to_vec())
                            key=|image| image.id.clone()
                            children=move |image: ImageInfo| {
                                view! { <ImageCard image=image public_origin=public_origin /> }
                            }
                        />
                    </div>
                </section>
            </Show>
        </div>
    }
}
