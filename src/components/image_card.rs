use leptos::prelude::*;

use crate::gallery::absolute_image_url;
use crate::models::upload::ImageInfo;
#[cfg(feature = "hydrate")]
use crate::gallery::{fallback_image_src, CLIPBOARD_FAILURE_MESSAGE, COPIED_RESET_MS};
use crate::toast::use_toaster;

/// One uploaded image with its "open" and "copy URL" actions.
#[component]
pub fn ImageCard(image: ImageInfo, #[prop(into)] public_origin: Signal<String>) -> impl IntoView {
    #[cfg_attr(not(feature = "hydrate"), allow(unused_variables))]
    let toaster = use_toaster();
    let copied = RwSignal::new(false);

    let url = image.url.clone();
    let href = Memo::new(move |_| absolute_image_url(&public_origin.get(), &url));

    // The proxy may not serve a fresh upload yet.
    let on_image_error = move |ev: leptos::ev::ErrorEvent| {
        #[cfg(feature = "hydrate")]
        {
            let img: web_sys::HtmlImageElement = event_target(&ev);
            if let Some(fallback) = fallback_image_src(&img.src()) {
                img.set_src(fallback);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = ev;
    };

    let copy_url = move |_| {
        #[cfg(feature = "hydrate")]
        {
            let target = href.get_untracked();
            leptos::task::spawn_local(async move {
                match crate::client::write_clipboard(&target).await {
                    Ok(()) => {
                        copied.set(true);
                        crate::client::sleep(COPIED_RESET_MS).await;
                        copied.try_set(false);
                    }
                    Err(e) => {
                        leptos::logging::warn!("clipboard write failed: {e}");
                        toaster.error(CLIPBOARD_FAILURE_MESSAGE);
                    }
                }
            });
        }
    };

    view! {
        <div class="card bg-base-200 border border-base-300 shadow-md overflow-hidden">
            <figure class="aspect-video bg-base-300">
                <img
                    src=move || href.get()
                    alt=image.filename.clone()
                    class="w-full h-full object-cover"
                    loading="lazy"
                    on:error=on_image_error
                />
            </figure>
            <div class="card-body p-4">
                <h3 class="card-title text-base truncate" title=image.filename.clone()>
                    {image.filename.clone()}
                </h3>
                <p class="text-sm opacity-70">{image.uploaded_at.clone()}</p>
                <div class="card-actions">
                    <a
                        href=move || href.get()
                        target="_blank"
                        rel="noopener noreferrer"
                        class="btn btn-sm btn-outline btn-info flex-1"
                    >
                        "Open in new tab"
                    </a>
                    <button class="btn btn-sm btn-outline btn-success flex-1" on:click=copy_url>
                        {move || if copied.get() { "Copied!" } else { "Copy URL" }}
                    </button>
                </div>
            </div>
        </div>
    }
}
