use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::components::*;
use leptos_router::path;

use crate::components::uploader::ImageUploader;
use crate::toast::{provide_toaster, ToastViewport};

/// HTML document wrapping [`App`] for server-side rendering.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_toaster();

    view! {
        <Stylesheet id="leptos" href="/pkg/imgdrop.css"/>
        <Title text="imgdrop - Image Uploader"/>

        <Router>
            <main class="min-h-screen">
                <Routes fallback=|| view! { "Page not found." }.into_view()>
                    <Route path=path!("/") view=ImageUploader/>
                </Routes>
            </main>
            <ToastViewport/>
        </Router>
    }
}
