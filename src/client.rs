//! Browser glue, compiled only with the `hydrate` feature.

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use crate::models::upload::UploadResponse;

pub const UPLOAD_ENDPOINT: &str = "/api/upload";

/// Send `file` to the upload handler as the `file` multipart field.
///
/// A 4xx/5xx reply with a JSON body is still `Ok`: the body says why.
pub async fn post_image(file: &web_sys::File) -> Result<UploadResponse, String> {
    let form = web_sys::FormData::new().map_err(js_error)?;
    form.append_with_blob_and_filename("file", file, &file.name())
        .map_err(js_error)?;

    let response = gloo_net::http::Request::post(UPLOAD_ENDPOINT)
        .body(form)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = response.status();
    response
        .json::<UploadResponse>()
        .await
        .map_err(|e| format!("HTTP {status}: {e}"))
}

pub async fn write_clipboard(text: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
    let promise = window.navigator().clipboard().write_text(text);
    JsFuture::from(promise).await.map(|_| ()).map_err(js_error)
}

pub fn now_ms() -> i64 {
    js_sys::Date::now() as i64
}

/// Current time formatted with the browser's locale.
pub fn locale_timestamp() -> String {
    js_sys::Date::new_0()
        .to_locale_string("default", &JsValue::UNDEFINED)
        .into()
}

pub async fn sleep(ms: u32) {
    gloo_timers::future::TimeoutFuture::new(ms).await;
}

fn js_error(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
