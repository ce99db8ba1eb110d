use std::future::Future;

use leptos::prelude::*;

pub const SUCCESS_DURATION_MS: u32 = 4_000;
pub const ERROR_DURATION_MS: u32 = 5_000;
pub const INFO_DURATION_MS: u32 = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Loading,
}

impl ToastKind {
    /// Auto-dismiss delay. Loading toasts stay until dismissed.
    pub fn duration_ms(self) -> Option<u32> {
        match self {
            ToastKind::Success => Some(SUCCESS_DURATION_MS),
            ToastKind::Error => Some(ERROR_DURATION_MS),
            ToastKind::Info => Some(INFO_DURATION_MS),
            ToastKind::Loading => None,
        }
    }

    fn class(self) -> &'static str {
        match self {
            ToastKind::Success => "alert alert-success",
            ToastKind::Error => "alert alert-error",
            ToastKind::Info => "alert alert-info",
            ToastKind::Loading => "alert",
        }
    }
}

pub type ToastId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
}

/// Visible toasts, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    next_id: ToastId,
}

impl ToastQueue {
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> ToastId {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            kind,
            message: message.into(),
        });
        id
    }

    /// Turn toast `id` into a `kind` toast showing `message`, keeping its place.
    ///
    /// Pushes a new toast when `id` was already dismissed.
    pub fn settle(&mut self, id: ToastId, kind: ToastKind, message: impl Into<String>) -> ToastId {
        let message = message.into();
        match self.toasts.iter_mut().find(|t| t.id == id) {
            Some(toast) => {
                toast.kind = kind;
                toast.message = message;
                id
            }
            None => self.push(kind, message),
        }
    }

    /// Remove a toast. Unknown ids are ignored.
    pub fn dismiss(&mut self, id: ToastId) {
        self.toasts.retain(|t| t.id != id);
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }
}

/// Handle for raising notifications from any component.
#[derive(Debug, Clone, Copy)]
pub struct Toaster {
    queue: RwSignal<ToastQueue>,
}

impl Toaster {
    fn new() -> Self {
        Self {
            queue: RwSignal::new(ToastQueue::default()),
        }
    }

    pub fn success(&self, message: impl Into<String>) -> ToastId {
        self.show(ToastKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> ToastId {
        self.show(ToastKind::Error, message)
    }

    pub fn info(&self, message: impl Into<String>) -> ToastId {
        self.show(ToastKind::Info, message)
    }

    pub fn loading(&self, message: impl Into<String>) -> ToastId {
        self.show(ToastKind::Loading, message)
    }

    pub fn dismiss(&self, id: ToastId) {
        self.queue.try_update(|q| q.dismiss(id));
    }

    /// Show a toast that disappears after `duration_ms` instead of the
    /// default delay of its kind.
    pub fn show_for(&self, kind: ToastKind, message: impl Into<String>, duration_ms: u32) -> ToastId {
        let id = self.push(kind, message);
        self.dismiss_after(id, Some(duration_ms));
        id
    }

    /// Show `loading` while `task` runs, then replace it in place with a
    /// success toast built by `success` or an error toast carrying the
    /// `Err` text. The task's result is handed back unchanged.
    pub async fn promise<T, F>(
        &self,
        loading: impl Into<String>,
        task: F,
        success: impl FnOnce(&T) -> String,
    ) -> Result<T, String>
    where
        F: Future<Output = Result<T, String>>,
    {
        let pending = self.loading(loading);
        let result = task.await;

        let (kind, message) = match &result {
            Ok(value) => (ToastKind::Success, success(value)),
            Err(message) => (ToastKind::Error, message.clone()),
        };
        let id = self
            .queue
            .try_update(|q| q.settle(pending, kind, message))
            .unwrap_or(pending);
        self.dismiss_after(id, kind.duration_ms());

        result
    }

    fn show(&self, kind: ToastKind, message: impl Into<String>) -> ToastId {
        let id = self.push(kind, message);
        self.dismiss_after(id, kind.duration_ms());
        id
    }

    fn push(&self, kind: ToastKind, message: impl Into<String>) -> ToastId {
        let message = message.into();
        self.queue
            .try_update(|q| q.push(kind, message))
            .unwrap_or_default()
    }

    #[cfg_attr(not(feature = "hydrate"), allow(unused_variables))]
    fn dismiss_after(&self, id: ToastId, delay_ms: Option<u32>) {
        #[cfg(feature = "hydrate")]
        if let Some(delay) = delay_ms {
            let toaster = *self;
            leptos::task::spawn_local(async move {
                crate::client::sleep(delay).await;
                toaster.dismiss(id);
            });
        }
    }

    #[cfg(test)]
    fn snapshot(&self) -> Vec<Toast> {
        self.queue.with_untracked(|q| q.toasts().to_vec())
    }
}

/// Install a [`Toaster`] in the current reactive context.
pub fn provide_toaster() -> Toaster {
    let toaster = Toaster::new();
    provide_context(toaster);
    toaster
}

pub fn use_toaster() -> Toaster {
    expect_context::<Toaster>()
}

/// Renders the active toasts in the corner of the page.
#[component]
pub fn ToastViewport() -> impl IntoView {
    let toaster = use_toaster();

    view! {
        <div class="toast toast-end toast-bottom z-50">
            <For
                each=move || toaster.queue.with(|q| q.toasts().to_vec())
                key=|toast| toast.id
                children=move |toast: Toast| {
                    let id = toast.id;
                    view! {
                        <div class=toast.kind.class() role="status">
                            {(toast.kind == ToastKind::Loading)
                                .then(|| view! { <span class="loading loading-spinner loading-sm"></span> })}
                            <span>{toast.message}</span>
                            <button
                                class="btn btn-xs btn-ghost"
                                aria-label="Dismiss"
                                on:click=move |_| toaster.dismiss(id)
                            >
                                "✕"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
