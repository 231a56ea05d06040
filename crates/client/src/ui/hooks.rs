use std::future::Future;

use dioxus::prelude::*;

use super::UiState;

/// `use_resource` that also re-runs whenever the session or cached data
/// changes. The query cache makes the re-run free unless the key was
/// invalidated.
pub fn use_cached_resource<T, F>(mut future: impl FnMut() -> F + 'static) -> Resource<T>
where
    T: 'static,
    F: Future<Output = T> + 'static,
{
    let ui = use_context::<UiState>();
    use_resource(move || {
        ui.session.read();
        ui.data.read();
        future()
    })
}
