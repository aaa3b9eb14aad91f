//! String key/value storage
//!
//! Writes are fire-and-forget: a full or blocked LocalStorage is logged and
//! otherwise ignored. Native builds have no backing store.

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Read a stored value
#[cfg(target_arch = "wasm32")]
pub fn load_item(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok()?
}

/// Store a value, returning whether the write went through
#[cfg(target_arch = "wasm32")]
pub fn store_item(key: &str, value: &str) -> bool {
    let Some(storage) = local_storage() else {
        return false;
    };
    match storage.set_item(key, value) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Failed to write '{}': {:?}", key, e);
            false
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn remove_item(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn load_item(_key: &str) -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn store_item(_key: &str, _value: &str) -> bool {
    false
}

#[cfg(not(target_arch = "wasm32"))]
pub fn remove_item(_key: &str) {}
