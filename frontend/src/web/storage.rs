//! LocalStorage 存储实现
//!
//! 以 `window.localStorage` 作为 `KvStore`。浏览器 API 本身是同步的，
//! 返回的 future 在第一次 poll 时即完成。

use async_trait::async_trait;
use statesync::{KvStore, SyncError, SyncResult};

use super::js_error;

/// 浏览器 LocalStorage
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    /// 获取 LocalStorage 实例
    fn storage() -> SyncResult<web_sys::Storage> {
        let window = web_sys::window().ok_or_else(|| SyncError::unavailable("no window object"))?;
        window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| SyncError::unavailable("localStorage is disabled"))
    }
}

#[async_trait(?Send)]
impl KvStore for LocalStorageStore {
    async fn get(&self, key: &str) -> SyncResult<Option<String>> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| js_error(e).in_op_with("local_storage.get", key))
    }

    async fn set(&self, key: &str, value: &str) -> SyncResult<()> {
        // 配额不足时 set_item 会抛出 QuotaExceededError
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| js_error(e).in_op_with("local_storage.set", key))
    }

    async fn remove(&self, key: &str) -> SyncResult<bool> {
        let storage = Self::storage()?;
        let existed = storage
            .get_item(key)
            .map_err(|e| js_error(e).in_op_with("local_storage.remove", key))?
            .is_some();
        storage
            .remove_item(key)
            .map_err(|e| js_error(e).in_op_with("local_storage.remove", key))?;
        Ok(existed)
    }
}
