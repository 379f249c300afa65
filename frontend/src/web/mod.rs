//! 浏览器绑定
//!
//! `LocalStorageStore` 与 `WindowEvents` 分别实现 statesync 的存储和卸载事件接缝。

mod console;
mod events;
mod storage;

pub use console::init_logging;
pub use events::WindowEvents;
pub use storage::LocalStorageStore;

use statesync::{SyncError, SyncErrorStatus};
use wasm_bindgen::{JsCast, JsValue};

/// 浏览器拒绝访问存储时抛出的 DOMException 名称
const SECURITY_ERROR: &str = "SecurityError";

/// 按 DOMException 名称归类
fn status_for(exception_name: Option<&str>) -> SyncErrorStatus {
    match exception_name {
        Some(SECURITY_ERROR) => SyncErrorStatus::Unavailable,
        _ => SyncErrorStatus::Store,
    }
}

/// 把 JS 抛出的值转换为 `SyncError`
fn js_error(e: JsValue) -> SyncError {
    match e.dyn_ref::<web_sys::DomException>() {
        Some(exception) => {
            let name = exception.name();
            SyncError::new(
                status_for(Some(name.as_str())),
                format!("{}: {}", name, exception.message()),
            )
        }
        None => {
            let msg = e.as_string().unwrap_or_else(|| format!("{:?}", e));
            SyncError::new(status_for(None), msg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_error_means_unavailable() {
        assert_eq!(status_for(Some("SecurityError")), SyncErrorStatus::Unavailable);
    }

    #[test]
    fn test_other_exceptions_are_store_errors() {
        assert_eq!(status_for(Some("QuotaExceededError")), SyncErrorStatus::Store);
        assert_eq!(status_for(None), SyncErrorStatus::Store);
    }
}
