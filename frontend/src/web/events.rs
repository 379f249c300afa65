//! window 事件源
//!
//! 封装 `addEventListener` / `removeEventListener`。每次注册持有自己的
//! `Closure`，按 `ListenerId` 精确移除；`WindowEvents` 被 drop 时清除全部监听。

use futures::FutureExt;
use statesync::{ListenerId, SyncError, SyncResult, UnloadCallback, UnloadEvents};
use std::cell::RefCell;
use std::collections::HashMap;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::js_error;

struct Registration {
    event: String,
    closure: Closure<dyn Fn()>,
}

impl Registration {
    fn detach(&self) {
        if let Some(window) = web_sys::window() {
            let _ = window
                .remove_event_listener_with_callback(&self.event, self.closure.as_ref().unchecked_ref());
        }
    }
}

#[derive(Default)]
pub struct WindowEvents {
    registrations: RefCell<HashMap<ListenerId, Registration>>,
}

impl WindowEvents {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UnloadEvents for WindowEvents {
    fn add_listener(&self, event: &str, callback: UnloadCallback) -> SyncResult<ListenerId> {
        let window = web_sys::window().ok_or_else(|| SyncError::unavailable("no window object"))?;

        let closure = Closure::<dyn Fn()>::new(move || {
            let mut pending = callback();
            // 页面即将卸载，尽量在当前事件内完成；LocalStorage 写入一次 poll 即完成
            if (&mut pending).now_or_never().is_none() {
                wasm_bindgen_futures::spawn_local(pending);
            }
        });

        window
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|e| js_error(e).in_op_with("window.add_event_listener", event))?;

        let id = ListenerId::new();
        self.registrations.borrow_mut().insert(
            id,
            Registration {
                event: event.to_string(),
                closure,
            },
        );
        Ok(id)
    }

    fn remove_listener(&self, event: &str, id: ListenerId) -> bool {
        let registration = {
            let mut registrations = self.registrations.borrow_mut();
            match registrations.get(&id) {
                Some(registration) if registration.event == event => registrations.remove(&id),
                _ => None,
            }
        };
        let Some(registration) = registration else {
            return false;
        };

        registration.detach();
        // 回调可能正在执行（卸载时移除自身），推迟到当前调用栈结束后再释放闭包
        wasm_bindgen_futures::spawn_local(async move { drop(registration) });
        true
    }
}

impl Drop for WindowEvents {
    fn drop(&mut self) {
        for (_, registration) in self.registrations.get_mut().drain() {
            registration.detach();
        }
    }
}
