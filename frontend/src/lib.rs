//! statesync 浏览器端
//!
//! - `web`: LocalStorage 存储与 window 事件源
//! - `host`: Leptos 生命周期适配
//! - `components`: 演示组件

pub mod host;
pub mod web;
mod components {
    pub mod notepad;
}

use crate::components::notepad::NotePadPanel;

use leptos::prelude::*;

/// 演示应用：切换面板即可观察卸载时的保存与重新挂载时的恢复
#[component]
pub fn App() -> impl IntoView {
    let (visible, set_visible) = signal(true);

    view! {
        <main class="container mx-auto max-w-xl p-6 flex flex-col gap-4">
            <button class="btn btn-outline" on:click=move |_| set_visible.update(|v| *v = !*v)>
                {move || if visible.get() { "Hide notepad" } else { "Show notepad" }}
            </button>
            <Show when=move || visible.get()>
                <NotePadPanel />
            </Show>
        </main>
    }
}
