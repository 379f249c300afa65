use leptos::prelude::*;
use serde_json::{Value, json};
use statesync::{Component, Props, StateMap};

use crate::host::{SyncedView, use_synced};

/// 便签组件：草稿在卸载或关闭页面时写入 LocalStorage，
/// 编辑计数只在本次会话内有效（不在过滤列表中）。
pub struct NotePad;

impl Component for NotePad {
    type View = AnyView;

    fn display_name(&self) -> Option<&str> {
        Some("NotePad")
    }

    fn initial_state(&self, _props: &Props) -> StateMap {
        let mut state = StateMap::new();
        state.insert("draft".into(), json!(""));
        state.insert("edits".into(), json!(0));
        state
    }

    fn render(&self, props: &Props, state: &StateMap) -> AnyView {
        let title = props
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("Notes")
            .to_string();
        let draft = state
            .get("draft")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let edits = state.get("edits").and_then(Value::as_u64).unwrap_or(0);

        view! {
            <section class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title">{title}</h2>
                    <pre class="whitespace-pre-wrap">{draft}</pre>
                    <p class="text-sm text-base-content/60">{format!("{} edits this session", edits)}</p>
                </div>
            </section>
        }
        .into_any()
    }
}

#[component]
pub fn NotePadPanel() -> impl IntoView {
    let handle = use_synced(
        NotePad,
        Props::new()
            .with("title", "Scratchpad")
            .with_state_filter_keys(["draft"]),
    );

    let on_input = move |ev: leptos::ev::Event| {
        let edits = handle
            .field_untracked("edits")
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        let mut patch = StateMap::new();
        patch.insert("draft".into(), json!(event_target_value(&ev)));
        patch.insert("edits".into(), json!(edits + 1));
        handle.set_state(patch);
    };

    let draft = move || {
        handle
            .field("draft")
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    };

    view! {
        <div class="flex flex-col gap-4">
            <textarea
                class="textarea textarea-bordered"
                disabled=move || !handle.is_ready()
                prop:value=draft
                on:input=on_input
            ></textarea>
            <SyncedView handle=handle />
        </div>
    }
}
