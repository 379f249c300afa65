//! Leptos 宿主适配
//!
//! 把 `SyncedComponent` 接入 Leptos 的组件生命周期：
//! - 创建时异步 restore，完成后执行 did_mount 并开始渲染
//! - `on_cleanup` 时执行 teardown（保存并注销卸载监听）
//!
//! 实例本身不是 `Send`，保存在线程局部注册表中，信号和清理闭包只持有其 id。

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;
use statesync::{Component, Props, StateMap, SyncOptions, SyncedComponent};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::warn;
use uuid::Uuid;

use crate::web::{LocalStorageStore, WindowEvents};

pub type WebSynced<C> = SyncedComponent<C, LocalStorageStore, WindowEvents>;

/// 类型擦除后的存活实例
trait LiveInstance {
    fn render(&self) -> AnyView;
    fn set_state(&self, patch: StateMap) -> StateMap;
    fn teardown(self: Rc<Self>) -> LocalBoxFuture<'static, ()>;
}

impl<C> LiveInstance for WebSynced<C>
where
    C: Component<View = AnyView> + 'static,
{
    fn render(&self) -> AnyView {
        SyncedComponent::render(self)
    }

    fn set_state(&self, patch: StateMap) -> StateMap {
        SyncedComponent::set_state(self, patch);
        self.state()
    }

    fn teardown(self: Rc<Self>) -> LocalBoxFuture<'static, ()> {
        async move {
            if let Err(e) = SyncedComponent::teardown(&*self).await {
                warn!(error = %e, "failed to persist state on cleanup");
            }
        }
        .boxed_local()
    }
}

thread_local! {
    static LIVE: RefCell<HashMap<Uuid, Rc<dyn LiveInstance>>> = RefCell::new(HashMap::new());
    static STORE: Rc<LocalStorageStore> = Rc::new(LocalStorageStore);
    static EVENTS: Rc<WindowEvents> = Rc::new(WindowEvents::new());
}

fn with_live<R>(id: Uuid, f: impl FnOnce(&dyn LiveInstance) -> R) -> Option<R> {
    // 先取出 Rc 再调用，避免在回调期间持有注册表的借用
    let live = LIVE.with(|live| live.borrow().get(&id).cloned());
    live.map(|live| f(&*live))
}

/// 同步组件在 Leptos 侧的句柄
#[derive(Clone, Copy)]
pub struct SyncedHandle {
    id: Uuid,
    state: RwSignal<StateMap>,
    ready: RwSignal<bool>,
}

impl SyncedHandle {
    /// restore 完成后才为 true，此前不渲染被包装组件
    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }

    pub fn state(&self) -> ReadSignal<StateMap> {
        self.state.read_only()
    }

    /// 读取单个字段（响应式）
    pub fn field(&self, name: &str) -> Option<Value> {
        self.state.with(|state| state.get(name).cloned())
    }

    pub fn field_untracked(&self, name: &str) -> Option<Value> {
        self.state.with_untracked(|state| state.get(name).cloned())
    }

    /// state 更新入口：写入实例并刷新信号，不触发持久化
    pub fn set_state(&self, patch: StateMap) {
        if let Some(next) = with_live(self.id, |live| live.set_state(patch)) {
            self.state.set(next);
        }
    }

    fn render(&self) -> Option<AnyView> {
        with_live(self.id, |live| live.render())
    }
}

/// 在当前 Leptos owner 下挂载一个同步组件
pub fn use_synced<C>(component: C, props: Props) -> SyncedHandle
where
    C: Component<View = AnyView> + 'static,
{
    use_synced_with(component, props, SyncOptions::default())
}

pub fn use_synced_with<C>(component: C, props: Props, options: SyncOptions) -> SyncedHandle
where
    C: Component<View = AnyView> + 'static,
{
    let id = Uuid::new_v4();
    let state = RwSignal::new(StateMap::new());
    let ready = RwSignal::new(false);

    let synced: Rc<WebSynced<C>> = Rc::new(SyncedComponent::new(
        component,
        props,
        STORE.with(Rc::clone),
        EVENTS.with(Rc::clone),
        options,
    ));
    LIVE.with(|live| {
        live.borrow_mut()
            .insert(id, synced.clone() as Rc<dyn LiveInstance>)
    });

    spawn_local(async move {
        if let Err(e) = synced.restore().await {
            warn!(error = %e, "failed to restore persisted state");
        }
        if let Err(e) = synced.did_mount() {
            warn!(error = %e, "failed to register unload listener");
        }
        // owner 可能已被清理，信号失效时忽略
        let _ = state.try_set(synced.state());
        let _ = ready.try_set(true);
    });

    on_cleanup(move || {
        let live = LIVE.with(|live| live.borrow_mut().remove(&id));
        if let Some(live) = live {
            spawn_local(live.teardown());
        }
    });

    SyncedHandle { id, state, ready }
}

/// 渲染被包装组件，渲染结果与组件自身 `render` 一致
#[component]
pub fn SyncedView(handle: SyncedHandle) -> impl IntoView {
    move || {
        handle.state.track();
        if !handle.is_ready() {
            return ().into_any();
        }
        handle.render().unwrap_or_else(|| ().into_any())
    }
}
