//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程，验证由核心库的 `NavigationGuard` 完成。

use std::rc::Rc;

use gritsee::guard::{Navigation, NavigationGuard};
use gritsee::route::AppRoute;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 放行后如何更新地址栏
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryMode {
    Push,
    Replace,
    /// 浏览器已经更新了地址 (popstate)
    Keep,
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// `current_route` 为 `None` 表示首次导航的守卫尚未给出结果。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<Option<AppRoute>>,
    set_route: WriteSignal<Option<AppRoute>>,
    guard: StoredValue<Rc<NavigationGuard>, LocalStorage>,
    /// 导航序号：只有最后一次导航的守卫结果会被应用
    seq: StoredValue<u64>,
    login_path: StoredValue<String>,
    home_path: StoredValue<String>,
}

impl RouterService {
    fn new(guard: Rc<NavigationGuard>, login_path: String, home_path: String) -> Self {
        let (current_route, set_route) = signal(None);
        Self {
            current_route,
            set_route,
            guard: StoredValue::new_local(guard),
            seq: StoredValue::new(0),
            login_path: StoredValue::new(login_path),
            home_path: StoredValue::new(home_path),
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<Option<AppRoute>> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        self.navigate_with(path.to_string(), HistoryMode::Push);
    }

    fn navigate_with(&self, path: String, mode: HistoryMode) {
        let seq = self.seq.get_value() + 1;
        self.seq.set_value(seq);

        let this = *self;
        let guard = self.guard.get_value();
        let from = self.current_route.get_untracked().unwrap_or_default();

        spawn_local(async move {
            let decision = guard.check_path(&path, from).await;

            // 守卫等待期间又发生了新的导航
            if this.seq.get_value() != seq {
                log::debug!("[Router] stale navigation to {} dropped", path);
                return;
            }

            match decision {
                Navigation::Allow => this.commit(&path, mode),
                Navigation::Redirect(target) => {
                    log::info!("[Router] {} redirected to {}", path, target);
                    let mode = match mode {
                        HistoryMode::Keep => HistoryMode::Replace,
                        other => other,
                    };
                    this.navigate_with(target, mode);
                }
            }
        });
    }

    /// 加载页面 (更新地址与状态)
    fn commit(&self, path: &str, mode: HistoryMode) {
        match mode {
            HistoryMode::Push => push_history_state(path),
            HistoryMode::Replace => replace_history_state(path),
            HistoryMode::Keep => {}
        }
        self.set_route.set(Some(AppRoute::from_path(path)));
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let this = *self;

        // popstate 时也执行守卫逻辑
        let closure = Closure::<dyn Fn()>::new(move || {
            this.navigate_with(current_path(), HistoryMode::Keep);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 设置认证状态变化时的自动重定向
    ///
    /// 只响应变化本身，首次运行不跳转（首次导航交给守卫）。
    fn setup_auth_redirect(&self, is_authenticated: Signal<bool>) {
        let this = *self;

        Effect::new(move |prev: Option<bool>| {
            let is_auth = is_authenticated.get();
            if prev.is_some_and(|p| p != is_auth) {
                let here = AppRoute::resolve(&current_path());
                if is_auth && here.is_guest() {
                    log::info!("[Router] Auth state changed: logged in, redirecting to home.");
                    this.navigate(&this.home_path.get_value());
                } else if !is_auth && here.requires_auth() {
                    log::info!("[Router] Auth state changed: logged out, redirecting to login.");
                    this.navigate(&this.login_path.get_value());
                }
            }
            is_auth
        });
    }
}

/// 提供路由服务到 Context 并执行首次导航
fn provide_router(
    guard: Rc<NavigationGuard>,
    login_path: String,
    home_path: String,
    is_authenticated: Signal<bool>,
) -> RouterService {
    let router = RouterService::new(guard, login_path, home_path);

    router.init_popstate_listener();
    router.setup_auth_redirect(is_authenticated);
    router.navigate_with(current_path(), HistoryMode::Replace);

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    expect_context::<RouterService>()
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 导航守卫
    guard: Rc<NavigationGuard>,
    /// 登录页路径
    login_path: String,
    /// 首页路径
    home_path: String,
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(guard, login_path, home_path, is_authenticated);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件；守卫给出首次结果前显示加载动画。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || match router.current_route().get() {
        Some(current) => matcher(current),
        None => view! {
            <div class="flex items-center justify-center min-h-screen">
                <span class="loading loading-spinner loading-lg text-primary"></span>
            </div>
        }
        .into_any(),
    }
}

/// 站内链接：拦截点击，交给路由服务导航
#[component]
pub fn Link(
    /// 目标路径
    #[prop(into)]
    to: String,
    /// 链接样式
    #[prop(into, optional)]
    link_class: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=link_class on:click=on_click>
            {children()}
        </a>
    }
}
