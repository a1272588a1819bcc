//! Gritsee 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `gritsee`: 会话、守卫、接口与报告导出（与平台无关，可原生测试）
//! - `web`: 上述 trait 的浏览器实现与路由服务
//! - `auth`: 会话状态到信号的镜像
//! - `components`: UI 组件层

mod auth;
mod components {
    pub mod dashboard;
    pub mod history;
    pub mod layout;
    pub mod login;
    pub mod toasts;
    pub mod upload;
}
mod theme;
mod web;

use std::rc::Rc;

use crate::auth::AuthContext;
use crate::components::dashboard::{DashboardPage, ReportContext};
use crate::components::history::{HistoryContext, HistoryPage};
use crate::components::layout::{MainLayout, NotFoundPage};
use crate::components::login::LoginPage;
use crate::components::toasts::{TimedNotifier, ToastContext, ToastHost};
use crate::components::upload::UploadPage;

use gritsee::bootstrap::ClientServices;
use gritsee::config::ClientConfig;
use gritsee::export::{ReportExporter, SystemClock};
use gritsee::filters::HistoryStore;
use gritsee::notify::ToastQueue;
use gritsee::route::AppRoute;
use leptos::prelude::*;

use web::router::{Router, RouterOutlet};
use web::{DomReportCapture, FetchHttpClient, JsPdfWriter};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Dashboard => view! { <MainLayout><DashboardPage /></MainLayout> }.into_any(),
        AppRoute::Upload => view! { <MainLayout><UploadPage /></MainLayout> }.into_any(),
        AppRoute::History => view! { <MainLayout><HistoryPage /></MainLayout> }.into_any(),
        AppRoute::NotFound => view! { <NotFoundPage /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = ClientConfig::from_build_env();
    log::info!("[App] api base: {}", config.api_base_url);

    // 1. 装配核心服务：401 时整页跳转登录页
    let services = Rc::new(ClientServices::start(
        config,
        Rc::new(FetchHttpClient),
        Rc::new(web::LocalStorage),
        Rc::new(web::hard_redirect),
    ));

    // 2. 提示框与报告导出
    let queue = Rc::new(ToastQueue::new());
    let toast_ctx = ToastContext::new(queue.clone(), services.config.toast.clone());
    let notifier = Rc::new(TimedNotifier::new(queue, services.config.toast.clone()));
    let exporter = Rc::new(ReportExporter::new(
        Rc::new(DomReportCapture),
        Rc::new(JsPdfWriter),
        notifier,
        Rc::new(SystemClock),
    ));
    provide_context(ReportContext::new(exporter));
    provide_context(HistoryContext::new(Rc::new(HistoryStore::new())));

    // 3. 认证上下文，获取认证状态信号用于注入路由服务
    let guard = services.guard.clone();
    let login_path = services.config.login_path.clone();
    let home_path = services.config.home_path.clone();
    let auth_ctx = AuthContext::new(services);
    provide_context(auth_ctx);
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        <div style=theme::root_style()>
            <ToastHost ctx=toast_ctx />
            // 4. 路由器组件：注入守卫实现导航前验证
            <Router
                guard=guard
                login_path=login_path
                home_path=home_path
                is_authenticated=is_authenticated
            >
                <RouterOutlet matcher=route_matcher />
            </Router>
        </div>
    }
}
