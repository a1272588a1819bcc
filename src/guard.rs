//! 导航守卫
//!
//! 每次路由切换前调用，决定放行、跳转登录页或跳转首页。
//! 流程：请求 -> 验证(Guard) -> 处理 -> 加载

use std::rc::Rc;

use crate::route::{AppRoute, RouteMatch};
use crate::session::SessionStore;

#[cfg(test)]
mod tests;

/// 守卫的决定
///
/// 每次调用恰好产生一个决定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// 放行
    Allow,
    /// 重定向到给定路径
    Redirect(String),
}

pub struct NavigationGuard {
    session: Rc<SessionStore>,
    login_path: String,
    home_path: String,
}

impl NavigationGuard {
    pub fn new(session: Rc<SessionStore>, login_path: &str, home_path: &str) -> Self {
        Self {
            session,
            login_path: login_path.to_string(),
            home_path: home_path.to_string(),
        }
    }

    /// **核心方法：导航守卫**
    ///
    /// 1. 目标（或任一祖先）需要认证：
    ///    已有内存中的资料则直接放行（乐观，不访问后端）；
    ///    否则向后端验证会话，失败跳转登录页。
    /// 2. 目标是访客页且已有资料：跳转首页。
    /// 3. 其它情况放行。
    pub async fn before_each(&self, to: &RouteMatch, from: AppRoute) -> Navigation {
        if to.requires_auth() {
            if self.session.is_logged_in() {
                return Navigation::Allow;
            }

            if !self.session.check_auth().await {
                log::info!("[Guard] {} -> {}: no session, redirecting to login", from, to.route);
                return Navigation::Redirect(self.login_path.clone());
            }
        }

        if to.is_guest() && self.session.is_logged_in() {
            log::debug!("[Guard] {} -> {}: already authenticated", from, to.route);
            return Navigation::Redirect(self.home_path.clone());
        }

        Navigation::Allow
    }

    /// 解析路径后执行守卫
    pub async fn check_path(&self, path: &str, from: AppRoute) -> Navigation {
        let to = AppRoute::resolve(path);
        self.before_each(&to, from).await
    }
}
