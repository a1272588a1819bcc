//! 认证模块
//!
//! 会话的真实状态保存在核心库的 `SessionStore` 中，
//! 这里把它镜像成一个 Leptos 信号，供组件和路由服务读取。

use std::rc::Rc;

use gritsee::bootstrap::ClientServices;
use gritsee::error::ClientResult;
use gritsee_shared::UserProfile;
use leptos::prelude::*;

/// 认证上下文
///
/// 通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    services: StoredValue<Rc<ClientServices>, LocalStorage>,
    /// 当前用户（只读镜像）
    pub user: RwSignal<Option<UserProfile>>,
}

impl AuthContext {
    /// 创建认证上下文，并订阅会话变化
    pub fn new(services: Rc<ClientServices>) -> Self {
        let user = RwSignal::new(services.session.user());
        services
            .session
            .subscribe(Rc::new(move |profile: Option<&UserProfile>| {
                user.set(profile.cloned())
            }));

        Self {
            services: StoredValue::new_local(services),
            user,
        }
    }

    pub fn services(&self) -> Rc<ClientServices> {
        self.services.get_value()
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let user = self.user;
        Signal::derive(move || user.with(Option::is_some))
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

/// 登录
///
/// 成功后会话更新，跳转由路由服务的认证状态监听处理。
pub async fn login(ctx: &AuthContext, username: String, password: String) -> ClientResult<UserProfile> {
    let session = ctx.services().session.clone();
    session.login(&username, &password).await
}

/// 注销并清除状态
///
/// 后端调用失败也会清除本地状态。
pub async fn logout(ctx: &AuthContext) {
    let session = ctx.services().session.clone();
    session.logout().await;
    // 注意：不需要手动导航，路由服务会监听认证状态变化并自动重定向
}
