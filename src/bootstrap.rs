//! 应用装配
//!
//! 在启动时把各组件连接起来：401 拦截器 -> 会话失效 -> 跳转登录页。

use std::rc::{Rc, Weak};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::guard::NavigationGuard;
use crate::request::HttpClient;
use crate::session::SessionStore;
use crate::storage::KeyValueStorage;

/// 跳转函数（浏览器中为整页跳转）
pub type Navigate = Rc<dyn Fn(&str)>;

/// 启动后的组件集合
pub struct ClientServices {
    pub config: ClientConfig,
    pub api: Rc<ApiClient>,
    pub session: Rc<SessionStore>,
    pub guard: Rc<NavigationGuard>,
}

impl ClientServices {
    /// 创建全部服务并安装 401 处理器
    pub fn start(
        config: ClientConfig,
        http: Rc<dyn HttpClient>,
        storage: Rc<dyn KeyValueStorage>,
        navigate: Navigate,
    ) -> Self {
        let api = Rc::new(ApiClient::new(http, &config.api_base_url));
        let session = Rc::new(SessionStore::new(
            api.clone(),
            storage,
            &config.profile_storage_key,
        ));
        install_unauthorized_redirect(&api, &session, &config.login_path, navigate);
        let guard = Rc::new(NavigationGuard::new(
            session.clone(),
            &config.login_path,
            &config.home_path,
        ));
        Self {
            config,
            api,
            session,
            guard,
        }
    }
}

/// 安装唯一的 401 处理器
///
/// 任一接口返回 401 都会让本地缓存失效，然后跳转到登录页。
/// 处理器只持有会话的弱引用：会话持有 `ApiClient`，避免循环引用。
pub fn install_unauthorized_redirect(
    api: &ApiClient,
    session: &Rc<SessionStore>,
    login_path: &str,
    navigate: Navigate,
) {
    let session: Weak<SessionStore> = Rc::downgrade(session);
    let login_path = login_path.to_string();
    api.set_unauthorized_handler(Rc::new(move || {
        if let Some(session) = session.upgrade() {
            session.clear_user();
        }
        log::info!("[Auth] session rejected by backend, redirecting to {}", login_path);
        navigate(&login_path);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{HttpMethod, MockHttpClient};
    use crate::storage::MemoryStorage;
    use crate::error::ClientError;
    use crate::route::same_location;
    use gritsee_shared::{PATH_AUTH_TOKEN, PATH_DASHBOARD_SUMMARY, UserProfile};
    use serde_json::json;
    use std::cell::RefCell;

    fn start() -> (Rc<MockHttpClient>, Rc<RefCell<Vec<String>>>, ClientServices) {
        let http = Rc::new(MockHttpClient::new());
        let visits = Rc::new(RefCell::new(Vec::new()));
        let log = visits.clone();
        let services = ClientServices::start(
            ClientConfig::default(),
            http.clone(),
            Rc::new(MemoryStorage::new()),
            Rc::new(move |path: &str| log.borrow_mut().push(path.to_string())),
        );
        (http, visits, services)
    }

    #[tokio::test]
    async fn any_401_invalidates_cache_and_navigates_once() {
        let (http, visits, services) = start();
        services.session.set_user(UserProfile::new("a", true));
        http.mock_response(
            HttpMethod::Get,
            &services.api.url(PATH_DASHBOARD_SUMMARY),
            401,
            json!({}),
        );

        // The caller still sees the rejection; navigation happens once
        let res = services.api.dashboard_summary(None).await;
        assert!(res.is_err());

        assert_eq!(*visits.borrow(), vec!["/login".to_string()]);
        assert!(!services.session.is_logged_in());
    }

    #[tokio::test]
    async fn rejected_login_reaches_the_form_and_targets_login_page() {
        let (http, visits, services) = start();
        http.mock_response(
            HttpMethod::Post,
            &services.api.url(PATH_AUTH_TOKEN),
            401,
            json!({"detail": "Incorrect username or password"}),
        );

        let res = services.session.login("a", "wrong").await;
        assert_eq!(res, Err(ClientError::Unauthorized));
        // The redirect targets the login page itself, which the browser skips
        assert_eq!(*visits.borrow(), vec![services.config.login_path.clone()]);
        assert!(same_location(&visits.borrow()[0], "/login"));
    }

    #[tokio::test]
    async fn non_auth_failures_do_not_navigate() {
        let (http, visits, services) = start();
        services.session.set_user(UserProfile::new("a", true));
        http.set_offline(true);
        let _ = services.api.dashboard_summary(None).await;
        assert!(visits.borrow().is_empty());
        assert!(services.session.is_logged_in());
    }

    #[test]
    fn handler_does_not_keep_session_alive() {
        let (_http, _visits, services) = start();
        let weak = Rc::downgrade(&services.session);
        let ClientServices {
            session, guard, ..
        } = services;
        drop(guard);
        drop(session);
        assert!(weak.upgrade().is_none());
    }
}
