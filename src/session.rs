//! 会话存储
//!
//! 持有当前用户的公开资料，是会话状态的唯一写入方。
//! 内存状态与本地存储总是同步修改；凭据本身只存在于 HttpOnly Cookie，
//! 这里从不接触。本地缓存只是乐观缓存，`check_auth` 才是权威来源。

use std::cell::RefCell;
use std::rc::Rc;

use gritsee_shared::UserProfile;

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::storage::KeyValueStorage;


/// 会话变化监听器
pub type SessionListener = Rc<dyn Fn(Option<&UserProfile>)>;

pub struct SessionStore {
    user: RefCell<Option<UserProfile>>,
    api: Rc<ApiClient>,
    storage: Rc<dyn KeyValueStorage>,
    storage_key: String,
    listeners: RefCell<Vec<SessionListener>>,
}

impl SessionStore {
    /// 创建会话存储，并从本地存储恢复上次的资料
    pub fn new(api: Rc<ApiClient>, storage: Rc<dyn KeyValueStorage>, storage_key: &str) -> Self {
        let user = load_persisted(storage.as_ref(), storage_key);
        if let Some(user) = &user {
            log::debug!("[Session] restored cached profile for {}", user.username);
        }
        Self {
            user: RefCell::new(user),
            api,
            storage,
            storage_key: storage_key.to_string(),
            listeners: RefCell::new(Vec::new()),
        }
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.user.borrow().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.borrow().is_some()
    }

    pub fn subscribe(&self, listener: SessionListener) {
        self.listeners.borrow_mut().push(listener);
    }

    /// 替换当前资料并持久化，不做校验
    pub fn set_user(&self, profile: UserProfile) {
        match serde_json::to_string(&profile) {
            Ok(raw) => {
                if !self.storage.set(&self.storage_key, &raw) {
                    log::warn!("[Session] failed to persist profile");
                }
            }
            Err(e) => log::error!("[Session] failed to serialize profile: {}", e),
        }
        self.replace(Some(profile));
    }

    /// 清空资料并删除持久化副本
    pub fn clear_user(&self) {
        self.storage.delete(&self.storage_key);
        self.replace(None);
    }

    /// 注销
    ///
    /// 无论后端是否成功都清空本地会话，失败只记录日志。
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            log::error!("[Session] logout request failed: {}", e);
        }
        self.clear_user();
    }

    /// 向后端验证当前 Cookie
    ///
    /// 成功时用返回的资料替换内存状态；任何失败（网络、非 2xx）都视为未登录。
    pub async fn check_auth(&self) -> bool {
        match self.api.me().await {
            Ok(profile) => {
                self.replace(Some(profile));
                true
            }
            Err(e) => {
                log::debug!("[Session] session check rejected: {}", e);
                self.clear_user();
                false
            }
        }
    }

    /// 用户名密码登录，成功后保存资料
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<UserProfile> {
        let resp = self.api.login(username, password).await?;
        log::info!("[Session] logged in as {}", resp.user.username);
        self.set_user(resp.user.clone());
        Ok(resp.user)
    }

    fn replace(&self, user: Option<UserProfile>) {
        *self.user.borrow_mut() = user;
        // 回调中可能再次读取会话，先释放借用
        let listeners = self.listeners.borrow().clone();
        let current = self.user();
        for listener in listeners {
            listener(current.as_ref());
        }
    }
}

/// 读取持久化的资料，损坏的数据会被丢弃
fn load_persisted(storage: &dyn KeyValueStorage, key: &str) -> Option<UserProfile> {
    let raw = storage.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(user) => Some(user),
        Err(e) => {
            log::warn!("[Session] discarding unreadable cached profile: {}", e);
            storage.delete(key);
            None
        }
    }
}
