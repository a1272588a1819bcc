use crate::notify::ToastOptions;

// =========================================================
// 运行时配置 (Client Configuration)
// =========================================================

/// 默认值，构建时可以通过环境变量覆盖
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_PROFILE_STORAGE_KEY: &str = "user_public_data";
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_HOME_PATH: &str = "/";

/// 客户端配置
///
/// 启动时构建一次，之后注入到各个组件中，不作为全局变量读取。
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// 后端固定地址（无末尾 `/`）
    pub api_base_url: String,
    /// 用户公开资料在本地存储中的键
    pub profile_storage_key: String,
    pub login_path: String,
    pub home_path: String,
    pub toast: ToastOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            profile_storage_key: DEFAULT_PROFILE_STORAGE_KEY.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            home_path: DEFAULT_HOME_PATH.to_string(),
            toast: ToastOptions::default(),
        }
    }
}

impl ClientConfig {
    /// 从构建环境读取配置（`GRITSEE_API_BASE`），读不到就用默认值
    pub fn from_build_env() -> Self {
        Self::default().with_api_base_url(option_env!("GRITSEE_API_BASE"))
    }

    /// 覆盖后端地址，空值保持默认
    pub fn with_api_base_url(mut self, base: Option<&str>) -> Self {
        if let Some(base) = base.map(str::trim).filter(|b| !b.is_empty()) {
            self.api_base_url = base.trim_end_matches('/').to_string();
        }
        self
    }
}
