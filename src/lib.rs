//! Gritsee 客户端核心
//!
//! 不依赖 DOM 的客户端逻辑，浏览器相关实现都在 `frontend` 中通过 trait 注入：
//! - `request`: HTTP 传输抽象
//! - `api`: 后端接口封装与 401 拦截
//! - `session`: 会话存储（唯一写入方）
//! - `route` / `guard`: 路由表与导航守卫
//! - `export`: 仪表盘报告导出
//! - `filters`, `notify`: 历史页过滤条件与提示消息

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod export;
pub mod filters;
pub mod guard;
pub mod notify;
pub mod request;
pub mod route;
pub mod session;
pub mod storage;

pub use api::ApiClient;
pub use bootstrap::{ClientServices, install_unauthorized_redirect};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, ExportError};
pub use export::ReportExporter;
pub use guard::{Navigation, NavigationGuard};
pub use route::{AppRoute, RouteMatch};
pub use session::SessionStore;
pub use storage::{KeyValueStorage, MemoryStorage};

pub use gritsee_shared as shared;
