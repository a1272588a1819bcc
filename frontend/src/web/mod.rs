//! 原生 Web API 封装模块
//!
//! 核心库中各个 trait 的浏览器实现，直接基于 `web_sys`，不引入 gloo-* 系列 crate。

use gritsee::route::same_location;

mod http;
mod report;
pub mod router;
mod storage;

pub use http::FetchHttpClient;
pub use report::{DomReportCapture, JsPdfWriter};
pub use storage::LocalStorage;

/// 整页跳转
///
/// 401 处理器使用：丢弃当前页面的全部内存状态。
/// 已经在目标页面时不重新加载（登录表单自己显示凭据错误）。
pub fn hard_redirect(path: &str) {
    if let Some(window) = web_sys::window() {
        let location = window.location();
        if location
            .pathname()
            .is_ok_and(|here| same_location(&here, path))
        {
            log::debug!("[Router] already at {}, skipping reload", path);
            return;
        }
        if location.set_href(path).is_err() {
            log::error!("[Router] hard redirect to {} failed", path);
        }
    }
}
