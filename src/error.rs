use thiserror::Error;

// =========================================================
// 请求错误 (Client Errors)
// =========================================================

/// 后端调用失败的分类
///
/// 传输层失败和非 2xx 响应都会以 `Err` 的形式交给调用方，
/// 401 另有专门的变体，以便拦截器和调用方都能识别。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// 请求构建失败
    #[error("request build failed: {0}")]
    RequestBuild(String),
    /// 网络请求失败（无响应）
    #[error("network error: {0}")]
    Network(String),
    /// 401：会话缺失或过期
    #[error("unauthorized")]
    Unauthorized,
    /// 其它非 2xx 状态
    #[error("request failed with status {status}")]
    Status { status: u16, body: String },
    /// 响应体解析失败
    #[error("invalid response body: {0}")]
    Decode(String),
    /// 本地校验拒绝，请求未发出
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

// =========================================================
// 导出错误 (Export Errors)
// =========================================================

/// 报告导出流程中的失败
///
/// 只用于日志诊断，用户只会看到统一的失败提示。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("element not found: #{0}")]
    ElementNotFound(String),
    #[error("capture failed: {0}")]
    Capture(String),
    #[error("render failed: {0}")]
    Render(String),
    #[error("save failed: {0}")]
    Save(String),
}
