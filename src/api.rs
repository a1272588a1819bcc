//! 后端 REST 接口封装
//!
//! 所有请求都以固定的后端地址为前缀，凭据由传输层以 Cookie 自动携带。
//! 响应拦截：收到 401 时先通知已注册的处理器，再把失败交回调用方。

use std::cell::RefCell;
use std::rc::Rc;

use gritsee_shared::{
    BatchUploadResponse, DashboardResponse, LoginResponse, PATH_AUTH_LOGOUT, PATH_AUTH_ME,
    PATH_AUTH_TOKEN, PATH_BATCH_UPLOAD, PATH_DASHBOARD_SUMMARY, UserProfile,
};

use crate::error::{ClientError, ClientResult};
use crate::request::{FilePart, HttpClient, HttpMethod, HttpRequest, HttpResponse};

/// 401 处理器
pub type UnauthorizedHandler = Rc<dyn Fn()>;

const CSV_CONTENT_TYPE: &str = "text/csv";
const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub struct ApiClient {
    http: Rc<dyn HttpClient>,
    base_url: String,
    on_unauthorized: RefCell<Option<UnauthorizedHandler>>,
}

impl ApiClient {
    pub fn new(http: Rc<dyn HttpClient>, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            on_unauthorized: RefCell::new(None),
        }
    }

    /// 安装唯一的 401 处理器（替换之前的处理器）
    pub fn set_unauthorized_handler(&self, handler: UnauthorizedHandler) {
        *self.on_unauthorized.borrow_mut() = Some(handler);
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发送请求并统一处理状态码
    ///
    /// - 传输失败 => `Network`
    /// - 401 => 触发处理器一次，然后返回 `Unauthorized`
    /// - 其它非 2xx => `Status`
    pub async fn execute(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let method = req.method;
        let url = req.url.clone();
        let resp = self.http.send(req).await.inspect_err(|e| {
            log::warn!("[Api] {} {} failed: {}", method.as_str(), url, e);
        })?;

        if resp.status == 401 {
            log::info!("[Api] {} {} -> 401", method.as_str(), url);
            self.emit_unauthorized();
            return Err(ClientError::Unauthorized);
        }

        if !resp.is_success() {
            return Err(ClientError::Status {
                status: resp.status,
                body: resp.body,
            });
        }

        Ok(resp)
    }

    fn emit_unauthorized(&self) {
        // 克隆出来再调用，处理器内部可以重新安装自己
        let handler = self.on_unauthorized.borrow().clone();
        if let Some(handler) = handler {
            handler();
        }
    }

    // =========================================================
    // 认证接口 (Auth)
    // =========================================================

    /// 查询当前会话对应的用户
    pub async fn me(&self) -> ClientResult<UserProfile> {
        let req = HttpRequest::new(&self.url(PATH_AUTH_ME), HttpMethod::Get);
        self.execute(req).await?.json()
    }

    /// 请求后端注销 Cookie
    pub async fn logout(&self) -> ClientResult<()> {
        let req = HttpRequest::new(&self.url(PATH_AUTH_LOGOUT), HttpMethod::Post);
        self.execute(req).await?;
        Ok(())
    }

    /// 用户名密码登录（OAuth2 password 表单）
    ///
    /// 后端通过 Set-Cookie 下发凭据，响应体只有公开资料。
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let req = HttpRequest::new(&self.url(PATH_AUTH_TOKEN), HttpMethod::Post).with_form(vec![
            ("username".to_string(), username.to_string()),
            ("password".to_string(), password.to_string()),
        ]);
        self.execute(req).await?.json()
    }

    // =========================================================
    // 业务接口 (Dashboard / Upload)
    // =========================================================

    /// 仪表盘汇总，可按门店过滤
    pub async fn dashboard_summary(&self, location: Option<&str>) -> ClientResult<DashboardResponse> {
        let mut url = url::Url::parse(&self.url(PATH_DASHBOARD_SUMMARY))
            .map_err(|e| ClientError::RequestBuild(e.to_string()))?;
        if let Some(location) = location.map(str::trim).filter(|l| !l.is_empty()) {
            url.query_pairs_mut().append_pair("locacion", location);
        }
        let req = HttpRequest::new(url.as_str(), HttpMethod::Get);
        self.execute(req).await?.json()
    }

    /// 批量上传检测表格（CSV 或 Excel）
    pub async fn upload_batch(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<BatchUploadResponse> {
        let content_type = spreadsheet_content_type(filename).ok_or_else(|| {
            ClientError::InvalidInput("Solo archivos CSV o Excel".to_string())
        })?;

        let part = FilePart {
            field: "file".to_string(),
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            bytes,
        };
        let req = HttpRequest::new(&self.url(PATH_BATCH_UPLOAD), HttpMethod::Post)
            .with_multipart(vec![part]);
        self.execute(req).await?.json()
    }
}

/// 后端只接受 `.csv` 与 `.xlsx`（区分大小写，与后端校验一致）
pub fn spreadsheet_content_type(filename: &str) -> Option<&'static str> {
    if filename.ends_with(".csv") {
        Some(CSV_CONTENT_TYPE)
    } else if filename.ends_with(".xlsx") {
        Some(XLSX_CONTENT_TYPE)
    } else {
        None
    }
}
