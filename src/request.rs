use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::error::{ClientError, ClientResult};

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 方法枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// 表单上传中的单个文件
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// 请求体
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
    /// `multipart/form-data`
    Multipart(Vec<FilePart>),
}

/// 通用 HTTP 请求结构
///
/// 凭据由传输层以 Cookie 形式自动携带，这里从不设置认证头。
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn with_form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(fields);
        self
    }

    pub fn with_multipart(mut self, parts: Vec<FilePart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 检查响应是否成功 (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        serde_json::from_str(&self.body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

/// HTTP 客户端特性 (Trait)
///
/// 只报告传输层失败；非 2xx 状态作为正常响应返回，由上层判断。
/// (?Send) 是因为浏览器环境下的 JS 类型不是 Send 的。
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse>;
}

// =========================================================
// 实现层: reqwest 客户端 (原生目标)
// =========================================================

#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

#[cfg(not(target_arch = "wasm32"))]
impl ReqwestHttpClient {
    /// 启用 Cookie 存储，与浏览器的 `credentials: include` 行为一致
    pub fn new() -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ClientError::RequestBuild(e.to_string()))?;
        Ok(Self { client })
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait::async_trait(?Send)]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &req.url);

        for (k, v) in req.headers {
            builder = builder.header(k, v);
        }

        builder = match req.body {
            RequestBody::Empty => builder,
            RequestBody::Form(fields) => builder.form(&fields),
            RequestBody::Multipart(parts) => {
                let mut form = reqwest::multipart::Form::new();
                for part in parts {
                    let file = reqwest::multipart::Part::bytes(part.bytes)
                        .file_name(part.filename)
                        .mime_str(&part.content_type)
                        .map_err(|e| ClientError::RequestBuild(e.to_string()))?;
                    form = form.part(part.field, file);
                }
                builder.multipart(form)
            }
        };

        let resp = builder
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
pub(crate) use mock::MockHttpClient;
