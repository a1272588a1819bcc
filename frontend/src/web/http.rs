//! HTTP 传输层 (浏览器)
//!
//! 使用 `web_sys::fetch` 实现核心库的 `HttpClient`。
//! 所有请求都带 `credentials: include`，认证 Cookie 由浏览器自动附带。

use gritsee::error::{ClientError, ClientResult};
use gritsee::request::{FilePart, HttpClient, HttpRequest, HttpResponse, RequestBody};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, BlobPropertyBag, FormData, Headers, Request, RequestCredentials, RequestInit, Response,
    UrlSearchParams,
};

fn build_err(e: JsValue) -> ClientError {
    ClientError::RequestBuild(format!("{:?}", e))
}

/// 基于 fetch 的 HTTP 客户端
#[derive(Clone, Copy, Default)]
pub struct FetchHttpClient;

impl FetchHttpClient {
    fn form_body(fields: &[(String, String)]) -> Result<JsValue, ClientError> {
        let params = UrlSearchParams::new().map_err(build_err)?;
        for (key, value) in fields {
            params.append(key, value);
        }
        Ok(params.into())
    }

    fn multipart_body(parts: &[FilePart]) -> Result<JsValue, ClientError> {
        let form = FormData::new().map_err(build_err)?;
        for part in parts {
            let bytes = js_sys::Uint8Array::from(part.bytes.as_slice());
            let chunks = js_sys::Array::of1(&bytes);
            let opts = BlobPropertyBag::new();
            opts.set_type(&part.content_type);
            let blob = Blob::new_with_u8_array_sequence_and_options(&chunks, &opts)
                .map_err(build_err)?;
            form.append_with_blob_and_filename(&part.field, &blob, &part.filename)
                .map_err(build_err)?;
        }
        Ok(form.into())
    }

    async fn read_text(response: &Response) -> ClientResult<String> {
        let promise = response
            .text()
            .map_err(|e| ClientError::Decode(format!("{:?}", e)))?;
        let text = JsFuture::from(promise)
            .await
            .map_err(|e| ClientError::Decode(format!("{:?}", e)))?;
        text.as_string()
            .ok_or_else(|| ClientError::Decode("响应体不是字符串".to_string()))
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let headers = Headers::new().map_err(build_err)?;
        for (key, value) in &req.headers {
            headers.set(key, value).map_err(build_err)?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_credentials(RequestCredentials::Include);
        opts.set_headers(&headers.into());

        // Form / Multipart 不设置 Content-Type，由浏览器生成（含 boundary）
        match &req.body {
            RequestBody::Empty => {}
            RequestBody::Form(fields) => opts.set_body(&Self::form_body(fields)?),
            RequestBody::Multipart(parts) => opts.set_body(&Self::multipart_body(parts)?),
        }

        let request = Request::new_with_str_and_init(&req.url, &opts).map_err(build_err)?;

        let window = web_sys::window()
            .ok_or_else(|| ClientError::Network("无法获取 window 对象".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ClientError::Network(format!("{:?}", e)))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| ClientError::Decode(format!("Response 类型转换失败: {:?}", e)))?;

        let status = response.status();
        let body = Self::read_text(&response).await?;
        Ok(HttpResponse { status, body })
    }
}
