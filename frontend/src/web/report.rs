//! 报告导出的浏览器实现
//!
//! 页面中以 `<script>` 引入的 html2canvas 与 jsPDF (UMD 全局变量)，
//! 通过 `wasm_bindgen` 声明绑定。

use gritsee::error::ExportError;
use gritsee::export::{CaptureOptions, CapturedImage, DocumentWriter, ReportCapture, ReportDocument};
use js_sys::{Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlCanvasElement, HtmlElement};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_name = html2canvas)]
    fn html2canvas(element: &HtmlElement, options: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(js_namespace = jspdf, js_name = jsPDF)]
    type JsPdf;

    #[wasm_bindgen(catch, constructor, js_namespace = jspdf, js_class = "jsPDF")]
    fn new(orientation: &str, unit: &str, format: &str) -> Result<JsPdf, JsValue>;

    #[wasm_bindgen(catch, method, js_name = addImage)]
    fn add_image(
        this: &JsPdf,
        data: &str,
        format: &str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = setFontSize)]
    fn set_font_size(this: &JsPdf, size: f64);

    #[wasm_bindgen(method)]
    fn text(this: &JsPdf, text: &str, x: f64, y: f64);

    #[wasm_bindgen(catch, method)]
    fn save(this: &JsPdf, filename: &str) -> Result<(), JsValue>;
}

const PDF_ORIENTATION: &str = "p";
const PDF_UNIT: &str = "mm";
const PDF_FORMAT: &str = "a4";

fn document() -> Option<web_sys::Document> {
    web_sys::window()?.document()
}

fn capture_options(options: &CaptureOptions) -> Result<JsValue, JsValue> {
    let obj = Object::new();
    Reflect::set(&obj, &"scale".into(), &options.scale.into())?;
    Reflect::set(&obj, &"useCORS".into(), &options.use_cors.into())?;
    Reflect::set(&obj, &"logging".into(), &options.logging.into())?;
    Ok(obj.into())
}

/// 使用 html2canvas 对页面元素截图
#[derive(Clone, Copy, Default)]
pub struct DomReportCapture;

#[async_trait::async_trait(?Send)]
impl ReportCapture for DomReportCapture {
    fn find_element(&self, element_id: &str) -> bool {
        document()
            .and_then(|d| d.get_element_by_id(element_id))
            .is_some()
    }

    async fn capture(
        &self,
        element_id: &str,
        options: &CaptureOptions,
    ) -> Result<CapturedImage, ExportError> {
        let element: HtmlElement = document()
            .and_then(|d| d.get_element_by_id(element_id))
            .and_then(|e| e.dyn_into().ok())
            .ok_or_else(|| ExportError::ElementNotFound(element_id.to_string()))?;

        let opts = capture_options(options).map_err(|e| ExportError::Capture(format!("{:?}", e)))?;
        let promise =
            html2canvas(&element, &opts).map_err(|e| ExportError::Capture(format!("{:?}", e)))?;
        let canvas: HtmlCanvasElement = JsFuture::from(promise)
            .await
            .map_err(|e| ExportError::Capture(format!("{:?}", e)))?
            .dyn_into()
            .map_err(|_| ExportError::Capture("html2canvas 未返回 canvas".to_string()))?;

        let data_url = canvas
            .to_data_url_with_type("image/png")
            .map_err(|e| ExportError::Capture(format!("{:?}", e)))?;

        Ok(CapturedImage {
            width: canvas.width(),
            height: canvas.height(),
            data_url,
        })
    }
}

/// 使用 jsPDF 生成并下载文档
#[derive(Clone, Copy, Default)]
pub struct JsPdfWriter;

#[async_trait::async_trait(?Send)]
impl DocumentWriter for JsPdfWriter {
    async fn save(&self, doc: &ReportDocument) -> Result<(), ExportError> {
        let render = |e: JsValue| ExportError::Render(format!("{:?}", e));

        // 页面尺寸与核心库的 A4 纵向版式一致
        let pdf = JsPdf::new(PDF_ORIENTATION, PDF_UNIT, PDF_FORMAT).map_err(render)?;
        pdf.add_image(
            &doc.image.data_url,
            "PNG",
            doc.placement.x,
            doc.placement.y,
            doc.placement.width,
            doc.placement.height,
        )
        .map_err(render)?;

        pdf.set_font_size(doc.footer.font_size);
        pdf.text(&doc.footer.text, doc.footer.x, doc.footer.y);

        pdf.save(&doc.filename)
            .map_err(|e| ExportError::Save(format!("{:?}", e)))
    }
}
