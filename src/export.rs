//! 报告导出流程
//!
//! 把页面上的一个元素截图，缩放到一页 A4 纵向文档上，加页脚后触发下载。
//! 截图与保存两个步骤会挂起；没有分页，过高的内容会被压缩在一页内。

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{DateTime, Utc};
use gritsee_shared::{display_date, iso_date};

use crate::error::ExportError;
use crate::notify::Notifier;

#[cfg(test)]
mod tests;

pub const DEFAULT_REPORT_TITLE: &str = "Reporte";
pub const REPORT_EXTENSION: &str = "pdf";

/// 图片顶部留白 (mm)
pub const TOP_MARGIN: f64 = 10.0;
/// 页脚距左边与底边的距离 (mm)
pub const FOOTER_MARGIN: f64 = 10.0;
pub const FOOTER_FONT_SIZE: f64 = 10.0;
pub const FOOTER_LABEL: &str = "Generado por Gritsee AI";

const MSG_STARTED: &str = "Generando Reporte, por favor espera";
const MSG_DONE: &str = "Reporte generado correctamente";
const MSG_FAILED: &str = "Error al generar el Reporte";

// =========================================================
// 页面与版式 (Layout)
// =========================================================

/// 页面尺寸，单位毫米
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFormat {
    pub width: f64,
    pub height: f64,
}

impl PageFormat {
    pub const A4_PORTRAIT: PageFormat = PageFormat {
        width: 210.0,
        height: 297.0,
    };
}

/// 截图参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    /// 像素密度
    pub scale: f64,
    /// 允许跨域图片
    pub use_cors: bool,
    pub logging: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            use_cors: true,
            logging: false,
        }
    }
}

/// 截图结果
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedImage {
    pub width: u32,
    pub height: u32,
    /// `data:image/png;base64,...`
    pub data_url: String,
}

/// 图片在页面上的位置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FooterText {
    pub text: String,
    pub font_size: f64,
    pub x: f64,
    pub y: f64,
}

/// 待写出的文档
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub page: PageFormat,
    pub image: CapturedImage,
    pub placement: ImagePlacement,
    pub footer: FooterText,
    pub filename: String,
}

/// 一次导出调用
#[derive(Debug, Clone, PartialEq)]
pub struct ExportJob {
    pub source_element_id: String,
    pub title: String,
    pub generated_at: DateTime<Utc>,
}

impl ExportJob {
    pub fn new(element_id: &str, title: Option<&str>, generated_at: DateTime<Utc>) -> Self {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_REPORT_TITLE);
        Self {
            source_element_id: element_id.to_string(),
            title: title.to_string(),
            generated_at,
        }
    }

    /// `{title}_{YYYY-MM-DD}.pdf`
    pub fn filename(&self) -> String {
        format!(
            "{}_{}.{}",
            self.title,
            iso_date(&self.generated_at),
            REPORT_EXTENSION
        )
    }

    pub fn footer(&self, page: &PageFormat) -> FooterText {
        FooterText {
            text: format!("{} - {}", FOOTER_LABEL, display_date(&self.generated_at)),
            font_size: FOOTER_FONT_SIZE,
            x: FOOTER_MARGIN,
            y: page.height - FOOTER_MARGIN,
        }
    }
}

/// 按页面宽度缩放
///
/// 宽度强制等于页面宽度，高度按同一比例换算；不分页。
pub fn fit_to_page_width(
    bitmap_width: u32,
    bitmap_height: u32,
    page: &PageFormat,
) -> Result<ImagePlacement, ExportError> {
    if bitmap_width == 0 || bitmap_height == 0 {
        return Err(ExportError::Render(format!(
            "empty capture ({bitmap_width}x{bitmap_height})"
        )));
    }
    let ratio = f64::from(bitmap_width) / page.width;
    Ok(ImagePlacement {
        x: 0.0,
        y: TOP_MARGIN,
        width: page.width,
        height: f64::from(bitmap_height) / ratio,
    })
}

// =========================================================
// 外部协作者 (Collaborators)
// =========================================================

/// 页面元素截图
#[async_trait::async_trait(?Send)]
pub trait ReportCapture {
    /// 元素是否存在
    fn find_element(&self, element_id: &str) -> bool;

    async fn capture(
        &self,
        element_id: &str,
        options: &CaptureOptions,
    ) -> Result<CapturedImage, ExportError>;
}

/// 文档生成与下载
#[async_trait::async_trait(?Send)]
pub trait DocumentWriter {
    async fn save(&self, doc: &ReportDocument) -> Result<(), ExportError>;
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// =========================================================
// 导出服务 (Exporter)
// =========================================================

pub type ProgressListener = Rc<dyn Fn(bool)>;

pub struct ReportExporter {
    capture: Rc<dyn ReportCapture>,
    writer: Rc<dyn DocumentWriter>,
    notifier: Rc<dyn Notifier>,
    clock: Rc<dyn Clock>,
    page: PageFormat,
    options: CaptureOptions,
    in_progress: Cell<bool>,
    on_progress: RefCell<Option<ProgressListener>>,
}

impl ReportExporter {
    pub fn new(
        capture: Rc<dyn ReportCapture>,
        writer: Rc<dyn DocumentWriter>,
        notifier: Rc<dyn Notifier>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            capture,
            writer,
            notifier,
            clock,
            page: PageFormat::A4_PORTRAIT,
            options: CaptureOptions::default(),
            in_progress: Cell::new(false),
            on_progress: RefCell::new(None),
        }
    }

    /// 是否有导出正在进行（仅供 UI 禁用按钮，不做互斥）
    pub fn is_in_progress(&self) -> bool {
        self.in_progress.get()
    }

    pub fn set_progress_listener(&self, listener: ProgressListener) {
        *self.on_progress.borrow_mut() = Some(listener);
    }

    /// 生成并下载仪表盘报告
    ///
    /// 失败只以统一提示告知用户，具体原因写入日志。
    pub async fn generate_dashboard_pdf(&self, element_id: &str, title: Option<&str>) {
        let _progress = ProgressFlag::raise(self);
        self.notifier.info(MSG_STARTED);

        let job = ExportJob::new(element_id, title, self.clock.now());
        match self.run(&job).await {
            Ok(()) => {
                log::info!("[Export] saved {}", job.filename());
                self.notifier.success(MSG_DONE);
            }
            Err(e) => {
                log::error!("[Export] #{} failed: {}", job.source_element_id, e);
                self.notifier.error(MSG_FAILED);
            }
        }
    }

    async fn run(&self, job: &ExportJob) -> Result<(), ExportError> {
        // 1. 查找元素
        if !self.capture.find_element(&job.source_element_id) {
            return Err(ExportError::ElementNotFound(job.source_element_id.clone()));
        }

        // 2. 截图
        let image = self
            .capture
            .capture(&job.source_element_id, &self.options)
            .await?;

        // 3. 按页宽缩放
        let placement = fit_to_page_width(image.width, image.height, &self.page)?;

        // 4. 页脚
        let footer = job.footer(&self.page);

        // 5. 下载
        let doc = ReportDocument {
            page: self.page,
            image,
            placement,
            footer,
            filename: job.filename(),
        };
        self.writer.save(&doc).await
    }

    fn set_in_progress(&self, value: bool) {
        self.in_progress.set(value);
        let listener = self.on_progress.borrow().clone();
        if let Some(listener) = listener {
            listener(value);
        }
    }
}

/// 进行中标记，离开作用域时自动清除
struct ProgressFlag<'a> {
    exporter: &'a ReportExporter,
}

impl<'a> ProgressFlag<'a> {
    fn raise(exporter: &'a ReportExporter) -> Self {
        exporter.set_in_progress(true);
        Self { exporter }
    }
}

impl Drop for ProgressFlag<'_> {
    fn drop(&mut self) {
        self.exporter.set_in_progress(false);
    }
}
