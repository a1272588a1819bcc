use super::*;
use crate::notify::{ToastLevel, ToastQueue};
use async_trait::async_trait;
use chrono::TimeZone;
use futures::executor::block_on;
use futures::future::join;

// =========================================================
// Shared Mock Components
// =========================================================

struct TestContext {
    /// Operation log to verify calling order
    log: RefCell<Vec<String>>,
    /// Element ids present on the page
    elements: RefCell<Vec<String>>,
    /// Bitmap returned by the capture step
    bitmap: Cell<(u32, u32)>,
    fail_capture: Cell<bool>,
    fail_save: Cell<bool>,
    saved: RefCell<Vec<ReportDocument>>,
    /// in_progress observed by the writer while saving
    progress_during_save: Cell<Option<bool>>,
}

impl TestContext {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            log: RefCell::new(Vec::new()),
            elements: RefCell::new(vec!["dashboard-content".to_string()]),
            bitmap: Cell::new((1680, 2400)),
            fail_capture: Cell::new(false),
            fail_save: Cell::new(false),
            saved: RefCell::new(Vec::new()),
            progress_during_save: Cell::new(None),
        })
    }

    fn push_log(&self, msg: String) {
        self.log.borrow_mut().push(msg);
    }
}

struct TestCapture {
    ctx: Rc<TestContext>,
}

#[async_trait(?Send)]
impl ReportCapture for TestCapture {
    fn find_element(&self, element_id: &str) -> bool {
        self.ctx.push_log(format!("find:{element_id}"));
        self.ctx.elements.borrow().iter().any(|e| e == element_id)
    }

    async fn capture(
        &self,
        element_id: &str,
        options: &CaptureOptions,
    ) -> Result<CapturedImage, ExportError> {
        self.ctx
            .push_log(format!("capture:{element_id}:{}:{}", options.scale, options.use_cors));
        if self.ctx.fail_capture.get() {
            return Err(ExportError::Capture("tainted canvas".to_string()));
        }
        let (width, height) = self.ctx.bitmap.get();
        Ok(CapturedImage {
            width,
            height,
            data_url: "data:image/png;base64,AAAA".to_string(),
        })
    }
}

struct TestWriter {
    ctx: Rc<TestContext>,
    exporter: RefCell<Option<std::rc::Weak<ReportExporter>>>,
}

#[async_trait(?Send)]
impl DocumentWriter for TestWriter {
    async fn save(&self, doc: &ReportDocument) -> Result<(), ExportError> {
        self.ctx.push_log(format!("save:{}", doc.filename));
        if let Some(exporter) = self.exporter.borrow().as_ref().and_then(|w| w.upgrade()) {
            self.ctx
                .progress_during_save
                .set(Some(exporter.is_in_progress()));
        }
        if self.ctx.fail_save.get() {
            return Err(ExportError::Save("quota exceeded".to_string()));
        }
        self.ctx.saved.borrow_mut().push(doc.clone());
        Ok(())
    }
}

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn setup() -> (Rc<TestContext>, Rc<ToastQueue>, Rc<ReportExporter>) {
    let ctx = TestContext::new();
    let toasts = Rc::new(ToastQueue::new());
    let writer = Rc::new(TestWriter {
        ctx: ctx.clone(),
        exporter: RefCell::new(None),
    });
    let clock = FixedClock(Utc.with_ymd_and_hms(2024, 5, 17, 14, 30, 0).unwrap());
    let exporter = Rc::new(ReportExporter::new(
        Rc::new(TestCapture { ctx: ctx.clone() }),
        writer.clone(),
        toasts.clone(),
        Rc::new(clock),
    ));
    *writer.exporter.borrow_mut() = Some(Rc::downgrade(&exporter));
    (ctx, toasts, exporter)
}

fn levels(toasts: &ToastQueue) -> Vec<ToastLevel> {
    toasts.snapshot().iter().map(|t| t.level).collect()
}

// =========================================================
// Layout
// =========================================================

#[test]
fn width_is_forced_to_page_width() {
    let page = PageFormat::A4_PORTRAIT;
    for (bw, bh) in [(1680u32, 2400u32), (420, 100), (3000, 9000), (1, 1)] {
        let p = fit_to_page_width(bw, bh, &page).unwrap();
        let expected = f64::from(bh) / (f64::from(bw) / page.width);
        assert_eq!(p.width, page.width);
        assert!((p.height - expected).abs() < 1e-9);
        assert_eq!((p.x, p.y), (0.0, TOP_MARGIN));
    }
}

#[test]
fn tall_content_is_not_paginated() {
    // A 1:10 capture overflows the page height but stays on one page
    let p = fit_to_page_width(1000, 10_000, &PageFormat::A4_PORTRAIT).unwrap();
    assert!(p.height > PageFormat::A4_PORTRAIT.height);
}

#[test]
fn empty_bitmap_is_a_render_error() {
    let err = fit_to_page_width(0, 300, &PageFormat::A4_PORTRAIT).unwrap_err();
    assert!(matches!(err, ExportError::Render(_)));
}

#[test]
fn job_names_file_from_title_and_iso_date() {
    let at = Utc.with_ymd_and_hms(2024, 5, 17, 23, 0, 0).unwrap();
    assert_eq!(
        ExportJob::new("x", Some("Semanal"), at).filename(),
        "Semanal_2024-05-17.pdf"
    );
    assert_eq!(ExportJob::new("x", None, at).filename(), "Reporte_2024-05-17.pdf");
    assert_eq!(ExportJob::new("x", Some(" "), at).title, "Reporte");
}

#[test]
fn footer_sits_above_bottom_margin() {
    let at = Utc.with_ymd_and_hms(2024, 5, 17, 9, 0, 0).unwrap();
    let footer = ExportJob::new("x", None, at).footer(&PageFormat::A4_PORTRAIT);
    assert_eq!(footer.text, "Generado por Gritsee AI - 17/05/2024");
    assert_eq!(footer.font_size, 10.0);
    assert_eq!((footer.x, footer.y), (10.0, 287.0));
}

// =========================================================
// Pipeline
// =========================================================

#[tokio::test]
async fn success_path_saves_one_document() {
    let (ctx, toasts, exporter) = setup();

    exporter
        .generate_dashboard_pdf("dashboard-content", Some("Dashboard"))
        .await;

    assert_eq!(
        *ctx.log.borrow(),
        vec![
            "find:dashboard-content".to_string(),
            "capture:dashboard-content:2:true".to_string(),
            "save:Dashboard_2024-05-17.pdf".to_string(),
        ]
    );
    let saved = ctx.saved.borrow();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].placement.width, 210.0);
    assert_eq!(saved[0].placement.height, 2400.0 / (1680.0 / 210.0));
    assert_eq!(levels(&toasts), vec![ToastLevel::Info, ToastLevel::Success]);
    assert!(!exporter.is_in_progress());
    assert_eq!(ctx.progress_during_save.get(), Some(true));
}

#[tokio::test]
async fn missing_element_never_reaches_download() {
    let (ctx, toasts, exporter) = setup();

    exporter.generate_dashboard_pdf("no-such-panel", None).await;

    assert_eq!(*ctx.log.borrow(), vec!["find:no-such-panel".to_string()]);
    assert!(ctx.saved.borrow().is_empty());
    assert_eq!(levels(&toasts), vec![ToastLevel::Info, ToastLevel::Error]);
    assert_eq!(toasts.snapshot()[1].message, "Error al generar el Reporte");
    assert!(!exporter.is_in_progress());
}

#[tokio::test]
async fn capture_failure_is_reported_generically() {
    let (ctx, toasts, exporter) = setup();
    ctx.fail_capture.set(true);

    exporter.generate_dashboard_pdf("dashboard-content", None).await;

    assert!(ctx.saved.borrow().is_empty());
    assert!(!ctx.log.borrow().iter().any(|l| l.starts_with("save:")));
    let last = toasts.snapshot().pop().unwrap();
    assert_eq!(last.level, ToastLevel::Error);
    // The underlying cause is logged, never shown
    assert!(!last.message.contains("tainted"));
    assert!(!exporter.is_in_progress());
}

#[tokio::test]
async fn save_failure_clears_progress_flag() {
    let (ctx, toasts, exporter) = setup();
    ctx.fail_save.set(true);

    exporter.generate_dashboard_pdf("dashboard-content", None).await;

    assert_eq!(levels(&toasts), vec![ToastLevel::Info, ToastLevel::Error]);
    assert!(!exporter.is_in_progress());
}

#[tokio::test]
async fn progress_listener_sees_raise_and_clear() {
    let (_ctx, _toasts, exporter) = setup();
    let seen = Rc::new(RefCell::new(Vec::new()));
    {
        let seen = seen.clone();
        exporter.set_progress_listener(Rc::new(move |v: bool| seen.borrow_mut().push(v)));
    }
    exporter.generate_dashboard_pdf("missing", None).await;
    assert_eq!(*seen.borrow(), vec![true, false]);
}

#[test]
fn double_invocation_is_not_prevented() {
    let (ctx, toasts, exporter) = setup();

    block_on(join(
        exporter.generate_dashboard_pdf("dashboard-content", None),
        exporter.generate_dashboard_pdf("dashboard-content", None),
    ));

    assert_eq!(ctx.saved.borrow().len(), 2);
    assert_eq!(toasts.snapshot().len(), 4);
    assert!(!exporter.is_in_progress());
}
