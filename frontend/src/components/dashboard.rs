use std::rc::Rc;

use crate::auth::use_auth;
use gritsee::export::ReportExporter;
use gritsee_shared::{DashboardResponse, GeneralSummary, IncidentsByDay, SamplesByHour};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 截图区域的元素 id
pub const DASHBOARD_ELEMENT_ID: &str = "dashboard-content";
const REPORT_TITLE: &str = "Reporte_Dashboard";

/// 报告导出上下文
#[derive(Clone, Copy)]
pub struct ReportContext {
    exporter: StoredValue<Rc<ReportExporter>, LocalStorage>,
    /// 导出进行中（按钮禁用）
    pub in_progress: RwSignal<bool>,
}

impl ReportContext {
    pub fn new(exporter: Rc<ReportExporter>) -> Self {
        let in_progress = RwSignal::new(exporter.is_in_progress());
        exporter.set_progress_listener(Rc::new(move |busy: bool| in_progress.set(busy)));
        Self {
            exporter: StoredValue::new_local(exporter),
            in_progress,
        }
    }

    pub fn export(&self, element_id: &'static str, title: &'static str) {
        let exporter = self.exporter.get_value();
        spawn_local(async move {
            exporter.generate_dashboard_pdf(element_id, Some(title)).await;
        });
    }
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

fn signed(value: Option<f64>) -> String {
    match value {
        Some(v) if v > 0.0 => format!("+{:.1}", v),
        Some(v) => format!("{:.1}", v),
        None => "-".to_string(),
    }
}

#[component]
fn SummaryStats(summary: GeneralSummary) -> impl IntoView {
    view! {
        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <div class="stat">
                <div class="stat-title">"Muestras"</div>
                <div class="stat-value text-gritsee-orange">{summary.total_muestras}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Correctas"</div>
                <div class="stat-value text-success">{summary.pizzas_correctas}</div>
                <div class="stat-desc">{percent(summary.porcentaje_correctas)}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Incorrectas"</div>
                <div class="stat-value text-error">{summary.pizzas_incorrectas}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Calificación promedio"</div>
                <div class="stat-value">{format!("{:.2}", summary.calificacion_promedio)}</div>
            </div>
        </div>
        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <div class="stat">
                <div class="stat-title">"Burbujas"</div>
                <div class="stat-value text-lg">{summary.pizzas_con_burbujas}</div>
                <div class="stat-desc">{percent(summary.porcentaje_burbujas)}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Grasa"</div>
                <div class="stat-value text-lg">{summary.pizzas_con_grasa}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Bordes sucios"</div>
                <div class="stat-value text-lg">{summary.pizzas_bordes_sucios}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Distribución deficiente"</div>
                <div class="stat-value text-lg">{summary.distribucion_deficiente}</div>
                <div class="stat-desc">{percent(summary.porcentaje_distribucion_deficiente)}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Distribución mala"</div>
                <div class="stat-value text-lg">{summary.distribucion_mala}</div>
                <div class="stat-desc">{percent(summary.porcentaje_distribucion_mala)}</div>
            </div>
        </div>
    }
}

#[component]
fn HoursTable(rows: Vec<SamplesByHour>) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h2 class="card-title">"Horas con más muestras"</h2>
                <table class="table table-zebra">
                    <thead>
                        <tr><th>"Hora"</th><th>"Muestras"</th><th>"Correctas"</th><th>"Incorrectas"</th><th>"Promedio"</th></tr>
                    </thead>
                    <tbody>
                        {rows
                            .into_iter()
                            .map(|row| view! {
                                <tr>
                                    <td>{format!("{:02}:00", row.hora)}</td>
                                    <td>{row.cantidad_muestras}</td>
                                    <td>{row.pizzas_correctas}</td>
                                    <td>{row.pizzas_incorrectas}</td>
                                    <td>{format!("{:.2}", row.calificacion_promedio)}</td>
                                </tr>
                            })
                            .collect_view()}
                    </tbody>
                </table>
            </div>
        </div>
    }
}

#[component]
fn IncidentsTable(rows: Vec<IncidentsByDay>) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h2 class="card-title">"Días con más incidentes"</h2>
                <table class="table table-zebra">
                    <thead>
                        <tr><th>"Fecha"</th><th>"Muestras"</th><th>"Incidentes"</th><th>"%"</th></tr>
                    </thead>
                    <tbody>
                        {rows
                            .into_iter()
                            .map(|row| view! {
                                <tr>
                                    <td>{row.fecha.format("%d/%m/%Y").to_string()}</td>
                                    <td>{row.total_muestras}</td>
                                    <td>{row.total_incidentes}</td>
                                    <td>{percent(row.porcentaje_incidentes)}</td>
                                </tr>
                            })
                            .collect_view()}
                    </tbody>
                </table>
            </div>
        </div>
    }
}

#[component]
fn DashboardBody(data: DashboardResponse) -> impl IntoView {
    let weekly = data.comparacion_semanal.clone().map(|w| {
        view! {
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title">"Comparación semanal"</h2>
                    <div class="grid grid-cols-2 md:grid-cols-5 gap-4 text-center">
                        <div><div class="text-sm opacity-70">"Correctas"</div><div class="font-bold">{signed(w.diferencial_correctas)}</div></div>
                        <div><div class="text-sm opacity-70">"Promedio"</div><div class="font-bold">{signed(w.diferencial_promedio)}</div></div>
                        <div><div class="text-sm opacity-70">"Burbujas"</div><div class="font-bold">{signed(w.diferencial_burbujas)}</div></div>
                        <div><div class="text-sm opacity-70">"Dist. deficiente"</div><div class="font-bold">{signed(w.diferencial_dist_deficiente)}</div></div>
                        <div><div class="text-sm opacity-70">"Dist. mala"</div><div class="font-bold">{signed(w.diferencial_dist_mala)}</div></div>
                    </div>
                </div>
            </div>
        }
    });

    let location = data.por_locacion.clone().map(|loc| {
        view! {
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title">{format!("Locación: {}", loc.locacion)}</h2>
                    <p class="text-sm opacity-70">
                        {format!(
                            "{} - {}",
                            loc.periodo_inicio.format("%d/%m/%Y"),
                            loc.periodo_fin.format("%d/%m/%Y"),
                        )}
                    </p>
                    <SummaryStats summary=loc.resumen />
                </div>
            </div>
        }
    });

    view! {
        <SummaryStats summary=data.resumen_general />
        {weekly}
        {location}
        <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
            <HoursTable rows=data.top_5_horas_muestras />
            <IncidentsTable rows=data.top_5_dias_incidentes />
        </div>
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let report = expect_context::<ReportContext>();

    let (data, set_data) = signal(Option::<DashboardResponse>::None);
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (location, set_location) = signal(String::new());

    let load_summary = move || {
        let api = auth.services().api.clone();
        let filter = location.get_untracked().trim().to_string();
        set_loading.set(true);
        spawn_local(async move {
            let filter = (!filter.is_empty()).then_some(filter);
            match api.dashboard_summary(filter.as_deref()).await {
                Ok(summary) => {
                    set_error_msg.set(None);
                    set_data.set(Some(summary));
                }
                Err(e) => {
                    log::error!("[Dashboard] failed to load summary: {}", e);
                    set_error_msg.set(Some(format!("No se pudo cargar el resumen: {}", e)));
                }
            }
            set_loading.set(false);
        });
    };

    // 初始加载
    load_summary();

    let on_filter = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        load_summary();
    };

    let on_export = move |_| report.export(DASHBOARD_ELEMENT_ID, REPORT_TITLE);

    view! {
        <div class="space-y-6">
            <div class="flex flex-col md:flex-row md:items-center justify-between gap-4">
                <h1 class="text-2xl font-bold">"Resumen"</h1>
                <div class="flex gap-2">
                    <form class="join" on:submit=on_filter>
                        <input
                            type="text"
                            placeholder="Locación"
                            class="input input-bordered join-item"
                            on:input=move |ev| set_location.set(event_target_value(&ev))
                            prop:value=location
                        />
                        <button class="btn join-item" type="submit">"Filtrar"</button>
                    </form>
                    <button
                        class="btn bg-gritsee-orange text-white"
                        on:click=on_export
                        disabled=move || report.in_progress.get() || data.with(Option::is_none)
                    >
                        {move || if report.in_progress.get() {
                            view! { <span class="loading loading-spinner"></span> "Generando..." }.into_any()
                        } else {
                            "Exportar PDF".into_any()
                        }}
                    </button>
                </div>
            </div>

            <Show when=move || error_msg.get().is_some()>
                <div role="alert" class="alert alert-error">
                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                </div>
            </Show>

            <div id=DASHBOARD_ELEMENT_ID class="space-y-6 bg-base-200">
                {move || {
                    if loading.get() && data.with(Option::is_none) {
                        view! {
                            <div class="flex justify-center py-16">
                                <span class="loading loading-spinner loading-lg text-primary"></span>
                            </div>
                        }
                        .into_any()
                    } else {
                        match data.get() {
                            Some(summary) => view! { <DashboardBody data=summary /> }.into_any(),
                            None => view! { <p class="text-center opacity-70 py-16">"Sin datos"</p> }.into_any(),
                        }
                    }
                }}
            </div>
        </div>
    }
}
