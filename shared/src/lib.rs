//! Gritsee 前后端共享的数据契约
//!
//! 这里的类型与后端 REST 接口的 JSON 结构一一对应，
//! 客户端只做透传和展示，不做业务校验。

use serde::{Deserialize, Serialize};

pub mod date;

pub use date::{display_date, iso_date};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const PATH_AUTH_ME: &str = "/api/v1/auth/me";
pub const PATH_AUTH_LOGOUT: &str = "/api/v1/auth/logout";
pub const PATH_AUTH_TOKEN: &str = "/api/v1/auth/token";
pub const PATH_DASHBOARD_SUMMARY: &str = "/api/v1/dashboard/resumen";
pub const PATH_BATCH_UPLOAD: &str = "/api/v1/inspecciones/batch-upload";

// =========================================================
// 用户 (User)
// =========================================================

/// 当前用户的公开资料
///
/// 后端定义的不透明记录：客户端只依赖 `username` 和 `is_active`，
/// 其余字段原样保存在 `extra` 中，持久化时不会丢失。
/// 永远不包含凭据，凭据只存在于 HttpOnly Cookie。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub is_active: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    pub fn new(username: impl Into<String>, is_active: bool) -> Self {
        Self {
            username: username.into(),
            is_active,
            extra: serde_json::Map::new(),
        }
    }
}

/// `POST /api/v1/auth/token` 的响应体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: UserProfile,
}

// =========================================================
// 检测结果 (Inspection)
// =========================================================

/// 检测结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "FAIL")]
    Fail,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
        }
    }

    /// 解析表单值，空字符串表示不过滤
    pub fn from_form_value(value: &str) -> Option<Self> {
        match value {
            "PASS" => Some(Verdict::Pass),
            "FAIL" => Some(Verdict::Fail),
            _ => None,
        }
    }
}

/// `POST /api/v1/inspecciones/batch-upload` 的响应体
///
/// `detalle` 中每一项的结构由后端决定，这里保持不透明。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchUploadResponse {
    pub status: String,
    pub total_procesados: u64,
    #[serde(default)]
    pub detalle: Vec<serde_json::Value>,
}

// =========================================================
// 仪表盘 (Dashboard)
// =========================================================

/// 全局统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSummary {
    pub total_muestras: u64,
    pub pizzas_correctas: u64,
    pub pizzas_incorrectas: u64,
    pub porcentaje_correctas: f64,
    pub calificacion_promedio: f64,

    pub pizzas_con_burbujas: u64,
    pub pizzas_con_grasa: u64,
    pub pizzas_bordes_sucios: u64,
    pub distribucion_deficiente: u64,
    pub distribucion_mala: u64,

    pub porcentaje_burbujas: f64,
    pub porcentaje_distribucion_deficiente: f64,
    pub porcentaje_distribucion_mala: f64,
}

/// 本周与上周对比
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyComparison {
    pub semana_actual: GeneralSummary,
    #[serde(default)]
    pub semana_anterior: Option<GeneralSummary>,
    #[serde(default)]
    pub diferencial_correctas: Option<f64>,
    #[serde(default)]
    pub diferencial_promedio: Option<f64>,
    #[serde(default)]
    pub diferencial_burbujas: Option<f64>,
    #[serde(default)]
    pub diferencial_dist_deficiente: Option<f64>,
    #[serde(default)]
    pub diferencial_dist_mala: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplesByHour {
    pub hora: u8,
    pub cantidad_muestras: u64,
    pub pizzas_correctas: u64,
    pub pizzas_incorrectas: u64,
    pub calificacion_promedio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentsByDay {
    pub fecha: chrono::NaiveDateTime,
    pub total_muestras: u64,
    pub total_incidentes: u64,
    pub porcentaje_incidentes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSummary {
    pub locacion: String,
    pub periodo_inicio: chrono::NaiveDateTime,
    pub periodo_fin: chrono::NaiveDateTime,
    pub resumen: GeneralSummary,
    pub top_horas_muestras: Vec<SamplesByHour>,
    pub top_dias_incidentes: Vec<IncidentsByDay>,
}

/// `GET /api/v1/dashboard/resumen` 的响应体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub resumen_general: GeneralSummary,
    #[serde(default)]
    pub comparacion_semanal: Option<WeeklyComparison>,
    pub top_5_horas_muestras: Vec<SamplesByHour>,
    pub top_5_dias_incidentes: Vec<IncidentsByDay>,
    #[serde(default)]
    pub por_locacion: Option<LocationSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_profile_keeps_unknown_fields() {
        let raw = json!({ "username": "ana", "is_active": true, "role": "qa" });
        let profile: UserProfile = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(profile.username, "ana");
        assert!(profile.is_active);
        assert_eq!(serde_json::to_value(&profile).unwrap(), raw);
    }

    #[test]
    fn verdict_form_values() {
        assert_eq!(Verdict::from_form_value("PASS"), Some(Verdict::Pass));
        assert_eq!(Verdict::from_form_value("FAIL"), Some(Verdict::Fail));
        assert_eq!(Verdict::from_form_value(""), None);
        assert_eq!(serde_json::to_value(Verdict::Fail).unwrap(), json!("FAIL"));
    }

    #[test]
    fn dashboard_response_optional_sections() {
        let summary = json!({
            "total_muestras": 10, "pizzas_correctas": 8, "pizzas_incorrectas": 2,
            "porcentaje_correctas": 80.0, "calificacion_promedio": 91.5,
            "pizzas_con_burbujas": 1, "pizzas_con_grasa": 0, "pizzas_bordes_sucios": 1,
            "distribucion_deficiente": 0, "distribucion_mala": 0,
            "porcentaje_burbujas": 10.0, "porcentaje_distribucion_deficiente": 0.0,
            "porcentaje_distribucion_mala": 0.0
        });
        let raw = json!({
            "resumen_general": summary,
            "top_5_horas_muestras": [],
            "top_5_dias_incidentes": [{
                "fecha": "2024-05-02T00:00:00", "total_muestras": 4,
                "total_incidentes": 1, "porcentaje_incidentes": 25.0
            }]
        });
        let resp: DashboardResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(resp.resumen_general.total_muestras, 10);
        assert!(resp.comparacion_semanal.is_none());
        assert!(resp.por_locacion.is_none());
        assert_eq!(resp.top_5_dias_incidentes[0].total_incidentes, 1);
    }
}
