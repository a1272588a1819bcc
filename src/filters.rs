//! 历史记录页的过滤条件

use std::cell::RefCell;

use chrono::NaiveDate;
use gritsee_shared::Verdict;
use serde::{Deserialize, Serialize};

/// 过滤条件
///
/// 字符串字段为空表示不过滤。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistoryFilters {
    pub id: String,
    #[serde(rename = "locacion")]
    pub location: String,
    #[serde(rename = "estado", with = "verdict_or_empty")]
    pub verdict: Option<Verdict>,
    #[serde(rename = "fecha_inicio")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "fecha_fin")]
    pub end_date: Option<NaiveDate>,
}

impl HistoryFilters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// 局部更新：只有 `Some` 的字段会被覆盖
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub id: Option<String>,
    pub location: Option<String>,
    pub verdict: Option<Option<Verdict>>,
    pub start_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
}

#[derive(Debug, Default)]
pub struct HistoryStore {
    filters: RefCell<HistoryFilters>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(&self) -> HistoryFilters {
        self.filters.borrow().clone()
    }

    /// 合并新的过滤条件
    pub fn set_filters(&self, patch: FilterPatch) {
        let mut filters = self.filters.borrow_mut();
        if let Some(id) = patch.id {
            filters.id = id;
        }
        if let Some(location) = patch.location {
            filters.location = location;
        }
        if let Some(verdict) = patch.verdict {
            filters.verdict = verdict;
        }
        if let Some(start) = patch.start_date {
            filters.start_date = start;
        }
        if let Some(end) = patch.end_date {
            filters.end_date = end;
        }
    }

    /// 清空全部过滤条件
    pub fn clear_filters(&self) {
        *self.filters.borrow_mut() = HistoryFilters::default();
    }
}

// 表单里用空字符串表示"全部"
mod verdict_or_empty {
    use gritsee_shared::Verdict;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Verdict>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.map(|v| v.as_str()).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Verdict>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.as_deref().and_then(Verdict::from_form_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn populated() -> HistoryStore {
        let store = HistoryStore::new();
        store.set_filters(FilterPatch {
            id: Some("42".into()),
            location: Some("Molino".into()),
            verdict: Some(Some(Verdict::Fail)),
            start_date: Some(NaiveDate::from_ymd_opt(2024, 1, 1)),
            end_date: None,
        });
        store
    }

    #[test]
    fn patch_merges_only_given_fields() {
        let store = populated();
        store.set_filters(FilterPatch {
            location: Some("Centro".into()),
            ..Default::default()
        });
        let f = store.filters();
        assert_eq!(f.id, "42");
        assert_eq!(f.location, "Centro");
        assert_eq!(f.verdict, Some(Verdict::Fail));
    }

    #[test]
    fn patch_can_unset_optional_fields() {
        let store = populated();
        store.set_filters(FilterPatch {
            verdict: Some(None),
            start_date: Some(None),
            ..Default::default()
        });
        let f = store.filters();
        assert_eq!(f.verdict, None);
        assert_eq!(f.start_date, None);
    }

    #[test]
    fn clear_is_idempotent() {
        let store = populated();
        store.clear_filters();
        let once = store.filters();
        store.clear_filters();
        assert_eq!(store.filters(), once);
        assert!(once.is_empty());
    }

    #[test]
    fn serializes_with_backend_field_names() {
        let store = populated();
        let value = serde_json::to_value(store.filters()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "42",
                "locacion": "Molino",
                "estado": "FAIL",
                "fecha_inicio": "2024-01-01",
                "fecha_fin": null
            })
        );
        let empty = serde_json::to_value(HistoryFilters::default()).unwrap();
        assert_eq!(empty["estado"], json!(""));
    }

    #[test]
    fn empty_verdict_deserializes_to_none() {
        let f: HistoryFilters = serde_json::from_value(json!({
            "id": "", "locacion": "", "estado": "",
            "fecha_inicio": null, "fecha_fin": null
        }))
        .unwrap();
        assert!(f.is_empty());
    }
}
