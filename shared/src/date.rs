//! 日期格式化
//!
//! - `iso_date`: `YYYY-MM-DD`，用于文件名
//! - `display_date`: `dd/mm/yyyy`，用于页面与报告页脚

use chrono::{DateTime, NaiveDate, Utc};

/// ISO 8601 日历日期（不含时间部分）
#[inline]
pub fn iso_date(at: &DateTime<Utc>) -> String {
    at.date_naive().format("%Y-%m-%d").to_string()
}

/// 面向用户的日期显示
#[inline]
pub fn display_date(at: &DateTime<Utc>) -> String {
    at.date_naive().format("%d/%m/%Y").to_string()
}

/// 解析 `<input type="date">` 的值，空字符串或非法值返回 None
pub fn parse_form_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_calendar_date_without_time() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 23, 59, 1).unwrap();
        assert_eq!(iso_date(&at), "2024-03-07");
        assert_eq!(display_date(&at), "07/03/2024");
    }

    #[test]
    fn form_date_parsing() {
        assert_eq!(
            parse_form_date("2024-12-31"),
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
        assert_eq!(parse_form_date(""), None);
        assert_eq!(parse_form_date("31/12/2024"), None);
    }
}
