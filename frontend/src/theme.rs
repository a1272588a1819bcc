//! 品牌主题
//!
//! 与 `index.html` 中 Tailwind 配置的 `gritsee-orange` / `gritsee-dark` 保持一致。

pub const BRAND_ORANGE: &str = "#F27405";
pub const BRAND_DARK: &str = "#1A1A1A";
pub const FONT_FAMILY: &str = "Inter, sans-serif";

/// 根节点的内联样式
pub fn root_style() -> String {
    format!("font-family: {FONT_FAMILY}; --gritsee-orange: {BRAND_ORANGE}; --gritsee-dark: {BRAND_DARK};")
}
