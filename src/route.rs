//! 路由定义模块 - 领域模型
//!
//! 纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 路由表是静态配置，运行时不可变；守卫只读取其中的元信息。

use std::fmt::Display;

/// 路由元信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteMeta {
    /// 需要已认证的会话
    pub requires_auth: bool,
    /// 仅供未登录用户访问（如登录页）
    pub guest: bool,
}

/// 路由描述
#[derive(Debug, PartialEq, Eq)]
pub struct RouteRecord {
    pub path: &'static str,
    pub name: Option<&'static str>,
    /// 叶子路由对应的页面
    pub route: Option<AppRoute>,
    pub meta: RouteMeta,
    pub children: &'static [RouteRecord],
}

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面
    Login,
    /// 控制面板 (需要认证)
    #[default]
    Dashboard,
    /// 批量上传 (需要认证)
    Upload,
    /// 检测历史 (需要认证)
    History,
    /// 页面未找到
    NotFound,
}

/// 应用路由表
pub static ROUTES: &[RouteRecord] = &[
    RouteRecord {
        path: "/login",
        name: Some("login"),
        route: Some(AppRoute::Login),
        meta: RouteMeta {
            requires_auth: false,
            guest: true,
        },
        children: &[],
    },
    RouteRecord {
        path: "/",
        name: None,
        route: None,
        meta: RouteMeta {
            requires_auth: true,
            guest: false,
        },
        children: &[
            RouteRecord {
                path: "",
                name: Some("dashboard"),
                route: Some(AppRoute::Dashboard),
                meta: RouteMeta {
                    requires_auth: false,
                    guest: false,
                },
                children: &[],
            },
            RouteRecord {
                path: "carga",
                name: Some("upload"),
                route: Some(AppRoute::Upload),
                meta: RouteMeta {
                    requires_auth: false,
                    guest: false,
                },
                children: &[],
            },
            RouteRecord {
                path: "historial",
                name: Some("history"),
                route: Some(AppRoute::History),
                meta: RouteMeta {
                    requires_auth: false,
                    guest: false,
                },
                children: &[],
            },
        ],
    },
];

/// 一次路由匹配的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: AppRoute,
    /// 从根到叶子的匹配链
    pub matched: Vec<&'static RouteRecord>,
}

impl RouteMatch {
    /// **核心守卫逻辑：链上任意一条记录需要认证即需要认证**
    pub fn requires_auth(&self) -> bool {
        self.matched.iter().any(|r| r.meta.requires_auth)
    }

    /// 链上任意一条记录标记为访客页
    pub fn is_guest(&self) -> bool {
        self.matched.iter().any(|r| r.meta.guest)
    }
}

impl AppRoute {
    /// 将 URL path 解析为路由（忽略查询串、锚点和末尾的 `/`）
    pub fn resolve(path: &str) -> RouteMatch {
        let path = normalize(path);
        let mut chain = Vec::new();
        if let Some(route) = match_records(ROUTES, "", &path, &mut chain) {
            return RouteMatch {
                route,
                matched: chain,
            };
        }
        RouteMatch {
            route: AppRoute::NotFound,
            matched: Vec::new(),
        }
    }

    pub fn from_path(path: &str) -> Self {
        Self::resolve(path).route
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/",
            Self::Upload => "/carga",
            Self::History => "/historial",
            Self::NotFound => "/404",
        }
    }
}

/// 两个地址是否指向同一页面（忽略查询串、锚点和末尾的 `/`）
pub fn same_location(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn join(parent: &str, child: &str) -> String {
    if child.starts_with('/') {
        return normalize(child);
    }
    normalize(&format!("{}/{}", parent.trim_end_matches('/'), child))
}

fn match_records(
    records: &'static [RouteRecord],
    parent: &str,
    path: &str,
    chain: &mut Vec<&'static RouteRecord>,
) -> Option<AppRoute> {
    for record in records {
        let full = join(parent, record.path);
        chain.push(record);
        if let Some(route) = match_records(record.children, &full, path, chain) {
            return Some(route);
        }
        if full == path {
            if let Some(route) = record.route {
                return Some(route);
            }
        }
        chain.pop();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_static_routes() {
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path("/carga"), AppRoute::Upload);
        assert_eq!(AppRoute::from_path("/historial"), AppRoute::History);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
    }

    #[test]
    fn ignores_query_and_trailing_slash() {
        assert_eq!(AppRoute::from_path("/historial/?id=4"), AppRoute::History);
        assert_eq!(AppRoute::from_path(""), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path("carga#top"), AppRoute::Upload);
    }

    #[test]
    fn children_inherit_auth_from_parent() {
        for path in ["/", "/carga", "/historial"] {
            let m = AppRoute::resolve(path);
            assert!(m.requires_auth(), "{path} should require auth");
            assert!(!m.is_guest());
            assert_eq!(m.matched.len(), 2);
            assert_eq!(m.matched[0].path, "/");
        }
    }

    #[test]
    fn login_is_guest_only() {
        let m = AppRoute::resolve("/login");
        assert!(m.is_guest());
        assert!(!m.requires_auth());
        assert_eq!(m.matched[0].name, Some("login"));
    }

    #[test]
    fn same_location_ignores_query_and_trailing_slash() {
        assert!(same_location("/login", "/login"));
        assert!(same_location("/login/?next=/carga", "/login"));
        assert!(same_location("", "/"));
        assert!(!same_location("/carga", "/login"));
    }

    #[test]
    fn unknown_path_has_no_meta() {
        let m = AppRoute::resolve("/admin");
        assert!(m.matched.is_empty());
        assert!(!m.requires_auth());
        assert!(!m.is_guest());
    }

    #[test]
    fn paths_roundtrip_through_resolver() {
        for route in [
            AppRoute::Login,
            AppRoute::Dashboard,
            AppRoute::Upload,
            AppRoute::History,
        ] {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
    }
}
