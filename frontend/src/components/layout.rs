use crate::auth::{logout, use_auth};
use crate::web::router::{Link, use_router};
use gritsee::route::AppRoute;
use leptos::prelude::*;
use leptos::task::spawn_local;

const NAV_ITEMS: [(AppRoute, &str); 3] = [
    (AppRoute::Dashboard, "Dashboard"),
    (AppRoute::Upload, "Carga"),
    (AppRoute::History, "Historial"),
];

/// 已登录页面的公共布局
#[component]
pub fn MainLayout(children: Children) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let username = move || auth.user.with(|u| u.as_ref().map(|u| u.username.clone()).unwrap_or_default());

    let on_logout = move |_| {
        spawn_local(async move {
            logout(&auth).await;
        });
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8">
            <div class="max-w-7xl mx-auto space-y-8">
                <div class="navbar bg-gritsee-dark text-white rounded-box shadow-xl">
                    <div class="flex-1 gap-4">
                        <span class="text-xl font-bold text-gritsee-orange px-2">"Gritsee AI"</span>
                        {NAV_ITEMS
                            .into_iter()
                            .map(|(route, label)| {
                                let class = move || {
                                    if router.current_route().get() == Some(route) {
                                        "btn btn-ghost btn-sm text-gritsee-orange"
                                    } else {
                                        "btn btn-ghost btn-sm"
                                    }
                                };
                                view! {
                                    <span class=class>
                                        <Link to=route.to_path()>{label}</Link>
                                    </span>
                                }
                            })
                            .collect_view()}
                    </div>
                    <div class="flex-none gap-2">
                        <span class="hidden md:inline-flex text-sm opacity-70">{username}</span>
                        <button on:click=on_logout class="btn btn-outline btn-error btn-sm">
                            "Cerrar sesión"
                        </button>
                    </div>
                </div>

                {children()}
            </div>
        </div>
    }
}

/// 页面未找到
#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center space-y-4">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl">"Página no encontrada"</p>
                <Link to=AppRoute::Dashboard.to_path() link_class="btn btn-primary">"Volver al inicio"</Link>
            </div>
        </div>
    }
}
