use crate::auth::{login, use_auth};
use gritsee::error::ClientError;
use leptos::prelude::*;
use leptos::task::spawn_local;

fn login_error_message(err: &ClientError) -> String {
    match err {
        ClientError::Unauthorized => "Usuario o contraseña incorrectos".to_string(),
        ClientError::Network(_) => "No se pudo conectar con el servidor".to_string(),
        other => format!("Error al iniciar sesión: {}", other),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let (user, pass) = (username.get_untracked(), password.get_untracked());
        if user.is_empty() || pass.is_empty() {
            set_error_msg.set(Some("Completa todos los campos".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            // 成功后由路由服务监听认证状态并跳转首页
            if let Err(e) = login(&auth, user, pass).await {
                log::warn!("[Login] failed: {}", e);
                set_error_msg.set(Some(login_error_message(&e)));
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold text-gritsee-orange">"Gritsee AI"</h1>
                    <p class="text-base-content/70">"Inicia sesión para continuar"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">"Usuario"</span>
                            </label>
                            <input
                                id="username"
                                type="text"
                                autocomplete="username"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Contraseña"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                autocomplete="current-password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Ingresando..." }.into_any()
                                } else {
                                    "Ingresar".into_any()
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
