use crate::auth::use_auth;
use gritsee::api::spreadsheet_content_type;
use gritsee_shared::BatchUploadResponse;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen_futures::JsFuture;

/// 读取选中文件的名称和内容
async fn read_file(file: web_sys::File) -> Result<(String, Vec<u8>), String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("{:?}", e))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok((file.name(), bytes))
}

#[component]
pub fn UploadPage() -> impl IntoView {
    let auth = use_auth();
    let file_input = NodeRef::<html::Input>::new();

    let (is_uploading, set_is_uploading) = signal(false);
    let (result, set_result) = signal(Option::<BatchUploadResponse>::None);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(file) = file_input
            .get_untracked()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0))
        else {
            set_error_msg.set(Some("Selecciona un archivo".to_string()));
            return;
        };

        if spreadsheet_content_type(&file.name()).is_none() {
            set_error_msg.set(Some("Solo se permiten archivos .csv o .xlsx".to_string()));
            return;
        }

        set_is_uploading.set(true);
        set_error_msg.set(None);
        set_result.set(None);

        let api = auth.services().api.clone();
        spawn_local(async move {
            let outcome = match read_file(file).await {
                Ok((name, bytes)) => api.upload_batch(&name, bytes).await.map_err(|e| e.to_string()),
                Err(e) => Err(format!("No se pudo leer el archivo: {}", e)),
            };
            match outcome {
                Ok(resp) => {
                    log::info!("[Upload] {} rows processed", resp.total_procesados);
                    set_result.set(Some(resp));
                }
                Err(e) => {
                    log::error!("[Upload] failed: {}", e);
                    set_error_msg.set(Some(format!("Error al subir el archivo: {}", e)));
                }
            }
            set_is_uploading.set(false);
        });
    };

    view! {
        <div class="card bg-base-100 shadow max-w-2xl">
            <form class="card-body gap-4" on:submit=on_submit>
                <h1 class="card-title">"Carga de inspecciones"</h1>
                <p class="text-sm opacity-70">"Archivos .csv o .xlsx"</p>

                <input
                    node_ref=file_input
                    type="file"
                    accept=".csv,.xlsx"
                    class="file-input file-input-bordered w-full"
                />

                <Show when=move || error_msg.get().is_some()>
                    <div role="alert" class="alert alert-error text-sm py-2">
                        <span>{move || error_msg.get().unwrap_or_default()}</span>
                    </div>
                </Show>

                {move || {
                    result
                        .get()
                        .map(|resp| {
                            view! {
                                <div role="alert" class="alert alert-success text-sm py-2">
                                    <span>
                                        {format!("{}: {} registros procesados", resp.status, resp.total_procesados)}
                                    </span>
                                </div>
                            }
                        })
                }}

                <div class="card-actions justify-end">
                    <button class="btn bg-gritsee-orange text-white" disabled=move || is_uploading.get()>
                        {move || if is_uploading.get() {
                            view! { <span class="loading loading-spinner"></span> "Subiendo..." }.into_any()
                        } else {
                            "Subir".into_any()
                        }}
                    </button>
                </div>
            </form>
        </div>
    }
}
