use std::rc::Rc;

use gritsee::filters::{FilterPatch, HistoryFilters, HistoryStore};
use gritsee_shared::Verdict;
use gritsee_shared::date::parse_form_date;
use leptos::prelude::*;

/// 历史记录过滤条件上下文
///
/// 页面切换后条件保留，直到用户清空。
#[derive(Clone, Copy)]
pub struct HistoryContext {
    store: StoredValue<Rc<HistoryStore>, LocalStorage>,
    pub filters: RwSignal<HistoryFilters>,
}

impl HistoryContext {
    pub fn new(store: Rc<HistoryStore>) -> Self {
        let filters = RwSignal::new(store.filters());
        Self {
            store: StoredValue::new_local(store),
            filters,
        }
    }

    pub fn apply(&self, patch: FilterPatch) {
        self.store.with_value(|s| s.set_filters(patch));
        self.filters.set(self.store.with_value(|s| s.filters()));
    }

    pub fn clear(&self) {
        self.store.with_value(|s| s.clear_filters());
        self.filters.set(HistoryFilters::default());
    }
}

fn date_value(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

#[component]
pub fn HistoryPage() -> impl IntoView {
    let ctx = expect_context::<HistoryContext>();
    let filters = ctx.filters;

    let active_query = move || {
        let current = filters.get();
        if current.is_empty() {
            "Sin filtros".to_string()
        } else {
            serde_json::to_string(&current).unwrap_or_default()
        }
    };

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body gap-4">
                <h1 class="card-title">"Historial de inspecciones"</h1>

                <div class="grid grid-cols-1 md:grid-cols-5 gap-4">
                    <input
                        type="text"
                        placeholder="ID"
                        class="input input-bordered"
                        prop:value=move || filters.with(|f| f.id.clone())
                        on:change=move |ev| ctx.apply(FilterPatch {
                            id: Some(event_target_value(&ev)),
                            ..Default::default()
                        })
                    />
                    <input
                        type="text"
                        placeholder="Locación"
                        class="input input-bordered"
                        prop:value=move || filters.with(|f| f.location.clone())
                        on:change=move |ev| ctx.apply(FilterPatch {
                            location: Some(event_target_value(&ev)),
                            ..Default::default()
                        })
                    />
                    <select
                        class="select select-bordered"
                        prop:value=move || filters.with(|f| f.verdict.map(|v| v.as_str()).unwrap_or_default())
                        on:change=move |ev| ctx.apply(FilterPatch {
                            verdict: Some(Verdict::from_form_value(&event_target_value(&ev))),
                            ..Default::default()
                        })
                    >
                        <option value="">"Todos"</option>
                        <option value="PASS">"PASS"</option>
                        <option value="FAIL">"FAIL"</option>
                    </select>
                    <input
                        type="date"
                        class="input input-bordered"
                        prop:value=move || date_value(filters.with(|f| f.start_date))
                        on:change=move |ev| ctx.apply(FilterPatch {
                            start_date: Some(parse_form_date(&event_target_value(&ev))),
                            ..Default::default()
                        })
                    />
                    <input
                        type="date"
                        class="input input-bordered"
                        prop:value=move || date_value(filters.with(|f| f.end_date))
                        on:change=move |ev| ctx.apply(FilterPatch {
                            end_date: Some(parse_form_date(&event_target_value(&ev))),
                            ..Default::default()
                        })
                    />
                </div>

                <div class="flex items-center justify-between">
                    <code class="text-xs opacity-70">{active_query}</code>
                    <button class="btn btn-ghost btn-sm" on:click=move |_| ctx.clear()>
                        "Limpiar filtros"
                    </button>
                </div>
            </div>
        </div>
    }
}
