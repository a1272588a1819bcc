//! 全局提示框
//!
//! `ToastQueue` 是唯一的数据源，这里负责渲染和按超时自动关闭。

use std::rc::Rc;

use gritsee::notify::{Notifier, Toast, ToastLevel, ToastOptions, ToastPosition, ToastQueue};
use leptos::prelude::*;
use uuid::Uuid;

/// 带自动关闭的通知发布端
pub struct TimedNotifier {
    queue: Rc<ToastQueue>,
    options: ToastOptions,
}

impl TimedNotifier {
    pub fn new(queue: Rc<ToastQueue>, options: ToastOptions) -> Self {
        Self { queue, options }
    }
}

impl Notifier for TimedNotifier {
    fn notify(&self, level: ToastLevel, message: &str) -> Uuid {
        let id = self.queue.notify(level, message);
        let queue = self.queue.clone();
        set_timeout(
            move || {
                queue.dismiss(id);
            },
            self.options.timeout,
        );
        id
    }
}

/// 提示框上下文
#[derive(Clone, Copy)]
pub struct ToastContext {
    queue: StoredValue<Rc<ToastQueue>, LocalStorage>,
    toasts: RwSignal<Vec<Toast>>,
    options: StoredValue<ToastOptions>,
}

impl ToastContext {
    pub fn new(queue: Rc<ToastQueue>, options: ToastOptions) -> Self {
        let toasts = RwSignal::new(queue.snapshot());
        queue.set_listener(Rc::new(move |current: &[Toast]| toasts.set(current.to_vec())));
        Self {
            queue: StoredValue::new_local(queue),
            toasts,
            options: StoredValue::new(options),
        }
    }

    fn dismiss(&self, id: Uuid) {
        self.queue.with_value(|q| q.dismiss(id));
    }
}

fn position_class(position: ToastPosition) -> &'static str {
    match position {
        ToastPosition::TopLeft => "toast-top toast-start",
        ToastPosition::TopRight => "toast-top toast-end",
        ToastPosition::BottomLeft => "toast-bottom toast-start",
        ToastPosition::BottomRight => "toast-bottom toast-end",
    }
}

fn level_class(level: ToastLevel) -> &'static str {
    match level {
        ToastLevel::Info => "alert alert-info shadow-lg",
        ToastLevel::Success => "alert alert-success shadow-lg",
        ToastLevel::Error => "alert alert-error shadow-lg",
    }
}

#[component]
pub fn ToastHost(ctx: ToastContext) -> impl IntoView {
    let options = ctx.options.get_value();
    let container = format!("toast {} z-50", position_class(options.position));
    let close_on_click = options.close_on_click;

    view! {
        <div class=container>
            <For
                each=move || ctx.toasts.get()
                key=|toast| toast.id
                children=move |toast: Toast| {
                    let id = toast.id;
                    view! {
                        <div
                            class=level_class(toast.level)
                            on:click=move |_| {
                                if close_on_click {
                                    ctx.dismiss(id);
                                }
                            }
                        >
                            <span>{toast.message}</span>
                        </div>
                    }
                }
            />
        </div>
    }
}
