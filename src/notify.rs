//! 用户可见的提示消息（Toast）

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use uuid::Uuid;

// =========================================================
// 显示选项 (Toast Options)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastPosition {
    #[default]
    TopRight,
    TopLeft,
    BottomRight,
    BottomLeft,
}

impl ToastPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastPosition::TopRight => "top-right",
            ToastPosition::TopLeft => "top-left",
            ToastPosition::BottomRight => "bottom-right",
            ToastPosition::BottomLeft => "bottom-left",
        }
    }
}

/// 提示框的全局显示选项
#[derive(Debug, Clone, PartialEq)]
pub struct ToastOptions {
    pub position: ToastPosition,
    pub timeout: Duration,
    pub close_on_click: bool,
    pub pause_on_focus_loss: bool,
    pub pause_on_hover: bool,
    pub draggable: bool,
    pub draggable_percent: f32,
    pub show_close_button_on_hover: bool,
    pub hide_progress_bar: bool,
    pub close_button: bool,
    pub icon: bool,
    pub rtl: bool,
}

impl Default for ToastOptions {
    fn default() -> Self {
        Self {
            position: ToastPosition::TopRight,
            timeout: Duration::from_millis(3000),
            close_on_click: true,
            pause_on_focus_loss: true,
            pause_on_hover: true,
            draggable: true,
            draggable_percent: 0.6,
            show_close_button_on_hover: false,
            hide_progress_bar: false,
            close_button: true,
            icon: true,
            rtl: false,
        }
    }
}

// =========================================================
// 消息 (Toast)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub level: ToastLevel,
    pub message: String,
}

/// 提示消息的发布端
pub trait Notifier {
    fn notify(&self, level: ToastLevel, message: &str) -> Uuid;

    fn info(&self, message: &str) -> Uuid {
        self.notify(ToastLevel::Info, message)
    }

    fn success(&self, message: &str) -> Uuid {
        self.notify(ToastLevel::Success, message)
    }

    fn error(&self, message: &str) -> Uuid {
        self.notify(ToastLevel::Error, message)
    }
}

type ToastListener = Rc<dyn Fn(&[Toast])>;

/// 内存中的提示队列
///
/// 按发布顺序保存当前可见的提示；UI 通过监听器同步到自己的状态。
#[derive(Default)]
pub struct ToastQueue {
    toasts: RefCell<VecDeque<Toast>>,
    listener: RefCell<Option<ToastListener>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册唯一的变更监听器（后注册的覆盖先注册的）
    pub fn set_listener(&self, listener: ToastListener) {
        *self.listener.borrow_mut() = Some(listener);
        self.emit();
    }

    pub fn snapshot(&self) -> Vec<Toast> {
        self.toasts.borrow().iter().cloned().collect()
    }

    /// 关闭指定提示，返回是否存在
    pub fn dismiss(&self, id: Uuid) -> bool {
        let removed = {
            let mut toasts = self.toasts.borrow_mut();
            let before = toasts.len();
            toasts.retain(|t| t.id != id);
            toasts.len() != before
        };
        if removed {
            self.emit();
        }
        removed
    }

    fn emit(&self) {
        // 先克隆出监听器和快照，避免回调中重入时持有借用
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            let snapshot = self.snapshot();
            listener(&snapshot);
        }
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, level: ToastLevel, message: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.toasts.borrow_mut().push_back(Toast {
            id,
            level,
            message: message.to_string(),
        });
        self.emit();
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn options_default_to_three_seconds_top_right() {
        let opts = ToastOptions::default();
        assert_eq!(opts.position.as_str(), "top-right");
        assert_eq!(opts.timeout, Duration::from_secs(3));
        assert!(opts.close_on_click);
        assert!(!opts.rtl);
    }

    #[test]
    fn queue_keeps_publish_order() {
        let queue = ToastQueue::new();
        queue.info("a");
        queue.success("b");
        queue.error("c");
        let levels: Vec<ToastLevel> = queue.snapshot().iter().map(|t| t.level).collect();
        assert_eq!(
            levels,
            vec![ToastLevel::Info, ToastLevel::Success, ToastLevel::Error]
        );
    }

    #[test]
    fn dismiss_removes_only_the_target() {
        let queue = ToastQueue::new();
        let first = queue.info("first");
        queue.info("second");
        assert!(queue.dismiss(first));
        assert!(!queue.dismiss(first));
        assert_eq!(queue.snapshot().len(), 1);
        assert_eq!(queue.snapshot()[0].message, "second");
    }

    #[test]
    fn listener_sees_every_change() {
        let queue = ToastQueue::new();
        let calls = Rc::new(Cell::new(0));
        let last_len = Rc::new(Cell::new(0));
        {
            let calls = calls.clone();
            let last_len = last_len.clone();
            queue.set_listener(Rc::new(move |toasts: &[Toast]| {
                calls.set(calls.get() + 1);
                last_len.set(toasts.len());
            }));
        }
        let id = queue.info("x");
        queue.dismiss(id);
        // dismissing an unknown id is silent
        queue.dismiss(id);
        // set_listener + notify + dismiss
        assert_eq!(calls.get(), 3);
        assert_eq!(last_len.get(), 0);
    }
}
