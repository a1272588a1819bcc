//! 本地键值存储抽象
//!
//! 浏览器中由 `localStorage` 实现，原生环境和测试使用 `MemoryStorage`。

use std::cell::RefCell;
use std::collections::HashMap;

/// 本地存储操作
///
/// 与 `localStorage` 的语义一致：同步、只存字符串、失败不抛出。
pub trait KeyValueStorage {
    /// 获取存储的字符串值，键不存在或发生错误时返回 None
    fn get(&self, key: &str) -> Option<String>;

    /// 设置存储值，返回操作是否成功
    fn set(&self, key: &str, value: &str) -> bool;

    /// 删除存储的键值对，返回操作是否成功
    fn delete(&self, key: &str) -> bool;
}

/// 进程内存储
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.entries.borrow_mut().remove(key);
        true
    }
}
