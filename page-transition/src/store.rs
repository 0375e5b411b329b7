//! # Store 模块
//!
//! 过渡状态存储：默认效果 + 当前导航使用的效果。
//!
//! 单槽位、后写覆盖，不保留历史，也不发事件。

use std::cell::Cell;

use crate::catalogue::TransitionKind;

/// 过渡状态存储
#[derive(Debug, Default)]
pub struct TransitionStore {
    default_kind: Cell<TransitionKind>,
    active: Cell<Option<TransitionKind>>,
}

impl TransitionStore {
    pub fn new(default_kind: TransitionKind) -> Self {
        Self {
            default_kind: Cell::new(default_kind),
            active: Cell::new(None),
        }
    }

    pub fn set_default(&self, kind: TransitionKind) {
        self.default_kind.set(kind);
    }

    pub fn default_kind(&self) -> TransitionKind {
        self.default_kind.get()
    }

    /// 记录（或清除）进行中导航的效果
    pub fn set_active(&self, kind: Option<TransitionKind>) {
        self.active.set(kind);
    }

    pub fn active(&self) -> Option<TransitionKind> {
        self.active.get()
    }

    /// 当前应使用的效果：进行中的优先，否则默认
    pub fn resolve(&self) -> TransitionKind {
        self.active().unwrap_or_else(|| self.default_kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_active() {
        let store = TransitionStore::new(TransitionKind::RotateScale);
        assert_eq!(store.resolve(), TransitionKind::RotateScale);

        store.set_active(Some(TransitionKind::DoorSwing));
        assert_eq!(store.resolve(), TransitionKind::DoorSwing);

        store.set_active(None);
        assert_eq!(store.resolve(), TransitionKind::RotateScale);
    }

    #[test]
    fn test_last_write_wins() {
        let store = TransitionStore::default();
        store.set_active(Some(TransitionKind::Flip));
        store.set_active(Some(TransitionKind::Swirl));
        assert_eq!(store.active(), Some(TransitionKind::Swirl));

        store.set_default(TransitionKind::Overlay);
        assert_eq!(store.default_kind(), TransitionKind::Overlay);
    }
}
