//! # Scope 模块
//!
//! 组件树的"提供者"边界：按类型存放共享服务，子作用域向上查找。
//!
//! `use_context` 在值未被提供时直接 panic，
//! 这属于接线错误，应当在开发期立刻暴露。

use std::any::{Any, TypeId, type_name};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// 作用域
#[derive(Default)]
pub struct Scope {
    parent: Option<Rc<Scope>>,
    values: RefCell<HashMap<TypeId, Rc<dyn Any>>>,
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("values", &self.values.borrow().len())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

impl Scope {
    /// 根作用域
    pub fn root() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// 子作用域
    pub fn child(self: &Rc<Self>) -> Rc<Self> {
        Rc::new(Self {
            parent: Some(self.clone()),
            values: RefCell::new(HashMap::new()),
        })
    }

    /// 在当前作用域提供一个值，同类型的旧值被覆盖
    pub fn provide<T: 'static>(&self, value: Rc<T>) {
        self.values.borrow_mut().insert(TypeId::of::<T>(), value);
    }

    /// 查找值，未提供时返回 `None`
    pub fn try_use_context<T: 'static>(&self) -> Option<Rc<T>> {
        let found = self.values.borrow().get(&TypeId::of::<T>()).cloned();
        match found {
            Some(value) => value.downcast::<T>().ok(),
            None => self.parent.as_ref()?.try_use_context::<T>(),
        }
    }

    /// 查找值
    ///
    /// # Panics
    /// 当前作用域及所有祖先都未提供该类型时 panic。
    pub fn use_context<T: 'static>(&self) -> Rc<T> {
        self.try_use_context::<T>().unwrap_or_else(|| {
            panic!(
                "{} 未在当前作用域中提供，请在上层作用域调用 provide",
                type_name::<T>()
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Theme(&'static str);

    #[test]
    fn test_child_sees_parent_values() {
        let root = Scope::root();
        root.provide(Rc::new(Theme("dark")));

        let child = root.child();
        assert_eq!(*child.use_context::<Theme>(), Theme("dark"));
    }

    #[test]
    fn test_child_overrides_parent() {
        let root = Scope::root();
        root.provide(Rc::new(Theme("dark")));
        let child = root.child();
        child.provide(Rc::new(Theme("light")));

        assert_eq!(*child.use_context::<Theme>(), Theme("light"));
        assert_eq!(*root.use_context::<Theme>(), Theme("dark"));
    }

    #[test]
    fn test_missing_value() {
        let root = Scope::root();
        assert!(root.try_use_context::<Theme>().is_none());
    }

    #[test]
    #[should_panic(expected = "未在当前作用域中提供")]
    fn test_use_context_panics_when_missing() {
        Scope::root().use_context::<Theme>();
    }
}
