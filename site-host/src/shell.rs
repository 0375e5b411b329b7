//! # Shell 模块
//!
//! 平滑滚动外壳：拥有 `#smooth-wrapper` 和内容根节点，
//! 把当前路由对应的页面渲染进内容根节点。
//!
//! 路由变化时在路由的同步监听器里卸载旧内容（连同其上的补间）并挂载新页面，
//! 导航处理器醒来时看到的一定是新内容节点。
//! `mount_delay` 大于零时新页面改由 `run` 延迟挂载，用来模拟慢渲染。

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use page_transition::{Element, Location, PageTransitions};

use crate::pages::Page;

/// 外壳容器 id
pub const WRAPPER_ID: &str = "smooth-wrapper";

/// 平滑滚动外壳
#[derive(Debug)]
pub struct SmoothScrollShell {
    transitions: Rc<PageTransitions>,
    mount_delay: Duration,
    current: RefCell<Option<Rc<Element>>>,
}

impl SmoothScrollShell {
    pub fn new(transitions: Rc<PageTransitions>, mount_delay: Duration) -> Self {
        Self {
            transitions,
            mount_delay,
            current: RefCell::new(None),
        }
    }

    /// 注册路由监听器
    pub fn attach(self: &Rc<Self>) {
        let shell: Weak<Self> = Rc::downgrade(self);
        self.transitions.router().on_change(move |location| {
            if let Some(shell) = shell.upgrade() {
                shell.on_route(location);
            }
        });
    }

    fn on_route(&self, location: &Location) {
        self.unmount();
        if self.mount_delay.is_zero() {
            self.mount_location(location);
        }
    }

    /// 当前挂载的外壳容器
    pub fn current(&self) -> Option<Rc<Element>> {
        self.current.borrow().clone()
    }

    /// 构建外壳元素树
    pub fn render(&self, location: &Location) -> Rc<Element> {
        let page = Page::from_path(&location.pathname);
        let content = Element::new(self.transitions.config().content_root_id.clone())
            .with_class("smooth-content")
            .with_child(page.render(location.locale));
        let class = if location.locale.is_rtl() {
            "smooth-wrapper rtl"
        } else {
            "smooth-wrapper"
        };
        Rc::new(
            Element::new(WRAPPER_ID)
                .with_class(class)
                .with_child(Rc::new(content)),
        )
    }

    /// 挂载当前路由的页面
    pub fn mount(&self) -> Rc<Element> {
        let location = self.transitions.router().location();
        self.mount_location(&location)
    }

    fn mount_location(&self, location: &Location) -> Rc<Element> {
        self.unmount();
        let wrapper = self.render(location);
        self.transitions.document().append_to_body(wrapper.clone());
        tracing::debug!(href = %location, "页面已挂载");
        *self.current.borrow_mut() = Some(wrapper.clone());
        wrapper
    }

    /// 卸载当前页面，释放其上的补间
    pub fn unmount(&self) {
        let Some(old) = self.current.borrow_mut().take() else {
            return;
        };
        for node in old.descendants() {
            self.transitions.frames().release(&node);
        }
        self.transitions.document().unmount(WRAPPER_ID);
    }

    /// 延迟挂载任务，路由销毁时返回
    ///
    /// 没有挂载延迟时只是空转。延迟期间路由又变了就放弃这次挂载。
    pub async fn run(&self) {
        let mut location = self.transitions.router().subscribe();
        loop {
            if location.changed().await.is_err() {
                return;
            }
            if self.mount_delay.is_zero() {
                continue;
            }
            let next = location.borrow_and_update().clone();
            tokio::time::sleep(self.mount_delay).await;
            if self.transitions.router().location() == next {
                self.mount_location(&next);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_transition::{Document, Locale, Router, TransitionConfig};

    fn shell(delay: Duration) -> (Rc<PageTransitions>, Rc<SmoothScrollShell>) {
        let document = Rc::new(Document::new());
        let router = Rc::new(Router::new(Location::new(Locale::En, "/")));
        let transitions = PageTransitions::new(TransitionConfig::default(), document, router);
        let shell = Rc::new(SmoothScrollShell::new(transitions.clone(), delay));
        shell.attach();
        (transitions, shell)
    }

    #[test]
    fn test_mount_owns_wrapper_and_content() {
        let (transitions, shell) = shell(Duration::ZERO);
        shell.mount();

        let document = transitions.document();
        assert!(document.contains(WRAPPER_ID));
        let content = transitions.content_node().unwrap();
        assert_eq!(content.class(), "smooth-content");
        assert_eq!(content.children()[0].class(), "page page-home");
        assert_eq!(document.body().len(), 1);
    }

    #[test]
    fn test_rtl_wrapper_for_arabic() {
        let (_transitions, shell) = shell(Duration::ZERO);
        let wrapper = shell.render(&Location::new(Locale::Ar, "/about"));
        assert_eq!(wrapper.class(), "smooth-wrapper rtl");
    }

    #[test]
    fn test_remount_replaces_content() {
        let (transitions, shell) = shell(Duration::ZERO);
        let first = shell.mount();
        let second = shell.mount();

        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(transitions.document().body().len(), 1);
    }

    #[test]
    fn test_route_change_remounts_synchronously() {
        let (transitions, shell) = shell(Duration::ZERO);
        shell.mount();
        let old = transitions.content_node().unwrap();

        transitions.router().push("/about");
        let new = transitions.content_node().unwrap();
        assert!(!Rc::ptr_eq(&old, &new));
        assert_eq!(new.children()[0].class(), "page page-about");
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_mounts_after_delay() {
        let (transitions, shell) = shell(Duration::from_millis(30));
        shell.mount();

        let navigate = async {
            transitions.router().push("/services");
            tokio::time::sleep(Duration::from_millis(10)).await;
            assert!(transitions.content_node().is_none());
            tokio::time::sleep(Duration::from_millis(30)).await;
            let content = transitions.content_node().unwrap();
            assert_eq!(content.children()[0].class(), "page page-services");
        };

        tokio::select! {
            biased;
            _ = shell.run() => unreachable!(),
            _ = navigate => {}
        }
    }
}
