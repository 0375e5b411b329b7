//! # Handler 模块
//!
//! 全局导航处理器：监听路径变化，过渡导航时在新内容上播放进入动画。
//!
//! - 路径变化且正在过渡：等待内容节点出现（有超时），写入进入初态，
//!   启动进入动画，清除当前效果，上下文 `end`
//! - 路径变化但未在过渡：只更新记录的路径
//!
//! 每次过渡导航恰好调用一次 `end`，超时也不例外。

use std::cell::RefCell;
use std::rc::Rc;

use crate::catalogue::TransitionKind;
use crate::events::TransitionEvent;
use crate::runtime::PageTransitions;

/// 一次路径变化的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// 路径未变
    Unchanged,
    /// 非过渡导航
    Plain,
    /// 已启动进入动画
    Entered(TransitionKind),
    /// 内容节点未在时限内出现
    TimedOut(TransitionKind),
}

/// 导航处理器
///
/// 通过 `PageTransitions::mount_handler` 创建，销毁时释放挂载名额。
#[derive(Debug)]
pub struct PostNavigationHandler {
    runtime: Rc<PageTransitions>,
    previous_path: RefCell<String>,
}

impl PostNavigationHandler {
    pub(crate) fn new(runtime: Rc<PageTransitions>) -> Self {
        let previous_path = RefCell::new(runtime.router().pathname());
        Self {
            runtime,
            previous_path,
        }
    }

    /// 上一次处理的路径
    pub fn previous_path(&self) -> String {
        self.previous_path.borrow().clone()
    }

    /// 持续监听路由，路由销毁时返回
    pub async fn run(&self) {
        let mut location = self.runtime.router().subscribe();
        loop {
            if location.changed().await.is_err() {
                return;
            }
            let pathname = location.borrow_and_update().pathname.clone();
            self.on_path_change(&pathname).await;
        }
    }

    /// 处理一次路径变化
    pub async fn on_path_change(&self, pathname: &str) -> NavigationOutcome {
        let rt = &self.runtime;

        if *self.previous_path.borrow() == pathname {
            return NavigationOutcome::Unchanged;
        }
        *self.previous_path.borrow_mut() = pathname.to_string();

        if !rt.context().is_transitioning() {
            rt.record(TransitionEvent::PlainNavigation {
                pathname: pathname.to_string(),
            });
            return NavigationOutcome::Plain;
        }

        let kind = rt.store().resolve();
        let content_id = &rt.config().content_root_id;
        let found = tokio::time::timeout(
            rt.config().enter_timeout(),
            rt.document().wait_for_element(content_id),
        )
        .await;

        let outcome = match found {
            Ok(node) => {
                node.apply_state(&rt.catalogue().enter_initial_state(kind));
                // 进入动画与后续渲染并行，不等待结束
                drop(rt.catalogue().play_enter(kind, &node, true));
                rt.record(TransitionEvent::EnterStarted(kind));
                NavigationOutcome::Entered(kind)
            }
            Err(_) => {
                tracing::warn!(
                    id = %content_id,
                    timeout = ?rt.config().enter_timeout(),
                    "内容节点未出现，放弃进入动画"
                );
                if kind.is_overlay() {
                    drop(rt.hide_overlay());
                }
                rt.record(TransitionEvent::EnterTimedOut(kind));
                NavigationOutcome::TimedOut(kind)
            }
        };

        rt.store().set_active(None);
        rt.context().end();
        rt.record(TransitionEvent::Settled);
        outcome
    }
}

impl Drop for PostNavigationHandler {
    fn drop(&mut self) {
        self.runtime.unmount_handler();
    }
}
