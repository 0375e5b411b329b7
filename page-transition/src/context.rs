//! # Context 模块
//!
//! 过渡播放状态：`is_transitioning` / `transition_done` 两个标志，
//! 只能通过 `start` / `end` / `reset` 修改。
//!
//! ## 状态
//!
//! | 操作    | is_transitioning | transition_done |
//! |---------|------------------|-----------------|
//! | 初始    | false            | true            |
//! | `start` | true             | false           |
//! | `end`   | false            | true            |
//! | `reset` | false            | false           |
//!
//! 两个标志永远不会同时为 true。`reset` 之后若持续一段时间没有新的过渡，
//! 兜底任务会把 `transition_done` 置为 true，二次动画不会永久等待。

use std::rc::Rc;
use std::time::Duration;

use tokio::sync::watch;

use crate::scope::Scope;

/// 播放状态快照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayState {
    pub is_transitioning: bool,
    pub transition_done: bool,
}

impl Default for PlayState {
    fn default() -> Self {
        Self {
            is_transitioning: false,
            transition_done: true,
        }
    }
}

impl PlayState {
    /// 既不在过渡中、也未完成：等待兜底
    fn is_unsettled(&self) -> bool {
        !self.is_transitioning && !self.transition_done
    }
}

/// 过渡上下文
#[derive(Debug)]
pub struct TransitionContext {
    state: watch::Sender<PlayState>,
    fallback_delay: Duration,
}

impl Default for TransitionContext {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

impl TransitionContext {
    pub fn new(fallback_delay: Duration) -> Self {
        Self {
            state: watch::Sender::new(PlayState::default()),
            fallback_delay,
        }
    }

    fn set(&self, next: PlayState) {
        self.state.send_if_modified(|state| {
            let changed = *state != next;
            *state = next;
            changed
        });
    }

    /// 开始过渡
    pub fn start(&self) {
        tracing::debug!("过渡开始");
        self.set(PlayState {
            is_transitioning: true,
            transition_done: false,
        });
    }

    /// 结束过渡
    pub fn end(&self) {
        tracing::debug!("过渡结束");
        self.set(PlayState {
            is_transitioning: false,
            transition_done: true,
        });
    }

    /// 两个标志都清除
    pub fn reset(&self) {
        tracing::debug!("过渡状态重置");
        self.set(PlayState {
            is_transitioning: false,
            transition_done: false,
        });
    }

    pub fn state(&self) -> PlayState {
        *self.state.borrow()
    }

    pub fn is_transitioning(&self) -> bool {
        self.state().is_transitioning
    }

    pub fn transition_done(&self) -> bool {
        self.state().transition_done
    }

    /// 订阅状态变化
    pub fn subscribe(&self) -> watch::Receiver<PlayState> {
        self.state.subscribe()
    }

    /// 等待 `transition_done` 为 true
    ///
    /// 二次动画（文字揭示等）用它做门闸。
    pub async fn wait_until_done(&self) {
        let mut state = self.subscribe();
        if state.wait_for(|s| s.transition_done).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// 兜底任务，永不返回
    ///
    /// 每当状态变为"未过渡且未完成"并保持 `fallback_delay`，
    /// 强制 `transition_done = true`。
    pub async fn run_fallback(&self) {
        let mut state = self.subscribe();
        loop {
            if state.wait_for(PlayState::is_unsettled).await.is_err() {
                return;
            }

            let settled = tokio::time::timeout(
                self.fallback_delay,
                state.wait_for(|s| !s.is_unsettled()),
            )
            .await
            .is_ok();

            if !settled {
                tracing::debug!(delay = ?self.fallback_delay, "兜底：强制 transition_done");
                self.state.send_if_modified(|s| {
                    if s.is_transitioning || s.transition_done {
                        return false;
                    }
                    s.transition_done = true;
                    true
                });
            }
        }
    }
}

/// 从作用域取出过渡上下文
///
/// # Panics
/// 作用域中未提供 `TransitionContext` 时 panic。
pub fn use_page_transition(scope: &Scope) -> Rc<TransitionContext> {
    scope
        .try_use_context::<TransitionContext>()
        .unwrap_or_else(|| panic!("use_page_transition 必须在提供了 TransitionContext 的作用域内调用"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exclusive(state: PlayState) -> bool {
        !(state.is_transitioning && state.transition_done)
    }

    #[test]
    fn test_initial_state() {
        let ctx = TransitionContext::default();
        assert_eq!(ctx.state(), PlayState::default());
        assert!(!ctx.is_transitioning());
        assert!(ctx.transition_done());
    }

    #[test]
    fn test_flags_never_both_true() {
        let ctx = TransitionContext::default();
        let ops: [fn(&TransitionContext); 3] = [
            TransitionContext::start,
            TransitionContext::end,
            TransitionContext::reset,
        ];

        // 所有长度为 3 的操作序列
        for a in ops {
            for b in ops {
                for c in ops {
                    for op in [a, b, c] {
                        op(&ctx);
                        assert!(exclusive(ctx.state()));
                    }
                }
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_forces_done_after_reset() {
        let ctx = TransitionContext::new(Duration::from_millis(100));
        ctx.reset();

        tokio::select! {
            _ = ctx.run_fallback() => unreachable!(),
            _ = tokio::time::sleep(Duration::from_millis(99)) => {}
        }
        assert!(!ctx.transition_done());

        tokio::select! {
            _ = ctx.run_fallback() => unreachable!(),
            _ = tokio::time::sleep(Duration::from_millis(150)) => {}
        }
        assert!(ctx.transition_done());
        assert!(!ctx.is_transitioning());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_cancelled_by_start() {
        let ctx = TransitionContext::new(Duration::from_millis(100));
        ctx.reset();

        let scenario = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            ctx.start();
            tokio::time::sleep(Duration::from_millis(200)).await;
        };

        tokio::select! {
            _ = ctx.run_fallback() => unreachable!(),
            _ = scenario => {}
        }
        assert!(ctx.is_transitioning());
        assert!(!ctx.transition_done());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_until_done() {
        let ctx = TransitionContext::default();
        ctx.start();

        let finish = async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            ctx.end();
        };
        tokio::join!(ctx.wait_until_done(), finish);
        assert!(ctx.transition_done());
    }

    #[test]
    fn test_use_page_transition_from_scope() {
        let scope = Scope::root();
        let ctx = Rc::new(TransitionContext::default());
        scope.provide(ctx.clone());

        let found = use_page_transition(&scope.child());
        assert!(Rc::ptr_eq(&found, &ctx));
    }

    #[test]
    #[should_panic(expected = "use_page_transition")]
    fn test_use_page_transition_outside_provider() {
        use_page_transition(&Scope::root());
    }
}
