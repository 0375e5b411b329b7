//! # Interceptor 模块
//!
//! 过渡链接的点击处理：先播放退出动画，再交给路由跳转。
//!
//! ## 流程
//!
//! 1. 阻止默认跳转
//! 2. 确定效果：链接指定的，否则默认
//! 3. 记录为当前效果，上下文 `start`
//! 4. 查找内容节点，找不到时直接跳到第 7 步
//! 5. 等待退出动画结束
//! 6. 锁定退出终态，再预置进入初态
//! 7. 等待两帧
//! 8. 路由跳转
//!
//! 过渡进行中再次点击会被忽略，点击当前页面的链接也不做任何事。

use std::cell::Cell;
use std::rc::Rc;

use crate::catalogue::TransitionKind;
use crate::events::TransitionEvent;
use crate::router::normalize_pathname;
use crate::runtime::PageTransitions;

/// 带过渡效果的链接
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionLink {
    /// 与语言无关的目标路径
    pub href: String,
    /// 指定效果，`None` 时使用默认效果
    pub kind: Option<TransitionKind>,
}

impl TransitionLink {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            kind: None,
        }
    }

    pub fn with_transition(mut self, kind: TransitionKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// 点击事件
#[derive(Debug, Default)]
pub struct ClickEvent {
    default_prevented: Cell<bool>,
}

impl ClickEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// 点击被忽略的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// 已有过渡在进行
    InFlight,
    /// 目标就是当前页面
    SameRoute,
}

/// 点击处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// 已用该效果完成跳转
    Navigated(TransitionKind),
    Ignored(IgnoreReason),
}

/// 链接拦截器
#[derive(Debug, Clone)]
pub struct LinkInterceptor {
    runtime: Rc<PageTransitions>,
}

impl LinkInterceptor {
    pub fn new(runtime: Rc<PageTransitions>) -> Self {
        Self { runtime }
    }

    /// 处理一次点击
    ///
    /// 返回时路由已经跳转，进入动画由导航处理器负责。
    pub async fn activate(&self, link: &TransitionLink, event: &ClickEvent) -> Activation {
        let rt = &self.runtime;
        event.prevent_default();

        if rt.context().is_transitioning() {
            rt.record(TransitionEvent::ActivationIgnored {
                href: link.href.clone(),
            });
            return Activation::Ignored(IgnoreReason::InFlight);
        }

        let target = normalize_pathname(&link.href);
        if target == rt.router().pathname() {
            tracing::debug!(href = %link.href, "目标为当前页面，忽略");
            return Activation::Ignored(IgnoreReason::SameRoute);
        }

        let kind = link.kind.unwrap_or_else(|| rt.store().default_kind());
        rt.store().set_active(Some(kind));
        rt.context().start();

        match rt.content_node() {
            Some(node) => {
                rt.record(TransitionEvent::ExitStarted(kind));
                rt.catalogue().play_exit(kind, &node).await;
                rt.record(TransitionEvent::ExitCompleted(kind));

                // 锁定退出终态，防止跳转前回弹
                node.apply_state(&rt.catalogue().exit_state(kind));
                node.apply_state(&rt.catalogue().enter_initial_state(kind));
                rt.record(TransitionEvent::StateLocked(kind));
            }
            None => {
                tracing::warn!(
                    id = %rt.config().content_root_id,
                    "找不到内容节点，跳过退出动画"
                );
            }
        }

        rt.frames().next_frame().await;
        rt.frames().next_frame().await;
        rt.record(TransitionEvent::FramesPainted);

        rt.router().push(&target);
        rt.record(TransitionEvent::Navigated { pathname: target });

        Activation::Navigated(kind)
    }
}
