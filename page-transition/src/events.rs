//! # Events 模块
//!
//! 过渡协议的事件轨迹。每条事件同时写入 `EventLog` 和 tracing，
//! 测试用日志断言顺序，运行时用日志排查问题。

use std::cell::RefCell;
use std::fmt;

use crate::catalogue::TransitionKind;

/// 过渡事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionEvent {
    /// 过渡进行中又点了链接，被忽略
    ActivationIgnored { href: String },
    /// 退出动画开始
    ExitStarted(TransitionKind),
    /// 退出动画结束（找不到内容节点时跳过）
    ExitCompleted(TransitionKind),
    /// 内容节点锁定在退出终态并预置进入初态
    StateLocked(TransitionKind),
    /// 已等待两帧渲染
    FramesPainted,
    /// 路由已跳转
    Navigated { pathname: String },
    /// 进入动画开始
    EnterStarted(TransitionKind),
    /// 等待内容节点超时
    EnterTimedOut(TransitionKind),
    /// 非过渡导航
    PlainNavigation { pathname: String },
    /// 过渡结束
    Settled,
}

impl fmt::Display for TransitionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ActivationIgnored { href } => write!(f, "activation-ignored {href}"),
            Self::ExitStarted(kind) => write!(f, "exit-started {kind}"),
            Self::ExitCompleted(kind) => write!(f, "exit-completed {kind}"),
            Self::StateLocked(kind) => write!(f, "state-locked {kind}"),
            Self::FramesPainted => f.write_str("frames-painted"),
            Self::Navigated { pathname } => write!(f, "navigated {pathname}"),
            Self::EnterStarted(kind) => write!(f, "enter-started {kind}"),
            Self::EnterTimedOut(kind) => write!(f, "enter-timed-out {kind}"),
            Self::PlainNavigation { pathname } => write!(f, "plain-navigation {pathname}"),
            Self::Settled => f.write_str("settled"),
        }
    }
}

/// 事件日志
#[derive(Debug, Default)]
pub struct EventLog {
    events: RefCell<Vec<TransitionEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录事件
    pub fn record(&self, event: TransitionEvent) {
        match &event {
            TransitionEvent::ActivationIgnored { .. } | TransitionEvent::EnterTimedOut(_) => {
                tracing::info!(%event, "过渡事件");
            }
            _ => tracing::debug!(%event, "过渡事件"),
        }
        self.events.borrow_mut().push(event);
    }

    pub fn snapshot(&self) -> Vec<TransitionEvent> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// 取出已记录的事件并清空
    pub fn drain(&self) -> Vec<TransitionEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// 每行一条事件
    pub fn render(&self) -> String {
        self.events
            .borrow()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
