//! # Page Transition
//!
//! 站点路由切换时的页面过渡编排库。
//!
//! ## 架构概述
//!
//! `page-transition` 把一次"带动画的导航"拆成两半：
//!
//! ```text
//! LinkInterceptor                Router              PostNavigationHandler
//!   │ start()                      │                        │
//!   │ play_exit ... await          │                        │
//!   │ 锁定退出终态 / 预置进入初态   │                        │
//!   │ 等待两帧                     │                        │
//!   │──── push(path) ────────────►│──── pathname 变化 ───►│
//!   │                              │                        │ 等待内容节点（有超时）
//!   │                              │                        │ play_enter
//!   │                              │                        │ end()
//! ```
//!
//! 两半之间只通过 `TransitionStore`（当前效果）和
//! `TransitionContext`（`is_transitioning` / `transition_done`）交流。
//!
//! ## 核心类型
//!
//! - [`PageTransitions`]：构建一次、到处共享的服务集合
//! - [`TransitionKind`]：过渡效果标识，[`Catalogue`] 提供对应关键帧和动画
//! - [`TransitionContext`]：播放状态，二次动画用 `wait_until_done` 做门闸
//! - [`LinkInterceptor`] / [`PostNavigationHandler`]：导航前后两半
//!
//! ## 使用示例
//!
//! ```ignore
//! let document = Rc::new(Document::new());
//! let router = Rc::new(Router::new(Location::new(Locale::En, "/")));
//! let transitions = PageTransitions::new(TransitionConfig::default(), document, router);
//! let handler = transitions.mount_handler()?;
//!
//! let link = TransitionLink::new("/about").with_transition(TransitionKind::DoorSwing);
//! tokio::select! {
//!     _ = transitions.run(&handler) => {}
//!     _ = transitions.interceptor().activate(&link, &ClickEvent::new()) => {}
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`animation`]：补间动画系统
//! - [`style`]：关键帧与视觉样式
//! - [`document`]：元素与文档
//! - [`frame`]：帧循环
//! - [`catalogue`]：过渡效果目录
//! - [`overlay`]：色块遮罩
//! - [`store`] / [`context`]：过渡状态
//! - [`interceptor`] / [`handler`]：导航前后
//! - [`router`]：带语言前缀的路由
//! - [`config`]：配置
//! - [`error`]：错误类型定义

pub mod animation;
pub mod catalogue;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod events;
pub mod frame;
pub mod handler;
pub mod interceptor;
pub mod overlay;
pub mod router;
pub mod runtime;
pub mod scope;
pub mod store;
pub mod style;

// 重导出核心类型
pub use animation::{
    Animatable, AnimationEvent, AnimationSystem, Completion, EasingFunction, ObjectId, Tween,
};
pub use catalogue::{Catalogue, Timing, TransitionKind, TransitionSpec};
pub use config::{OverlayConfig, TransitionConfig};
pub use context::{PlayState, TransitionContext, use_page_transition};
pub use document::{DisplayMode, Document, Element};
pub use error::{AnimationError, ConfigError, TransitionError, TransitionResult};
pub use events::{EventLog, TransitionEvent};
pub use frame::FrameLoop;
pub use handler::{NavigationOutcome, PostNavigationHandler};
pub use interceptor::{Activation, ClickEvent, IgnoreReason, LinkInterceptor, TransitionLink};
pub use overlay::Overlay;
pub use router::{Locale, Location, Router, normalize_pathname};
pub use runtime::PageTransitions;
pub use scope::Scope;
pub use store::TransitionStore;
pub use style::{KeyframeState, TransformOrigin, VisualStyle};

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_public_api_accessible() {
        let document = Rc::new(Document::new());
        let router = Rc::new(Router::new(Location::new(Locale::En, "/")));
        let transitions = PageTransitions::new(TransitionConfig::default(), document, router);

        let _handler = transitions.mount_handler().unwrap();
        let _link = TransitionLink::new("/about").with_transition(TransitionKind::DoorSwing);
        assert_eq!(transitions.context().state(), PlayState::default());
        assert_eq!(transitions.store().default_kind(), TransitionKind::RotateScale);
    }

    #[test]
    fn test_handler_mounts_once() {
        let document = Rc::new(Document::new());
        let router = Rc::new(Router::new(Location::new(Locale::En, "/")));
        let transitions = PageTransitions::new(TransitionConfig::default(), document, router);

        let first = transitions.mount_handler().unwrap();
        assert_eq!(
            transitions.mount_handler().unwrap_err(),
            TransitionError::HandlerAlreadyMounted
        );

        drop(first);
        assert!(transitions.mount_handler().is_ok());
    }
}
