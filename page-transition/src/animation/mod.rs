//! # Animation 模块
//!
//! 基于 Trait 的通用动画系统。
//!
//! ## 架构
//!
//! - `Animatable` trait：对象声明自己有哪些可动画属性
//! - `AnimationSystem`：管理时间轴，每帧直接写入对象属性
//! - `Completion`：一组动画结束时 resolve 的 future
//!
//! 过渡目录、遮罩时间线都建立在这一层之上，
//! 它们只描述"哪个属性在多长时间内变到多少"。

#[allow(clippy::module_inception)]
mod animation;
mod completion;
mod easing;
mod system;
mod traits;

pub use animation::{Animation, AnimationId, AnimationState};
pub use completion::Completion;
pub use easing::EasingFunction;
pub use system::{AnimationSystem, Tween};
pub use traits::{Animatable, ObjectId, PropertyKey};

/// 动画事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEvent {
    /// 动画开始
    Started(AnimationId),
    /// 动画完成
    Completed(AnimationId),
    /// 动画被跳过或终止
    Skipped(AnimationId),
}
