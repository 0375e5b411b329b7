//! # Animation 模块
//!
//! 单条补间：一个 f32 值沿时间轴从起点走到终点，不关心值属于哪个对象。
//!
//! 时间轴只记一个累计时钟，延迟、进度都由时钟推算。
//! 起点可以留空，等延迟结束、真正开始的那一帧再由动画系统填入对象的当前值。

use super::EasingFunction;

/// 动画 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(pub u64);

impl AnimationId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// 补间所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    /// 延迟中，尚未写值
    #[default]
    Delayed,
    Running,
    Completed,
    /// 被跳过，值已直接到终点
    Skipped,
}

impl AnimationState {
    /// 仍需每帧推进
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Delayed | Self::Running)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Skipped)
    }
}

/// 单条补间
#[derive(Debug, Clone)]
pub struct Animation {
    pub id: AnimationId,
    /// 起点，`None` 表示开始时再读取
    start: Option<f32>,
    /// 终点
    pub to: f32,
    /// 时长（秒）
    pub duration: f32,
    pub easing: EasingFunction,
    /// 延迟（秒）
    pub delay: f32,
    state: AnimationState,
    /// 自创建起累计的时间
    clock: f32,
}

impl Animation {
    pub fn new(id: AnimationId, start: Option<f32>, to: f32, duration: f32) -> Self {
        Self {
            id,
            start,
            to,
            duration: duration.max(0.0),
            easing: EasingFunction::default(),
            delay: 0.0,
            state: AnimationState::Delayed,
            clock: 0.0,
        }
    }

    pub fn eased(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    pub fn after(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// 已开始但起点还没填
    pub fn wants_start(&self) -> bool {
        self.start.is_none() && self.state == AnimationState::Running
    }

    /// 填入起点
    pub fn start_at(&mut self, value: f32) {
        self.start = Some(value);
    }

    /// 推进时钟，返回是否仍在进行
    pub fn advance(&mut self, dt: f32) -> bool {
        if !self.state.is_active() {
            return false;
        }
        self.clock += dt;
        let played = self.clock - self.delay;
        if played < 0.0 {
            return true;
        }
        self.state = if self.duration <= 0.0 || played >= self.duration {
            AnimationState::Completed
        } else {
            AnimationState::Running
        };
        self.state.is_active()
    }

    /// 已应用缓动的进度，Back / Elastic 可能越出 0..1
    pub fn progress(&self) -> f32 {
        match self.state {
            AnimationState::Delayed => 0.0,
            AnimationState::Completed | AnimationState::Skipped => 1.0,
            AnimationState::Running => self
                .easing
                .apply((self.clock - self.delay) / self.duration),
        }
    }

    /// 本帧应写入对象的值
    ///
    /// 延迟中或起点未填时为 `None`；结束后精确等于终点。
    pub fn value(&self) -> Option<f32> {
        match self.state {
            AnimationState::Delayed => None,
            AnimationState::Completed | AnimationState::Skipped => Some(self.to),
            AnimationState::Running => {
                let start = self.start?;
                Some(start + (self.to - start) * self.progress())
            }
        }
    }

    /// 直接跳到终点
    pub fn skip(&mut self) {
        if self.state.is_active() {
            self.state = AnimationState::Skipped;
        }
    }
}
