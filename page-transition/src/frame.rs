//! # Frame 模块
//!
//! 帧循环：持有动画系统，按固定间隔推进所有动画，并广播"已渲染一帧"。
//!
//! 帧计数通过 `watch` 广播，`next_frame` 等待下一次 `tick`。

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};

use crate::animation::{AnimationEvent, AnimationSystem, ObjectId};
use crate::document::Element;

/// 帧间隔下限
const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);

/// 帧循环
#[derive(Debug)]
pub struct FrameLoop {
    system: RefCell<AnimationSystem>,
    frames: watch::Sender<u64>,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            system: RefCell::new(AnimationSystem::new()),
            frames: watch::Sender::new(0),
        }
    }

    /// 元素在动画系统中的对象 ID，首次访问时注册
    pub fn object_id(&self, element: &Rc<Element>) -> ObjectId {
        if let Some(id) = element.object_id() {
            if self.system.borrow().is_registered(id) {
                return id;
            }
        }
        let id = self.system.borrow_mut().register(element.clone());
        element.set_object_id(Some(id));
        id
    }

    /// 从动画系统注销元素，进行中的动画随之终止
    pub fn release(&self, element: &Element) {
        if let Some(id) = element.object_id() {
            self.system.borrow_mut().unregister(id);
            element.set_object_id(None);
        }
    }

    /// 借用动画系统
    ///
    /// 闭包内不能再调用本帧循环的其它方法。
    pub fn with_system<R>(&self, f: impl FnOnce(&mut AnimationSystem) -> R) -> R {
        f(&mut self.system.borrow_mut())
    }

    /// 推进一帧
    pub fn tick(&self, dt: f32) -> Vec<AnimationEvent> {
        let events = self.system.borrow_mut().update(dt);
        self.frames.send_modify(|count| *count += 1);
        events
    }

    /// 已渲染的帧数
    pub fn frame_count(&self) -> u64 {
        *self.frames.borrow()
    }

    /// 是否还有动画在播放
    pub fn is_animating(&self) -> bool {
        self.system.borrow().has_active_animations()
    }

    /// 等待下一帧渲染完成
    pub async fn next_frame(&self) {
        let mut frames = self.frames.subscribe();
        if frames.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// 按固定间隔持续推进，永不返回
    ///
    /// 间隔不足 1ms 时按 1ms 处理。
    pub async fn run(&self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval.max(MIN_FRAME_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last = Instant::now();

        loop {
            ticker.tick().await;
            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f32();
            last = now;
            self.tick(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Tween;

    #[test]
    fn test_object_id_is_cached() {
        let frames = FrameLoop::new();
        let element = Rc::new(Element::new("node"));

        let a = frames.object_id(&element);
        let b = frames.object_id(&element);
        assert_eq!(a, b);

        frames.release(&element);
        let c = frames.object_id(&element);
        assert_ne!(a, c);
    }

    #[test]
    fn test_tick_drives_animations() {
        let frames = FrameLoop::new();
        let element = Rc::new(Element::new("node"));
        let id = frames.object_id(&element);

        frames
            .with_system(|system| system.animate(Tween::to(id, "opacity", 0.0, 0.1)))
            .unwrap();
        assert!(frames.is_animating());

        frames.tick(0.2);
        assert_eq!(element.style().opacity, 0.0);
        assert!(!frames.is_animating());
        assert_eq!(frames.frame_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_still_ticks() {
        let frames = FrameLoop::new();

        tokio::select! {
            _ = frames.run(Duration::ZERO) => unreachable!(),
            _ = tokio::time::sleep(Duration::from_millis(10)) => {}
        }
        assert!(frames.frame_count() >= 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_frame_waits_for_tick() {
        let frames = FrameLoop::new();

        tokio::select! {
            _ = frames.run(Duration::from_millis(16)) => unreachable!(),
            _ = async {
                frames.next_frame().await;
                frames.next_frame().await;
            } => {}
        }
        assert!(frames.frame_count() >= 2);
    }
}
