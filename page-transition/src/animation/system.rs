//! # System 模块
//!
//! 通用动画系统管理器。
//!
//! 对象实现 `Animatable` trait，系统直接设置属性值：
//! ```rust,ignore
//! let obj_id = system.register(element.clone());
//! let id = system.animate(Tween::to(obj_id, "opacity", 0.0, 0.8))?;
//! let done = system.completion([id]);
//! // 每帧 system.update(dt)，done 在动画结束的那一帧 resolve
//! ```

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tokio::sync::oneshot;

use super::traits::{Animatable, ObjectId, PropertyKey};
use super::{Animation, AnimationEvent, AnimationId, AnimationState, Completion, EasingFunction};
use crate::error::AnimationError;

/// 单个属性动画的描述
///
/// `from` 为 `None` 时从属性的当前值开始（在动画真正开始播放时读取）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub object: ObjectId,
    pub property: &'static str,
    pub from: Option<f32>,
    pub to: f32,
    pub duration: f32,
    pub delay: f32,
    pub easing: EasingFunction,
}

impl Tween {
    /// 从当前值过渡到 `to`
    pub fn to(object: ObjectId, property: &'static str, to: f32, duration: f32) -> Self {
        Self {
            object,
            property,
            from: None,
            to,
            duration,
            delay: 0.0,
            easing: EasingFunction::default(),
        }
    }

    /// 指定起始值
    pub fn from(mut self, from: f32) -> Self {
        self.from = Some(from);
        self
    }

    /// 设置延迟（秒）
    pub fn delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    /// 设置缓动函数
    pub fn easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }
}

/// 正在运行的动画轨道
struct Track {
    key: PropertyKey,
    animation: Animation,
}

/// 等待一组动画结束的完成信号
struct CompletionWatch {
    pending: HashSet<AnimationId>,
    sender: oneshot::Sender<()>,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl CompletionWatch {
    fn fire(self) {
        if let Some(callback) = self.on_complete {
            callback();
        }
        // 等待方已放弃时发送失败，忽略即可
        let _ = self.sender.send(());
    }
}

/// 动画系统
///
/// 按帧推进补间并把值写回注册对象，一组补间全部结束时触发对应的完成信号。
/// 它不知道元素、过渡效果或路由，上层只描述"哪个属性在多长时间内变到多少"。
///
/// 同一属性允许存在多条轨道（例如延迟错开的脉冲动画），
/// 按启动顺序更新，后启动的轨道在同一帧内后写入。
pub struct AnimationSystem {
    /// 已注册的对象（ObjectId -> 对象）
    objects: HashMap<ObjectId, Rc<dyn Animatable>>,
    /// 动画轨道（按启动顺序）
    tracks: Vec<Track>,
    /// 完成信号
    watches: Vec<CompletionWatch>,
    /// 下一个动画 ID
    next_anim_id: u64,
    /// 下一个对象 ID
    next_object_id: u64,
    /// 待处理的事件队列
    events: Vec<AnimationEvent>,
}

impl Default for AnimationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AnimationSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationSystem")
            .field("objects", &self.objects.len())
            .field("tracks", &self.tracks.len())
            .field("watches", &self.watches.len())
            .finish()
    }
}

impl AnimationSystem {
    /// 创建新的动画系统
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            tracks: Vec::new(),
            watches: Vec::new(),
            next_anim_id: 1,
            next_object_id: 1,
            events: Vec::new(),
        }
    }

    /// 生成下一个动画 ID
    fn next_animation_id(&mut self) -> AnimationId {
        let id = AnimationId::new(self.next_anim_id);
        self.next_anim_id += 1;
        id
    }

    /// 生成下一个对象 ID
    fn next_object_id(&mut self) -> ObjectId {
        let id = ObjectId::new(self.next_object_id);
        self.next_object_id += 1;
        id
    }

    // ========== 对象管理 ==========

    /// 注册可动画对象
    ///
    /// 系统分配唯一的 `ObjectId` 并返回，后续通过此 ID 引用对象。
    /// 同一对象多次注册会获得不同的 ID。
    pub fn register<T: Animatable>(&mut self, object: Rc<T>) -> ObjectId {
        let id = self.next_object_id();
        self.objects.insert(id, object as Rc<dyn Animatable>);
        id
    }

    /// 注销对象
    ///
    /// 移除对象及其所有相关动画。
    pub fn unregister(&mut self, object_id: ObjectId) {
        self.kill_object_animations(object_id);
        self.objects.remove(&object_id);
    }

    /// 检查对象是否已注册
    pub fn is_registered(&self, object_id: ObjectId) -> bool {
        self.objects.contains_key(&object_id)
    }

    // ========== 动画控制 ==========

    /// 启动属性动画
    ///
    /// 无延迟且指定了 `from` 时立即写入起始值；
    /// 未指定 `from` 时在开始播放的那一刻读取当前值。
    pub fn animate(&mut self, tween: Tween) -> Result<AnimationId, AnimationError> {
        let object = self
            .objects
            .get(&tween.object)
            .ok_or(AnimationError::ObjectNotRegistered(tween.object))?
            .clone();

        let current = object
            .get_property(tween.property)
            .ok_or(AnimationError::PropertyNotFound {
                object: tween.object,
                property: tween.property,
            })?;

        // 起点：显式指定的，否则无延迟时取当前值，有延迟时留到开始那一帧
        let start = match tween.from {
            Some(from) => Some(from),
            None if tween.delay > 0.0 => None,
            None => Some(current),
        };
        if let Some(from) = tween.from {
            if tween.delay <= 0.0 {
                object.set_property(tween.property, from);
            }
        }

        let id = self.next_animation_id();
        let animation = Animation::new(id, start, tween.to, tween.duration)
            .eased(tween.easing)
            .after(tween.delay);

        self.tracks.push(Track {
            key: PropertyKey::new(tween.object, tween.property),
            animation,
        });
        self.events.push(AnimationEvent::Started(id));

        Ok(id)
    }

    /// 创建一组动画的完成信号
    ///
    /// 所有 ID 都已结束（或列表为空）时立即完成。
    pub fn completion(&mut self, ids: impl IntoIterator<Item = AnimationId>) -> Completion {
        self.completion_with(ids, None)
    }

    /// 创建完成信号，并在完成时执行回调
    ///
    /// 回调在 `update` 内部执行，此时动画系统处于可变借用中，
    /// 回调内不能再访问动画系统。
    pub fn completion_with(
        &mut self,
        ids: impl IntoIterator<Item = AnimationId>,
        on_complete: Option<Box<dyn FnOnce()>>,
    ) -> Completion {
        let pending: HashSet<AnimationId> = ids
            .into_iter()
            .filter(|id| self.tracks.iter().any(|t| t.animation.id == *id))
            .collect();

        let (sender, completion) = Completion::channel();
        let watch = CompletionWatch {
            pending,
            sender,
            on_complete,
        };

        if watch.pending.is_empty() {
            watch.fire();
        } else {
            self.watches.push(watch);
        }
        completion
    }

    /// 更新所有动画
    ///
    /// # 返回
    /// 返回产生的事件列表
    pub fn update(&mut self, dt: f32) -> Vec<AnimationEvent> {
        let mut finished: Vec<AnimationId> = Vec::new();

        for track in &mut self.tracks {
            let Some(object) = self.objects.get(&track.key.object) else {
                track.animation.skip();
                finished.push(track.animation.id);
                continue;
            };

            track.animation.advance(dt);
            if track.animation.wants_start() {
                let current = object.get_property(track.key.property).unwrap_or(0.0);
                track.animation.start_at(current);
            }
            if let Some(value) = track.animation.value() {
                object.set_property(track.key.property, value);
            }

            if track.animation.is_finished() {
                finished.push(track.animation.id);
            }
        }

        if !finished.is_empty() {
            for track in &self.tracks {
                if !finished.contains(&track.animation.id) {
                    continue;
                }
                let event = if track.animation.state() == AnimationState::Skipped {
                    AnimationEvent::Skipped(track.animation.id)
                } else {
                    AnimationEvent::Completed(track.animation.id)
                };
                self.events.push(event);
            }
            self.tracks.retain(|t| !finished.contains(&t.animation.id));
            self.settle_watches(&finished);
        }

        // 返回并清空事件队列
        std::mem::take(&mut self.events)
    }

    /// 从完成信号中移除已结束的动画，触发已全部结束的信号
    fn settle_watches(&mut self, finished: &[AnimationId]) {
        let mut remaining = Vec::with_capacity(self.watches.len());
        for mut watch in self.watches.drain(..) {
            watch.pending.retain(|id| !finished.contains(id));
            if watch.pending.is_empty() {
                watch.fire();
            } else {
                remaining.push(watch);
            }
        }
        self.watches = remaining;
    }

    /// 终止对象的所有动画
    ///
    /// 属性停留在当前值；等待这些动画的完成信号视为完成。
    pub fn kill_object_animations(&mut self, object_id: ObjectId) {
        let killed: Vec<AnimationId> = self
            .tracks
            .iter()
            .filter(|t| t.key.belongs_to(object_id))
            .map(|t| t.animation.id)
            .collect();

        if killed.is_empty() {
            return;
        }

        self.tracks.retain(|t| !t.key.belongs_to(object_id));
        for id in &killed {
            self.events.push(AnimationEvent::Skipped(*id));
        }
        self.settle_watches(&killed);
    }

    // ========== 查询方法 ==========

    /// 检查是否有活跃的动画
    pub fn has_active_animations(&self) -> bool {
        self.tracks.iter().any(|t| t.animation.is_active())
    }
}
