//! # Traits 模块
//!
//! 动画系统与被动画对象之间的接缝。
//!
//! 动画系统只认 `ObjectId` 和属性名，对象是元素、遮罩块还是测试桩都无所谓，
//! 只要实现 `Animatable` 按名字读写 f32 即可。

use std::fmt;

/// 注册到动画系统的对象句柄
///
/// 由 `AnimationSystem::register` 分配，单调递增，注销后不复用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u64);

impl ObjectId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{}", self.0)
    }
}

/// 一条补间写入的位置：哪个对象的哪个属性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyKey {
    pub object: ObjectId,
    pub property: &'static str,
}

impl PropertyKey {
    pub fn new(object: ObjectId, property: &'static str) -> Self {
        Self { object, property }
    }

    /// 是否属于给定对象
    pub fn belongs_to(&self, object: ObjectId) -> bool {
        self.object == object
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.object, self.property)
    }
}

/// 可动画对象
///
/// 读写都只借 `&self`，可变状态放在 `Cell` 里，
/// 同一对象的多个属性可以各自被一条补间驱动。
pub trait Animatable: 'static {
    /// 读属性，未知属性返回 `None`
    fn get_property(&self, property: &str) -> Option<f32>;

    /// 写属性，未知属性返回 `false` 且不做任何事
    fn set_property(&self, property: &str, value: f32) -> bool;

    /// 支持的属性名
    fn property_list(&self) -> &'static [&'static str];
}
