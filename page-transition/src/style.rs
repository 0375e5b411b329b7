//! # Style 模块
//!
//! 视觉样式模型。
//!
//! - `KeyframeState`：部分属性记录，只写入其中出现的属性（类似一次 `set()` 调用）
//! - `VisualStyle`：元素的完整计算样式，默认值即"恒等"状态

use std::fmt::Write as _;

/// 变换原点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformOrigin {
    #[default]
    Center,
    TopCenter,
    BottomCenter,
    LeftCenter,
    RightCenter,
}

impl TransformOrigin {
    /// CSS 写法
    pub fn as_css(&self) -> &'static str {
        match self {
            Self::Center => "center center",
            Self::TopCenter => "top center",
            Self::BottomCenter => "bottom center",
            Self::LeftCenter => "left center",
            Self::RightCenter => "right center",
        }
    }
}

/// 所有可动画属性
pub const ANIMATABLE_PROPERTIES: &[&str] = &[
    "opacity",
    "x_percent",
    "y",
    "z",
    "rotation",
    "rotation_x",
    "rotation_y",
    "scale_x",
    "scale_y",
    "blur",
    "hue_rotate",
    "brightness",
];

/// 关键帧状态
///
/// 未设置的属性保持元素原值。`scale` 是 `scale_x` / `scale_y` 的简写，
/// 单独设置的 `scale_x` / `scale_y` 优先。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KeyframeState {
    pub opacity: Option<f32>,
    /// 水平位移（元素宽度的百分比）
    pub x_percent: Option<f32>,
    /// 垂直位移（px）
    pub y: Option<f32>,
    /// 纵深位移（px）
    pub z: Option<f32>,
    pub rotation: Option<f32>,
    pub rotation_x: Option<f32>,
    pub rotation_y: Option<f32>,
    pub scale: Option<f32>,
    pub scale_x: Option<f32>,
    pub scale_y: Option<f32>,
    /// 模糊半径（px）
    pub blur: Option<f32>,
    pub hue_rotate: Option<f32>,
    pub brightness: Option<f32>,
    pub transform_origin: Option<TransformOrigin>,
}

macro_rules! keyframe_setters {
    ($($name:ident),* $(,)?) => {
        $(
            pub fn $name(mut self, value: f32) -> Self {
                self.$name = Some(value);
                self
            }
        )*
    };
}

impl KeyframeState {
    /// 空状态
    pub fn new() -> Self {
        Self::default()
    }

    keyframe_setters!(
        opacity, x_percent, y, z, rotation, rotation_x, rotation_y, scale, scale_x, scale_y, blur,
        hue_rotate, brightness,
    );

    pub fn origin(mut self, origin: TransformOrigin) -> Self {
        self.transform_origin = Some(origin);
        self
    }

    /// 展开为 (属性名, 值) 列表，`scale` 展开为两个轴
    pub fn entries(&self) -> Vec<(&'static str, f32)> {
        let scale_x = self.scale_x.or(self.scale);
        let scale_y = self.scale_y.or(self.scale);

        [
            ("opacity", self.opacity),
            ("x_percent", self.x_percent),
            ("y", self.y),
            ("z", self.z),
            ("rotation", self.rotation),
            ("rotation_x", self.rotation_x),
            ("rotation_y", self.rotation_y),
            ("scale_x", scale_x),
            ("scale_y", scale_y),
            ("blur", self.blur),
            ("hue_rotate", self.hue_rotate),
            ("brightness", self.brightness),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }

    /// 涉及的属性名
    pub fn property_names(&self) -> Vec<&'static str> {
        self.entries().into_iter().map(|(name, _)| name).collect()
    }

    /// 是否没有设置任何属性
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty() && self.transform_origin.is_none()
    }
}

/// 元素的完整视觉样式
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualStyle {
    pub opacity: f32,
    pub x_percent: f32,
    pub y: f32,
    pub z: f32,
    pub rotation: f32,
    pub rotation_x: f32,
    pub rotation_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub blur: f32,
    pub hue_rotate: f32,
    pub brightness: f32,
    pub transform_origin: TransformOrigin,
}

impl Default for VisualStyle {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl VisualStyle {
    /// 恒等状态：完全不透明、无位移、无旋转、无缩放、无滤镜
    pub const IDENTITY: Self = Self {
        opacity: 1.0,
        x_percent: 0.0,
        y: 0.0,
        z: 0.0,
        rotation: 0.0,
        rotation_x: 0.0,
        rotation_y: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
        blur: 0.0,
        hue_rotate: 0.0,
        brightness: 1.0,
        transform_origin: TransformOrigin::Center,
    };

    /// 属性的恒等值
    pub fn identity_value(property: &str) -> Option<f32> {
        Self::IDENTITY.get(property)
    }

    /// 按属性名读取
    pub fn get(&self, property: &str) -> Option<f32> {
        let value = match property {
            "opacity" => self.opacity,
            "x_percent" => self.x_percent,
            "y" => self.y,
            "z" => self.z,
            "rotation" => self.rotation,
            "rotation_x" => self.rotation_x,
            "rotation_y" => self.rotation_y,
            "scale_x" => self.scale_x,
            "scale_y" => self.scale_y,
            "blur" => self.blur,
            "hue_rotate" => self.hue_rotate,
            "brightness" => self.brightness,
            _ => return None,
        };
        Some(value)
    }

    /// 按属性名写入，属性不存在时返回 `false`
    pub fn set(&mut self, property: &str, value: f32) -> bool {
        let slot = match property {
            "opacity" => &mut self.opacity,
            "x_percent" => &mut self.x_percent,
            "y" => &mut self.y,
            "z" => &mut self.z,
            "rotation" => &mut self.rotation,
            "rotation_x" => &mut self.rotation_x,
            "rotation_y" => &mut self.rotation_y,
            "scale_x" => &mut self.scale_x,
            "scale_y" => &mut self.scale_y,
            "blur" => &mut self.blur,
            "hue_rotate" => &mut self.hue_rotate,
            "brightness" => &mut self.brightness,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// 写入关键帧中出现的属性
    pub fn apply(&mut self, state: &KeyframeState) {
        for (name, value) in state.entries() {
            self.set(name, value);
        }
        if let Some(origin) = state.transform_origin {
            self.transform_origin = origin;
        }
    }

    /// 关键帧中出现的属性是否都已到达
    pub fn matches(&self, state: &KeyframeState) -> bool {
        state
            .entries()
            .into_iter()
            .all(|(name, value)| self.get(name).is_some_and(|v| approx(v, value)))
    }

    /// 所有可动画属性是否都处于恒等值（忽略变换原点）
    pub fn is_identity(&self) -> bool {
        self.approx_eq(&Self::IDENTITY)
    }

    /// 近似相等（忽略变换原点）
    pub fn approx_eq(&self, other: &Self) -> bool {
        ANIMATABLE_PROPERTIES.iter().all(|name| {
            match (self.get(name), other.get(name)) {
                (Some(a), Some(b)) => approx(a, b),
                _ => false,
            }
        })
    }

    /// 偏离恒等值的属性
    pub fn non_identity_properties(&self) -> Vec<&'static str> {
        ANIMATABLE_PROPERTIES
            .iter()
            .copied()
            .filter(|name| {
                let current = self.get(name).unwrap_or_default();
                let identity = Self::identity_value(name).unwrap_or_default();
                !approx(current, identity)
            })
            .collect()
    }

    /// 渲染为 CSS 声明，恒等属性省略
    pub fn to_css(&self) -> String {
        let mut transform = String::new();
        if self.x_percent != 0.0 || self.y != 0.0 || self.z != 0.0 {
            let _ = write!(
                transform,
                "translate3d({}%, {}px, {}px) ",
                self.x_percent, self.y, self.z
            );
        }
        if self.rotation != 0.0 {
            let _ = write!(transform, "rotate({}deg) ", self.rotation);
        }
        if self.rotation_x != 0.0 {
            let _ = write!(transform, "rotateX({}deg) ", self.rotation_x);
        }
        if self.rotation_y != 0.0 {
            let _ = write!(transform, "rotateY({}deg) ", self.rotation_y);
        }
        if self.scale_x != 1.0 || self.scale_y != 1.0 {
            let _ = write!(transform, "scale({}, {}) ", self.scale_x, self.scale_y);
        }

        let mut filter = String::new();
        if self.blur != 0.0 {
            let _ = write!(filter, "blur({}px) ", self.blur);
        }
        if self.hue_rotate != 0.0 {
            let _ = write!(filter, "hue-rotate({}deg) ", self.hue_rotate);
        }
        if self.brightness != 1.0 {
            let _ = write!(filter, "brightness({}) ", self.brightness);
        }

        let mut css = String::new();
        if self.opacity != 1.0 {
            let _ = write!(css, "opacity: {}; ", self.opacity);
        }
        if !transform.is_empty() {
            let _ = write!(css, "transform: {}; ", transform.trim_end());
        }
        if !filter.is_empty() {
            let _ = write!(css, "filter: {}; ", filter.trim_end());
        }
        if self.transform_origin != TransformOrigin::Center {
            let _ = write!(css, "transform-origin: {}; ", self.transform_origin.as_css());
        }
        css.trim_end().to_string()
    }
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_scale_expands_to_axes() {
        let state = KeyframeState::new().opacity(0.0).scale(0.8);
        assert_eq!(
            state.entries(),
            vec![("opacity", 0.0), ("scale_x", 0.8), ("scale_y", 0.8)]
        );
    }

    #[test]
    fn test_axis_scale_wins_over_uniform() {
        let state = KeyframeState::new().scale(0.5).scale_y(1.2);
        assert_eq!(state.entries(), vec![("scale_x", 0.5), ("scale_y", 1.2)]);
    }

    #[test]
    fn test_apply_only_touches_listed_properties() {
        let mut style = VisualStyle::IDENTITY;
        style.blur = 4.0;

        style.apply(
            &KeyframeState::new()
                .opacity(0.0)
                .origin(TransformOrigin::LeftCenter),
        );

        assert_eq!(style.opacity, 0.0);
        assert_eq!(style.blur, 4.0);
        assert_eq!(style.transform_origin, TransformOrigin::LeftCenter);
        assert!(style.matches(&KeyframeState::new().opacity(0.0)));
    }

    #[test]
    fn test_identity() {
        let mut style = VisualStyle::default();
        assert!(style.is_identity());
        assert!(style.non_identity_properties().is_empty());
        assert_eq!(style.to_css(), "");

        // 变换原点不影响恒等判断
        style.transform_origin = TransformOrigin::TopCenter;
        assert!(style.is_identity());

        style.set("rotation_y", 90.0);
        assert!(!style.is_identity());
        assert_eq!(style.non_identity_properties(), vec!["rotation_y"]);
    }

    #[test]
    fn test_unknown_property() {
        let mut style = VisualStyle::default();
        assert_eq!(style.get("color"), None);
        assert!(!style.set("color", 1.0));
    }

    #[test]
    fn test_to_css() {
        let mut style = VisualStyle::default();
        style.apply(
            &KeyframeState::new()
                .opacity(0.0)
                .rotation_y(90.0)
                .scale(0.8)
                .blur(8.0)
                .origin(TransformOrigin::LeftCenter),
        );
        assert_eq!(
            style.to_css(),
            "opacity: 0; transform: rotateY(90deg) scale(0.8, 0.8); filter: blur(8px); transform-origin: left center;"
        );
    }
}
