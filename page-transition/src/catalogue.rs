//! # Catalogue 模块
//!
//! 过渡效果目录：每种效果对应一对关键帧状态（退出终态、进入初态）
//! 以及退出 / 进入动画的时长与缓动。
//!
//! ## 对称性
//!
//! 除 `overlay` 外，"进入初态 → 恒等" 是 "恒等 → 退出终态" 的镜像：
//! 两者涉及同一组属性，方向量取反。

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::animation::{AnimationId, Completion, EasingFunction, Tween};
use crate::document::Element;
use crate::error::TransitionError;
use crate::frame::FrameLoop;
use crate::overlay::Overlay;
use crate::style::{KeyframeState, TransformOrigin, VisualStyle};

/// 过渡效果标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionKind {
    /// 3D 翻转
    #[serde(alias = "flip3D")]
    Flip,
    /// 水平擦除
    #[serde(alias = "slideWipe")]
    SlideWipe,
    /// 旋转缩放
    #[default]
    #[serde(alias = "rotateScale")]
    RotateScale,
    /// 纵向折叠
    Accordion,
    /// 透视漩涡
    Swirl,
    /// 立方体旋转
    #[serde(alias = "cubeRotate")]
    CubeRotate,
    /// 开门
    #[serde(alias = "doorSwing")]
    DoorSwing,
    /// 波纹
    Ripple,
    /// 弹性压缩
    Elastic,
    /// 万花筒
    Kaleidoscope,
    /// 色块遮罩，不动内容节点
    Overlay,
    /// 淡出模糊，未知名称时的兜底效果
    #[serde(alias = "fadeBlur")]
    FadeBlur,
}

impl TransitionKind {
    /// 所有效果
    pub const ALL: [TransitionKind; 12] = [
        Self::Flip,
        Self::SlideWipe,
        Self::RotateScale,
        Self::Accordion,
        Self::Swirl,
        Self::CubeRotate,
        Self::DoorSwing,
        Self::Ripple,
        Self::Elastic,
        Self::Kaleidoscope,
        Self::Overlay,
        Self::FadeBlur,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flip => "flip",
            Self::SlideWipe => "slide-wipe",
            Self::RotateScale => "rotate-scale",
            Self::Accordion => "accordion",
            Self::Swirl => "swirl",
            Self::CubeRotate => "cube-rotate",
            Self::DoorSwing => "door-swing",
            Self::Ripple => "ripple",
            Self::Elastic => "elastic",
            Self::Kaleidoscope => "kaleidoscope",
            Self::Overlay => "overlay",
            Self::FadeBlur => "fade-blur",
        }
    }

    /// 解析名称，未知时记录警告并退回 `FadeBlur`
    pub fn parse_or_fallback(name: &str) -> Self {
        name.parse().unwrap_or_else(|e: TransitionError| {
            tracing::warn!(error = %e, "退回 fade-blur");
            Self::FadeBlur
        })
    }

    pub fn is_overlay(&self) -> bool {
        matches!(self, Self::Overlay)
    }

    /// 效果参数
    pub fn spec(&self) -> TransitionSpec {
        use EasingFunction::*;
        use TransformOrigin::*;

        let k = KeyframeState::new;
        match self {
            Self::Flip => TransitionSpec {
                exit: k().opacity(0.0).rotation_y(90.0).scale(0.8).z(-300.0).blur(8.0),
                enter_initial: k().opacity(0.0).rotation_y(-90.0).scale(0.8).z(-300.0).blur(8.0),
                exit_timing: Timing::new(0.9, EaseInQuart),
                enter_timing: Timing::new(1.1, EaseOutQuart),
            },
            Self::SlideWipe => TransitionSpec {
                exit: k().opacity(0.0).x_percent(-100.0).scale(0.95).blur(10.0),
                enter_initial: k().opacity(0.0).x_percent(100.0).scale(0.95).blur(10.0),
                exit_timing: Timing::new(0.8, EaseInQuint),
                enter_timing: Timing::new(1.0, EaseOutQuint),
            },
            Self::RotateScale => TransitionSpec {
                exit: k().opacity(0.0).rotation(15.0).scale(0.7).y(-100.0).blur(10.0),
                enter_initial: k().opacity(0.0).rotation(-15.0).scale(0.7).y(100.0).blur(10.0),
                exit_timing: Timing::new(0.85, EaseInBack(1.5)),
                enter_timing: Timing::new(1.2, EaseOutBack(1.2)),
            },
            Self::Accordion => TransitionSpec {
                exit: k().scale_y(0.0).y(-200.0).origin(TopCenter),
                enter_initial: k().scale_y(0.0).y(200.0).origin(TopCenter),
                exit_timing: Timing::new(0.7, EaseInCubic),
                enter_timing: Timing::new(0.9, EaseOutCubic),
            },
            Self::Swirl => TransitionSpec {
                exit: k().rotation(180.0).rotation_x(90.0).scale(0.3).z(-500.0).blur(15.0),
                enter_initial: k()
                    .rotation(-180.0)
                    .rotation_x(-90.0)
                    .scale(0.3)
                    .z(-500.0)
                    .blur(15.0),
                exit_timing: Timing::new(1.0, EaseInCubic),
                enter_timing: Timing::new(1.3, EaseOutCubic),
            },
            Self::CubeRotate => TransitionSpec {
                exit: k().rotation_y(-90.0).x_percent(-50.0).z(-400.0).origin(LeftCenter),
                enter_initial: k().rotation_y(90.0).x_percent(50.0).z(-400.0).origin(RightCenter),
                exit_timing: Timing::new(0.9, EaseInQuart),
                enter_timing: Timing::new(1.1, EaseOutQuart),
            },
            Self::DoorSwing => TransitionSpec {
                exit: k().rotation_y(-90.0).z(-200.0).origin(LeftCenter),
                enter_initial: k().rotation_y(90.0).z(-200.0).origin(RightCenter),
                exit_timing: Timing::new(0.8, EaseInCubic),
                enter_timing: Timing::new(1.0, EaseOutCubic),
            },
            Self::Ripple => TransitionSpec {
                exit: k().scale(1.5).rotation(360.0).blur(20.0).origin(Center),
                enter_initial: k().scale(0.2).rotation(-360.0).blur(20.0).origin(Center),
                exit_timing: Timing::new(0.9, EaseInQuart),
                enter_timing: Timing::new(
                    1.2,
                    EaseOutElastic {
                        amplitude: 1.0,
                        period: 0.5,
                    },
                ),
            },
            Self::Elastic => TransitionSpec {
                exit: k().scale_x(0.0).scale_y(1.2).x_percent(-100.0).rotation(-45.0),
                enter_initial: k().scale_x(0.0).scale_y(1.2).x_percent(100.0).rotation(45.0),
                exit_timing: Timing::new(0.85, EaseInBack(2.0)),
                enter_timing: Timing::new(
                    1.2,
                    EaseOutElastic {
                        amplitude: 1.0,
                        period: 0.6,
                    },
                ),
            },
            Self::Kaleidoscope => TransitionSpec {
                exit: k()
                    .rotation(180.0)
                    .rotation_x(180.0)
                    .rotation_y(180.0)
                    .scale(0.2)
                    .blur(20.0)
                    .hue_rotate(360.0),
                enter_initial: k()
                    .rotation(-180.0)
                    .rotation_x(-180.0)
                    .rotation_y(-180.0)
                    .scale(0.2)
                    .blur(20.0)
                    .hue_rotate(-360.0),
                exit_timing: Timing::new(1.1, EaseInCubic),
                enter_timing: Timing::new(1.4, EaseOutCubic),
            },
            // 遮罩自带时间线，这里的时长只是名义值
            Self::Overlay => TransitionSpec {
                exit: k().opacity(1.0),
                enter_initial: k().opacity(1.0),
                exit_timing: Timing::new(0.0, Linear),
                enter_timing: Timing::new(0.0, Linear),
            },
            Self::FadeBlur => TransitionSpec {
                exit: k().opacity(0.0).y(-120.0).scale(0.92).blur(12.0).brightness(0.8),
                enter_initial: k().opacity(0.0).y(120.0).scale(0.92).blur(12.0).brightness(0.8),
                exit_timing: Timing::new(0.85, EaseInQuart),
                enter_timing: Timing::new(1.2, EaseOutQuart),
            },
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransitionKind {
    type Err = TransitionError;

    /// 接受 kebab-case 名称及旧的 camelCase 写法
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "flip" | "flip3D" => Self::Flip,
            "slide-wipe" | "slideWipe" => Self::SlideWipe,
            "rotate-scale" | "rotateScale" => Self::RotateScale,
            "accordion" => Self::Accordion,
            "swirl" => Self::Swirl,
            "cube-rotate" | "cubeRotate" => Self::CubeRotate,
            "door-swing" | "doorSwing" => Self::DoorSwing,
            "ripple" => Self::Ripple,
            "elastic" => Self::Elastic,
            "kaleidoscope" => Self::Kaleidoscope,
            "overlay" => Self::Overlay,
            "fade-blur" | "fadeBlur" => Self::FadeBlur,
            other => return Err(TransitionError::UnknownTransition(other.to_string())),
        };
        Ok(kind)
    }
}

/// 动画时长与缓动
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// 时长（秒）
    pub duration: f32,
    pub easing: EasingFunction,
}

impl Timing {
    pub const fn new(duration: f32, easing: EasingFunction) -> Self {
        Self { duration, easing }
    }
}

/// 单个效果的完整参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionSpec {
    /// 退出终态
    pub exit: KeyframeState,
    /// 进入初态
    pub enter_initial: KeyframeState,
    pub exit_timing: Timing,
    pub enter_timing: Timing,
}

/// 过渡目录
///
/// 持有帧循环和遮罩，负责把效果参数落实为对内容节点的动画。
#[derive(Debug)]
pub struct Catalogue {
    frames: Rc<FrameLoop>,
    overlay: Rc<Overlay>,
}

impl Catalogue {
    pub fn new(frames: Rc<FrameLoop>, overlay: Rc<Overlay>) -> Self {
        Self { frames, overlay }
    }

    /// 退出终态
    pub fn exit_state(&self, kind: TransitionKind) -> KeyframeState {
        kind.spec().exit
    }

    /// 进入初态
    pub fn enter_initial_state(&self, kind: TransitionKind) -> KeyframeState {
        kind.spec().enter_initial
    }

    /// 播放退出动画：从节点当前状态过渡到退出终态
    ///
    /// 所有补间结束后完成。`overlay` 不动节点，改为展开遮罩。
    pub fn play_exit(&self, kind: TransitionKind, node: &Rc<Element>) -> Completion {
        if kind.is_overlay() {
            return self.overlay.show();
        }

        let spec = kind.spec();
        if let Some(origin) = spec.exit.transform_origin {
            node.set_origin(origin);
        }
        let targets = spec.exit.entries();
        self.tween_node(node, &targets, spec.exit_timing)
    }

    /// 播放进入动画：过渡到恒等状态
    ///
    /// `skip_initial_apply` 为 false 时先同步写入进入初态。
    /// `overlay` 不动节点，改为收起遮罩。
    pub fn play_enter(
        &self,
        kind: TransitionKind,
        node: &Rc<Element>,
        skip_initial_apply: bool,
    ) -> Completion {
        if kind.is_overlay() {
            return self.overlay.hide();
        }

        let spec = kind.spec();
        if !skip_initial_apply {
            node.apply_state(&spec.enter_initial);
        }

        let mut properties = spec.enter_initial.property_names();
        for name in node.style().non_identity_properties() {
            if !properties.contains(&name) {
                properties.push(name);
            }
        }
        let targets: Vec<(&'static str, f32)> = properties
            .into_iter()
            .filter_map(|name| VisualStyle::identity_value(name).map(|v| (name, v)))
            .collect();

        self.tween_node(node, &targets, spec.enter_timing)
    }

    /// 终止节点上的旧补间，按目标值启动新补间
    fn tween_node(
        &self,
        node: &Rc<Element>,
        targets: &[(&'static str, f32)],
        timing: Timing,
    ) -> Completion {
        let object = self.frames.object_id(node);
        self.frames.with_system(|system| {
            system.kill_object_animations(object);

            let ids: Vec<AnimationId> = targets
                .iter()
                .filter_map(|&(property, to)| {
                    system
                        .animate(
                            Tween::to(object, property, to, timing.duration).easing(timing.easing),
                        )
                        .inspect_err(|e| tracing::warn!(error = %e, "补间启动失败"))
                        .ok()
                })
                .collect();

            system.completion(ids)
        })
    }
}
