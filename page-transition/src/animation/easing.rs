//! # Easing 模块
//!
//! 缓动函数库，用于动画的时间插值。
//!
//! 命名与常见的 power 系列对应关系：
//! power1 = Quad，power2 = Cubic，power3 = Quart，power4 = Quint。

use std::f32::consts::PI;

/// 缓动函数类型
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EasingFunction {
    /// 线性（匀速）
    Linear,
    /// 二次缓入缓出（两头慢中间快）
    #[default]
    EaseInOutQuad,
    /// 二次缓入
    EaseInQuad,
    /// 二次缓出
    EaseOutQuad,
    /// 三次缓入
    EaseInCubic,
    /// 三次缓出
    EaseOutCubic,
    /// 四次缓入
    EaseInQuart,
    /// 四次缓出
    EaseOutQuart,
    /// 五次缓入
    EaseInQuint,
    /// 五次缓出
    EaseOutQuint,
    /// 回弹缓入（先向反方向拉，参数为回拉幅度）
    EaseInBack(f32),
    /// 回弹缓出（越过终点后回落）
    EaseOutBack(f32),
    /// 弹性缓出
    EaseOutElastic {
        /// 振幅（小于 1 时按 1 处理）
        amplitude: f32,
        /// 周期
        period: f32,
    },
}

impl EasingFunction {
    /// 计算缓动值
    ///
    /// # 参数
    /// - `t`: 时间进度 (0.0 - 1.0)
    ///
    /// # 返回
    /// - 缓动后的进度值。Back / Elastic 在中途可能越过 [0, 1]，端点恒为 0 和 1。
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match *self {
            EasingFunction::Linear => t,
            EasingFunction::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            EasingFunction::EaseInQuad => t * t,
            EasingFunction::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            EasingFunction::EaseInCubic => t.powi(3),
            EasingFunction::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            EasingFunction::EaseInQuart => t.powi(4),
            EasingFunction::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            EasingFunction::EaseInQuint => t.powi(5),
            EasingFunction::EaseOutQuint => 1.0 - (1.0 - t).powi(5),
            EasingFunction::EaseInBack(overshoot) => ease_in_back(t, overshoot),
            EasingFunction::EaseOutBack(overshoot) => 1.0 - ease_in_back(1.0 - t, overshoot),
            EasingFunction::EaseOutElastic { amplitude, period } => {
                ease_out_elastic(t, amplitude, period)
            }
        }
    }
}

/// 回弹缓入
fn ease_in_back(t: f32, overshoot: f32) -> f32 {
    (overshoot + 1.0) * t * t * t - overshoot * t * t
}

/// 弹性缓出
fn ease_out_elastic(t: f32, amplitude: f32, period: f32) -> f32 {
    if t == 0.0 {
        return 0.0;
    }
    if t == 1.0 {
        return 1.0;
    }

    let amplitude = amplitude.max(1.0);
    let period = if period > 0.0 { period } else { 0.3 };
    let shift = period / (2.0 * PI) * (1.0 / amplitude).asin();

    amplitude * 2.0_f32.powf(-10.0 * t) * ((t - shift) * (2.0 * PI) / period).sin() + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EasingFunction; 13] = [
        EasingFunction::Linear,
        EasingFunction::EaseInOutQuad,
        EasingFunction::EaseInQuad,
        EasingFunction::EaseOutQuad,
        EasingFunction::EaseInCubic,
        EasingFunction::EaseOutCubic,
        EasingFunction::EaseInQuart,
        EasingFunction::EaseOutQuart,
        EasingFunction::EaseInQuint,
        EasingFunction::EaseOutQuint,
        EasingFunction::EaseInBack(1.5),
        EasingFunction::EaseOutBack(1.2),
        EasingFunction::EaseOutElastic {
            amplitude: 1.0,
            period: 0.5,
        },
    ];

    #[test]
    fn test_linear_is_identity_inside_range() {
        for step in 0..=10 {
            let t = step as f32 / 10.0;
            assert!((EasingFunction::Linear.apply(t) - t).abs() < 1e-6);
        }
    }

    #[test]
    fn test_endpoints() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-5, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-5, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_progress_outside_range_is_clamped() {
        for easing in ALL {
            assert_eq!(easing.apply(-0.3), easing.apply(0.0), "{easing:?}");
            assert_eq!(easing.apply(2.0), easing.apply(1.0), "{easing:?}");
        }
    }

    #[test]
    fn test_back_pulls_back_first() {
        // 回弹缓入开始时会短暂变为负值
        assert!(EasingFunction::EaseInBack(2.0).apply(0.2) < 0.0);
        // 回弹缓出会越过终点
        assert!(EasingFunction::EaseOutBack(1.7).apply(0.8) > 1.0);
    }

    #[test]
    fn test_elastic_overshoots() {
        let easing = EasingFunction::EaseOutElastic {
            amplitude: 1.0,
            period: 0.5,
        };
        let peak = (1..100)
            .map(|i| easing.apply(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_ease_in_is_slow_at_start() {
        let t = 0.25;
        assert!(EasingFunction::EaseInQuint.apply(t) < EasingFunction::EaseInCubic.apply(t));
        assert!(EasingFunction::EaseOutQuint.apply(t) > EasingFunction::EaseOutCubic.apply(t));
    }
}
