//! # Config 模块
//!
//! 站点配置：初始语言、帧率、页面挂载延迟，以及内嵌的过渡配置。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (site.json)
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use page_transition::{ConfigError, Locale, TransitionConfig};

/// 站点配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteConfig {
    /// 启动时的语言
    #[serde(default)]
    pub locale: Locale,

    /// 帧率，决定帧循环间隔
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,

    /// 路由变化后页面内容延迟多久挂载（毫秒），模拟慢渲染
    #[serde(default)]
    pub mount_delay_ms: u64,

    /// 过渡系统配置
    #[serde(default)]
    pub transition: TransitionConfig,
}

fn default_frame_rate() -> u32 {
    60
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            frame_rate: default_frame_rate(),
            mount_delay_ms: 0,
            transition: TransitionConfig::default(),
        }
    }
}

impl SiteConfig {
    /// 从文件加载配置
    ///
    /// 文件不存在或解析失败时返回默认配置。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::read(path).and_then(|config| config.validate().map(|()| config)) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "已加载站点配置");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "使用默认站点配置");
                Self::default()
            }
        }
    }

    /// 读取并解析配置文件
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialization(e.to_string()))?;
        fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// 验证配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=240).contains(&self.frame_rate) {
            return Err(ConfigError::Validation(format!(
                "frame_rate 必须在 1..=240 之间，当前为 {}",
                self.frame_rate
            )));
        }
        self.transition.validate()
    }

    /// 页面挂载延迟
    pub fn mount_delay(&self) -> Duration {
        Duration::from_millis(self.mount_delay_ms)
    }

    /// 交给过渡运行时的最终配置
    ///
    /// 帧间隔由 `frame_rate` 换算，覆盖过渡配置里的值。
    pub fn effective_transition(&self) -> TransitionConfig {
        let mut transition = self.transition.clone();
        transition.frame_interval_ms = (1000 / u64::from(self.frame_rate.max(1))).max(1);
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_transition::TransitionKind;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.frame_rate, 60);
        assert_eq!(config.mount_delay(), Duration::ZERO);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{
            "locale": "ar",
            "transition": { "default_transition": "door-swing" }
        }"#;
        let config: SiteConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.locale, Locale::Ar);
        assert_eq!(config.frame_rate, 60);
        assert_eq!(
            config.transition.default_transition,
            TransitionKind::DoorSwing
        );
        assert_eq!(config.transition.content_root_id, "smooth-content");
    }

    #[test]
    fn test_frame_rate_drives_interval() {
        let config = SiteConfig {
            frame_rate: 30,
            ..SiteConfig::default()
        };
        assert_eq!(config.effective_transition().frame_interval_ms, 33);

        let config = SiteConfig {
            frame_rate: 240,
            ..SiteConfig::default()
        };
        assert_eq!(config.effective_transition().frame_interval_ms, 4);
    }

    #[test]
    fn test_validate_frame_rate() {
        let config = SiteConfig {
            frame_rate: 0,
            ..SiteConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let path = std::env::temp_dir().join(format!("site-zero-frame-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"{ "locale": "ar", "transition": { "frame_interval_ms": 0 } }"#,
        )
        .unwrap();

        let config = SiteConfig::load(&path);
        fs::remove_file(&path).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = SiteConfig::load("/nonexistent/site.json");
        assert_eq!(config, SiteConfig::default());
    }
}
