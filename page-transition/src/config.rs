//! # Config 模块
//!
//! 过渡系统配置。
//!
//! ## 配置优先级
//!
//! 1. 宿主传入的覆盖项（最高）
//! 2. 配置文件 (`*.transition.json`)
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::catalogue::TransitionKind;
use crate::error::ConfigError;

/// 过渡系统配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransitionConfig {
    /// 链接未指定效果时使用的过渡
    #[serde(default)]
    pub default_transition: TransitionKind,

    /// 内容根节点 id
    #[serde(default = "default_content_root_id")]
    pub content_root_id: String,

    /// 遮罩容器 id
    #[serde(default = "default_overlay_id")]
    pub overlay_id: String,

    /// 导航后等待内容节点出现的最长时间（毫秒）
    #[serde(default = "default_enter_timeout_ms")]
    pub enter_timeout_ms: u64,

    /// `isTransitioning` 为 false 持续多久后强制 `transitionDone`（毫秒）
    #[serde(default = "default_fallback_delay_ms")]
    pub fallback_delay_ms: u64,

    /// 帧间隔（毫秒）
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// 遮罩过渡配置
    #[serde(default)]
    pub overlay: OverlayConfig,
}

/// 遮罩过渡配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlayConfig {
    /// 色块列数
    #[serde(default = "default_grid_size")]
    pub columns: u32,

    /// 色块行数
    #[serde(default = "default_grid_size")]
    pub rows: u32,

    /// 色块配色
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,

    /// 随机顺序种子，未设置时每次运行不同
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_content_root_id() -> String {
    "smooth-content".to_string()
}

fn default_overlay_id() -> String {
    "page-transition-overlay".to_string()
}

fn default_enter_timeout_ms() -> u64 {
    50
}

fn default_fallback_delay_ms() -> u64 {
    100
}

fn default_frame_interval_ms() -> u64 {
    16
}

fn default_grid_size() -> u32 {
    20
}

fn default_palette() -> Vec<String> {
    ["#667eea", "#764ba2", "#f093fb", "#4facfe"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            default_transition: TransitionKind::default(),
            content_root_id: default_content_root_id(),
            overlay_id: default_overlay_id(),
            enter_timeout_ms: default_enter_timeout_ms(),
            fallback_delay_ms: default_fallback_delay_ms(),
            frame_interval_ms: default_frame_interval_ms(),
            overlay: OverlayConfig::default(),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            columns: default_grid_size(),
            rows: default_grid_size(),
            palette: default_palette(),
            seed: None,
        }
    }
}

impl TransitionConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在、解析失败或校验不通过，返回默认配置并打印警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match Self::read(path).and_then(|config| config.validate().map(|()| config)) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "配置文件加载成功");
                config
            }
            Err(e) => {
                tracing::warn!(error = %e, "使用默认配置");
                Self::default()
            }
        }
    }

    /// 读取并解析配置文件，不做回退
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json_str(&content)
    }

    /// 从 JSON 文本解析
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialization(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::Io(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content_root_id.trim().is_empty() {
            return Err(ConfigError::Validation("content_root_id 不能为空".to_string()));
        }
        if self.overlay_id.trim().is_empty() {
            return Err(ConfigError::Validation("overlay_id 不能为空".to_string()));
        }
        if self.overlay_id == self.content_root_id {
            return Err(ConfigError::Validation(
                "overlay_id 与 content_root_id 不能相同".to_string(),
            ));
        }
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::Validation("frame_interval_ms 必须大于 0".to_string()));
        }
        if self.enter_timeout_ms == 0 {
            return Err(ConfigError::Validation("enter_timeout_ms 必须大于 0".to_string()));
        }
        self.overlay.validate()
    }

    pub fn enter_timeout(&self) -> Duration {
        Duration::from_millis(self.enter_timeout_ms)
    }

    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }

    /// 帧间隔，至少 1ms
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

impl OverlayConfig {
    /// 色块总数
    pub fn block_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(ConfigError::Validation(format!(
                "遮罩网格尺寸无效: {}x{}",
                self.columns, self.rows
            )));
        }
        if self.palette.is_empty() {
            return Err(ConfigError::Validation("遮罩配色不能为空".to_string()));
        }
        if let Some(color) = self.palette.iter().find(|c| !is_hex_color(c)) {
            return Err(ConfigError::Validation(format!("无效的颜色值 '{color}'")));
        }
        Ok(())
    }
}

/// `#rgb` 或 `#rrggbb`
fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TransitionConfig::default();
        assert_eq!(config.default_transition, TransitionKind::RotateScale);
        assert_eq!(config.content_root_id, "smooth-content");
        assert_eq!(config.enter_timeout(), Duration::from_millis(50));
        assert_eq!(config.fallback_delay(), Duration::from_millis(100));
        assert_eq!(config.overlay.block_count(), 400);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = TransitionConfig::from_json_str(
            r#"{ "default_transition": "doorSwing", "overlay": { "seed": 7 } }"#,
        )
        .unwrap();

        assert_eq!(config.default_transition, TransitionKind::DoorSwing);
        assert_eq!(config.overlay.seed, Some(7));
        assert_eq!(config.overlay.columns, 20);
        assert_eq!(config.frame_interval_ms, 16);
    }

    #[test]
    fn test_config_serialization() {
        let mut config = TransitionConfig::default();
        config.default_transition = TransitionKind::Overlay;
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains(r#""default_transition": "overlay""#));

        let loaded = TransitionConfig::from_json_str(&json).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unknown_transition_is_parse_error() {
        let result = TransitionConfig::from_json_str(r#"{ "default_transition": "zoom" }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_validation() {
        let mut config = TransitionConfig::default();

        config.overlay.palette = vec!["purple".to_string()];
        assert!(config.validate().is_err());

        config.overlay.palette = vec!["#fff".to_string()];
        assert!(config.validate().is_ok());

        config.overlay.rows = 0;
        assert!(config.validate().is_err());
        config.overlay.rows = 20;

        config.overlay_id = config.content_root_id.clone();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_invalid_file_falls_back() {
        let path = std::env::temp_dir().join(format!(
            "zero-interval-{}.transition.json",
            std::process::id()
        ));
        fs::write(&path, r#"{ "frame_interval_ms": 0, "default_transition": "flip" }"#).unwrap();

        let config = TransitionConfig::load(&path);
        fs::remove_file(&path).unwrap();

        assert_eq!(config, TransitionConfig::default());
        assert!(config.frame_interval() >= Duration::from_millis(1));
    }

    #[test]
    fn test_frame_interval_never_zero() {
        let config = TransitionConfig {
            frame_interval_ms: 0,
            ..TransitionConfig::default()
        };
        assert_eq!(config.frame_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = TransitionConfig::load("/nonexistent/site.transition.json");
        assert_eq!(config, TransitionConfig::default());
    }
}
