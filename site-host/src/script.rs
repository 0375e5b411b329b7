//! # Script 模块
//!
//! 导航脚本：命令行上的一串步骤，按顺序模拟用户操作。
//!
//! ## 步骤语法
//!
//! | 写法 | 含义 |
//! |------|------|
//! | `/about` | 点击过渡链接，使用默认效果 |
//! | `/about@door-swing` | 点击过渡链接，指定效果 |
//! | `plain:/contact` | 普通导航，不播放过渡 |
//! | `locale:ar` | 切换语言 |

use std::fmt;
use std::str::FromStr;

use page_transition::{Locale, TransitionKind, TransitionLink};

use crate::error::SiteError;

/// 一个导航步骤
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// 点击过渡链接
    Link(TransitionLink),
    /// 普通导航
    Plain(String),
    /// 切换语言
    Locale(Locale),
}

impl FromStr for Step {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(code) = s.strip_prefix("locale:") {
            return Ok(Self::Locale(code.parse()?));
        }
        if let Some(path) = s.strip_prefix("plain:") {
            if !path.starts_with('/') {
                return Err(SiteError::InvalidStep(s.to_string()));
            }
            return Ok(Self::Plain(path.to_string()));
        }
        if !s.starts_with('/') {
            return Err(SiteError::InvalidStep(s.to_string()));
        }
        match s.split_once('@') {
            Some((path, kind)) => Ok(Self::Link(
                TransitionLink::new(path).with_transition(kind.parse()?),
            )),
            None => Ok(Self::Link(TransitionLink::new(s))),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link(link) => match link.kind {
                Some(kind) => write!(f, "{}@{}", link.href, kind),
                None => f.write_str(&link.href),
            },
            Self::Plain(path) => write!(f, "plain:{path}"),
            Self::Locale(locale) => write!(f, "locale:{locale}"),
        }
    }
}

/// 解析一串步骤，遇到第一个错误即返回
pub fn parse_steps<S: AsRef<str>>(steps: &[S]) -> Result<Vec<Step>, SiteError> {
    steps.iter().map(|s| s.as_ref().parse()).collect()
}

/// 未指定步骤时的演示脚本
pub fn demo_steps() -> Vec<Step> {
    vec![
        Step::Link(TransitionLink::new("/about")),
        Step::Link(TransitionLink::new("/").with_transition(TransitionKind::DoorSwing)),
        Step::Link(TransitionLink::new("/projects").with_transition(TransitionKind::Overlay)),
        Step::Locale(Locale::Ar),
        Step::Plain("/contact".to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_transition::TransitionError;

    #[test]
    fn test_parse_link_steps() {
        assert_eq!(
            "/about".parse::<Step>().unwrap(),
            Step::Link(TransitionLink::new("/about"))
        );
        assert_eq!(
            "/@door-swing".parse::<Step>().unwrap(),
            Step::Link(TransitionLink::new("/").with_transition(TransitionKind::DoorSwing))
        );
    }

    #[test]
    fn test_parse_plain_and_locale() {
        assert_eq!(
            "plain:/contact".parse::<Step>().unwrap(),
            Step::Plain("/contact".to_string())
        );
        assert_eq!(
            "locale:ar".parse::<Step>().unwrap(),
            Step::Locale(Locale::Ar)
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "about".parse::<Step>().unwrap_err(),
            SiteError::InvalidStep("about".to_string())
        );
        assert_eq!(
            "/about@warp".parse::<Step>().unwrap_err(),
            SiteError::Transition(TransitionError::UnknownTransition("warp".to_string()))
        );
        assert!(matches!(
            "locale:fr".parse::<Step>(),
            Err(SiteError::Transition(TransitionError::UnknownLocale(_)))
        ));
    }

    #[test]
    fn test_display_parses_back() {
        for step in demo_steps() {
            assert_eq!(step.to_string().parse::<Step>().unwrap(), step);
        }
    }
}
