//! # Error 模块
//!
//! 站点宿主的错误类型。

use page_transition::TransitionError;
use thiserror::Error;

/// 站点宿主错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SiteError {
    /// 过渡系统错误，包括配置校验失败
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// 无法解析的导航步骤
    #[error("无法解析的导航步骤: '{0}'")]
    InvalidStep(String),
}

pub type SiteResult<T> = Result<T, SiteError>;
