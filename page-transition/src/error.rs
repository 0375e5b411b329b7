//! # Error 模块
//!
//! 定义 page-transition 中使用的错误类型。
//!
//! 过渡系统是"装饰性"子系统：缺失内容节点、未知过渡名等情况都会降级处理，
//! 不会阻塞导航。这里的错误类型只用于需要显式上报的场景。

use thiserror::Error;

use crate::animation::ObjectId;

/// 动画系统错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// 对象未注册到动画系统
    #[error("对象 {0} 未注册")]
    ObjectNotRegistered(ObjectId),

    /// 对象上不存在该属性
    #[error("对象 {object} 上不存在属性 '{property}'")]
    PropertyNotFound {
        object: ObjectId,
        property: &'static str,
    },
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 读取失败
    #[error("配置读取失败: {0}")]
    Io(String),

    /// 解析失败
    #[error("配置解析失败: {0}")]
    Parse(String),

    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    Serialization(String),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    Validation(String),
}

/// page-transition 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransitionError {
    /// 未知的过渡效果名称
    #[error("未知的过渡效果 '{0}'")]
    UnknownTransition(String),

    /// 未知的语言代码
    #[error("未知的语言 '{0}'")]
    UnknownLocale(String),

    /// 同一个运行时上重复挂载 PostNavigationHandler
    #[error("PostNavigationHandler 已挂载，同一运行时只能挂载一次")]
    HandlerAlreadyMounted,

    /// 配置错误
    #[error("{0}")]
    Config(#[from] ConfigError),
}

/// Result 类型别名
pub type TransitionResult<T> = Result<T, TransitionError>;
