//! # Router 模块
//!
//! 带语言前缀的客户端路由。
//!
//! `pathname` 与语言无关（`/about`），完整地址为 `/{locale}{pathname}`。
//! 切换语言只替换当前记录，`pathname` 不变。

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::TransitionError;

/// 站点语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Ar];

    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    /// 是否从右到左书写
    pub fn is_rtl(&self) -> bool {
        matches!(self, Self::Ar)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "ar" => Ok(Self::Ar),
            other => Err(TransitionError::UnknownLocale(other.to_string())),
        }
    }
}

/// 当前位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub locale: Locale,
    pub pathname: String,
}

impl Location {
    pub fn new(locale: Locale, pathname: &str) -> Self {
        Self {
            locale,
            pathname: normalize_pathname(pathname),
        }
    }

    /// 完整地址，首页为 `/{locale}`
    pub fn href(&self) -> String {
        if self.pathname == "/" {
            format!("/{}", self.locale)
        } else {
            format!("/{}{}", self.locale, self.pathname)
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}

/// 规范化路径：去掉查询串和锚点，补前导 `/`，去尾随 `/`
pub fn normalize_pathname(path: &str) -> String {
    let path = path.trim();
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}

type Listener = Rc<dyn Fn(&Location)>;

/// 路由器
pub struct Router {
    location: watch::Sender<Location>,
    history: RefCell<Vec<Location>>,
    listeners: RefCell<Vec<Listener>>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("location", &*self.location.borrow())
            .field("history", &self.history.borrow().len())
            .finish()
    }
}

impl Router {
    pub fn new(initial: Location) -> Self {
        Self {
            location: watch::Sender::new(initial.clone()),
            history: RefCell::new(vec![initial]),
            listeners: RefCell::new(Vec::new()),
        }
    }

    pub fn location(&self) -> Location {
        self.location.borrow().clone()
    }

    pub fn pathname(&self) -> String {
        self.location.borrow().pathname.clone()
    }

    pub fn locale(&self) -> Locale {
        self.location.borrow().locale
    }

    /// 历史记录（旧到新）
    pub fn history(&self) -> Vec<Location> {
        self.history.borrow().clone()
    }

    /// 订阅位置变化
    pub fn subscribe(&self) -> watch::Receiver<Location> {
        self.location.subscribe()
    }

    /// 注册同步监听器，在位置更新后立即调用
    ///
    /// 相当于路由变化触发的组件重渲染。
    pub fn on_change(&self, listener: impl Fn(&Location) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// 在当前语言下跳转，追加一条历史记录
    pub fn push(&self, path: &str) {
        let next = Location::new(self.locale(), path);
        tracing::info!(href = %next, "导航");
        self.history.borrow_mut().push(next.clone());
        self.commit(next);
    }

    /// 保持路径不变切换语言，替换当前历史记录
    pub fn replace_locale(&self, locale: Locale) {
        let next = Location {
            locale,
            pathname: self.pathname(),
        };
        tracing::info!(href = %next, "切换语言");
        if let Some(last) = self.history.borrow_mut().last_mut() {
            *last = next.clone();
        }
        self.commit(next);
    }

    fn commit(&self, next: Location) {
        self.location.send_replace(next.clone());
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(&next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_normalize_pathname() {
        assert_eq!(normalize_pathname(""), "/");
        assert_eq!(normalize_pathname("/"), "/");
        assert_eq!(normalize_pathname("about"), "/about");
        assert_eq!(normalize_pathname("/about/"), "/about");
        assert_eq!(normalize_pathname("/projects?page=2#top"), "/projects");
    }

    #[test]
    fn test_href() {
        assert_eq!(Location::new(Locale::En, "/").href(), "/en");
        assert_eq!(Location::new(Locale::Ar, "/about").href(), "/ar/about");
    }

    #[test]
    fn test_unknown_locale_code() {
        assert_eq!("ar".parse::<Locale>(), Ok(Locale::Ar));
        assert_eq!(
            "fr".parse::<Locale>(),
            Err(TransitionError::UnknownLocale("fr".to_string()))
        );
    }

    #[test]
    fn test_locale() {
        assert!(Locale::Ar.is_rtl());
        assert!(!Locale::En.is_rtl());
        assert_eq!("ar".parse::<Locale>().unwrap(), Locale::Ar);
    }

    #[test]
    fn test_push_and_replace_locale() {
        let router = Router::new(Location::new(Locale::En, "/"));
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        router.on_change(move |_| counter.set(counter.get() + 1));

        router.push("/about");
        assert_eq!(router.pathname(), "/about");
        assert_eq!(router.history().len(), 2);

        router.replace_locale(Locale::Ar);
        assert_eq!(router.location().href(), "/ar/about");
        assert_eq!(router.pathname(), "/about");
        assert_eq!(router.history().len(), 2);
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_subscribe_sees_push() {
        let router = Router::new(Location::new(Locale::En, "/"));
        let mut changes = router.subscribe();

        router.push("/contact");
        changes.changed().await.unwrap();
        assert_eq!(changes.borrow_and_update().pathname, "/contact");
    }
}
