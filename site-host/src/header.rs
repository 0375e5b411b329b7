//! # Header 模块
//!
//! 站点头部：导航链接和语言切换器。
//!
//! 导航链接都是过渡链接，使用默认效果；语言切换是普通替换，不播放过渡。

use std::rc::Rc;

use page_transition::{Element, Locale, Router, TransitionLink};

use crate::pages::Page;

/// 导航项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub page: Page,
    pub label: &'static str,
    pub link: TransitionLink,
}

/// 语言选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageOption {
    pub locale: Locale,
    pub label: &'static str,
    /// 当前语言不可再选
    pub disabled: bool,
}

/// 当前语言下的导航项
pub fn nav_items(locale: Locale) -> Vec<NavItem> {
    Page::ROUTED
        .into_iter()
        .map(|page| NavItem {
            page,
            label: page.nav_label(locale),
            link: TransitionLink::new(page.path()),
        })
        .collect()
}

/// 按链接文字查找导航项
pub fn find_nav_item(locale: Locale, label: &str) -> Option<NavItem> {
    nav_items(locale).into_iter().find(|item| item.label == label)
}

/// 渲染头部
pub fn render(locale: Locale) -> Rc<Element> {
    let mut nav = Element::new("site-nav").with_class("site-nav");
    for item in nav_items(locale) {
        nav = nav.with_child(Rc::new(
            Element::anonymous()
                .with_class(format!("nav-link nav-{}", item.page.slug()))
                .with_text(item.label),
        ));
    }

    let mut switcher = Element::new("language-switcher").with_class("language-switcher");
    for option in LanguageSwitcher::options(locale) {
        let class = if option.disabled {
            "language-option disabled"
        } else {
            "language-option"
        };
        switcher = switcher.with_child(Rc::new(
            Element::anonymous().with_class(class).with_text(option.label),
        ));
    }

    Rc::new(
        Element::new("site-header")
            .with_class("site-header")
            .with_child(Rc::new(nav))
            .with_child(Rc::new(switcher)),
    )
}

/// 语言切换器
#[derive(Debug, Clone)]
pub struct LanguageSwitcher {
    router: Rc<Router>,
}

impl LanguageSwitcher {
    pub fn new(router: Rc<Router>) -> Self {
        Self { router }
    }

    /// 所有语言选项，当前语言标记为不可选
    pub fn options(current: Locale) -> Vec<LanguageOption> {
        Locale::ALL
            .into_iter()
            .map(|locale| LanguageOption {
                locale,
                label: match locale {
                    Locale::En => "English",
                    Locale::Ar => "العربية",
                },
                disabled: locale == current,
            })
            .collect()
    }

    /// 切换语言，路径不变
    ///
    /// 已是目标语言时不做任何事，返回 false。
    pub fn switch(&self, locale: Locale) -> bool {
        if self.router.locale() == locale {
            tracing::debug!(%locale, "已是当前语言");
            return false;
        }
        self.router.replace_locale(locale);
        true
    }
}
