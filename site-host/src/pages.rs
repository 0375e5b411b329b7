//! # Pages 模块
//!
//! 站点页面。每个页面按语言渲染成一棵元素树，挂进内容根节点。

use std::rc::Rc;

use page_transition::{Element, Locale, TransitionKind, TransitionLink, normalize_pathname};

/// 按语言选择文案
fn tr(locale: Locale, en: &'static str, ar: &'static str) -> &'static str {
    match locale {
        Locale::En => en,
        Locale::Ar => ar,
    }
}

/// 站点页面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    About,
    Services,
    Projects,
    Contact,
    NotFound,
}

/// 页面内的链接
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub label: &'static str,
    pub link: TransitionLink,
}

impl Page {
    /// 可路由的页面
    pub const ROUTED: [Page; 5] = [
        Page::Home,
        Page::About,
        Page::Services,
        Page::Projects,
        Page::Contact,
    ];

    /// 按路径查找页面，未知路径得到 `NotFound`
    pub fn from_path(path: &str) -> Self {
        let path = normalize_pathname(path);
        Self::ROUTED
            .into_iter()
            .find(|page| page.path() == path)
            .unwrap_or(Self::NotFound)
    }

    /// 与语言无关的路径
    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::About => "/about",
            Self::Services => "/services",
            Self::Projects => "/projects",
            Self::Contact => "/contact",
            Self::NotFound => "/404",
        }
    }

    /// 用作 class 和日志的短名
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::Services => "services",
            Self::Projects => "projects",
            Self::Contact => "contact",
            Self::NotFound => "not-found",
        }
    }

    /// 导航栏上的名称
    pub fn nav_label(&self, locale: Locale) -> &'static str {
        match self {
            Self::Home => tr(locale, "Home", "الرئيسية"),
            Self::About => tr(locale, "About", "من نحن"),
            Self::Services => tr(locale, "Services", "خدماتنا"),
            Self::Projects => tr(locale, "Projects", "مشاريعنا"),
            Self::Contact => tr(locale, "Contact", "اتصل بنا"),
            Self::NotFound => tr(locale, "Not found", "غير موجود"),
        }
    }

    /// 页面大标题
    pub fn heading(&self, locale: Locale) -> &'static str {
        match self {
            Self::Home => tr(locale, "We build what lasts", "نبني ما يدوم"),
            Self::About => tr(locale, "About Us", "من نحن"),
            Self::Services => tr(locale, "Our Services", "خدماتنا"),
            Self::Projects => tr(locale, "Our Projects", "مشاريعنا"),
            Self::Contact => tr(locale, "Contact Us", "اتصل بنا"),
            Self::NotFound => tr(locale, "Page not found", "الصفحة غير موجودة"),
        }
    }

    /// 标题下的说明文字
    pub fn summary(&self, locale: Locale) -> &'static str {
        match self {
            Self::Home => tr(
                locale,
                "Design, engineering and construction under one roof.",
                "التصميم والهندسة والبناء تحت سقف واحد.",
            ),
            Self::About => tr(
                locale,
                "A construction company with two decades on site.",
                "شركة مقاولات بخبرة عقدين في مواقع العمل.",
            ),
            Self::Services => tr(
                locale,
                "From feasibility studies to handover.",
                "من دراسات الجدوى حتى التسليم.",
            ),
            Self::Projects => tr(
                locale,
                "Residential, commercial and infrastructure work.",
                "مشاريع سكنية وتجارية وبنية تحتية.",
            ),
            Self::Contact => tr(
                locale,
                "Tell us about your next project.",
                "أخبرنا عن مشروعك القادم.",
            ),
            Self::NotFound => tr(
                locale,
                "The page you are looking for does not exist.",
                "الصفحة التي تبحث عنها غير موجودة.",
            ),
        }
    }

    /// 页面正文里的过渡链接
    pub fn links(&self, locale: Locale) -> Vec<PageLink> {
        match self {
            Self::About | Self::NotFound => vec![PageLink {
                label: tr(locale, "Go back home", "العودة إلى الرئيسية"),
                link: TransitionLink::new("/").with_transition(TransitionKind::DoorSwing),
            }],
            Self::Home => vec![PageLink {
                label: tr(locale, "See our projects", "شاهد مشاريعنا"),
                link: TransitionLink::new("/projects"),
            }],
            Self::Services | Self::Projects => vec![PageLink {
                label: tr(locale, "Start a project", "ابدأ مشروعك"),
                link: TransitionLink::new("/contact"),
            }],
            Self::Contact => Vec::new(),
        }
    }

    /// 渲染页面元素树
    ///
    /// 链接渲染为 `page-link` 元素，文字即标签。
    pub fn render(&self, locale: Locale) -> Rc<Element> {
        let mut section = Element::anonymous()
            .with_class(format!("page page-{}", self.slug()))
            .with_child(Rc::new(
                Element::anonymous()
                    .with_class("page-heading")
                    .with_text(self.heading(locale)),
            ))
            .with_child(Rc::new(
                Element::anonymous()
                    .with_class("page-summary")
                    .with_text(self.summary(locale)),
            ));
        for link in self.links(locale) {
            section = section.with_child(Rc::new(
                Element::anonymous()
                    .with_class("page-link")
                    .with_text(link.label),
            ));
        }
        Rc::new(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(Page::from_path("/"), Page::Home);
        assert_eq!(Page::from_path("/about/"), Page::About);
        assert_eq!(Page::from_path("contact?ref=nav"), Page::Contact);
        assert_eq!(Page::from_path("/missing"), Page::NotFound);
    }

    #[test]
    fn test_routed_paths_round_trip() {
        for page in Page::ROUTED {
            assert_eq!(Page::from_path(page.path()), page);
        }
    }

    #[test]
    fn test_about_links_home_with_door_swing() {
        let links = Page::About.links(Locale::En);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].label, "Go back home");
        assert_eq!(links[0].link.href, "/");
        assert_eq!(links[0].link.kind, Some(TransitionKind::DoorSwing));
    }

    #[test]
    fn test_render_localized() {
        let en = Page::About.render(Locale::En);
        let ar = Page::About.render(Locale::Ar);
        assert_eq!(en.class(), "page page-about");
        assert_eq!(en.children()[0].text(), "About Us");
        assert_eq!(ar.children()[0].text(), "من نحن");
        assert_eq!(ar.children()[2].text(), "العودة إلى الرئيسية");
    }

    #[test]
    fn test_contact_has_no_links() {
        let contact = Page::Contact.render(Locale::En);
        assert_eq!(contact.children().len(), 2);
    }
}
