//! # Site Host
//!
//! 中英（阿拉伯语）双语建筑公司站点的宿主层，建立在 `page-transition` 之上。
//!
//! ## 组成
//!
//! - [`config`]：站点配置（语言、帧率、挂载延迟、过渡配置）
//! - [`pages`]：页面与多语言文案
//! - [`header`]：导航链接与语言切换器
//! - [`shell`]：平滑滚动外壳，拥有内容根节点
//! - [`text_reveal`]：等过渡结束后逐词揭示文字
//! - [`script`]：命令行导航脚本
//! - [`app`]：装配与驱动

pub mod app;
pub mod config;
pub mod error;
pub mod header;
pub mod pages;
pub mod script;
pub mod shell;
pub mod text_reveal;

pub use app::{Site, StepReport};
pub use config::SiteConfig;
pub use error::{SiteError, SiteResult};
pub use header::{LanguageOption, LanguageSwitcher, NavItem};
pub use pages::{Page, PageLink};
pub use script::{Step, demo_steps, parse_steps};
pub use shell::SmoothScrollShell;
pub use text_reveal::TextReveal;
