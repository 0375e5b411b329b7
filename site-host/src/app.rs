//! # App 模块
//!
//! `Site`：把过渡运行时、滚动外壳、头部和语言切换器装配成一个站点，
//! 并按脚本驱动导航。
//!
//! 过渡链接点击后，新页面标题以逐词揭示的方式出现，揭示动画
//! 由过渡上下文的 `transition_done` 门闸放行。

use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use page_transition::{
    Activation, ClickEvent, Document, Locale, Location, PageTransitions, PostNavigationHandler,
    Router, Scope, TransitionError, TransitionEvent, use_page_transition,
};

use crate::config::SiteConfig;
use crate::error::SiteResult;
use crate::header::{self, LanguageSwitcher};
use crate::pages::Page;
use crate::script::Step;
use crate::shell::SmoothScrollShell;
use crate::text_reveal::TextReveal;

/// 遮罩上的加载文字
fn loading_label(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Loading",
        Locale::Ar => "جارٍ التحميل",
    }
}

/// 一个步骤的执行结果
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub step: Step,
    /// 步骤结束后的完整地址
    pub href: String,
    /// 过渡链接的处理结果，其它步骤为 `None`
    pub activation: Option<Activation>,
    /// 本步骤产生的过渡事件
    pub events: Vec<TransitionEvent>,
}

/// 站点
#[derive(Debug)]
pub struct Site {
    config: SiteConfig,
    scope: Rc<Scope>,
    transitions: Rc<PageTransitions>,
    handler: PostNavigationHandler,
    shell: Rc<SmoothScrollShell>,
    switcher: LanguageSwitcher,
}

impl Site {
    /// 装配站点并挂载首页
    pub fn new(config: SiteConfig) -> SiteResult<Self> {
        config.validate().map_err(TransitionError::Config)?;

        let document = Rc::new(Document::new());
        let router = Rc::new(Router::new(Location::new(config.locale, "/")));
        let transitions =
            PageTransitions::new(config.effective_transition(), document.clone(), router.clone());

        let scope = Scope::root();
        transitions.provide(&scope);
        transitions.set_overlay_label(loading_label(config.locale));

        let handler = transitions.mount_handler()?;
        let shell = Rc::new(SmoothScrollShell::new(
            transitions.clone(),
            config.mount_delay(),
        ));
        shell.attach();
        let switcher = LanguageSwitcher::new(router.clone());

        document.append_to_body(header::render(config.locale));
        shell.mount();
        Self::follow_locale(&router, &transitions, config.locale);

        tracing::info!(
            locale = %config.locale,
            frame_rate = config.frame_rate,
            "站点已启动"
        );

        Ok(Self {
            config,
            scope,
            transitions,
            handler,
            shell,
            switcher,
        })
    }

    /// 语言变化时重新渲染头部并更新遮罩文字
    fn follow_locale(router: &Router, transitions: &Rc<PageTransitions>, initial: Locale) {
        let current = Cell::new(initial);
        let transitions: Weak<PageTransitions> = Rc::downgrade(transitions);
        router.on_change(move |location| {
            if current.replace(location.locale) == location.locale {
                return;
            }
            let Some(transitions) = transitions.upgrade() else {
                return;
            };
            let document = transitions.document();
            document.unmount("site-header");
            document.append_to_body(header::render(location.locale));
            transitions.set_overlay_label(loading_label(location.locale));
        });
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// 根作用域，提供了运行时、上下文和存储
    pub fn scope(&self) -> &Rc<Scope> {
        &self.scope
    }

    pub fn transitions(&self) -> &Rc<PageTransitions> {
        &self.transitions
    }

    pub fn shell(&self) -> &Rc<SmoothScrollShell> {
        &self.shell
    }

    pub fn location(&self) -> Location {
        self.transitions.router().location()
    }

    /// 驱动帧循环、导航处理器和外壳，永不返回
    pub async fn drive(&self) {
        tokio::join!(self.transitions.run(&self.handler), self.shell.run());
    }

    /// 执行一个步骤
    ///
    /// 需要在 `drive` 同时运行时调用。过渡链接步骤等进入动画和
    /// 标题揭示都结束才返回。
    ///
    /// 事件日志在步骤开始时清空、结束时取走。
    pub async fn perform(&self, step: &Step) -> StepReport {
        self.transitions.events().clear();
        let mut activation = None;

        match step {
            Step::Link(link) => {
                let click = ClickEvent::new();
                let result = self.transitions.interceptor().activate(link, &click).await;
                if let Activation::Navigated(_) = result {
                    self.reveal_heading().await;
                }
                activation = Some(result);
            }
            Step::Plain(path) => {
                self.transitions.router().push(path);
                self.transitions.frames().next_frame().await;
            }
            Step::Locale(locale) => {
                self.switcher.switch(*locale);
                self.transitions.frames().next_frame().await;
            }
        }

        let events = self.transitions.events().drain();
        StepReport {
            step: step.clone(),
            href: self.location().href(),
            activation,
            events,
        }
    }

    /// 在新页面上揭示标题
    ///
    /// 先等过渡结束，内容节点此时仍未出现（进入超时）则跳过。
    async fn reveal_heading(&self) {
        let context = use_page_transition(&self.scope);
        context.wait_until_done().await;
        self.transitions.frames().next_frame().await;

        let Some(content) = self.transitions.content_node() else {
            tracing::debug!("内容节点不存在，跳过标题揭示");
            return;
        };
        let location = self.location();
        let page = Page::from_path(&location.pathname);
        let reveal = TextReveal::new("page-title", page.heading(location.locale));
        content.append_child(reveal.element().clone());
        reveal.play(&context, self.transitions.frames()).await;
    }

    /// 依次执行步骤，每步之后停留 `settle`
    pub async fn run_script(&self, steps: &[Step], settle: Duration) -> Vec<StepReport> {
        let script = async {
            let mut reports = Vec::with_capacity(steps.len());
            for step in steps {
                let report = self.perform(step).await;
                tracing::info!(step = %report.step, href = %report.href, "步骤完成");
                reports.push(report);
                tokio::time::sleep(settle).await;
            }
            reports
        };

        tokio::select! {
            biased;
            _ = self.drive() => unreachable!("站点驱动不会自行结束"),
            reports = script => reports,
        }
    }
}
