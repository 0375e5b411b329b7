//! # Runtime 模块
//!
//! `PageTransitions`：应用启动时构建一次的服务集合，
//! 把存储、上下文、文档、帧循环、路由和目录连在一起，
//! 由链接拦截器和导航处理器共享。

use std::cell::Cell;
use std::rc::Rc;

use crate::animation::Completion;
use crate::catalogue::Catalogue;
use crate::config::TransitionConfig;
use crate::context::TransitionContext;
use crate::document::{Document, Element};
use crate::error::{TransitionError, TransitionResult};
use crate::events::{EventLog, TransitionEvent};
use crate::frame::FrameLoop;
use crate::handler::PostNavigationHandler;
use crate::interceptor::LinkInterceptor;
use crate::overlay::Overlay;
use crate::router::Router;
use crate::scope::Scope;
use crate::store::TransitionStore;

/// 页面过渡运行时
#[derive(Debug)]
pub struct PageTransitions {
    config: TransitionConfig,
    store: Rc<TransitionStore>,
    context: Rc<TransitionContext>,
    document: Rc<Document>,
    frames: Rc<FrameLoop>,
    router: Rc<Router>,
    overlay: Rc<Overlay>,
    catalogue: Catalogue,
    events: EventLog,
    handler_mounted: Cell<bool>,
}

impl PageTransitions {
    pub fn new(config: TransitionConfig, document: Rc<Document>, router: Rc<Router>) -> Rc<Self> {
        let frames = Rc::new(FrameLoop::new());
        let overlay = Rc::new(Overlay::new(
            document.clone(),
            frames.clone(),
            config.overlay_id.clone(),
            config.overlay.clone(),
        ));
        let catalogue = Catalogue::new(frames.clone(), overlay.clone());

        tracing::info!(
            default = %config.default_transition,
            content_root = %config.content_root_id,
            "页面过渡运行时已创建"
        );

        Rc::new(Self {
            store: Rc::new(TransitionStore::new(config.default_transition)),
            context: Rc::new(TransitionContext::new(config.fallback_delay())),
            document,
            frames,
            router,
            overlay,
            catalogue,
            events: EventLog::new(),
            handler_mounted: Cell::new(false),
            config,
        })
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    pub fn store(&self) -> &Rc<TransitionStore> {
        &self.store
    }

    pub fn context(&self) -> &Rc<TransitionContext> {
        &self.context
    }

    pub fn document(&self) -> &Rc<Document> {
        &self.document
    }

    pub fn frames(&self) -> &Rc<FrameLoop> {
        &self.frames
    }

    pub fn router(&self) -> &Rc<Router> {
        &self.router
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub(crate) fn record(&self, event: TransitionEvent) {
        self.events.record(event);
    }

    /// 当前内容节点
    pub fn content_node(&self) -> Option<Rc<Element>> {
        self.document.get_element_by_id(&self.config.content_root_id)
    }

    /// 设置遮罩加载文字
    pub fn set_overlay_label(&self, text: impl Into<String>) {
        self.overlay.set_label(text);
    }

    /// 收起遮罩，遮罩不存在时立即完成
    pub fn hide_overlay(&self) -> Completion {
        self.overlay.hide()
    }

    /// 在作用域中提供运行时、上下文和存储
    pub fn provide(self: &Rc<Self>, scope: &Scope) {
        scope.provide(self.clone());
        scope.provide(self.context.clone());
        scope.provide(self.store.clone());
    }

    /// 为链接创建拦截器
    pub fn interceptor(self: &Rc<Self>) -> LinkInterceptor {
        LinkInterceptor::new(self.clone())
    }

    /// 挂载导航处理器
    ///
    /// 同一运行时只能挂载一个，处理器销毁后可重新挂载。
    pub fn mount_handler(self: &Rc<Self>) -> TransitionResult<PostNavigationHandler> {
        if self.handler_mounted.replace(true) {
            return Err(TransitionError::HandlerAlreadyMounted);
        }
        Ok(PostNavigationHandler::new(self.clone()))
    }

    pub(crate) fn unmount_handler(&self) {
        self.handler_mounted.set(false);
    }

    /// 驱动帧循环、导航处理器和兜底任务
    pub async fn run(&self, handler: &PostNavigationHandler) {
        tokio::join!(
            self.frames.run(self.config.frame_interval()),
            handler.run(),
            self.context.run_fallback(),
        );
    }
}
