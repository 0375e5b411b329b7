//! # Document 模块
//!
//! 最小化的文档模型：按 id 索引的元素表，加上挂载通知。
//!
//! 过渡系统只通过 id 查找内容节点，从不长期持有节点引用；
//! `wait_for_element` 是"内容已挂载"信号，替代轮询。

use std::cell::{Cell, Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use tokio::sync::watch;

use crate::animation::{Animatable, ObjectId};
use crate::style::{ANIMATABLE_PROPERTIES, KeyframeState, TransformOrigin, VisualStyle};

/// 元素显示模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Block,
    Grid,
    None,
}

/// 文档元素
///
/// 所有可变部分都走内部可变性，元素以 `Rc<Element>` 在文档、
/// 动画系统和组件之间共享。
#[derive(Debug, Default)]
pub struct Element {
    id: Option<String>,
    class: String,
    text: RefCell<String>,
    background: Option<String>,
    display: Cell<DisplayMode>,
    style: RefCell<VisualStyle>,
    children: RefCell<Vec<Rc<Element>>>,
    /// 在动画系统中的注册 ID
    object_id: Cell<Option<ObjectId>>,
}

impl Element {
    /// 创建带 id 的元素
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// 创建匿名元素
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        *self.text.borrow_mut() = text.into();
        self
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    pub fn with_display(self, display: DisplayMode) -> Self {
        self.display.set(display);
        self
    }

    pub fn with_child(self, child: Rc<Element>) -> Self {
        self.children.borrow_mut().push(child);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.borrow_mut() = text.into();
    }

    pub fn display(&self) -> DisplayMode {
        self.display.get()
    }

    pub fn set_display(&self, display: DisplayMode) {
        self.display.set(display);
    }

    /// 当前样式快照
    pub fn style(&self) -> VisualStyle {
        *self.style.borrow()
    }

    /// 立即写入关键帧（不经过动画）
    pub fn apply_state(&self, state: &KeyframeState) {
        self.style.borrow_mut().apply(state);
    }

    pub fn set_origin(&self, origin: TransformOrigin) {
        self.style.borrow_mut().transform_origin = origin;
    }

    pub fn append_child(&self, child: Rc<Element>) {
        self.children.borrow_mut().push(child);
    }

    pub fn children(&self) -> Ref<'_, Vec<Rc<Element>>> {
        self.children.borrow()
    }

    pub(crate) fn object_id(&self) -> Option<ObjectId> {
        self.object_id.get()
    }

    pub(crate) fn set_object_id(&self, id: Option<ObjectId>) {
        self.object_id.set(id);
    }

    /// 自身及所有后代（先序）
    pub fn descendants(self: &Rc<Self>) -> Vec<Rc<Element>> {
        let mut out = vec![self.clone()];
        for child in self.children.borrow().iter() {
            out.extend(child.descendants());
        }
        out
    }
}

impl Animatable for Element {
    fn get_property(&self, property_id: &str) -> Option<f32> {
        self.style.borrow().get(property_id)
    }

    fn set_property(&self, property_id: &str, value: f32) -> bool {
        self.style.borrow_mut().set(property_id, value)
    }

    fn property_list(&self) -> &'static [&'static str] {
        ANIMATABLE_PROPERTIES
    }
}

/// 文档
///
/// 每次挂载都会推进挂载代数，`wait_for_element` 借此得知新节点出现。
#[derive(Debug)]
pub struct Document {
    elements: RefCell<HashMap<String, Rc<Element>>>,
    body: RefCell<Vec<Rc<Element>>>,
    mounts: watch::Sender<u64>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            elements: RefCell::new(HashMap::new()),
            body: RefCell::new(Vec::new()),
            mounts: watch::Sender::new(0),
        }
    }

    /// 挂载元素（连同后代）到 id 索引
    ///
    /// 同 id 的旧元素被替换。
    pub fn mount(&self, element: Rc<Element>) {
        {
            let mut elements = self.elements.borrow_mut();
            for node in element.descendants() {
                if let Some(id) = node.id() {
                    elements.insert(id.to_string(), node.clone());
                }
            }
        }
        tracing::trace!(id = ?element.id(), "元素挂载");
        self.mounts.send_modify(|generation| *generation += 1);
    }

    /// 挂载并追加到 body 末尾
    pub fn append_to_body(&self, element: Rc<Element>) {
        self.body.borrow_mut().push(element.clone());
        self.mount(element);
    }

    /// 卸载元素（连同后代），返回被卸载的元素
    pub fn unmount(&self, id: &str) -> Option<Rc<Element>> {
        let element = self.elements.borrow().get(id).cloned()?;
        {
            let mut elements = self.elements.borrow_mut();
            for node in element.descendants() {
                if let Some(node_id) = node.id() {
                    // 只移除仍指向这棵子树的条目
                    if elements.get(node_id).is_some_and(|e| Rc::ptr_eq(e, &node)) {
                        elements.remove(node_id);
                    }
                }
            }
        }
        self.body.borrow_mut().retain(|e| !Rc::ptr_eq(e, &element));
        tracing::trace!(id, "元素卸载");
        Some(element)
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<Rc<Element>> {
        self.elements.borrow().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.borrow().contains_key(id)
    }

    /// body 下的顶层元素
    pub fn body(&self) -> Vec<Rc<Element>> {
        self.body.borrow().clone()
    }

    /// 等待指定 id 的元素出现
    ///
    /// 已存在时立即返回。调用方用 `tokio::time::timeout` 限定等待时长。
    pub async fn wait_for_element(&self, id: &str) -> Rc<Element> {
        let mut mounts = self.mounts.subscribe();
        loop {
            if let Some(element) = self.get_element_by_id(id) {
                return element;
            }
            if mounts.changed().await.is_err() {
                // 发送端随文档存在，不会走到这里
                std::future::pending::<()>().await;
            }
        }
    }
}
