//! # Overlay 模块
//!
//! 色块遮罩过渡：全屏网格色块以随机顺序展开，中间显示加载文字；
//! 收起时先隐藏文字，再以随机顺序收起色块，最后隐藏遮罩。
//!
//! 遮罩节点按需创建，重复调用复用同一组节点。

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::animation::{AnimationId, AnimationSystem, Completion, EasingFunction, Tween};
use crate::config::OverlayConfig;
use crate::document::{DisplayMode, Document, Element};
use crate::frame::FrameLoop;
use crate::style::{KeyframeState, TransformOrigin};

/// 色块展开 / 收起时长
const BLOCK_DURATION: f32 = 0.8;
/// 错开总时长
const STAGGER_AMOUNT: f32 = 0.6;
/// 文字在色块全部展开前多久开始出现
const LABEL_LEAD: f32 = 0.3;
const LABEL_IN_DURATION: f32 = 0.5;
const LABEL_OUT_DURATION: f32 = 0.3;
const PULSE_DURATION: f32 = 0.4;
const PULSE_SCALE: f32 = 1.1;

const BLOCK_CLASS: &str = "overlay-block";
const LABEL_CLASS: &str = "overlay-text";

/// 已创建的遮罩节点
struct OverlayNodes {
    container: Rc<Element>,
    label: Rc<Element>,
    blocks: Vec<Rc<Element>>,
}

/// 色块遮罩
pub struct Overlay {
    document: Rc<Document>,
    frames: Rc<FrameLoop>,
    overlay_id: String,
    config: OverlayConfig,
    rng: RefCell<StdRng>,
    label_text: RefCell<String>,
}

impl std::fmt::Debug for Overlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Overlay")
            .field("overlay_id", &self.overlay_id)
            .field("config", &self.config)
            .finish()
    }
}

impl Overlay {
    pub fn new(
        document: Rc<Document>,
        frames: Rc<FrameLoop>,
        overlay_id: impl Into<String>,
        config: OverlayConfig,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            document,
            frames,
            overlay_id: overlay_id.into(),
            config,
            rng: RefCell::new(rng),
            label_text: RefCell::new("Loading".to_string()),
        }
    }

    fn label_id(&self) -> String {
        format!("{}-label", self.overlay_id)
    }

    /// 设置加载文字（本地化）
    pub fn set_label(&self, text: impl Into<String>) {
        let text = text.into();
        if let Some(label) = self.document.get_element_by_id(&self.label_id()) {
            label.set_text(text.clone());
        }
        *self.label_text.borrow_mut() = text;
    }

    /// 遮罩是否已创建
    pub fn exists(&self) -> bool {
        self.document.contains(&self.overlay_id)
    }

    /// 创建遮罩节点（幂等）
    fn ensure(&self) -> OverlayNodes {
        if let Some(nodes) = self.existing() {
            return nodes;
        }

        let mut rng = self.rng.borrow_mut();
        let blocks: Vec<Rc<Element>> = (0..self.config.block_count())
            .map(|_| {
                let color = self
                    .config
                    .palette
                    .choose(&mut *rng)
                    .cloned()
                    .unwrap_or_default();
                Rc::new(
                    Element::anonymous()
                        .with_class(BLOCK_CLASS)
                        .with_background(color),
                )
            })
            .collect();

        let container = Element::new(self.overlay_id.clone())
            .with_class("page-transition-overlay")
            .with_display(DisplayMode::None);
        for block in &blocks {
            container.append_child(block.clone());
        }
        let container = Rc::new(container);

        let label = Rc::new(
            Element::new(self.label_id())
                .with_class(LABEL_CLASS)
                .with_text(self.label_text.borrow().clone())
                .with_display(DisplayMode::None),
        );

        self.document.append_to_body(container.clone());
        self.document.append_to_body(label.clone());
        tracing::debug!(blocks = blocks.len(), "遮罩已创建");

        OverlayNodes {
            container,
            label,
            blocks,
        }
    }

    fn existing(&self) -> Option<OverlayNodes> {
        let container = self.document.get_element_by_id(&self.overlay_id)?;
        let label = self.document.get_element_by_id(&self.label_id())?;
        let blocks = container.children().clone();
        Some(OverlayNodes {
            container,
            label,
            blocks,
        })
    }

    /// 随机顺序的错开延迟
    fn random_stagger(&self, count: usize) -> Vec<f32> {
        let mut order: Vec<usize> = (0..count).collect();
        order.shuffle(&mut *self.rng.borrow_mut());

        let step = if count > 1 {
            STAGGER_AMOUNT / (count - 1) as f32
        } else {
            0.0
        };
        let mut delays = vec![0.0; count];
        for (rank, index) in order.into_iter().enumerate() {
            delays[index] = rank as f32 * step;
        }
        delays
    }

    /// 展开遮罩
    ///
    /// 整条时间线（色块、文字、脉冲）结束后完成。
    pub fn show(&self) -> Completion {
        let nodes = self.ensure();
        let delays = self.random_stagger(nodes.blocks.len());

        for block in &nodes.blocks {
            block.apply_state(&KeyframeState::new().scale_y(0.0).origin(TransformOrigin::TopCenter));
        }
        nodes
            .label
            .apply_state(&KeyframeState::new().opacity(0.0).scale(0.5));
        nodes.container.set_display(DisplayMode::Grid);
        nodes.label.set_display(DisplayMode::Block);

        let label_start = BLOCK_DURATION + STAGGER_AMOUNT - LABEL_LEAD;
        let pulse_start = label_start + LABEL_IN_DURATION;

        let block_ids: Vec<_> = nodes
            .blocks
            .iter()
            .map(|block| self.frames.object_id(block))
            .collect();
        let label_id = self.frames.object_id(&nodes.label);

        self.frames.with_system(|system| {
            let mut ids = Vec::with_capacity(block_ids.len() + 6);
            for (object, delay) in block_ids.iter().zip(&delays) {
                system.kill_object_animations(*object);
                ids.extend(start(
                    system,
                    Tween::to(*object, "scale_y", 1.0, BLOCK_DURATION)
                        .from(0.0)
                        .delay(*delay)
                        .easing(EasingFunction::EaseOutCubic),
                ));
            }

            system.kill_object_animations(label_id);
            let label_in = EasingFunction::EaseOutBack(1.7);
            ids.extend(start(
                system,
                Tween::to(label_id, "opacity", 1.0, LABEL_IN_DURATION)
                    .from(0.0)
                    .delay(label_start)
                    .easing(label_in),
            ));
            for axis in ["scale_x", "scale_y"] {
                ids.extend(start(
                    system,
                    Tween::to(label_id, axis, 1.0, LABEL_IN_DURATION)
                        .from(0.5)
                        .delay(label_start)
                        .easing(label_in),
                ));
                ids.extend(start(
                    system,
                    Tween::to(label_id, axis, PULSE_SCALE, PULSE_DURATION)
                        .delay(pulse_start)
                        .easing(EasingFunction::EaseInOutQuad),
                ));
                ids.extend(start(
                    system,
                    Tween::to(label_id, axis, 1.0, PULSE_DURATION)
                        .delay(pulse_start + PULSE_DURATION)
                        .easing(EasingFunction::EaseInOutQuad),
                ));
            }

            system.completion(ids)
        })
    }

    /// 收起遮罩
    ///
    /// 遮罩不存在时立即完成；结束时遮罩和文字都设为 `display: none`。
    pub fn hide(&self) -> Completion {
        let Some(nodes) = self.existing() else {
            return Completion::done();
        };
        let delays = self.random_stagger(nodes.blocks.len());

        let block_ids: Vec<_> = nodes
            .blocks
            .iter()
            .map(|block| self.frames.object_id(block))
            .collect();
        let label_id = self.frames.object_id(&nodes.label);

        let OverlayNodes {
            container,
            label,
            blocks,
        } = nodes;

        self.frames.with_system(move |system| {
            let mut ids = Vec::with_capacity(block_ids.len() + 3);

            system.kill_object_animations(label_id);
            let label_out = EasingFunction::EaseInCubic;
            ids.extend(start(
                system,
                Tween::to(label_id, "opacity", 0.0, LABEL_OUT_DURATION).easing(label_out),
            ));
            for axis in ["scale_x", "scale_y"] {
                ids.extend(start(
                    system,
                    Tween::to(label_id, axis, 0.5, LABEL_OUT_DURATION).easing(label_out),
                ));
            }

            for ((object, block), delay) in block_ids.iter().zip(&blocks).zip(&delays) {
                system.kill_object_animations(*object);
                block.set_origin(TransformOrigin::BottomCenter);
                ids.extend(start(
                    system,
                    Tween::to(*object, "scale_y", 0.0, BLOCK_DURATION)
                        .delay(LABEL_OUT_DURATION + *delay)
                        .easing(EasingFunction::EaseInCubic),
                ));
            }

            let on_hidden: Box<dyn FnOnce()> = Box::new(move || {
                container.set_display(DisplayMode::None);
                label.set_display(DisplayMode::None);
                tracing::debug!("遮罩已收起");
            });
            system.completion_with(ids, Some(on_hidden))
        })
    }
}

fn start(system: &mut AnimationSystem, tween: Tween) -> Option<AnimationId> {
    system
        .animate(tween)
        .inspect_err(|e| tracing::warn!(error = %e, "遮罩补间启动失败"))
        .ok()
}
