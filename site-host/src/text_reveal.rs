//! # Text Reveal 模块
//!
//! 逐词揭示文字。揭示动画等 `transition_done` 为 true 后才开始，
//! 不会和页面进入动画抢同一段时间。

use std::rc::Rc;

use page_transition::{
    EasingFunction, Element, FrameLoop, KeyframeState, ObjectId, TransitionContext, Tween,
};

/// 每个词的动画时长（秒）
const WORD_DURATION: f32 = 0.8;
/// 相邻两个词的起始间隔（秒）
const WORD_STAGGER: f32 = 0.05;
/// 初始下沉距离
const HIDDEN_OFFSET_Y: f32 = 40.0;

/// 逐词揭示的文字块
#[derive(Debug)]
pub struct TextReveal {
    element: Rc<Element>,
    words: Vec<Rc<Element>>,
}

impl TextReveal {
    /// 创建文字块，所有词处于隐藏状态
    pub fn new(class: &str, text: &str) -> Self {
        let hidden = KeyframeState::new().opacity(0.0).y(HIDDEN_OFFSET_Y);
        let words: Vec<Rc<Element>> = text
            .split_whitespace()
            .map(|word| {
                let element = Rc::new(
                    Element::anonymous()
                        .with_class("reveal-word")
                        .with_text(word),
                );
                element.apply_state(&hidden);
                element
            })
            .collect();

        let element = words.iter().fold(
            Element::anonymous().with_class(format!("text-reveal {class}")),
            |parent, word| parent.with_child(word.clone()),
        );

        Self {
            element: Rc::new(element),
            words,
        }
    }

    pub fn element(&self) -> &Rc<Element> {
        &self.element
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// 所有词都已回到恒等状态
    pub fn is_revealed(&self) -> bool {
        self.words.iter().all(|word| word.style().is_identity())
    }

    /// 等过渡结束后播放揭示动画，动画结束时返回
    pub async fn play(&self, context: &TransitionContext, frames: &FrameLoop) {
        context.wait_until_done().await;
        tracing::debug!(words = self.words.len(), "开始揭示文字");

        let objects: Vec<ObjectId> = self.words.iter().map(|w| frames.object_id(w)).collect();
        let completion = frames.with_system(|system| {
            let mut ids = Vec::new();
            for (index, &object) in objects.iter().enumerate() {
                let delay = index as f32 * WORD_STAGGER;
                for (property, to) in [("opacity", 1.0), ("y", 0.0)] {
                    let tween = Tween::to(object, property, to, WORD_DURATION)
                        .delay(delay)
                        .easing(EasingFunction::EaseOutCubic);
                    match system.animate(tween) {
                        Ok(id) => ids.push(id),
                        Err(e) => tracing::warn!(error = %e, "揭示补间启动失败"),
                    }
                }
            }
            system.completion(ids)
        });
        completion.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_words_start_hidden() {
        let reveal = TextReveal::new("hero-title", "We build what lasts");
        assert_eq!(reveal.word_count(), 4);
        assert_eq!(reveal.element().class(), "text-reveal hero-title");
        assert!(!reveal.is_revealed());
        let first = reveal.element().children()[0].clone();
        assert_eq!(first.text(), "We");
        assert_eq!(first.style().get("opacity"), Some(0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_transition_done() {
        let context = TransitionContext::default();
        let frames = FrameLoop::new();
        let reveal = TextReveal::new("hero-title", "Design build deliver");
        context.start();

        let scenario = async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            // 过渡未结束，文字保持隐藏
            assert!(!reveal.is_revealed());
            assert!(!frames.is_animating());
            context.end();
        };

        tokio::select! {
            biased;
            _ = frames.run(Duration::from_millis(16)) => unreachable!(),
            _ = async {
                tokio::join!(reveal.play(&context, &frames), scenario);
            } => {}
        }
        assert!(reveal.is_revealed());
    }
}
