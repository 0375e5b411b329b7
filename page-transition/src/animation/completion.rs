//! # Completion 模块
//!
//! 一组动画全部结束时触发的完成信号。
//!
//! `Completion` 本身是一个 `Future`，由 `AnimationSystem::update` 在最后一个
//! 动画结束的那一帧 resolve。动画系统被销毁时信号同样视为完成，
//! 等待方不会永久挂起。

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

/// 动画完成信号
#[derive(Debug)]
#[must_use = "Completion 不 await 时动画照常播放，但调用方将无法得知结束时机"]
pub struct Completion {
    receiver: Option<oneshot::Receiver<()>>,
}

impl Completion {
    /// 已完成的信号（没有需要等待的动画）
    pub fn done() -> Self {
        Self { receiver: None }
    }

    /// 创建一对发送端 / 完成信号
    pub(crate) fn channel() -> (oneshot::Sender<()>, Self) {
        let (sender, receiver) = oneshot::channel();
        (
            sender,
            Self {
                receiver: Some(receiver),
            },
        )
    }

    /// 非阻塞地检查是否已完成
    pub fn is_complete(&mut self) -> bool {
        match self.receiver.as_mut() {
            None => true,
            Some(receiver) => match receiver.try_recv() {
                Ok(()) | Err(oneshot::error::TryRecvError::Closed) => {
                    self.receiver = None;
                    true
                }
                Err(oneshot::error::TryRecvError::Empty) => false,
            },
        }
    }
}

impl Future for Completion {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        match this.receiver.as_mut() {
            None => Poll::Ready(()),
            Some(receiver) => match Pin::new(receiver).poll(cx) {
                Poll::Ready(_) => {
                    this.receiver = None;
                    Poll::Ready(())
                }
                Poll::Pending => Poll::Pending,
            },
        }
    }
}
