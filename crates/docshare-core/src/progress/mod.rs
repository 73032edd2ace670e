//! 上传进度模块
//!
//! 包含:
//! - 进度事件与观察者回调
//! - 包装字节源的进度读取器（支持协作取消）

pub mod reader;

pub use reader::ProgressReader;

use tokio::sync::mpsc;

/// 上传进度事件
///
/// `percent` 为 `floor(sent * 100 / total)`，同一百分比值最多上报一次。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub sent: u64,
    pub total: u64,
    pub percent: u8,
}

/// 进度观察者回调
pub trait ProgressObserver: Send + Sync {
    /// 百分比发生变化时调用
    fn on_progress(&self, sent: u64, total: u64, percent: u8);
}

/// 基于 mpsc 通道的观察者实现
///
/// 通道满时事件被丢弃（`try_send`），不阻塞上传。
pub struct ChannelObserver {
    tx: mpsc::Sender<ProgressEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::Receiver<ProgressEvent>) {
        let (tx, rx) = mpsc::channel(128);
        (Self { tx }, rx)
    }
}

impl ProgressObserver for ChannelObserver {
    fn on_progress(&self, sent: u64, total: u64, percent: u8) {
        let _ = self.tx.try_send(ProgressEvent {
            sent,
            total,
            percent,
        });
    }
}
