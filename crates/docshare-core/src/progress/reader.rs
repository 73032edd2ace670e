//! 进度读取器
//!
//! 包装一个已知总长度的 `AsyncRead` 字节源:
//! - 每次读取后按整数百分比上报进度，同一百分比只上报一次
//! - 每个读取边界检查取消信号，取消后读取以 `Interrupted` 失败
//!
//! 上传时通过 `tokio_util::io::ReaderStream` 转为请求体流。

use crate::progress::ProgressObserver;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};
use tokio_util::sync::CancellationToken;

/// 带进度上报和取消支持的读取器
pub struct ProgressReader<R> {
    inner: R,
    cancel: CancellationToken,
    observer: Arc<dyn ProgressObserver>,
    total: u64,
    sent: u64,
    last_percent: i32,
}

impl<R: AsyncRead + Unpin> ProgressReader<R> {
    pub fn new(
        inner: R,
        total: u64,
        cancel: CancellationToken,
        observer: Arc<dyn ProgressObserver>,
    ) -> Self {
        Self {
            inner,
            cancel,
            observer,
            total,
            sent: 0,
            last_percent: -1,
        }
    }

    /// 已读取的字节数
    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for ProgressReader<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();

        // 每个读取边界检查一次，保证大文件传输也能及时中止
        if this.cancel.is_cancelled() {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::Interrupted,
                "upload cancelled",
            )));
        }

        let before = buf.filled().len();
        match Pin::new(&mut this.inner).poll_read(cx, buf) {
            Poll::Ready(Ok(())) => {
                let n = buf.filled().len() - before;
                this.sent += n as u64;

                let percent = if this.total > 0 {
                    ((this.sent * 100) / this.total) as i32
                } else {
                    0
                };

                // 百分比未变化时不上报，避免事件风暴
                if percent != this.last_percent && percent <= 100 {
                    this.last_percent = percent;
                    this.observer.on_progress(this.sent, this.total, percent as u8);
                }

                Poll::Ready(Ok(()))
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressEvent;
    use std::io::Cursor;
    use std::sync::Mutex;
    use tokio::io::AsyncReadExt;

    /// 收集所有事件的测试观察者
    #[derive(Default)]
    struct CollectObserver {
        events: Mutex<Vec<ProgressEvent>>,
    }

    impl ProgressObserver for CollectObserver {
        fn on_progress(&self, sent: u64, total: u64, percent: u8) {
            self.events.lock().unwrap().push(ProgressEvent {
                sent,
                total,
                percent,
            });
        }
    }

    async fn drain_in_chunks<R: AsyncRead + Unpin>(reader: &mut R, chunk: usize) -> u64 {
        let mut buf = vec![0u8; chunk];
        let mut total = 0u64;
        loop {
            let n = reader.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            total += n as u64;
        }
        total
    }

    #[tokio::test]
    async fn test_percent_events_are_strictly_increasing_and_end_at_100() {
        let data = vec![0u8; 1000];
        let observer = Arc::new(CollectObserver::default());
        let mut reader = ProgressReader::new(
            Cursor::new(data),
            1000,
            CancellationToken::new(),
            observer.clone(),
        );

        let read = drain_in_chunks(&mut reader, 137).await;
        assert_eq!(read, 1000);

        let events = observer.events.lock().unwrap();
        assert!(!events.is_empty());
        assert_eq!(events.last().unwrap().percent, 100);
        assert_eq!(events.last().unwrap().sent, 1000);

        for pair in events.windows(2) {
            assert!(
                pair[1].percent > pair[0].percent,
                "percent not strictly increasing: {} -> {}",
                pair[0].percent,
                pair[1].percent
            );
        }
    }

    #[tokio::test]
    async fn test_at_most_101_events_for_many_small_chunks() {
        let data = vec![0u8; 500];
        let observer = Arc::new(CollectObserver::default());
        let mut reader = ProgressReader::new(
            Cursor::new(data),
            500,
            CancellationToken::new(),
            observer.clone(),
        );

        drain_in_chunks(&mut reader, 1).await;

        let events = observer.events.lock().unwrap();
        assert!(events.len() <= 101, "too many events: {}", events.len());
    }

    #[tokio::test]
    async fn test_zero_total_reports_zero_percent() {
        let observer = Arc::new(CollectObserver::default());
        let mut reader = ProgressReader::new(
            Cursor::new(Vec::new()),
            0,
            CancellationToken::new(),
            observer.clone(),
        );

        drain_in_chunks(&mut reader, 64).await;

        let events = observer.events.lock().unwrap();
        assert!(events.iter().all(|e| e.percent == 0));
    }

    #[tokio::test]
    async fn test_cancelled_token_fails_read_with_interrupted() {
        let token = CancellationToken::new();
        token.cancel();

        let mut reader = ProgressReader::new(
            Cursor::new(vec![0u8; 100]),
            100,
            token,
            Arc::new(CollectObserver::default()),
        );

        let mut buf = [0u8; 10];
        let err = reader.read(&mut buf).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Interrupted);
    }

    #[tokio::test]
    async fn test_cancellation_mid_transfer_stops_subsequent_reads() {
        let token = CancellationToken::new();
        let mut reader = ProgressReader::new(
            Cursor::new(vec![0u8; 100]),
            100,
            token.clone(),
            Arc::new(CollectObserver::default()),
        );

        let mut buf = [0u8; 10];
        let n = reader.read(&mut buf).await.unwrap();
        assert_eq!(n, 10);

        token.cancel();

        let err = reader.read(&mut buf).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Interrupted);
        assert_eq!(reader.sent(), 10);
    }
}
