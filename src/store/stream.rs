//! Push-based record streams
//!
//! The store pushes records into a bounded channel; the reader pulls them as
//! a [`Stream`]. A full channel suspends the producer. Calling
//! [`RecordStream::end`] closes the channel so the producer's next send
//! fails and it can stop reading.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::sync::mpsc;

use crate::value::Document;

use super::errors::{StoreError, StoreResult};

/// Opens a record channel with room for `buffer` pending records
pub fn record_channel(buffer: usize) -> (StreamSender, RecordStream) {
    let (sender, receiver) = mpsc::channel(buffer.max(1));
    (StreamSender { sender }, RecordStream { receiver })
}

/// Producer half, held by the store
#[derive(Debug, Clone)]
pub struct StreamSender {
    sender: mpsc::Sender<StoreResult<Document>>,
}

impl StreamSender {
    /// Push one record. Returns false once the reader has ended the stream.
    pub async fn send(&self, document: Document) -> bool {
        self.sender.send(Ok(document)).await.is_ok()
    }

    /// Push an error and close the producer side
    pub async fn fail(self, error: StoreError) {
        let _ = self.sender.send(Err(error)).await;
    }

    /// True once the reader has ended the stream
    pub fn is_ended(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Reader half, handed to the query engine.
///
/// Yields `Ok(document)` per record, `Err` on a store error and `None` at
/// the natural end (every producer dropped).
#[derive(Debug)]
pub struct RecordStream {
    receiver: mpsc::Receiver<StoreResult<Document>>,
}

impl RecordStream {
    /// A stream that replays fixed results and then ends
    pub fn from_results(results: Vec<StoreResult<Document>>) -> Self {
        let (sender, receiver) = mpsc::channel(results.len().max(1));
        for result in results {
            // Capacity covers every item, so try_send cannot fail on space
            let _ = sender.try_send(result);
        }
        Self { receiver }
    }

    /// Stop reading early. Further sends by the producer fail.
    pub fn end(&mut self) {
        self.receiver.close();
    }
}

impl Stream for RecordStream {
    type Item = StoreResult<Document>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn test_from_results_replays_then_ends() {
        let mut stream = RecordStream::from_results(vec![
            Ok(Document::new("a")),
            Err(StoreError::Unavailable("gone".into())),
        ]);

        assert_eq!(stream.next().await.unwrap().unwrap().id, "a");
        assert!(stream.next().await.unwrap().is_err());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_end_stops_producer() {
        let (sender, mut stream) = record_channel(4);
        assert!(sender.send(Document::new("a")).await);

        stream.end();
        assert!(sender.is_ended());
        assert!(!sender.send(Document::new("b")).await);
    }

    #[tokio::test]
    async fn test_dropping_sender_ends_stream() {
        let (sender, mut stream) = record_channel(4);
        assert!(sender.send(Document::new("a")).await);
        drop(sender);

        assert!(stream.next().await.is_some());
        assert!(stream.next().await.is_none());
    }
}
