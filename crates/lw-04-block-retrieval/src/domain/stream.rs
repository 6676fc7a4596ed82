//! # Block Range Stream

use std::pin::Pin;
use std::task::{Context, Poll};

use shared_types::CompactBlock;
use tokio::sync::mpsc;
use tokio_stream::{wrappers::ReceiverStream, Stream};

use super::errors::RetrievalError;

/// One element of a range stream.
pub type RangeItem = Result<CompactBlock, RetrievalError>;

/// Blocks of a range in request order, ending after the first error.
///
/// Dropping the stream cancels the producer.
pub struct BlockRangeStream {
    inner: ReceiverStream<RangeItem>,
}

impl BlockRangeStream {
    /// Wrap the consumer end of a producer channel.
    pub fn new(rx: mpsc::Receiver<RangeItem>) -> Self {
        Self {
            inner: ReceiverStream::new(rx),
        }
    }

    /// Stop the producer. Items already buffered can still be read.
    pub fn close(&mut self) {
        self.inner.close();
    }
}

impl Stream for BlockRangeStream {
    type Item = RangeItem;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
