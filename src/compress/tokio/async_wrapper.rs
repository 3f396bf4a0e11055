use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::AsyncWrite;

/// Counts the bytes that went through to the inner writer.
#[derive(Debug)]
pub struct AsyncWriteWrapper<W: AsyncWrite + Unpin> {
    writer: W,
    written_bytes_count: u64,
}

impl<W: AsyncWrite + Unpin> AsyncWriteWrapper<W> {
    pub fn new(w: W) -> AsyncWriteWrapper<W> {
        Self {
            writer: w,
            written_bytes_count: 0,
        }
    }

    pub fn get_written_bytes_count(&self) -> u64 {
        self.written_bytes_count
    }

    pub fn retrieve_writer(self) -> W {
        self.writer
    }
}

impl<W: AsyncWrite + Unpin> AsyncWrite for AsyncWriteWrapper<W> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<Result<usize, std::io::Error>> {
        let wrapper = self.get_mut();

        Pin::new(&mut wrapper.writer)
            .poll_write(cx, buf)
            .map_ok(|nb_byte_written| {
                wrapper.written_bytes_count += nb_byte_written as u64;
                nb_byte_written
            })
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), std::io::Error>> {
        Pin::new(&mut self.get_mut().writer).poll_flush(cx)
    }

    fn poll_shutdown(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<(), std::io::Error>> {
        Pin::new(&mut self.get_mut().writer).poll_shutdown(cx)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn counts_written_bytes() {
        let mut wrapper = AsyncWriteWrapper::new(Vec::new());
        wrapper.write_all(b"hello").await.unwrap();
        wrapper.write_all(b" world").await.unwrap();

        assert_eq!(wrapper.get_written_bytes_count(), 11);
        assert_eq!(wrapper.retrieve_writer(), b"hello world");
    }
}
