use std::io::{self, Read};
use std::panic::{self, AssertUnwindSafe};

/// Receives the cumulative byte count after each chunk. Runs on the reading thread.
pub trait ProgressCallback: Send {
    fn on_progress(&mut self, bytes_read: u64);
}

impl<F> ProgressCallback for F
where
    F: FnMut(u64) + Send,
{
    fn on_progress(&mut self, bytes_read: u64) {
        self(bytes_read)
    }
}

/// Reader that counts bytes as they pass through and reports the running total.
/// Transparent to the wrapped source: short reads, EOF, and errors pass through.
pub struct CountingReader<R, C> {
    inner: R,
    callback: C,
    bytes_read: u64,
}

impl<R, C> CountingReader<R, C> {
    pub fn new(inner: R, callback: C) -> Self {
        Self {
            inner,
            callback,
            bytes_read: 0,
        }
    }

    /// Bytes read so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read, C: ProgressCallback> Read for CountingReader<R, C> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.bytes_read += n as u64;
            let total = self.bytes_read;
            let callback = &mut self.callback;
            // Counting is best-effort; a faulty callback must not corrupt the transfer.
            if panic::catch_unwind(AssertUnwindSafe(|| callback.on_progress(total))).is_err() {
                tracing::warn!(bytes_read = total, "progress callback panicked");
            }
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Source that hands out at most `chunk` bytes per read.
    struct Chunked {
        data: Vec<u8>,
        pos: usize,
        chunk: usize,
    }

    impl Read for Chunked {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let end = (self.pos + self.chunk.min(buf.len())).min(self.data.len());
            let n = end - self.pos;
            buf[..n].copy_from_slice(&self.data[self.pos..end]);
            self.pos = end;
            Ok(n)
        }
    }

    #[test]
    fn counts_are_cumulative_and_end_at_total() {
        let data: Vec<u8> = (0u8..=255).cycle().take(10_007).collect();
        for chunk in [1, 7, 1000, 4096, 20_000] {
            let mut seen = Vec::new();
            let source = Chunked {
                data: data.clone(),
                pos: 0,
                chunk,
            };
            let mut reader = CountingReader::new(source, |n: u64| seen.push(n));
            let mut out = Vec::new();
            reader.read_to_end(&mut out).unwrap();
            assert_eq!(out, data);
            assert_eq!(reader.bytes_read(), data.len() as u64);
            drop(reader);
            assert!(seen.windows(2).all(|w| w[0] <= w[1]), "chunk {chunk}");
            assert_eq!(seen.last().copied(), Some(data.len() as u64));
        }
    }

    #[test]
    fn ten_chunks_report_tenths() {
        let data = vec![0u8; 1_000_000];
        let mut seen = Vec::new();
        let source = Chunked {
            data,
            pos: 0,
            chunk: 100_000,
        };
        let mut reader = CountingReader::new(source, |n: u64| seen.push(n));
        let mut buf = vec![0u8; 100_000];
        while reader.read(&mut buf).unwrap() > 0 {}
        drop(reader);
        let expected: Vec<u64> = (1..=10).map(|i| i * 100_000).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn eof_does_not_invoke_callback() {
        let mut calls = 0u32;
        let mut reader = CountingReader::new(Cursor::new(Vec::<u8>::new()), |_: u64| calls += 1);
        let mut buf = [0u8; 16];
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
        drop(reader);
        assert_eq!(calls, 0);
    }

    #[test]
    fn panicking_callback_does_not_break_read() {
        let data = b"payload bytes".to_vec();
        let mut reader = CountingReader::new(Cursor::new(data.clone()), |_: u64| panic!("boom"));
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, data);
        assert_eq!(reader.bytes_read(), data.len() as u64);
    }

    #[test]
    fn errors_pass_through() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            }
        }
        let mut reader = CountingReader::new(Failing, |_: u64| {});
        let err = reader.read(&mut [0u8; 4]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
        assert_eq!(reader.bytes_read(), 0);
    }
}
