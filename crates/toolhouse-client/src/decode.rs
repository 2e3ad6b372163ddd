//! Incremental UTF-8 decoding for streamed response bodies.
//!
//! Transport chunk boundaries are arbitrary: a multi-byte character can be
//! split across two reads, so decoding must carry state between chunks
//! rather than treating each chunk as a standalone byte string.

/// Stateful UTF-8 decoder.
///
/// Bytes that end mid-sequence are held back and prepended to the next
/// chunk; such a call can legitimately return `""`. Invalid sequences decode
/// to U+FFFD. Bytes still pending when the stream ends are dropped, matching
/// streaming text decoders that are never given a final flush.
#[derive(Debug, Default)]
pub(crate) struct Utf8Decoder {
    /// Incomplete trailing sequence carried over from the previous chunk.
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk, returning all text complete so far.
    pub(crate) fn decode(&mut self, input: &[u8]) -> String {
        self.pending.extend_from_slice(input);
        let buf = std::mem::take(&mut self.pending);

        let (complete, tail) = buf.split_at(buf.len() - incomplete_tail_len(&buf));
        self.pending = tail.to_vec();

        String::from_utf8_lossy(complete).into_owned()
    }
}

/// Length of a truncated multi-byte sequence at the end of `buf`, or 0.
///
/// A UTF-8 sequence is at most 4 bytes, so the lead byte of a truncated one
/// can only sit within the final 3 bytes. Anything that is not such a
/// truncation (stray continuation bytes, invalid leads) is left in place for
/// the lossy pass to substitute.
fn incomplete_tail_len(buf: &[u8]) -> usize {
    for back in 1..=buf.len().min(3) {
        let needed = match buf[buf.len() - back] {
            0x00..=0x7F => return 0,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            // Continuation or invalid byte: keep looking for the lead.
            _ => continue,
        };
        return if needed > back { back } else { 0 };
    }
    0
}
