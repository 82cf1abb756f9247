//! Incremental UTF-8 decoding of streamed reply chunks
//!
//! The backend streams raw text with no framing, so chunk boundaries can
//! fall in the middle of a multi-byte character. [`Utf8ChunkDecoder`] keeps
//! an incomplete trailing sequence until the next chunk arrives and replaces
//! genuinely invalid bytes with U+FFFD. Decoding never fails.

/// Replacement character substituted for invalid byte sequences
pub const REPLACEMENT: char = '\u{FFFD}';

/// Stateful decoder turning byte chunks into text
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
    replaced: usize,
}

impl Utf8ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk
    ///
    /// Returns the text that is complete after this chunk. Up to three
    /// trailing bytes of an unfinished character are held back.
    ///
    /// # Examples
    ///
    /// ```
    /// use chatline::decode::Utf8ChunkDecoder;
    ///
    /// let bytes = "مرحبا".as_bytes();
    /// let mut decoder = Utf8ChunkDecoder::new();
    /// let mut text = decoder.decode(&bytes[..3]);
    /// text.push_str(&decoder.decode(&bytes[3..]));
    /// text.push_str(&decoder.finish());
    /// assert_eq!(text, "مرحبا");
    /// ```
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        let mut out = String::with_capacity(self.pending.len());
        let mut rest: &[u8] = &self.pending;

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    rest = &[];
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    // `valid_up_to` marks a verified UTF-8 prefix
                    out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                    match e.error_len() {
                        Some(len) => {
                            out.push(REPLACEMENT);
                            self.replaced += 1;
                            rest = &after[len..];
                        }
                        None => {
                            // Incomplete sequence at the end, wait for more bytes
                            rest = after;
                            break;
                        }
                    }
                }
            }
        }

        let remaining = rest.to_vec();
        self.pending = remaining;
        out
    }

    /// Flush at end of stream
    ///
    /// An unfinished trailing sequence becomes a single replacement
    /// character.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        self.pending.clear();
        self.replaced += 1;
        REPLACEMENT.to_string()
    }

    /// Number of invalid sequences replaced so far
    pub fn replaced(&self) -> usize {
        self.replaced
    }
}
