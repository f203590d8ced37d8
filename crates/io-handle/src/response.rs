/// An opaque message framed off the transport.
///
/// The terminator byte that ended the frame (`;` for Kenwood HF) is kept
/// in `bytes` rather than stripped; callers that need to match a prefix
/// operate on the raw frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoResponse {
    bytes: Vec<u8>,
}

impl IoResponse {
    /// Wraps a raw frame.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// The frame's bytes, including its terminator.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether `match_bytes` occurs starting at `match_pos`.
    #[must_use]
    pub fn matches_at(&self, match_pos: usize, match_bytes: &[u8]) -> bool {
        self.bytes
            .get(match_pos..match_pos + match_bytes.len())
            .is_some_and(|slice| slice == match_bytes)
    }
}
