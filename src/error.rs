use std::fmt;

/// Why a pair of end points does not form a valid [`Segment`].
///
/// [`Segment`]: crate::Segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentError {
    /// Both end points are equal.
    Degenerate,
    /// At least one coordinate is infinite or NaN.
    NonFinite,
}

impl fmt::Display for SegmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentError::Degenerate => write!(f, "segment has identical end points"),
            SegmentError::NonFinite => write!(f, "segment has a non-finite coordinate"),
        }
    }
}

impl std::error::Error for SegmentError {}

/// Errors reported before a sweep starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The input at `index` is not a valid segment.
    InvalidSegment { index: usize, source: SegmentError },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidSegment { index, source } => {
                write!(f, "invalid segment at index {}: {}", index, source)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidSegment { source, .. } => Some(source),
        }
    }
}
