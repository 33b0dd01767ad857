use thiserror::Error;

use crate::view::ViewError;

#[derive(Debug, Error)]
pub enum ExtractError<E: std::error::Error + 'static> {
    #[error(transparent)]
    View(#[from] ViewError),

    /// Fewer than two axes are ranges, i.e. a line or a single point was requested.
    #[error("Unsupported view: {ranges} of 3 axes are ranges, line and point extraction is not implemented")]
    UnsupportedView { ranges: usize },

    #[error("Provider returned a {got:?} buffer, expected {expected:?}")]
    BufferShape {
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("Planar buffer provider failed: {0}")]
    Provider(#[source] E),
}
