use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::geom::Dim3D;

#[derive(Debug, Error, Diagnostic)]
pub enum ViewError {
    #[error("Too many indices: got {got}, but the field only has 3 axes")]
    #[diagnostic(code(fieldslice::view::shape))]
    Shape { got: usize },

    #[error("An index can only have a single ellipsis, found {count}")]
    #[diagnostic(code(fieldslice::view::multiple_ellipses))]
    MultipleEllipses { count: usize },

    #[error("Index {index} is out of bounds for axis {axis:?} with resolution {len}")]
    #[diagnostic(code(fieldslice::view::out_of_bounds))]
    IndexOutOfBounds {
        axis: Dim3D,
        index: isize,
        len: usize,
    },

    #[error("Invalid step {step} on axis {axis:?}")]
    #[diagnostic(
        code(fieldslice::view::invalid_step),
        help("Steps must be at least 1, reversed slicing is not supported")
    )]
    InvalidStep { axis: Dim3D, step: isize },

    #[error("Invalid index expression")]
    #[diagnostic(
        code(fieldslice::view::syntax),
        help("Expected comma separated entries of the form `3`, `1:4`, `::2` or `...`")
    )]
    Syntax {
        #[source_code]
        input: String,
        #[label("Unexpected input here")]
        at: SourceSpan,
    },
}
