use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use serde::{Deserialize, Serialize};

/// An unresolved `start:stop:step` triple, as written by the caller.
///
/// Missing parts are filled in against the axis resolution during normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawRange {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl RawRange {
    /// `:`
    pub const FULL: RawRange = RawRange {
        start: None,
        stop: None,
        step: None,
    };

    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Self { start, stop, step }
    }

    /// `::step`
    pub fn every(step: isize) -> Self {
        Self {
            step: Some(step),
            ..Self::FULL
        }
    }

    /// `start:stop`
    pub fn between(start: isize, stop: isize) -> Self {
        Self {
            start: Some(start),
            stop: Some(stop),
            step: None,
        }
    }
}

/// A single entry of a caller supplied index expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RawAxis {
    Index(isize),
    Range(RawRange),
    Ellipsis,
}

/// An index expression before normalization, e.g. `0, :, ::2`.
///
/// May be shorter than the field rank and may contain an ellipsis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawView(pub Vec<RawAxis>);

impl RawView {
    pub fn entries(&self) -> &[RawAxis] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<isize> for RawAxis {
    fn from(i: isize) -> Self {
        RawAxis::Index(i)
    }
}

impl From<i32> for RawAxis {
    fn from(i: i32) -> Self {
        RawAxis::Index(i as isize)
    }
}

impl From<RawRange> for RawAxis {
    fn from(r: RawRange) -> Self {
        RawAxis::Range(r)
    }
}

impl From<RangeFull> for RawAxis {
    fn from(_: RangeFull) -> Self {
        RawAxis::Range(RawRange::FULL)
    }
}

impl From<Range<isize>> for RawAxis {
    fn from(r: Range<isize>) -> Self {
        RawAxis::Range(RawRange::between(r.start, r.end))
    }
}

impl From<RangeFrom<isize>> for RawAxis {
    fn from(r: RangeFrom<isize>) -> Self {
        RawAxis::Range(RawRange::new(Some(r.start), None, None))
    }
}

impl From<RangeTo<isize>> for RawAxis {
    fn from(r: RangeTo<isize>) -> Self {
        RawAxis::Range(RawRange::new(None, Some(r.end), None))
    }
}

/// Single entries are wrapped into a length-1 expression.
macro_rules! impl_from_single {
    ($($t:ty),+) => {
        $(
            impl From<$t> for RawView {
                fn from(axis: $t) -> Self {
                    RawView(vec![axis.into()])
                }
            }
        )+
    };
}

impl_from_single!(
    RawAxis,
    isize,
    i32,
    RawRange,
    RangeFull,
    Range<isize>,
    RangeFrom<isize>,
    RangeTo<isize>
);

impl From<Vec<RawAxis>> for RawView {
    fn from(axes: Vec<RawAxis>) -> Self {
        RawView(axes)
    }
}

impl<A: Into<RawAxis>, B: Into<RawAxis>> From<(A, B)> for RawView {
    fn from((a, b): (A, B)) -> Self {
        RawView(vec![a.into(), b.into()])
    }
}

impl<A: Into<RawAxis>, B: Into<RawAxis>, C: Into<RawAxis>> From<(A, B, C)> for RawView {
    fn from((a, b, c): (A, B, C)) -> Self {
        RawView(vec![a.into(), b.into(), c.into()])
    }
}

impl<A, B, C, D> From<(A, B, C, D)> for RawView
where
    A: Into<RawAxis>,
    B: Into<RawAxis>,
    C: Into<RawAxis>,
    D: Into<RawAxis>,
{
    fn from((a, b, c, d): (A, B, C, D)) -> Self {
        RawView(vec![a.into(), b.into(), c.into(), d.into()])
    }
}
