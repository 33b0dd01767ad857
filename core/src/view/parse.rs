use std::str::FromStr;

use winnow::{
    ascii::{dec_int, space0},
    combinator::{alt, delimited, opt, preceded, separated},
    prelude::*,
};

use super::{
    err::ViewError,
    raw::{RawAxis, RawRange, RawView},
};

fn integer(input: &mut &str) -> PResult<isize> {
    dec_int.try_map(|i: i64| isize::try_from(i)).parse_next(input)
}

fn colon(input: &mut &str) -> PResult<char> {
    delimited(space0, ':', space0).parse_next(input)
}

/// `[start]:[stop][:[step]]`
fn range(input: &mut &str) -> PResult<RawRange> {
    (
        opt(integer),
        colon,
        opt(integer),
        opt(preceded(colon, opt(integer))),
    )
        .map(|(start, _, stop, step)| RawRange::new(start, stop, step.flatten()))
        .parse_next(input)
}

fn axis(input: &mut &str) -> PResult<RawAxis> {
    delimited(
        space0,
        alt((
            "...".value(RawAxis::Ellipsis),
            range.map(RawAxis::Range),
            integer.map(RawAxis::Index),
        )),
        space0,
    )
    .parse_next(input)
}

fn raw_view(input: &mut &str) -> PResult<Vec<RawAxis>> {
    delimited(space0, separated(0.., axis, ','), space0).parse_next(input)
}

/// Parses numpy style index expressions such as `0, :, ::2` or `..., -1`.
///
/// An empty expression selects everything.
impl FromStr for RawView {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        raw_view.parse(s).map(RawView).map_err(|e| ViewError::Syntax {
            input: s.to_owned(),
            at: (e.offset(), 0).into(),
        })
    }
}
