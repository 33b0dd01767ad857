//! Normalization of caller index expressions into explicit per-axis views.
//!
//! A [`RawView`] is whatever the caller wrote: possibly shorter than the field
//! rank, possibly containing an ellipsis, with unset range bounds and negative
//! indices. [`normalize`] turns it into a [`View`] with exactly one resolved
//! [`AxisDescriptor`] per axis, so the extraction code never has to look at
//! raw input again.

pub mod err;
mod parse;
pub mod raw;

use serde::{Deserialize, Serialize};
use tracing::instrument;

pub use err::ViewError;
pub use raw::{RawAxis, RawRange, RawView};

use crate::geom::{Dim3D, Vec3, Vec3U};

/// Number of axes of every field.
pub const RANK: usize = 3;

/// A resolved `start..stop` range sampled every `step` indices.
///
/// Always satisfies `start <= stop` and `step >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisRange {
    pub start: usize,
    pub stop: usize,
    pub step: usize,
}

impl AxisRange {
    pub fn new(start: usize, stop: usize, step: usize) -> Self {
        debug_assert!(step >= 1, "step must be at least 1");
        Self {
            start,
            stop: stop.max(start),
            step,
        }
    }

    /// The whole axis, every sample.
    pub fn full(len: usize) -> Self {
        Self::new(0, len, 1)
    }

    /// Number of output samples, `ceil((stop - start) / step)`.
    pub fn len(&self) -> usize {
        (self.stop - self.start + self.step - 1) / self.step
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Native index of the `k`-th output sample.
    pub fn nth(&self, k: usize) -> usize {
        self.start + k * self.step
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisDescriptor {
    /// Select a single native index, dropping the axis from the result.
    Index(usize),
    Range(AxisRange),
}

impl AxisDescriptor {
    pub fn as_range(&self) -> Option<&AxisRange> {
        match self {
            AxisDescriptor::Range(r) => Some(r),
            AxisDescriptor::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            AxisDescriptor::Index(i) => Some(*i),
            AxisDescriptor::Range(_) => None,
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, AxisDescriptor::Range(_))
    }

    fn resolve(raw: RawAxis, axis: Dim3D, len: usize) -> Result<Self, ViewError> {
        match raw {
            RawAxis::Index(index) => {
                let resolved = if index < 0 {
                    index + len as isize
                } else {
                    index
                };
                if resolved < 0 || resolved >= len as isize {
                    return Err(ViewError::IndexOutOfBounds { axis, index, len });
                }
                Ok(AxisDescriptor::Index(resolved as usize))
            }
            RawAxis::Range(range) => {
                let step = range.step.unwrap_or(1);
                if step < 1 {
                    return Err(ViewError::InvalidStep { axis, step });
                }
                let start = range.start.map_or(0, |s| clamp_bound(s, len));
                let stop = range.stop.map_or(len, |s| clamp_bound(s, len));
                Ok(AxisDescriptor::Range(AxisRange::new(
                    start,
                    stop,
                    step as usize,
                )))
            }
            RawAxis::Ellipsis => Ok(AxisDescriptor::Range(AxisRange::full(len))),
        }
    }
}

/// Negative bounds count from the end, everything is clamped to `0..=len`.
fn clamp_bound(bound: isize, len: usize) -> usize {
    let len = len as isize;
    let bound = if bound < 0 { bound + len } else { bound };
    bound.clamp(0, len) as usize
}

/// A fully resolved view: one descriptor for each of the three axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct View {
    pub axes: Vec3<AxisDescriptor>,
}

impl View {
    pub fn new(axes: Vec3<AxisDescriptor>) -> Self {
        Self { axes }
    }

    /// The view selecting the whole field.
    pub fn full(resolution: Vec3U) -> Self {
        Self::new(resolution.map(|n| AxisDescriptor::Range(AxisRange::full(n))))
    }

    pub fn get(&self, dim: Dim3D) -> &AxisDescriptor {
        &self.axes[dim]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dim3D, AxisDescriptor)> + '_ {
        self.axes.enumerate()
    }

    pub fn ranges(&self) -> impl Iterator<Item = (Dim3D, AxisRange)> + '_ {
        self.iter()
            .filter_map(|(dim, axis)| axis.as_range().map(|r| (dim, *r)))
    }

    pub fn indices(&self) -> impl Iterator<Item = (Dim3D, usize)> + '_ {
        self.iter()
            .filter_map(|(dim, axis)| axis.as_index().map(|i| (dim, i)))
    }

    pub fn range_count(&self) -> usize {
        self.ranges().count()
    }

    /// Output samples along every axis, if all axes are ranges.
    pub fn step_counts(&self) -> Option<Vec3U> {
        Some(Vec3::new(
            self.axes.x.as_range()?.len(),
            self.axes.y.as_range()?.len(),
            self.axes.z.as_range()?.len(),
        ))
    }

    /// Shape of the extracted array, integer axes are dropped.
    pub fn shape(&self) -> Vec<usize> {
        self.ranges().map(|(_, r)| r.len()).collect()
    }

    /// The same view with `dim` collapsed to a single native index.
    pub fn with_index(&self, dim: Dim3D, index: usize) -> View {
        let mut view = *self;
        view.axes[dim] = AxisDescriptor::Index(index);
        view
    }
}

/// Resolves a caller index expression against the field resolution.
///
/// A single ellipsis expands to as many full ranges as are needed to reach
/// three entries, any remaining gap is padded with full ranges on the right.
#[instrument(level = "trace", ret, err)]
pub fn normalize(raw: &RawView, resolution: Vec3U) -> Result<View, ViewError> {
    let entries = raw.entries();

    let ellipses = entries
        .iter()
        .filter(|e| matches!(e, RawAxis::Ellipsis))
        .count();
    if ellipses > 1 {
        return Err(ViewError::MultipleEllipses { count: ellipses });
    }

    let explicit = entries.len() - ellipses;
    if explicit > RANK {
        return Err(ViewError::Shape { got: explicit });
    }

    let mut expanded = Vec::with_capacity(RANK);
    for entry in entries {
        match entry {
            RawAxis::Ellipsis => expanded.extend(
                std::iter::repeat(RawAxis::Range(RawRange::FULL)).take(RANK - explicit),
            ),
            other => expanded.push(*other),
        }
    }
    expanded.resize(RANK, RawAxis::Range(RawRange::FULL));

    let resolve = |dim: Dim3D| AxisDescriptor::resolve(expanded[dim.index()], dim, resolution[dim]);
    Ok(View::new(Vec3::new(
        resolve(Dim3D::X)?,
        resolve(Dim3D::Y)?,
        resolve(Dim3D::Z)?,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RES: Vec3U = Vec3U {
        x: 4,
        y: 5,
        z: 6,
    };

    fn norm(s: &str) -> View {
        normalize(&s.parse().unwrap(), RES).unwrap()
    }

    fn range(start: usize, stop: usize, step: usize) -> AxisDescriptor {
        AxisDescriptor::Range(AxisRange::new(start, stop, step))
    }

    #[test]
    fn step_counts_round_up() {
        assert_eq!(AxisRange::new(0, 4, 1).len(), 4);
        assert_eq!(AxisRange::new(0, 4, 2).len(), 2);
        assert_eq!(AxisRange::new(0, 4, 3).len(), 2);
        assert_eq!(AxisRange::new(0, 4, 5).len(), 1);
        assert_eq!(AxisRange::new(1, 2, 1).len(), 1);
        assert_eq!(AxisRange::new(3, 3, 2).len(), 0);
        assert_eq!(AxisRange::new(3, 1, 1).len(), 0);
    }

    #[test]
    fn pads_missing_axes() {
        assert_eq!(norm(""), View::full(RES));
        assert_eq!(norm(":"), View::full(RES));
        assert_eq!(
            norm("1"),
            View::new(Vec3::new(
                AxisDescriptor::Index(1),
                range(0, 5, 1),
                range(0, 6, 1)
            ))
        );
    }

    #[test]
    fn fills_range_defaults() {
        assert_eq!(
            norm("1:, :3, ::2"),
            View::new(Vec3::new(range(1, 4, 1), range(0, 3, 1), range(0, 6, 2)))
        );
    }

    #[test]
    fn ellipsis_fills_the_gap() {
        for expr in ["...", ":, ...", "..., :", ":, ..., :", ":, :, :, ..."] {
            assert_eq!(norm(expr), View::full(RES), "{expr}");
        }
        assert_eq!(
            norm("..., 2"),
            View::new(Vec3::new(
                range(0, 4, 1),
                range(0, 5, 1),
                AxisDescriptor::Index(2)
            ))
        );
        assert_eq!(
            norm("1, ..., 2"),
            View::new(Vec3::new(
                AxisDescriptor::Index(1),
                range(0, 5, 1),
                AxisDescriptor::Index(2)
            ))
        );
    }

    #[test]
    fn negative_indices_count_from_the_end() {
        assert_eq!(
            norm("-1, -3:, :-1"),
            View::new(Vec3::new(
                AxisDescriptor::Index(3),
                range(2, 5, 1),
                range(0, 5, 1)
            ))
        );
    }

    #[test]
    fn range_bounds_are_clamped() {
        assert_eq!(
            norm("2:100, -100:2, 4:1"),
            View::new(Vec3::new(range(2, 4, 1), range(0, 2, 1), range(4, 4, 1)))
        );
    }

    #[test]
    fn too_many_indices() {
        let err = normalize(&"0, 0, 0, 0".parse().unwrap(), RES).unwrap_err();
        assert!(matches!(err, ViewError::Shape { got: 4 }));

        let err = normalize(&":, :, :, ...,  :".parse().unwrap(), RES).unwrap_err();
        assert!(matches!(err, ViewError::Shape { got: 4 }));
    }

    #[test]
    fn multiple_ellipses() {
        let err = normalize(&"..., 0, ...".parse().unwrap(), RES).unwrap_err();
        assert!(matches!(err, ViewError::MultipleEllipses { count: 2 }));
    }

    #[test]
    fn out_of_bounds() {
        let err = normalize(&"4".parse().unwrap(), RES).unwrap_err();
        assert!(matches!(
            err,
            ViewError::IndexOutOfBounds {
                axis: Dim3D::X,
                index: 4,
                len: 4
            }
        ));

        let err = normalize(&":, -6".parse().unwrap(), RES).unwrap_err();
        assert!(matches!(
            err,
            ViewError::IndexOutOfBounds {
                axis: Dim3D::Y,
                ..
            }
        ));
    }

    #[test]
    fn invalid_step() {
        for expr in ["::0", ":, ::-1"] {
            let err = normalize(&expr.parse().unwrap(), RES).unwrap_err();
            assert!(matches!(err, ViewError::InvalidStep { .. }), "{expr}");
        }
    }

    #[test]
    fn step_counts_need_all_ranges() {
        assert_eq!(norm(":, ::2, 1:4:2").step_counts(), Some(Vec3::new(4, 3, 2)));
        assert_eq!(norm("0").step_counts(), None);
        assert_eq!(norm("0, ::2").shape(), vec![3, 6]);
    }
}
