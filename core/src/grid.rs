//! In-memory [`PlanarBufferProvider`] over a uniform grid spanning the unit cube.

use std::collections::HashMap;

use miette::Diagnostic;
use ndarray::{Array2, Array3, ArrayView2, Zip};
use thiserror::Error;
use tracing::{instrument, trace};

use crate::{
    geom::{Dim3D, Vec3U},
    provider::{PixelBounds, PlanarBufferProvider, PlaneRequest},
};

#[derive(Debug, Error, Diagnostic)]
pub enum GridError {
    #[error("Unknown field '{0}'")]
    #[diagnostic(code(fieldslice::grid::unknown_field))]
    UnknownField(String),

    #[error("Field '{name}' has dimensions {got:?}, but the grid is {expected:?}")]
    #[diagnostic(code(fieldslice::grid::dimension_mismatch))]
    DimensionMismatch {
        name: String,
        expected: Vec3U,
        got: Vec3U,
    },

    #[error("Plane coordinate {coordinate} on axis {axis:?} lies outside of the domain [0, 1)")]
    #[diagnostic(code(fieldslice::grid::coordinate_out_of_domain))]
    CoordinateOutOfDomain { axis: Dim3D, coordinate: f64 },

    #[error("Invalid pixel bounds {0:?}")]
    #[diagnostic(code(fieldslice::grid::invalid_bounds))]
    InvalidBounds(PixelBounds),
}

/// Named scalar fields sharing one set of domain dimensions.
///
/// Cell `i` of an axis with `n` cells covers `[i / n, (i + 1) / n)` of the domain.
#[derive(Debug, Clone)]
pub struct UniformGrid {
    dimensions: Vec3U,
    fields: HashMap<String, Array3<f64>>,
}

impl UniformGrid {
    pub fn new(dimensions: Vec3U) -> Self {
        Self {
            dimensions,
            fields: HashMap::new(),
        }
    }

    /// A grid holding a single field, dimensioned after it.
    pub fn from_field(name: impl Into<String>, data: Array3<f64>) -> Self {
        let mut fields = HashMap::new();
        let dimensions = Vec3U::from(data.dim());
        fields.insert(name.into(), data);
        Self { dimensions, fields }
    }

    pub fn insert(&mut self, name: impl Into<String>, data: Array3<f64>) -> Result<(), GridError> {
        let name = name.into();
        let got = Vec3U::from(data.dim());
        if got != self.dimensions {
            return Err(GridError::DimensionMismatch {
                name,
                expected: self.dimensions,
                got,
            });
        }
        self.fields.insert(name, data);
        Ok(())
    }

    pub fn field(&self, name: &str) -> Option<&Array3<f64>> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Inverse of `index / (n - 1)`, rounding to the nearest native plane.
    fn plane_index(&self, axis: Dim3D, coordinate: f64) -> Result<usize, GridError> {
        let n = self.dimensions[axis];
        if n == 0 || !(0.0..1.0).contains(&coordinate) {
            return Err(GridError::CoordinateOutOfDomain { axis, coordinate });
        }
        Ok(((coordinate * (n - 1) as f64).round() as usize).min(n - 1))
    }
}

/// Assigns the native samples covered by `lo..hi` to `cells` equally wide output cells.
///
/// Returns the first covered native index and, for every covered native
/// sample, the output cell its center falls into. Integer arithmetic keeps
/// samples centered exactly on a cell border in the upper cell.
fn cell_bins(lo: f64, hi: f64, n: usize, cells: usize) -> Option<(usize, Vec<usize>)> {
    if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo > hi {
        return None;
    }
    let first = (lo * n as f64).round() as usize;
    let last = (hi * n as f64).round() as usize;
    let covered = last - first;

    let bins = (0..covered)
        .map(|offset| ((2 * offset + 1) * cells) / (2 * covered))
        .collect();
    Some((first, bins))
}

/// Box filter of `plane` (first in-plane axis, second in-plane axis) into a
/// `height × width` buffer. Cells without any native sample are `NaN`.
fn box_filter(
    plane: ArrayView2<f64>,
    request: &PlaneRequest,
) -> Result<Array2<f64>, GridError> {
    let (nx, ny) = plane.dim();
    let bounds = request.bounds;
    let resolution = request.resolution;

    let (x0, x_bins) = cell_bins(bounds.left, bounds.right, nx, resolution.width)
        .ok_or(GridError::InvalidBounds(bounds))?;
    let (y0, y_bins) = cell_bins(bounds.bottom, bounds.top, ny, resolution.height)
        .ok_or(GridError::InvalidBounds(bounds))?;

    let shape = (resolution.height, resolution.width);
    let mut sums = Array2::<f64>::zeros(shape);
    let mut counts = Array2::<usize>::zeros(shape);
    for (dx, &jx) in x_bins.iter().enumerate() {
        for (dy, &jy) in y_bins.iter().enumerate() {
            sums[(jy, jx)] += plane[(x0 + dx, y0 + dy)];
            counts[(jy, jx)] += 1;
        }
    }

    Zip::from(&mut sums).and(&counts).for_each(|sum, &count| {
        *sum = if count == 0 {
            f64::NAN
        } else {
            *sum / count as f64
        };
    });
    Ok(sums)
}

impl PlanarBufferProvider for UniformGrid {
    type Error = GridError;

    fn resolution(&self, axis: Dim3D) -> usize {
        self.dimensions[axis]
    }

    #[instrument(level = "trace", skip(self))]
    fn extract_planar_buffer(
        &self,
        field: &str,
        request: &PlaneRequest,
    ) -> Result<Array2<f64>, Self::Error> {
        let data = self
            .fields
            .get(field)
            .ok_or_else(|| GridError::UnknownField(field.to_string()))?;

        let index = self.plane_index(request.axis, request.coordinate)?;
        trace!(index, "Selected native plane");

        box_filter(data.index_axis(request.axis.as_axis(), index), request)
    }
}
