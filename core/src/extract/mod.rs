//! Planar and volumetric extraction on top of a [`PlanarBufferProvider`].

pub mod err;

use ndarray::{Array2, Array3, ArrayD};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

pub use err::ExtractError;

use crate::{
    geom::{Dim3D, Vec3U},
    provider::{PixelBounds, PlanarBufferProvider, PlaneRequest, PlaneResolution},
    view::{normalize, RawView, View, ViewError},
};

/// Distance kept from the upper domain border, which providers reject.
pub const PLANE_EDGE_EPSILON: f64 = 1e-6;

/// Result of an extraction, its rank depends on how many axes were collapsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Extraction {
    Plane(Array2<f64>),
    Volume(Array3<f64>),
}

impl Extraction {
    pub fn shape(&self) -> &[usize] {
        match self {
            Extraction::Plane(a) => a.shape(),
            Extraction::Volume(a) => a.shape(),
        }
    }

    pub fn into_dyn(self) -> ArrayD<f64> {
        match self {
            Extraction::Plane(a) => a.into_dyn(),
            Extraction::Volume(a) => a.into_dyn(),
        }
    }

    pub fn into_plane(self) -> Option<Array2<f64>> {
        match self {
            Extraction::Plane(a) => Some(a),
            Extraction::Volume(_) => None,
        }
    }

    pub fn into_volume(self) -> Option<Array3<f64>> {
        match self {
            Extraction::Volume(a) => Some(a),
            Extraction::Plane(_) => None,
        }
    }
}

/// Normalized position of native plane `index` on an axis with `len` samples.
///
/// The last plane would map to exactly `1`, which lies outside the domain, so
/// it is pulled back by [`PLANE_EDGE_EPSILON`].
pub fn plane_coordinate(index: usize, len: usize) -> f64 {
    if len <= 1 {
        return 0.0;
    }
    let coordinate = index as f64 / (len - 1) as f64;
    if coordinate == 1.0 {
        1.0 - PLANE_EDGE_EPSILON
    } else {
        coordinate
    }
}

fn fraction(value: usize, len: usize) -> f64 {
    if len == 0 {
        0.0
    } else {
        value as f64 / len as f64
    }
}

/// A named field of a volumetric engine that can be indexed like a numpy array.
///
/// ```
/// # use fieldslice_core::{extract::SliceField, grid::UniformGrid, view::RawRange};
/// # use ndarray::Array;
/// let data = Array::range(0.0, 64.0, 1.0).into_shape((4, 4, 4)).unwrap();
/// let field = SliceField::new(UniformGrid::from_field("data", data), "data");
///
/// // field[0, :, ::2]
/// let plane = field.get((0, .., RawRange::every(2))).unwrap();
/// assert_eq!(plane.shape(), [4, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct SliceField<P> {
    provider: P,
    field: String,
}

impl<P: PlanarBufferProvider> SliceField<P> {
    pub fn new(provider: P, field: impl Into<String>) -> Self {
        Self {
            provider,
            field: field.into(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn domain_dimensions(&self) -> Vec3U {
        self.provider.domain_dimensions()
    }

    pub fn normalize(&self, raw: &RawView) -> Result<View, ViewError> {
        normalize(raw, self.domain_dimensions())
    }

    /// `field[view]`: normalizes the expression and extracts a plane or a volume.
    #[instrument(skip_all, fields(field = %self.field))]
    pub fn get(&self, view: impl Into<RawView>) -> Result<Extraction, ExtractError<P::Error>> {
        let view = self.normalize(&view.into())?;
        self.extract(&view)
    }

    pub fn extract(&self, view: &View) -> Result<Extraction, ExtractError<P::Error>> {
        match view.range_count() {
            3 => self.extract_volume(view).map(Extraction::Volume),
            2 => self.extract_plane(view).map(Extraction::Plane),
            ranges => Err(ExtractError::UnsupportedView { ranges }),
        }
    }

    /// Builds the provider request for a view with exactly one integer axis.
    pub fn plane_request(&self, view: &View) -> Result<PlaneRequest, ExtractError<P::Error>> {
        let unsupported = || ExtractError::UnsupportedView {
            ranges: view.range_count(),
        };

        let mut indices = view.indices();
        let (axis, index) = match (indices.next(), indices.next()) {
            (Some(collapsed), None) => collapsed,
            _ => return Err(unsupported()),
        };

        let mut ranges = view.ranges();
        let (Some((x_dim, x)), Some((y_dim, y))) = (ranges.next(), ranges.next()) else {
            return Err(unsupported());
        };

        let nx = self.provider.resolution(x_dim);
        let ny = self.provider.resolution(y_dim);

        Ok(PlaneRequest::new(
            axis,
            plane_coordinate(index, self.provider.resolution(axis)),
            PixelBounds::new(
                fraction(x.start, nx),
                fraction(x.stop, nx),
                fraction(y.start, ny),
                fraction(y.stop, ny),
            ),
            PlaneResolution::new(y.len(), x.len()),
        ))
    }

    /// Extracts a 2D cross-section, axes in the order they appear in `view`.
    ///
    /// Strides on either range are served by the provider's box filter.
    pub fn extract_plane(&self, view: &View) -> Result<Array2<f64>, ExtractError<P::Error>> {
        let request = self.plane_request(view)?;
        trace!(?request, "Requesting planar buffer");

        let buffer = self
            .provider
            .extract_planar_buffer(&self.field, &request)
            .map_err(ExtractError::Provider)?;

        let expected = (request.resolution.height, request.resolution.width);
        if buffer.dim() != expected {
            return Err(ExtractError::BufferShape {
                expected,
                got: buffer.dim(),
            });
        }

        Ok(buffer.reversed_axes())
    }

    /// Assembles a 3D sub-volume from one planar extraction per output sample
    /// along the axis with the fewest output samples.
    ///
    /// Along that axis the volume is point sampled at `start + k * step`, the
    /// other two axes are box filtered.
    pub fn extract_volume(&self, view: &View) -> Result<Array3<f64>, ExtractError<P::Error>> {
        let counts = view.step_counts().ok_or(ExtractError::UnsupportedView {
            ranges: view.range_count(),
        })?;

        let (axis, planes) = counts
            .enumerate()
            .min_by_key(|(_, count)| *count)
            .unwrap_or((Dim3D::X, counts.x));
        debug!(?axis, planes, ?counts, "Assembling volume");

        let range = *view
            .get(axis)
            .as_range()
            .ok_or(ExtractError::UnsupportedView {
                ranges: view.range_count(),
            })?;

        let mut result = Array3::zeros(<(usize, usize, usize)>::from(counts));
        for k in 0..planes {
            let index = range.nth(k);
            debug_assert!(index < range.stop, "plane {index} outside of {range:?}");

            let plane = self.extract_plane(&view.with_index(axis, index))?;
            result.index_axis_mut(axis.as_axis(), k).assign(&plane);
        }

        Ok(result)
    }
}
