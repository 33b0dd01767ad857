use derive_more::Constructor;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::geom::{Dim3D, Vec3U};

/// Extent of a planar buffer in normalized `[0, 1]` domain coordinates.
///
/// `left`/`right` run along the first in-plane axis, `bottom`/`top` along the second.
#[derive(Constructor, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelBounds {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

/// Size of a planar buffer in output samples.
///
/// `width` counts samples along the first in-plane axis, `height` along the second.
#[derive(Constructor, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaneResolution {
    pub height: usize,
    pub width: usize,
}

/// Everything a provider needs to produce one planar cross-section.
#[derive(Constructor, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneRequest {
    /// The axis the plane is perpendicular to.
    pub axis: Dim3D,
    /// Position along `axis`, normalized to `[0, 1)`.
    pub coordinate: f64,
    pub bounds: PixelBounds,
    pub resolution: PlaneResolution,
}

/// A volumetric engine that can cut axis aligned planes out of its fields.
///
/// Implementors resample the plane to exactly `request.resolution`, averaging
/// all native samples that fall into an output cell when the requested
/// resolution is coarser than the native one.
pub trait PlanarBufferProvider {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Native number of samples along `axis`.
    fn resolution(&self, axis: Dim3D) -> usize;

    /// Returns a `height × width` buffer: rows follow the second in-plane
    /// axis, columns the first.
    fn extract_planar_buffer(
        &self,
        field: &str,
        request: &PlaneRequest,
    ) -> Result<Array2<f64>, Self::Error>;

    fn domain_dimensions(&self) -> Vec3U {
        Vec3U::new(
            self.resolution(Dim3D::X),
            self.resolution(Dim3D::Y),
            self.resolution(Dim3D::Z),
        )
    }
}

impl<P: PlanarBufferProvider + ?Sized> PlanarBufferProvider for &P {
    type Error = P::Error;

    fn resolution(&self, axis: Dim3D) -> usize {
        (**self).resolution(axis)
    }

    fn extract_planar_buffer(
        &self,
        field: &str,
        request: &PlaneRequest,
    ) -> Result<Array2<f64>, Self::Error> {
        (**self).extract_planar_buffer(field, request)
    }
}

impl<P: PlanarBufferProvider + ?Sized> PlanarBufferProvider for std::sync::Arc<P> {
    type Error = P::Error;

    fn resolution(&self, axis: Dim3D) -> usize {
        (**self).resolution(axis)
    }

    fn extract_planar_buffer(
        &self,
        field: &str,
        request: &PlaneRequest,
    ) -> Result<Array2<f64>, Self::Error> {
        (**self).extract_planar_buffer(field, request)
    }
}
