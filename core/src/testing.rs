use std::cell::RefCell;

use ndarray::{Array, Array2, Array3};

use crate::{
    geom::Dim3D,
    grid::UniformGrid,
    provider::{PlanarBufferProvider, PlaneRequest},
};

/// `0..64` reshaped to `4 × 4 × 4`.
pub fn sequential() -> Array3<f64> {
    Array::range(0.0, 64.0, 1.0).into_shape((4, 4, 4)).unwrap()
}

pub fn sequential_grid() -> UniformGrid {
    UniformGrid::from_field("data", sequential())
}

/// Wraps a provider and remembers every request passed through it.
pub struct Recording<P> {
    pub inner: P,
    pub requests: RefCell<Vec<PlaneRequest>>,
}

impl<P> Recording<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl<P: PlanarBufferProvider> PlanarBufferProvider for Recording<P> {
    type Error = P::Error;

    fn resolution(&self, axis: Dim3D) -> usize {
        self.inner.resolution(axis)
    }

    fn extract_planar_buffer(
        &self,
        field: &str,
        request: &PlaneRequest,
    ) -> Result<Array2<f64>, Self::Error> {
        self.requests.borrow_mut().push(*request);
        self.inner.extract_planar_buffer(field, request)
    }
}
