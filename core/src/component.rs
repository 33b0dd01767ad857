//! A data component that serves planar views through a volumetric engine and
//! everything else from the plain in-memory array.

use ndarray::{Array3, ArrayD, Slice};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    extract::{ExtractError, SliceField},
    geom::Vec3U,
    provider::PlanarBufferProvider,
    view::{AxisDescriptor, RawView, View},
};

#[derive(Debug, Error)]
pub enum ComponentError<E: std::error::Error + 'static> {
    #[error("In-memory data has dimensions {data:?}, but the field has {field:?}")]
    DimensionMismatch { data: Vec3U, field: Vec3U },

    #[error(transparent)]
    Extract(#[from] ExtractError<E>),
}

pub struct FieldComponent<P> {
    data: Array3<f64>,
    field: SliceField<P>,
    last: Mutex<Option<(View, ArrayD<f64>)>>,
}

impl<P: PlanarBufferProvider> FieldComponent<P> {
    pub fn new(data: Array3<f64>, field: SliceField<P>) -> Result<Self, ComponentError<P::Error>> {
        let dims = Vec3U::from(data.dim());
        if dims != field.domain_dimensions() {
            return Err(ComponentError::DimensionMismatch {
                data: dims,
                field: field.domain_dimensions(),
            });
        }

        Ok(Self {
            data,
            field,
            last: Mutex::new(None),
        })
    }

    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    pub fn field(&self) -> &SliceField<P> {
        &self.field
    }

    pub fn clear_cache(&self) {
        *self.last.lock() = None;
    }

    /// Views collapsing exactly one axis go through the provider and the result
    /// of the most recent one is reused for an identical view. Volumes, lines
    /// and points are sliced from the in-memory data without any resampling.
    #[instrument(skip_all, fields(field = self.field.field()))]
    pub fn get(&self, view: impl Into<RawView>) -> Result<ArrayD<f64>, ComponentError<P::Error>> {
        let view = self
            .field
            .normalize(&view.into())
            .map_err(ExtractError::<P::Error>::from)?;

        if view.indices().count() != 1 {
            debug!(?view, "Not a planar view, slicing in-memory data");
            return Ok(slice_in_memory(&self.data, &view));
        }

        if let Some((last_view, result)) = &*self.last.lock() {
            if *last_view == view {
                debug!("Cache hit");
                return Ok(result.clone());
            }
        }

        debug!(?view, "Cache miss, extracting through provider");
        let result = self.field.extract(&view)?.into_dyn();
        *self.last.lock() = Some((view, result.clone()));
        Ok(result)
    }
}

fn slice_in_memory(data: &Array3<f64>, view: &View) -> ArrayD<f64> {
    let mut sliced = data.view().into_dyn();
    // Back to front, so removing an axis never shifts the ones still to come.
    let axes: Vec<_> = view.iter().collect();
    for (dim, axis) in axes.into_iter().rev() {
        match axis {
            AxisDescriptor::Index(i) => sliced = sliced.index_axis_move(dim.as_axis(), i),
            AxisDescriptor::Range(r) => sliced.slice_axis_inplace(
                dim.as_axis(),
                Slice::new(r.start as isize, Some(r.stop as isize), r.step as isize),
            ),
        }
    }
    sliced.to_owned()
}
