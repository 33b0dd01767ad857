use std::ops::{Index, IndexMut};

use derive_more::Constructor;
use serde::{Deserialize, Serialize};

/// One of the three axes of a field, in storage order.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Dim3D {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Dim3D {
    pub fn iter() -> impl Iterator<Item = Dim3D> {
        [Dim3D::X, Dim3D::Y, Dim3D::Z].into_iter()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_axis(self) -> ndarray::Axis {
        ndarray::Axis(self.index())
    }
}

#[derive(Constructor, Default, PartialEq, Eq, Debug, Copy, Clone, Hash, Serialize, Deserialize)]
pub struct Vec3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

pub type Vec3U = Vec3<usize>;

impl<T> From<(T, T, T)> for Vec3<T> {
    fn from((x, y, z): (T, T, T)) -> Self {
        Vec3 { x, y, z }
    }
}

impl<T> From<Vec3<T>> for (T, T, T) {
    fn from(v: Vec3<T>) -> Self {
        (v.x, v.y, v.z)
    }
}

impl<T> Vec3<T> {
    pub fn iter<'a>(&self) -> impl Iterator<Item = T> + 'a
    where
        T: Copy + 'a,
    {
        [self.x, self.y, self.z].into_iter()
    }

    pub fn enumerate<'a>(&self) -> impl Iterator<Item = (Dim3D, T)> + 'a
    where
        T: Copy + 'a,
    {
        Dim3D::iter().zip(self.iter())
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Vec3<U> {
        Vec3::new(f(self.x), f(self.y), f(self.z))
    }
}

impl Vec3U {
    /// Number of elements in a dense array of this shape.
    pub fn volume(&self) -> usize {
        self.x * self.y * self.z
    }
}

impl<T> Index<Dim3D> for Vec3<T> {
    type Output = T;

    fn index(&self, i: Dim3D) -> &T {
        match i {
            Dim3D::X => &self.x,
            Dim3D::Y => &self.y,
            Dim3D::Z => &self.z,
        }
    }
}

impl<T> IndexMut<Dim3D> for Vec3<T> {
    fn index_mut(&mut self, i: Dim3D) -> &mut T {
        match i {
            Dim3D::X => &mut self.x,
            Dim3D::Y => &mut self.y,
            Dim3D::Z => &mut self.z,
        }
    }
}
