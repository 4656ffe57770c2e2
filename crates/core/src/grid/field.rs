//! Flat 3D scalar field storage
//!
//! Every simulated quantity (one velocity component, density, pressure, ...)
//! lives in its own `ScalarField`, giving the solver a struct-of-arrays layout
//! where each relaxation sweep streams through a single contiguous buffer.

/// Grid dimensions shared by every field of a room
///
/// Cells are stored in row-major order with z as the slowest axis:
/// `index = z * (nx * ny) + y * nx + x`. One z-layer (`nx * ny` values) is the
/// unit of work for the parallel sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridDims {
    /// Cells along x (room width)
    pub nx: usize,
    /// Cells along y (room height)
    pub ny: usize,
    /// Cells along z (room depth)
    pub nz: usize,
}

impl GridDims {
    /// Create a dimension triple
    #[must_use]
    pub const fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self { nx, ny, nz }
    }

    /// Total number of cells
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// Always false for a constructed grid; present for API symmetry with `len`
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of cells in one z-layer
    #[inline]
    #[must_use]
    pub const fn layer_len(&self) -> usize {
        self.nx * self.ny
    }

    /// Flat index of cell `(x, y, z)`
    #[inline]
    #[must_use]
    pub const fn index(&self, x: usize, y: usize, z: usize) -> usize {
        z * (self.nx * self.ny) + y * self.nx + x
    }

    /// Inverse of [`GridDims::index`]
    #[inline]
    #[must_use]
    pub const fn coords(&self, index: usize) -> (usize, usize, usize) {
        let layer = self.nx * self.ny;
        let z = index / layer;
        let rem = index % layer;
        (rem % self.nx, rem / self.nx, z)
    }

    /// Whether `(x, y, z)` lies strictly inside the one-cell boundary shell
    #[inline]
    #[must_use]
    pub const fn is_interior(&self, x: usize, y: usize, z: usize) -> bool {
        x > 0 && y > 0 && z > 0 && x < self.nx - 1 && y < self.ny - 1 && z < self.nz - 1
    }
}

/// Dense scalar field over a [`GridDims`] box
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    /// Field values in row-major order (see [`GridDims::index`])
    pub data: Vec<f32>,
    dims: GridDims,
}

impl ScalarField {
    /// Create a field initialized to zero
    #[must_use]
    pub fn new(dims: GridDims) -> Self {
        Self::with_value(dims, 0.0)
    }

    /// Create a field initialized to `value` everywhere
    #[must_use]
    pub fn with_value(dims: GridDims, value: f32) -> Self {
        Self {
            data: vec![value; dims.len()],
            dims,
        }
    }

    /// Dimensions of this field
    #[inline]
    #[must_use]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Get reference to field data
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Get mutable reference to field data
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Value at `(x, y, z)`
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the field
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> f32 {
        assert!(
            x < self.dims.nx && y < self.dims.ny && z < self.dims.nz,
            "Coordinates out of bounds"
        );
        self.data[self.dims.index(x, y, z)]
    }

    /// Set the value at `(x, y, z)`
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the field
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: f32) {
        assert!(
            x < self.dims.nx && y < self.dims.ny && z < self.dims.nz,
            "Coordinates out of bounds"
        );
        let idx = self.dims.index(x, y, z);
        self.data[idx] = value;
    }

    /// Fill entire field with a value
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Overwrite this field with the contents of `other`
    ///
    /// # Panics
    ///
    /// Panics if the two fields have different dimensions
    pub fn copy_from(&mut self, other: &ScalarField) {
        assert_eq!(self.dims, other.dims, "Field dimensions differ");
        self.data.copy_from_slice(&other.data);
    }

    /// Sum of all values
    #[must_use]
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}
