//! Result types for FEA analysis

use std::ops::{Add, AddAssign, Neg};

use serde::{Deserialize, Serialize};

use crate::elements::Dof;
use crate::math::Vec3;

/// Displacements and rotations of a point (node or point inside an element)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Displacement {
    /// Displacement in X direction
    pub dx: f64,
    /// Displacement in Y direction
    pub dy: f64,
    /// Displacement in Z direction
    pub dz: f64,
    /// Rotation about X axis
    pub rx: f64,
    /// Rotation about Y axis
    pub ry: f64,
    /// Rotation about Z axis
    pub rz: f64,
}

impl Displacement {
    /// Create from array [DX, DY, DZ, RX, RY, RZ]
    pub fn from_array(arr: [f64; 6]) -> Self {
        Self {
            dx: arr[0],
            dy: arr[1],
            dz: arr[2],
            rx: arr[3],
            ry: arr[4],
            rz: arr[5],
        }
    }

    /// Get as array [DX, DY, DZ, RX, RY, RZ]
    pub fn as_array(&self) -> [f64; 6] {
        [self.dx, self.dy, self.dz, self.rx, self.ry, self.rz]
    }

    /// Component for one DOF
    pub fn get(&self, dof: Dof) -> f64 {
        self.as_array()[dof.index()]
    }

    /// Set the component for one DOF
    pub fn set(&mut self, dof: Dof, value: f64) {
        let mut arr = self.as_array();
        arr[dof.index()] = value;
        *self = Self::from_array(arr);
    }

    /// Translation vector
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.dx, self.dy, self.dz)
    }

    /// Rotation vector
    pub fn rotation(&self) -> Vec3 {
        Vec3::new(self.rx, self.ry, self.rz)
    }

    /// Get translation magnitude
    pub fn translation_magnitude(&self) -> f64 {
        self.translation().norm()
    }
}

impl Add for Displacement {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let (a, b) = (self.as_array(), rhs.as_array());
        Self::from_array(std::array::from_fn(|i| a[i] + b[i]))
    }
}

/// Force and moment acting at a point
///
/// Used for reactions, nodal loads and element internal forces. For frame
/// internal forces the components are, in the element's local frame:
/// `fx` axial force (tension positive), `fy`/`fz` shear forces, `mx`
/// torsion and `my`/`mz` bending moments, all acting on the positive face of
/// the segment between the start node and the query point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Force {
    /// Force in X direction
    pub fx: f64,
    /// Force in Y direction
    pub fy: f64,
    /// Force in Z direction
    pub fz: f64,
    /// Moment about X axis
    pub mx: f64,
    /// Moment about Y axis
    pub my: f64,
    /// Moment about Z axis
    pub mz: f64,
}

impl Force {
    /// Create from array [FX, FY, FZ, MX, MY, MZ]
    pub fn from_array(arr: [f64; 6]) -> Self {
        Self {
            fx: arr[0],
            fy: arr[1],
            fz: arr[2],
            mx: arr[3],
            my: arr[4],
            mz: arr[5],
        }
    }

    /// Create from force and moment vectors
    pub fn from_vectors(force: Vec3, moment: Vec3) -> Self {
        Self::from_array([force.x, force.y, force.z, moment.x, moment.y, moment.z])
    }

    /// Get as array [FX, FY, FZ, MX, MY, MZ]
    pub fn as_array(&self) -> [f64; 6] {
        [self.fx, self.fy, self.fz, self.mx, self.my, self.mz]
    }

    /// Component for one DOF
    pub fn get(&self, dof: Dof) -> f64 {
        self.as_array()[dof.index()]
    }

    /// Add to the component for one DOF
    pub fn add_to(&mut self, dof: Dof, value: f64) {
        let mut arr = self.as_array();
        arr[dof.index()] += value;
        *self = Self::from_array(arr);
    }

    /// Force vector
    pub fn force(&self) -> Vec3 {
        Vec3::new(self.fx, self.fy, self.fz)
    }

    /// Moment vector
    pub fn moment(&self) -> Vec3 {
        Vec3::new(self.mx, self.my, self.mz)
    }

    /// Equivalent force system after moving the point of application
    pub fn moved(&self, from: &Vec3, to: &Vec3) -> Self {
        let r = from - to;
        let force = self.force();
        Self::from_vectors(force, self.moment() + r.cross(&force))
    }
}

impl Add for Force {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let (a, b) = (self.as_array(), rhs.as_array());
        Self::from_array(std::array::from_fn(|i| a[i] + b[i]))
    }
}

impl AddAssign for Force {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Neg for Force {
    type Output = Self;

    fn neg(self) -> Self {
        Self::from_array(self.as_array().map(|v| -v))
    }
}

/// Cauchy stress tensor in the element's local frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StressTensor {
    pub sxx: f64,
    pub syy: f64,
    pub szz: f64,
    pub txy: f64,
    pub tyz: f64,
    pub tzx: f64,
}

impl StressTensor {
    /// Create from Voigt components [σxx, σyy, σzz, τxy, τyz, τzx]
    pub fn from_voigt(v: [f64; 6]) -> Self {
        Self {
            sxx: v[0],
            syy: v[1],
            szz: v[2],
            txy: v[3],
            tyz: v[4],
            tzx: v[5],
        }
    }

    /// Plane stress state (σzz = τyz = τzx = 0)
    pub fn plane(sxx: f64, syy: f64, txy: f64) -> Self {
        Self::from_voigt([sxx, syy, 0.0, txy, 0.0, 0.0])
    }

    /// Voigt components [σxx, σyy, σzz, τxy, τyz, τzx]
    pub fn as_voigt(&self) -> [f64; 6] {
        [self.sxx, self.syy, self.szz, self.txy, self.tyz, self.tzx]
    }

    /// Von Mises equivalent stress
    pub fn von_mises(&self) -> f64 {
        let normal = (self.sxx - self.syy).powi(2)
            + (self.syy - self.szz).powi(2)
            + (self.szz - self.sxx).powi(2);
        let shear = self.txy.powi(2) + self.tyz.powi(2) + self.tzx.powi(2);
        (0.5 * normal + 3.0 * shear).sqrt()
    }
}

impl Add for StressTensor {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let (a, b) = (self.as_voigt(), rhs.as_voigt());
        Self::from_voigt(std::array::from_fn(|i| a[i] + b[i]))
    }
}

/// Summary of the current analysis result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Total number of nodes
    pub num_nodes: usize,
    /// Total number of elements
    pub num_elements: usize,
    /// Total DOFs
    pub total_dofs: usize,
    /// Free DOFs (unknown)
    pub free_dofs: usize,
    /// Fixed DOFs (prescribed)
    pub fixed_dofs: usize,
    /// Non-zeros in the free-free stiffness block
    pub kff_nnz: usize,
    /// Non-zeros in its Cholesky factor
    pub factor_nnz: usize,
    /// Factorizations performed by this model so far
    pub factorizations: usize,
    /// Names of the solved load cases
    pub load_cases: Vec<String>,
    /// Largest nodal translation over all solved cases
    pub max_displacement: f64,
    /// Node with maximum translation
    pub max_disp_node: String,
}
