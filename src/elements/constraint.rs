//! Degrees of freedom and nodal constraints

use serde::{Deserialize, Serialize};

/// One of the six physical degrees of freedom of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dof {
    Dx,
    Dy,
    Dz,
    Rx,
    Ry,
    Rz,
}

impl Dof {
    /// All DOFs in global numbering order
    pub const ALL: [Dof; 6] = [Dof::Dx, Dof::Dy, Dof::Dz, Dof::Rx, Dof::Ry, Dof::Rz];

    /// Offset of this DOF within a node's block of six
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Dof::Dx => 0,
            Dof::Dy => 1,
            Dof::Dz => 2,
            Dof::Rx => 3,
            Dof::Ry => 4,
            Dof::Rz => 5,
        }
    }
}

/// Constraint state of a single DOF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DofConstraint {
    #[default]
    Free,
    Fixed,
}

/// Constraint conditions at a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Constraints {
    pub dx: DofConstraint,
    pub dy: DofConstraint,
    pub dz: DofConstraint,
    pub rx: DofConstraint,
    pub ry: DofConstraint,
    pub rz: DofConstraint,
}

impl Constraints {
    /// Create constraints from an array [DX, DY, DZ, RX, RY, RZ] of fixity flags
    pub fn from_fixity(fixed: [bool; 6]) -> Self {
        let c = |f: bool| if f { DofConstraint::Fixed } else { DofConstraint::Free };
        Self {
            dx: c(fixed[0]),
            dy: c(fixed[1]),
            dz: c(fixed[2]),
            rx: c(fixed[3]),
            ry: c(fixed[4]),
            rz: c(fixed[5]),
        }
    }

    /// All DOFs free
    pub fn released() -> Self {
        Self::default()
    }

    /// All DOFs restrained
    pub fn fixed() -> Self {
        Self::from_fixity([true; 6])
    }

    /// Translations restrained, rotations free
    pub fn pinned() -> Self {
        Self::from_fixity([true, true, true, false, false, false])
    }

    /// Rotations restrained, translations free
    pub fn rotation_fixed() -> Self {
        Self::from_fixity([false, false, false, true, true, true])
    }

    /// Return a copy with one DOF changed
    pub fn with(mut self, dof: Dof, constraint: DofConstraint) -> Self {
        match dof {
            Dof::Dx => self.dx = constraint,
            Dof::Dy => self.dy = constraint,
            Dof::Dz => self.dz = constraint,
            Dof::Rx => self.rx = constraint,
            Dof::Ry => self.ry = constraint,
            Dof::Rz => self.rz = constraint,
        }
        self
    }

    /// Constraint of one DOF
    pub fn get(&self, dof: Dof) -> DofConstraint {
        match dof {
            Dof::Dx => self.dx,
            Dof::Dy => self.dy,
            Dof::Dz => self.dz,
            Dof::Rx => self.rx,
            Dof::Ry => self.ry,
            Dof::Rz => self.rz,
        }
    }

    /// Fixity flags [DX, DY, DZ, RX, RY, RZ]
    pub fn fixity(&self) -> [bool; 6] {
        Dof::ALL.map(|dof| self.get(dof) == DofConstraint::Fixed)
    }

    /// Count number of restrained DOFs
    pub fn num_fixed(&self) -> usize {
        self.fixity().iter().filter(|&&f| f).count()
    }
}
