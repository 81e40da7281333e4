//! Free/fixed partition of the global DOFs

use crate::math::Vec;

/// Position of a global DOF inside its partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DofSlot {
    /// Row of the free block (unknown displacement)
    Free(usize),
    /// Row of the fixed block (prescribed displacement)
    Fixed(usize),
}

/// Bijection between global DOFs and the free/fixed blocks
///
/// Both blocks keep the ascending global order of their DOFs.
#[derive(Debug, Clone, Default)]
pub struct DofMap {
    slots: std::vec::Vec<DofSlot>,
    free: std::vec::Vec<usize>,
    fixed: std::vec::Vec<usize>,
}

impl DofMap {
    /// Build the map from a fixity flag per global DOF (`true` = fixed)
    pub fn new(fixity: &[bool]) -> Self {
        let mut map = Self::default();
        for (dof, &is_fixed) in fixity.iter().enumerate() {
            if is_fixed {
                map.slots.push(DofSlot::Fixed(map.fixed.len()));
                map.fixed.push(dof);
            } else {
                map.slots.push(DofSlot::Free(map.free.len()));
                map.free.push(dof);
            }
        }
        map
    }

    pub fn slot(&self, dof: usize) -> DofSlot {
        self.slots[dof]
    }

    /// Global DOF of each free row
    pub fn free_dofs(&self) -> &[usize] {
        &self.free
    }

    /// Global DOF of each fixed row
    pub fn fixed_dofs(&self) -> &[usize] {
        &self.fixed
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn fixed_count(&self) -> usize {
        self.fixed.len()
    }

    pub fn total(&self) -> usize {
        self.slots.len()
    }

    /// Free entries of a global vector
    pub fn gather_free(&self, global: &Vec) -> Vec {
        Vec::from_iterator(self.free.len(), self.free.iter().map(|&d| global[d]))
    }

    /// Fixed entries of a global vector
    pub fn gather_fixed(&self, global: &Vec) -> Vec {
        Vec::from_iterator(self.fixed.len(), self.fixed.iter().map(|&d| global[d]))
    }

    /// Global vector from its free and fixed parts
    pub fn scatter(&self, free: &Vec, fixed: &Vec) -> Vec {
        let mut global = Vec::zeros(self.total());
        for (i, &d) in self.free.iter().enumerate() {
            global[d] = free[i];
        }
        for (i, &d) in self.fixed.iter().enumerate() {
            global[d] = fixed[i];
        }
        global
    }
}
