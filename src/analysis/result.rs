//! Result of a static linear analysis

use std::collections::HashMap;

use log::debug;

use super::DofMap;
use crate::error::{FEAError, FEAResult};
use crate::loads::LoadCase;
use crate::math::sparse::csc_matvec;
use crate::math::{PartitionedStiffness, SparseCholeskySolver, Vec};

/// Solution of one load case
#[derive(Debug, Clone)]
pub(crate) struct CaseSolution {
    /// Displacements of the free DOFs
    pub free_displacements: Vec,
    /// Load vector entries at the fixed DOFs
    pub fixed_loads: Vec,
}

/// Factorized system and the solved load cases of one `solve`
///
/// Built completely before it is attached to the model; queries never
/// mutate it.
#[derive(Debug)]
pub struct AnalysisResult {
    pub(crate) cholesky: SparseCholeskySolver,
    pub(crate) blocks: PartitionedStiffness,
    pub(crate) dof_map: DofMap,
    /// Prescribed displacements of the fixed DOFs
    pub(crate) settlements: Vec,
    pub(crate) settlements_case: Option<LoadCase>,
    cases: HashMap<LoadCase, CaseSolution>,
}

impl AnalysisResult {
    pub(crate) fn new(
        cholesky: SparseCholeskySolver,
        blocks: PartitionedStiffness,
        dof_map: DofMap,
        settlements: Vec,
        settlements_case: Option<LoadCase>,
    ) -> Self {
        Self {
            cholesky,
            blocks,
            dof_map,
            settlements,
            settlements_case,
            cases: HashMap::new(),
        }
    }

    /// Right-hand side `F_f - K_fs d_s` of a global load vector
    pub(crate) fn right_hand_side(&self, load: &Vec) -> Vec {
        let ff = self.dof_map.gather_free(load);
        ff - csc_matvec(&self.blocks.kfs, &self.settlements)
    }

    /// Solve one load case against the cached factorization
    pub(crate) fn solve_load(&self, load: &Vec) -> CaseSolution {
        let rhs = self.right_hand_side(load);
        CaseSolution {
            free_displacements: self.cholesky.solve(&rhs),
            fixed_loads: self.dof_map.gather_fixed(load),
        }
    }

    pub(crate) fn insert_case(&mut self, case: LoadCase, solution: CaseSolution) {
        debug!("Stored solution of load case '{}'", case);
        self.cases.insert(case, solution);
    }

    fn case(&self, case: &LoadCase) -> FEAResult<&CaseSolution> {
        self.cases
            .get(case)
            .ok_or_else(|| FEAError::LoadCaseNotFound(case.to_string()))
    }

    /// Global displacement vector of a solved load case
    pub fn displacement_vector(&self, case: &LoadCase) -> FEAResult<Vec> {
        let solution = self.case(case)?;
        Ok(self
            .dof_map
            .scatter(&solution.free_displacements, &self.settlements))
    }

    /// Support reactions at the fixed DOFs: `K_sf d_f + K_ss d_s - F_s`
    pub fn reactions_vector(&self, case: &LoadCase) -> FEAResult<Vec> {
        let solution = self.case(case)?;
        Ok(csc_matvec(&self.blocks.ksf, &solution.free_displacements)
            + csc_matvec(&self.blocks.kss, &self.settlements)
            - &solution.fixed_loads)
    }

    /// Solved load cases
    pub fn load_cases(&self) -> impl Iterator<Item = &LoadCase> {
        self.cases.keys()
    }

    pub fn dof_map(&self) -> &DofMap {
        &self.dof_map
    }

    pub fn settlements_case(&self) -> Option<&LoadCase> {
        self.settlements_case.as_ref()
    }

    /// Non-zeros of the free-free block
    pub fn kff_nnz(&self) -> usize {
        self.blocks.kff.nnz()
    }

    /// Non-zeros of the Cholesky factor
    pub fn factor_nnz(&self) -> usize {
        self.cholesky.factor_nnz()
    }
}
