//! Analysis configuration and results

mod dof_map;
mod result;

use serde::{Deserialize, Serialize};

pub use dof_map::{DofMap, DofSlot};
pub(crate) use result::CaseSolution;
pub use result::AnalysisResult;

use crate::loads::LoadCase;
use crate::math::ColumnOrdering;

/// Options of a static linear solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfiguration {
    /// Load cases to solve
    pub load_cases: Vec<LoadCase>,
    /// Case whose support settlements are prescribed on the fixed DOFs
    pub settlements_load_case: Option<LoadCase>,
    /// Fill-reducing ordering of the free-free block
    pub ordering: ColumnOrdering,
}

impl Default for SolverConfiguration {
    fn default() -> Self {
        Self {
            load_cases: vec![LoadCase::default()],
            settlements_load_case: None,
            ordering: ColumnOrdering::default(),
        }
    }
}

impl SolverConfiguration {
    /// Solve the given load cases
    pub fn new(load_cases: &[LoadCase]) -> Self {
        Self {
            load_cases: load_cases.to_vec(),
            ..Self::default()
        }
    }

    /// Prescribe the settlements recorded under `case`
    pub fn with_settlements(mut self, case: LoadCase) -> Self {
        self.settlements_load_case = Some(case);
        self
    }

    /// Set the column ordering
    pub fn with_ordering(mut self, ordering: ColumnOrdering) -> Self {
        self.ordering = ordering;
        self
    }
}
