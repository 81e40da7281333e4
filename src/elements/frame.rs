//! Two-node frame element (beam/column/truss)

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Material, MaterialProvider, Section, SectionProvider};

/// Local bending axis of a frame element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BendingAxis {
    /// Bending about local y (deflection along local z)
    Y,
    /// Bending about local z (deflection along local y)
    Z,
}

/// Which formulations a frame element carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameBehaviour {
    pub axial: bool,
    pub bending_y: bool,
    pub bending_z: bool,
    pub torsion: bool,
}

impl FrameBehaviour {
    /// Full 3D frame: axial, biaxial bending and torsion
    pub const FRAME: Self = Self {
        axial: true,
        bending_y: true,
        bending_z: true,
        torsion: true,
    };

    /// Axial only
    pub const TRUSS: Self = Self {
        axial: true,
        bending_y: false,
        bending_z: false,
        torsion: false,
    };

    /// Bending about local z only (plane beam)
    pub const BEAM: Self = Self {
        axial: false,
        bending_y: false,
        bending_z: true,
        torsion: false,
    };

    pub fn bends_about(&self, axis: BendingAxis) -> bool {
        match axis {
            BendingAxis::Y => self.bending_y,
            BendingAxis::Z => self.bending_z,
        }
    }
}

impl Default for FrameBehaviour {
    fn default() -> Self {
        Self::FRAME
    }
}

/// A frame member between two nodes
#[derive(Debug, Clone)]
pub struct FrameElement {
    pub material: Arc<dyn MaterialProvider>,
    pub section: Arc<dyn SectionProvider>,
    pub behaviour: FrameBehaviour,
    /// Bending moments released at the start node
    pub hinged_at_start: bool,
    /// Bending moments released at the end node
    pub hinged_at_end: bool,
    /// Rotation of the section about the member axis (radians)
    pub web_rotation: f64,
}

impl FrameElement {
    /// Create a full frame element with shared property providers
    pub fn new(material: Arc<dyn MaterialProvider>, section: Arc<dyn SectionProvider>) -> Self {
        Self {
            material,
            section,
            behaviour: FrameBehaviour::FRAME,
            hinged_at_start: false,
            hinged_at_end: false,
            web_rotation: 0.0,
        }
    }

    /// Create a frame element with uniform material and section
    pub fn uniform(material: Material, section: Section) -> Self {
        Self::new(Arc::new(material), Arc::new(section))
    }

    pub fn with_behaviour(mut self, behaviour: FrameBehaviour) -> Self {
        self.behaviour = behaviour;
        self
    }

    pub fn with_hinges(mut self, at_start: bool, at_end: bool) -> Self {
        self.hinged_at_start = at_start;
        self.hinged_at_end = at_end;
        self
    }

    pub fn with_web_rotation(mut self, rotation: f64) -> Self {
        self.web_rotation = rotation;
        self
    }

    /// Local DOFs (0..12) condensed out of the element stiffness by hinges
    pub fn released_dofs(&self) -> Vec<usize> {
        let mut released = Vec::new();
        for (hinged, offset) in [(self.hinged_at_start, 0), (self.hinged_at_end, 6)] {
            if !hinged {
                continue;
            }
            if self.behaviour.bending_y {
                released.push(offset + 4);
            }
            if self.behaviour.bending_z {
                released.push(offset + 5);
            }
        }
        released
    }

    /// Whether each end carries no moment about `axis`
    ///
    /// An inactive bending behaviour leaves both ends moment free.
    pub fn moment_free_ends(&self, axis: BendingAxis) -> (bool, bool) {
        if self.behaviour.bends_about(axis) {
            (self.hinged_at_start, self.hinged_at_end)
        } else {
            (true, true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_released_dofs() {
        let frame = FrameElement::uniform(Material::steel(), Section::default());
        assert!(frame.released_dofs().is_empty());

        let hinged = frame.clone().with_hinges(true, true);
        assert_eq!(hinged.released_dofs(), vec![4, 5, 10, 11]);

        let beam = frame.with_behaviour(FrameBehaviour::BEAM).with_hinges(false, true);
        assert_eq!(beam.released_dofs(), vec![11]);
    }

    #[test]
    fn test_moment_free_ends() {
        let truss = FrameElement::uniform(Material::steel(), Section::default())
            .with_behaviour(FrameBehaviour::TRUSS);
        assert_eq!(truss.moment_free_ends(BendingAxis::Z), (true, true));

        let propped = FrameElement::uniform(Material::steel(), Section::default())
            .with_hinges(true, false);
        assert_eq!(propped.moment_free_ends(BendingAxis::Y), (true, false));
    }
}
