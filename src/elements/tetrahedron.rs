//! Four-node solid element

use std::sync::Arc;

use super::{Material, MaterialProvider};

#[derive(Debug, Clone)]
pub struct TetrahedronElement {
    pub material: Arc<dyn MaterialProvider>,
}

impl TetrahedronElement {
    pub fn new(material: Arc<dyn MaterialProvider>) -> Self {
        Self { material }
    }

    pub fn uniform(material: Material) -> Self {
        Self::new(Arc::new(material))
    }
}
