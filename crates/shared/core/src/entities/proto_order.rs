use serde::{Deserialize, Serialize};

use super::{Allotment, Path};

/// An allotment of capital matched to a candidate path, ready for sizing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtoOrder {
    pub allotment: Allotment,
    pub path: Path,
}

impl ProtoOrder {
    pub fn new(allotment: Allotment, path: Path) -> Self {
        Self { allotment, path }
    }
}
