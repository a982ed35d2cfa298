use helios_core::{Order, ProtoOrder, Timestamp};

use crate::error::SizingError;

/// Port for order-sizing arithmetic
pub trait Sizer: Send + Sync {
    /// Turn a matched allotment and path into a concrete order
    fn size(&self, proto: &ProtoOrder, now: Timestamp) -> Result<Order, SizingError>;
}
