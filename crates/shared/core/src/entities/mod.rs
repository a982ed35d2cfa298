mod allotment;
mod balances;
mod delta;
mod destination;
mod order;
mod order_status;
mod order_type;
mod path;
mod position;
mod proto_order;
mod pulse;
mod side;

pub use allotment::Allotment;
pub use balances::Balances;
pub use delta::{Delta, DeltaKind};
pub use destination::Destination;
pub use order::{Order, OrderFilter, OrderId};
pub use order_status::OrderStatus;
pub use order_type::OrderType;
pub use path::{Path, TimestampedPath};
pub use position::{Position, PositionId};
pub use proto_order::ProtoOrder;
pub use pulse::Pulse;
pub use side::Side;
