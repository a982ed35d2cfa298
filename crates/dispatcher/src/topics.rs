/// Topic names for logical message routing
pub struct Topics;

impl Topics {
    /// Allotments matched with a candidate path, ready to be executed
    pub const TRADE_PROPOSAL: &'static str = "proposal";

    /// Returns attributed to open or closed positions
    pub const DELTA: &'static str = "delta";
}
