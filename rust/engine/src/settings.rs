use serde::{Deserialize, Serialize};

/// Stakes and rule switches for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    /// Chips a newly seated player receives
    pub starting_stack: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    /// When true an all-in raise smaller than the minimum raise re-opens
    /// betting for everyone. When false, seats that already acted may only
    /// call or fold against it.
    pub incomplete_raise_reopens: bool,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            starting_stack: 1000,
            small_blind: 5,
            big_blind: 10,
            incomplete_raise_reopens: true,
        }
    }
}

impl TableSettings {
    pub fn new(starting_stack: u32, small_blind: u32, big_blind: u32) -> Self {
        Self {
            starting_stack,
            small_blind,
            big_blind,
            ..Self::default()
        }
        .clamped()
    }

    /// Forces every value into the range a table accepts. The big blind is
    /// never below the small blind.
    pub fn clamped(self) -> Self {
        let small_blind = self.small_blind.clamp(1, 10_000);
        Self {
            starting_stack: self.starting_stack.clamp(100, 100_000),
            small_blind,
            big_blind: self.big_blind.clamp(2, 20_000).max(small_blind),
            incomplete_raise_reopens: self.incomplete_raise_reopens,
        }
    }
}
