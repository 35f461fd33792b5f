//! Error types for rejected player actions and config loading.

use thiserror::Error;

use crate::loot::EquipSlot;

/// A collaborator call the simulation refused. The display text doubles as
/// the in-world feedback shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("Inventory Full")]
    InventoryFull,

    #[error("No attribute points")]
    NoAttributePoints,

    #[error("Nothing equipped in {0:?}")]
    EmptySlot(EquipSlot),

    #[error("Item {0} not found")]
    ItemNotFound(u64),

    #[error("{item} does not fit {slot:?}")]
    IncompatibleSlot { item: String, slot: EquipSlot },

    #[error("Not enough gold ({have}/{need})")]
    InsufficientFunds { have: u64, need: u64 },

    #[error("WEAPON REQUIRED!")]
    WeaponRequired,

    #[error("Only available from the menu")]
    NotInMenu,

    #[error("No mission in slot {0}")]
    MissionNotFound(usize),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid RON config: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("unsupported config extension: {0}")]
    UnsupportedFormat(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}
