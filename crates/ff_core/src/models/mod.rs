pub mod asset;
pub mod slot;
pub mod team;

pub use asset::{Asset, AssetKind};
pub use slot::{EligibilityConfig, EligibilitySet, SlotCategory, SlotKey, SlotTemplate, TemplateSlot};
pub use team::Team;
