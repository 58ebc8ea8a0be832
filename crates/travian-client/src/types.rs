//! Snapshot records extracted from game pages.
//!
//! All records are transient: they describe the village at the moment the
//! page was fetched and are never persisted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lowest slot number in a village.
pub const MIN_SLOT: u8 = 1;
/// First interior building slot; everything below is a resource field.
pub const FIRST_BUILDING_SLOT: u8 = 19;
/// Highest slot number in a village.
pub const MAX_SLOT: u8 = 40;

/// What kind of plot a slot number addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    ResourceField,
    Building,
}

/// Classify a slot number, or `None` when it is outside `1..=40`.
pub fn slot_kind(slot_id: u8) -> Option<SlotKind> {
    if (MIN_SLOT..FIRST_BUILDING_SLOT).contains(&slot_id) {
        Some(SlotKind::ResourceField)
    } else if (FIRST_BUILDING_SLOT..=MAX_SLOT).contains(&slot_id) {
        Some(SlotKind::Building)
    } else {
        None
    }
}

/// The four village resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Lumber,
    Clay,
    Iron,
    Crop,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Lumber,
        Resource::Clay,
        Resource::Iron,
        Resource::Crop,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Resource::Lumber => "lumber",
            Resource::Clay => "clay",
            Resource::Iron => "iron",
            Resource::Crop => "crop",
        }
    }

    /// Resource fields carry their resource as a building type code 1..=4.
    pub fn from_gid(gid: u32) -> Option<Resource> {
        match gid {
            1 => Some(Resource::Lumber),
            2 => Some(Resource::Clay),
            3 => Some(Resource::Iron),
            4 => Some(Resource::Crop),
            _ => None,
        }
    }

    /// Name used for hero inventory items ("Lumber", "Clay", ...).
    pub fn item_name(self) -> &'static str {
        match self {
            Resource::Lumber => "Lumber",
            Resource::Clay => "Clay",
            Resource::Iron => "Iron",
            Resource::Crop => "Crop",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lumber" | "wood" => Ok(Resource::Lumber),
            "clay" => Ok(Resource::Clay),
            "iron" => Ok(Resource::Iron),
            "crop" => Ok(Resource::Crop),
            other => Err(format!("unknown resource: {other}")),
        }
    }
}

/// Warehouse and granary contents of the active village.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSnapshot {
    pub warehouse_capacity: i64,
    pub lumber: i64,
    pub clay: i64,
    pub iron: i64,
    pub granary_capacity: i64,
    pub crop: i64,
    pub free_crop: i64,
}

/// Per-hour yield. Crop may be negative when upkeep exceeds production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionSnapshot {
    pub lumber: i64,
    pub clay: i64,
    pub iron: i64,
    pub crop: i64,
}

/// A resource field in slots 1..=18.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceField {
    pub id: u8,
    pub resource_id: u32,
    pub level: u32,
    pub name: Resource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Troop {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Incoming,
    Outgoing,
}

/// A troop movement row from the village overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub direction: Direction,
    #[serde(rename = "type")]
    pub kind: String,
    pub count: i64,
    pub duration: String,
}

/// Movements split by direction, each in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movements {
    pub incoming: Vec<Movement>,
    pub outgoing: Vec<Movement>,
}

/// A construction currently in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingListEntry {
    pub name: String,
    pub level: String,
    pub duration: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VillageListEntry {
    pub name: String,
    pub coordinates: Coordinates,
    /// Whether this is the active village.
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CulturePoints {
    pub current: i64,
    pub next_village: i64,
}

/// An interior building plot in slots 19..=40. Empty plots have
/// `building_id == 0` and an empty name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub id: u8,
    pub building_id: u32,
    pub name: String,
    pub level: u32,
}

/// Everything the resource overview page shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VillageOverview {
    pub stock: StockSnapshot,
    pub production: ProductionSnapshot,
    pub resource_fields: Vec<ResourceField>,
    pub troops: Vec<Troop>,
    pub movements: Movements,
    pub building_list: Vec<BuildingListEntry>,
    pub village_list: Vec<VillageListEntry>,
    pub loyalty: String,
    pub culture_points: CulturePoints,
}

/// Both dashboard pages combined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    #[serde(flatten)]
    pub overview: VillageOverview,
    pub buildings: Vec<Building>,
}

impl GameState {
    pub fn resource_field(&self, slot_id: u8) -> Option<&ResourceField> {
        self.overview.resource_fields.iter().find(|f| f.id == slot_id)
    }

    pub fn building(&self, slot_id: u8) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == slot_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OasisBonus {
    pub resource: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileTroop {
    pub name: String,
    pub count: i64,
}

/// How many fields of one resource a village tile has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDistribution {
    #[serde(rename = "type")]
    pub resource: Resource,
    pub count: i64,
}

/// A map tile, discriminated by the shape of its details panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TileInfo {
    Wilderness,
    Oasis {
        distribution: Vec<OasisBonus>,
        troops: Vec<TileTroop>,
    },
    Village {
        tribe: String,
        owner: String,
        capital: bool,
        resource_fields: Vec<FieldDistribution>,
    },
    #[serde(rename = "abandoned valley")]
    AbandonedValley {
        resource_fields: Vec<FieldDistribution>,
    },
    /// A details panel carrying none of the known class tokens.
    Unknown { classes: Vec<String> },
}

impl TileInfo {
    pub fn kind(&self) -> &'static str {
        match self {
            TileInfo::Wilderness => "wilderness",
            TileInfo::Oasis { .. } => "oasis",
            TileInfo::Village { .. } => "village",
            TileInfo::AbandonedValley { .. } => "abandoned valley",
            TileInfo::Unknown { .. } => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroProduction {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroAttributes {
    pub attribute_points: i64,
    pub attack_behaviour: serde_json::Value,
    pub experience: i64,
    pub experience_percent: f64,
    /// Rounded to two decimals.
    pub health: f64,
    pub speed: f64,
    pub production: Vec<HeroProduction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroInventoryResource {
    /// Amount already moved into the village.
    pub village: i64,
    /// Amount held in the hero's inventory.
    pub amount: i64,
    pub transfer_id: u64,
    pub max_transfer: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroInventory {
    /// Server-issued token authorizing a transfer against this snapshot.
    pub checksum: String,
    pub resources: BTreeMap<Resource, HeroInventoryResource>,
}

/// Cost of an action as listed on a build or training page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demand {
    pub lumber: i64,
    pub clay: i64,
    pub iron: i64,
    pub crop: i64,
    pub free_crop: i64,
}

/// One cost cell of a [`Demand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemandField {
    Lumber,
    Clay,
    Iron,
    Crop,
    FreeCrop,
}

impl DemandField {
    pub fn name(self) -> &'static str {
        match self {
            DemandField::Lumber => "lumber",
            DemandField::Clay => "clay",
            DemandField::Iron => "iron",
            DemandField::Crop => "crop",
            DemandField::FreeCrop => "free_crop",
        }
    }
}

impl Demand {
    pub fn set(&mut self, field: DemandField, value: i64) {
        match field {
            DemandField::Lumber => self.lumber = value,
            DemandField::Clay => self.clay = value,
            DemandField::Iron => self.iron = value,
            DemandField::Crop => self.crop = value,
            DemandField::FreeCrop => self.free_crop = value,
        }
    }

    pub fn get(&self, resource: Resource) -> i64 {
        match resource {
            Resource::Lumber => self.lumber,
            Resource::Clay => self.clay,
            Resource::Iron => self.iron,
            Resource::Crop => self.crop,
        }
    }
}

/// The outcome of probing a build page for one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInfo {
    pub slot_id: u8,
    pub build_id: u32,
    pub demand: Demand,
    pub duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A building that can be placed on an empty interior slot right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingOption {
    pub id: u32,
    pub name: String,
    pub category: u8,
}

/// A unit type trainable in one of the village's military buildings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOption {
    pub demand: Demand,
    pub duration: String,
    pub max_production: i64,
    pub troop_type: String,
    pub troop_name: String,
    /// Building type code of the hosting building.
    pub building_id: u32,
    /// Slot of the hosting building.
    pub slot_id: u8,
}
