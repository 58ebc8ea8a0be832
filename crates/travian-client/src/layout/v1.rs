//! Layout contract v1: the desktop dashboards with `#stockBar`,
//! `#resourceFieldContainer` and `#villageContent`.

use crate::types::{DemandField, Resource};

// ── Endpoints ───────────────────────────────────────────────────────────────

pub const LOGIN: &str = "/api/v1/auth/login";
/// Nonce exchange; the nonce is appended as the last path segment.
pub const NONCE_EXCHANGE: &str = "/api/v1/auth";
pub const DORF1: &str = "/dorf1.php";
pub const DORF2: &str = "/dorf2.php";
pub const TILE_DETAILS: &str = "/api/v1/map/tile-details";
pub const BUILD: &str = "/build.php";
pub const HERO_INVENTORY: &str = "/api/v1/hero/v2/screen/inventory";
pub const HERO_INVENTORY_CLICK: &str = "/api/v1/hero/v2/inventory/click";
pub const HERO_ATTRIBUTES: &str = "/hero/attributes";

/// Viewport descriptor sent with the login request.
pub const VIEWPORT: &str = "1440:900";

// ── Login check ─────────────────────────────────────────────────────────────

pub const PLAYER_NAME: &str = "div#sidebarBoxActiveVillage div.playerName";

// ── Resource overview (dorf1) ───────────────────────────────────────────────

pub const STOCK_BAR: &str = "div#stockBar";
pub const WAREHOUSE_CAPACITY: &str = ".warehouse .capacity";
pub const WAREHOUSE_BUTTONS: &str = ".warehouse .stockBarButton";
/// The first three warehouse buttons, in this order.
pub const WAREHOUSE_ORDER: [Resource; 3] = [Resource::Lumber, Resource::Clay, Resource::Iron];
pub const GRANARY_CAPACITY: &str = ".granary .capacity";
/// First granary button is crop, second is free crop.
pub const GRANARY_BUTTONS: &str = ".granary .stockBarButton";

pub const PRODUCTION_ROWS: &str = "div.villageInfobox table#production tbody tr";
pub const PRODUCTION_VALUE: &str = "td.num";
/// The first four production rows, in this order.
pub const PRODUCTION_ORDER: [Resource; 4] = Resource::ALL;

pub const RESOURCE_FIELDS: &str = "div#resourceFieldContainer a.level";
pub const SLOT_CLASS: &str = r"^buildingSlot(\d+)$";
pub const GID_CLASS: &str = r"^gid(\d+)$";
pub const LEVEL_CLASS: &str = r"^level(\d+)$";

pub const TROOP_ROWS: &str = "div.villageInfobox table#troops tbody tr";
pub const NO_TROOPS: &str = "td.noTroops";
pub const TROOP_NAME: &str = "td.un";
pub const TROOP_COUNT: &str = "td.num";

pub const MOVEMENTS_TABLE: &str = "div.villageInfobox table#movements";
pub const MOVEMENT_ROWS: &str = "tr";
/// Label text that switches subsequent rows to incoming.
pub const INCOMING_LABEL: &str = "Incoming";
/// Label text that switches subsequent rows to outgoing.
pub const OUTGOING_LABEL: &str = "Outgoing";
/// "<count> <type>" in this order.
pub const MOVEMENT_SUMMARY: &str = "div.mov";
pub const MOVEMENT_TIMER: &str = "div.dur_r span.timer";

pub const BUILDING_LIST: &str = "div.buildingList ul li";
pub const BUILDING_LIST_NAME: &str = "div.name";
pub const BUILDING_LIST_LEVEL: &str = "div.name span.lvl";
pub const BUILDING_LIST_TIMER: &str = "div.buildDuration span.timer";

pub const VILLAGE_LIST: &str = "div#sidebarBoxVillagelist div.villageList div.listEntry";
pub const VILLAGE_NAME: &str = "span.name";
pub const VILLAGE_X: &str = "span.coordinatesGrid span.coordinateX";
pub const VILLAGE_Y: &str = "span.coordinatesGrid span.coordinateY";
pub const ACTIVE_CLASS: &str = "active";

pub const LOYALTY: &str = "div#sidebarBoxActiveVillage div.loyalty span";
/// Tooltip holding "current/next" culture points; the last fraction counts.
pub const EXPANSION_SLOT_INFO: &str = "div.expansionSlotInfo";
pub const CULTURE_FRACTION: &str = r"(\d+)/(\d+)";

// ── Building grid (dorf2) ───────────────────────────────────────────────────

pub const VILLAGE_CONTENT_SLOTS: &str = "div#villageContent div";
pub const SLOT_ATTR: &str = "data-aid";
pub const GID_ATTR: &str = "data-gid";
pub const NAME_ATTR: &str = "data-name";
pub const LEVEL_LINK: &str = "a";
pub const LEVEL_ATTR: &str = "data-level";

// ── Build page ──────────────────────────────────────────────────────────────

/// Cost cells of an existing slot's upgrade contract.
pub const CONTRACT_DEMAND: &str = "div#contract div.resource";
/// Cost cells in this order.
pub const DEMAND_ORDER: [DemandField; 5] = [
    DemandField::Lumber,
    DemandField::Clay,
    DemandField::Iron,
    DemandField::Crop,
    DemandField::FreeCrop,
];
/// Cells that must be present; the free crop cell may be missing.
pub const DEMAND_REQUIRED: usize = 4;
pub const DURATION: &str = "div.duration";
pub const UPGRADE_BUTTON: &str = "div.upgradeButtonsContainer button";
/// Class token marking an affordable action button.
pub const AFFORDABLE_CLASS: &str = "green";
pub const ONCLICK_ATTR: &str = "onclick";

/// Category pages probed for an empty interior slot.
pub const BUILD_CATEGORIES: [u8; 3] = [1, 2, 3];
pub const BUILDING_WRAPPER: &str = "div#build div.buildingWrapper";
pub const WRAPPER_CONTRACT: &str = "div.contract";
pub const WRAPPER_TITLE: &str = "h2";
pub const WRAPPER_DEMAND: &str = "div.resource";
pub const AFFORDABLE_BUTTON: &str = "button.green";
pub const CONTRACT_ID: &str = r"\d+";

// ── Training page ───────────────────────────────────────────────────────────

/// Building type codes that train units: barracks, stable, workshop,
/// residence, palace.
pub const PRODUCTION_BUILDINGS: [u32; 5] = [19, 20, 21, 25, 26];

pub const TRAIN_UNITS: &str = "div.trainUnits div.troop div.details";
pub const UNIT_DEMAND: &str = "div.resource";
pub const UNIT_DURATION: &str = "div.duration";
pub const UNIT_MAX: &str = "a[href='#']";
pub const UNIT_INPUT: &str = "input";
pub const UNIT_IMAGE: &str = "img";

pub const TRAIN_ACTION: &str = "form[name='snd'] input[name='action']";
pub const TRAIN_CHECKSUM: &str = "form[name='snd'] input[name='checksum']";
pub const TRAIN_SLOT: &str = "form[name='snd'] input[name='s']";
pub const TRAIN_VILLAGE: &str = "form[name='snd'] input[name='did']";
pub const TRAIN_BUTTON: &str = "form[name='snd'] button[name='s1']";

// ── Map tile fragment ───────────────────────────────────────────────────────

pub const MAP_DETAILS: &str = "div#map_details";
pub const TILE_DETAILS_PANEL: &str = "div#tileDetails";
pub const OASIS_CLASS: &str = "oasis";
pub const VILLAGE_CLASS: &str = "village";
pub const VILLAGE_INFO: &str = "table#village_info";
pub const DISTRIBUTION_ROWS: &str = "table#distribution tr";
/// Village tiles list one cell per resource, in this order.
pub const DISTRIBUTION_CELLS: &str = "table#distribution td";
pub const DISTRIBUTION_ORDER: [Resource; 4] = Resource::ALL;
pub const TROOP_INFO_ROWS: &str = "table#troop_info tr";
pub const ROW_DESC: &str = "td.desc";
pub const ROW_VALUE: &str = "td.val";
pub const TRIBE: &str = "tr.first td";
pub const OWNER: &str = "td.player";
pub const CAPITAL_MARKER: &str = "h1 span.mainVillage";

// ── Hero ────────────────────────────────────────────────────────────────────

/// Label of the embedded JSON payload on the attributes page.
pub const SCREEN_DATA_LABEL: &str = "screenData";
/// Hero production slots, in this order.
pub const HERO_PRODUCTION_ORDER: [&str; 5] = ["overall", "lumber", "clay", "iron", "crop"];
