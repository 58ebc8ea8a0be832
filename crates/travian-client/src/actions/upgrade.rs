//! Upgrade a resource field or an interior building, or construct one on an
//! empty interior slot.

use super::{onclick_url, parse_demand};
use crate::auth::Session;
use crate::error::{Error, Result};
use crate::extract::fetch_overview;
use crate::layout::current as layout;
use crate::markup;
use crate::transport::HttpRequest;
use crate::types::{slot_kind, ActionInfo, BuildingOption, Demand, GameState, SlotKind, StockSnapshot};
use scraper::Html;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeStatus {
    Ok,
    InvalidSlot,
    ExtendWarehouse,
    ExtendGranary,
    NotAvailable,
    BuildingRequired,
    BuildingUnavailable,
}

impl UpgradeStatus {
    pub fn message(self) -> &'static str {
        match self {
            UpgradeStatus::Ok => "ok",
            UpgradeStatus::InvalidSlot => "slot_id should be between 1 and 40",
            UpgradeStatus::ExtendWarehouse => "extend warehouse first",
            UpgradeStatus::ExtendGranary => "extend granary first",
            UpgradeStatus::NotAvailable => "upgrade not available",
            UpgradeStatus::BuildingRequired => "the slot is empty, building_id is needed",
            UpgradeStatus::BuildingUnavailable => "building_id not available",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradeRequest {
    /// Requested slot, validated against 1..=40 before any request.
    pub slot_id: i64,
    /// Building type to construct when the slot is empty.
    pub building_id: Option<u32>,
    pub dry_run: bool,
}

impl UpgradeRequest {
    pub fn new(slot_id: i64) -> Self {
        Self {
            slot_id,
            building_id: None,
            dry_run: false,
        }
    }

    pub fn building(mut self, building_id: u32) -> Self {
        self.building_id = Some(building_id);
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeResult {
    pub upgrading: bool,
    pub status: UpgradeStatus,
    pub message: String,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_info: Option<ActionInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub available_buildings: Vec<BuildingOption>,
}

impl UpgradeResult {
    fn new(status: UpgradeStatus, dry_run: bool) -> Self {
        Self {
            upgrading: status == UpgradeStatus::Ok,
            status,
            message: status.message().to_string(),
            dry_run,
            action_info: None,
            available_buildings: Vec::new(),
        }
    }

    fn with_action(mut self, info: ActionInfo) -> Self {
        self.action_info = Some(info);
        self
    }

    fn with_options(mut self, options: Vec<BuildingOption>) -> Self {
        self.available_buildings = options;
        self
    }
}

/// State of the first action button on a build page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeButton {
    Affordable(String),
    Unaffordable,
    /// No action button at all, as on storage-blocked upgrades.
    Missing,
}

/// What a build page for an occupied slot offers.
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradePage {
    pub demand: Demand,
    pub duration: String,
    pub button: UpgradeButton,
}

pub fn parse_upgrade_page(html: &str) -> Result<UpgradePage> {
    let doc = Html::parse_document(html);
    let root = doc.root_element();

    let cells = markup::select_all(root, layout::CONTRACT_DEMAND)?;
    let demand = parse_demand(&cells)?;
    let duration = markup::text(markup::select_first(root, layout::DURATION)?);

    let button = match markup::find_first(root, layout::UPGRADE_BUTTON)? {
        None => UpgradeButton::Missing,
        Some(button) if markup::has_class(button, layout::AFFORDABLE_CLASS) => {
            match onclick_url(button) {
                Ok(url) => UpgradeButton::Affordable(url),
                Err(e) => {
                    tracing::debug!("Affordable button without a target: {e}");
                    UpgradeButton::Unaffordable
                }
            }
        }
        Some(_) => UpgradeButton::Unaffordable,
    };

    Ok(UpgradePage {
        demand,
        duration,
        button,
    })
}

/// Affordable building options on one category page of an empty slot.
pub fn parse_building_options(html: &str, category: u8) -> Result<Vec<BuildingOption>> {
    let doc = Html::parse_document(html);
    let id_pattern = markup::regex(layout::CONTRACT_ID)?;
    let mut options = Vec::new();

    for wrapper in markup::select_all(doc.root_element(), layout::BUILDING_WRAPPER)? {
        if !markup::exists(wrapper, layout::AFFORDABLE_BUTTON)? {
            continue;
        }
        let contract = markup::select_first(wrapper, layout::WRAPPER_CONTRACT)?;
        let contract_id = markup::attr(contract, "id")?;
        let id = id_pattern
            .find(contract_id)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .ok_or_else(|| Error::parse(format!("no building id in {contract_id:?}")))?;
        let name = markup::text(markup::select_first(wrapper, layout::WRAPPER_TITLE)?).to_lowercase();
        options.push(BuildingOption { id, name, category });
    }
    Ok(options)
}

/// Demand, duration and submission URL of one building offer on a
/// category page.
pub fn parse_building_contract(html: &str, building_id: u32) -> Result<(Demand, String, String)> {
    let doc = Html::parse_document(html);
    let id_pattern = markup::regex(layout::CONTRACT_ID)?;

    for wrapper in markup::select_all(doc.root_element(), layout::BUILDING_WRAPPER)? {
        let Some(contract) = markup::find_first(wrapper, layout::WRAPPER_CONTRACT)? else {
            continue;
        };
        let matches = contract
            .value()
            .attr("id")
            .and_then(|id| id_pattern.find(id))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            == Some(building_id);
        if !matches {
            continue;
        }
        let cells = markup::select_all(contract, layout::WRAPPER_DEMAND)?;
        let demand = parse_demand(&cells)?;
        let duration = markup::text(markup::select_first(wrapper, layout::DURATION)?);
        let url = onclick_url(markup::select_first(wrapper, layout::AFFORDABLE_BUTTON)?)?;
        return Ok((demand, duration, url));
    }
    Err(Error::parse(format!("no contract for building {building_id}")))
}

/// Which storage a demand overflows, if any.
fn capacity_check(demand: &Demand, stock: &StockSnapshot) -> Option<UpgradeStatus> {
    let warehouse = [demand.lumber, demand.clay, demand.iron];
    if warehouse.iter().any(|&cost| cost >= stock.warehouse_capacity) {
        return Some(UpgradeStatus::ExtendWarehouse);
    }
    if demand.crop >= stock.granary_capacity {
        return Some(UpgradeStatus::ExtendGranary);
    }
    None
}

/// Run the upgrade workflow for one slot.
///
/// Feasibility outcomes come back as [`UpgradeStatus`] values. With
/// `dry_run` set every probe still runs but the final submission is
/// skipped.
pub async fn upgrade(session: &Session, request: UpgradeRequest) -> Result<UpgradeResult> {
    let slot = u8::try_from(request.slot_id)
        .ok()
        .and_then(|id| slot_kind(id).map(|kind| (id, kind)));
    let Some((slot_id, kind)) = slot else {
        tracing::error!("slot_id should be between 1 and 40, got {}", request.slot_id);
        return Ok(UpgradeResult::new(UpgradeStatus::InvalidSlot, request.dry_run));
    };

    tracing::debug!("Execute upgrading job for slot_id={slot_id}");
    let state = fetch_overview(session).await?;
    let occupant = occupant(&state, slot_id, kind)?;

    if occupant != 0 {
        upgrade_occupied(session, &state, slot_id, request, occupant).await
    } else {
        build_on_empty(session, slot_id, request).await
    }
}

/// Type code of whatever sits on the slot; 0 for an empty interior slot.
fn occupant(state: &GameState, slot_id: u8, kind: SlotKind) -> Result<u32> {
    match kind {
        SlotKind::ResourceField => state
            .resource_field(slot_id)
            .map(|f| f.resource_id)
            .ok_or_else(|| Error::parse(format!("resource field {slot_id} not on dashboard"))),
        SlotKind::Building => Ok(state.building(slot_id).map_or(0, |b| b.building_id)),
    }
}

async fn upgrade_occupied(
    session: &Session,
    state: &GameState,
    slot_id: u8,
    request: UpgradeRequest,
    build_id: u32,
) -> Result<UpgradeResult> {
    tracing::debug!("Getting upgrade page for slot_id={slot_id}, gid={build_id}");
    let page = session
        .page(
            HttpRequest::get(layout::BUILD)
                .query("id", slot_id)
                .query("gid", build_id),
        )
        .await?;
    let page = parse_upgrade_page(&page)?;

    let mut info = ActionInfo {
        slot_id,
        build_id,
        demand: page.demand,
        duration: page.duration,
        url: None,
    };

    if let Some(status) = capacity_check(&info.demand, &state.overview.stock) {
        tracing::warn!("Failed to upgrade slot_id={slot_id}, {}", status.message());
        return Ok(UpgradeResult::new(status, request.dry_run).with_action(info));
    }

    match page.button {
        UpgradeButton::Affordable(url) => {
            submit(session, &url, request.dry_run).await?;
            tracing::info!("Upgrading slot_id={slot_id} now");
            info.url = Some(url);
            Ok(UpgradeResult::new(UpgradeStatus::Ok, request.dry_run).with_action(info))
        }
        UpgradeButton::Unaffordable | UpgradeButton::Missing => {
            tracing::warn!("Failed to upgrade slot_id={slot_id}, resources are not affordable");
            Ok(UpgradeResult::new(UpgradeStatus::NotAvailable, request.dry_run).with_action(info))
        }
    }
}

async fn build_on_empty(
    session: &Session,
    slot_id: u8,
    request: UpgradeRequest,
) -> Result<UpgradeResult> {
    tracing::debug!("slot_id={slot_id} is empty, probing building categories");

    let mut pages = Vec::with_capacity(layout::BUILD_CATEGORIES.len());
    let mut options = Vec::new();
    for category in layout::BUILD_CATEGORIES {
        let page = session
            .page(
                HttpRequest::get(layout::BUILD)
                    .query("id", slot_id)
                    .query("category", category),
            )
            .await?;
        options.extend(parse_building_options(&page, category)?);
        pages.push((category, page));
    }

    let Some(building_id) = request.building_id else {
        tracing::warn!("Building on an empty slot requires a building_id");
        return Ok(UpgradeResult::new(UpgradeStatus::BuildingRequired, request.dry_run)
            .with_options(options));
    };
    let Some(option) = options.iter().find(|o| o.id == building_id) else {
        tracing::warn!("building_id={building_id} is not available on slot_id={slot_id}");
        return Ok(UpgradeResult::new(UpgradeStatus::BuildingUnavailable, request.dry_run)
            .with_options(options));
    };

    let page = pages
        .iter()
        .find(|(category, _)| *category == option.category)
        .map(|(_, page)| page.as_str())
        .ok_or_else(|| Error::parse(format!("category page {} missing", option.category)))?;
    let (demand, duration, url) = parse_building_contract(page, building_id)?;

    submit(session, &url, request.dry_run).await?;
    tracing::info!("Building {building_id} on slot_id={slot_id} now");

    let info = ActionInfo {
        slot_id,
        build_id: building_id,
        demand,
        duration,
        url: Some(url),
    };
    Ok(UpgradeResult::new(UpgradeStatus::Ok, request.dry_run)
        .with_action(info)
        .with_options(options))
}

async fn submit(session: &Session, url: &str, dry_run: bool) -> Result<()> {
    if dry_run {
        tracing::info!("Dry run, not submitting {url}");
        return Ok(());
    }
    session.page(HttpRequest::get(url)).await?;
    Ok(())
}
