//! Troop training in the production-capable buildings of a village.

use super::parse_demand;
use crate::auth::Session;
use crate::error::Result;
use crate::extract::fetch_overview;
use crate::layout::current as layout;
use crate::markup;
use crate::transport::HttpRequest;
use crate::types::{Building, UnitOption};
use scraper::Html;
use serde::Serialize;
use std::collections::BTreeMap;

/// Hidden fields of a building's training form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingForm {
    pub action: String,
    pub checksum: String,
    /// Positional slot id echoed back to the server.
    pub s: String,
    /// Village id.
    pub did: String,
    pub s1: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductionDetail {
    pub slot_id: u8,
    pub building_id: u32,
    /// Every form field submitted, or that would have been.
    pub fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductionResult {
    pub produced: bool,
    pub dry_run: bool,
    pub details: Vec<ProductionDetail>,
}

/// Trainable units listed on a production building's page.
pub fn parse_units(html: &str, building: &Building) -> Result<Vec<UnitOption>> {
    let doc = Html::parse_document(html);
    markup::select_all(doc.root_element(), layout::TRAIN_UNITS)?
        .into_iter()
        .map(|unit| -> Result<UnitOption> {
            let cells = markup::select_all(unit, layout::UNIT_DEMAND)?;
            Ok(UnitOption {
                demand: parse_demand(&cells)?,
                duration: markup::text(markup::select_first(unit, layout::UNIT_DURATION)?),
                max_production: markup::number(
                    markup::select_first(unit, layout::UNIT_MAX)?,
                    "max_production",
                )?,
                troop_type: markup::attr(markup::select_first(unit, layout::UNIT_INPUT)?, "name")?
                    .to_string(),
                troop_name: markup::attr(markup::select_first(unit, layout::UNIT_IMAGE)?, "alt")?
                    .to_string(),
                building_id: building.building_id,
                slot_id: building.id,
            })
        })
        .collect()
}

pub fn parse_training_form(html: &str) -> Result<TrainingForm> {
    let doc = Html::parse_document(html);
    let root = doc.root_element();
    let value = |css: &str| -> Result<String> {
        Ok(markup::attr(markup::select_first(root, css)?, "value")?.to_string())
    };
    Ok(TrainingForm {
        action: value(layout::TRAIN_ACTION)?,
        checksum: value(layout::TRAIN_CHECKSUM)?,
        s: value(layout::TRAIN_SLOT)?,
        did: value(layout::TRAIN_VILLAGE)?,
        s1: value(layout::TRAIN_BUTTON)?,
    })
}

async fn production_buildings(session: &Session) -> Result<Vec<Building>> {
    let state = fetch_overview(session).await?;
    let buildings: Vec<Building> = state
        .buildings
        .into_iter()
        .filter(|b| layout::PRODUCTION_BUILDINGS.contains(&b.building_id))
        .collect();
    if buildings.is_empty() {
        tracing::warn!("No buildings can produce units");
    }
    Ok(buildings)
}

async fn building_page(session: &Session, building: &Building) -> Result<String> {
    tracing::debug!(
        "Checking producible units in {} (building_id={})",
        building.name,
        building.building_id
    );
    session
        .page(
            HttpRequest::get(layout::BUILD)
                .query("id", building.id)
                .query("gid", building.building_id),
        )
        .await
}

/// Every unit the village can train right now, across all its
/// production buildings.
pub async fn list_producible_units(session: &Session) -> Result<Vec<UnitOption>> {
    let mut units = Vec::new();
    for building in production_buildings(session).await? {
        let page = building_page(session, &building).await?;
        units.extend(parse_units(&page, &building)?);
    }
    Ok(units)
}

/// Train units according to `plan` (unit type code to requested count).
///
/// Each production building gets one combined submission. Requests are
/// clamped to what the building can currently produce; types the plan
/// does not name are submitted as 0.
pub async fn produce_units(
    session: &Session,
    plan: &BTreeMap<String, i64>,
    dry_run: bool,
) -> Result<ProductionResult> {
    let mut details = Vec::new();

    for building in production_buildings(session).await? {
        let page = building_page(session, &building).await?;
        let units = parse_units(&page, &building)?;
        if units.is_empty() {
            tracing::debug!("{} has nothing to train", building.name);
            continue;
        }
        let form = parse_training_form(&page)?;

        let mut fields = vec![
            ("action".to_string(), form.action),
            ("checksum".to_string(), form.checksum),
            ("s".to_string(), form.s),
            ("did".to_string(), form.did),
        ];
        for unit in &units {
            let requested = plan.get(&unit.troop_type).copied().unwrap_or(0);
            let count = requested.clamp(0, unit.max_production.max(0));
            fields.push((unit.troop_type.clone(), count.to_string()));
        }
        fields.push(("s1".to_string(), form.s1));

        if dry_run {
            tracing::info!("Dry run, not submitting training in {}", building.name);
        } else {
            session
                .page(
                    HttpRequest::post(layout::BUILD)
                        .query("id", building.id)
                        .query("gid", building.building_id)
                        .form(fields.clone()),
                )
                .await?;
            tracing::info!("Submitted training in {}", building.name);
        }

        details.push(ProductionDetail {
            slot_id: building.id,
            building_id: building.building_id,
            fields: fields.into_iter().collect(),
        });
    }

    Ok(ProductionResult {
        produced: !dry_run && !details.is_empty(),
        dry_run,
        details,
    })
}
