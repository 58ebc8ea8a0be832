//! Hero attributes page and hero inventory API.

use crate::error::{Error, Result};
use crate::layout::current as layout;
use crate::types::{HeroAttributes, HeroInventory, HeroInventoryResource, HeroProduction, Resource};
use scraper::Html;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct ScreenData {
    hero: HeroPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeroPayload {
    attribute_points: i64,
    attack_behaviour: serde_json::Value,
    experience: i64,
    experience_percent: f64,
    health: f64,
    speed: f64,
    production_types: Vec<f64>,
}

/// Parse the JSON payload embedded in the attributes page.
///
/// The payload is the value of the `screenData:` line inside an inline
/// script, terminated by a trailing comma.
pub fn parse_hero_attributes(html: &str) -> Result<HeroAttributes> {
    let doc = Html::parse_document(html);
    let label = layout::SCREEN_DATA_LABEL;

    let block = doc
        .root_element()
        .text()
        .find(|t| t.contains(label))
        .ok_or_else(|| Error::parse(format!("no {label} block on hero attributes page")))?;
    let line = block
        .lines()
        .find(|l| l.contains(label))
        .ok_or_else(|| Error::parse(format!("no {label} line")))?;
    let (_, payload) = line
        .split_once(':')
        .ok_or_else(|| Error::parse(format!("{label} line has no value")))?;
    let payload = payload.trim().trim_matches(',').trim();

    let hero = serde_json::from_str::<ScreenData>(payload)?.hero;
    if hero.production_types.len() < layout::HERO_PRODUCTION_ORDER.len() {
        return Err(Error::parse(format!(
            "hero has {} production slots, expected {}",
            hero.production_types.len(),
            layout::HERO_PRODUCTION_ORDER.len()
        )));
    }

    Ok(HeroAttributes {
        attribute_points: hero.attribute_points,
        attack_behaviour: hero.attack_behaviour,
        experience: hero.experience,
        experience_percent: hero.experience_percent,
        health: (hero.health * 100.0).round() / 100.0,
        speed: hero.speed,
        production: layout::HERO_PRODUCTION_ORDER
            .iter()
            .zip(&hero.production_types)
            .map(|(name, value)| HeroProduction {
                name: name.to_string(),
                value: *value,
            })
            .collect(),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InventoryScreen {
    checksum: String,
    view_data: ViewData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewData {
    items_inventory: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceItem {
    id: u64,
    #[serde(default)]
    amount: i64,
    #[serde(default)]
    already_equipped: i64,
    #[serde(default)]
    max_input: i64,
}

/// Parse the hero inventory screen JSON.
///
/// Only the four resource items are decoded; equipment items have a
/// different shape and are skipped.
pub fn parse_hero_inventory(json: &str) -> Result<HeroInventory> {
    let screen: InventoryScreen = serde_json::from_str(json)?;
    let mut resources = BTreeMap::new();

    for resource in Resource::ALL {
        let item = screen
            .view_data
            .items_inventory
            .iter()
            .find(|item| item.get("name").and_then(|n| n.as_str()) == Some(resource.item_name()))
            .ok_or_else(|| Error::parse(format!("no {resource} item in hero inventory")))?;
        let item: ResourceItem = serde_json::from_value(item.clone())?;
        resources.insert(
            resource,
            HeroInventoryResource {
                village: item.already_equipped,
                amount: item.amount,
                transfer_id: item.id,
                max_transfer: item.max_input,
            },
        );
    }

    Ok(HeroInventory {
        checksum: screen.checksum,
        resources,
    })
}
