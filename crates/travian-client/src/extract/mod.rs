//! State Extractor: fetch game pages and map them to snapshot records.
//!
//! Each `fetch_*` function issues its requests through the session and hands
//! the bodies to a pure `parse_*` function. Any missing element the layout
//! contract guarantees fails the whole call with [`crate::Error::Parse`].

mod dorf1;
mod dorf2;
mod hero;
mod tile;

pub use dorf1::parse_dorf1;
pub use dorf2::parse_dorf2;
pub use hero::{parse_hero_attributes, parse_hero_inventory};
pub use tile::parse_tile;

#[cfg(test)]
pub(crate) use dorf1::tests::dorf1_html;
#[cfg(test)]
pub(crate) use dorf2::tests::DORF2;
#[cfg(test)]
pub(crate) use hero::tests::inventory_json;

use crate::auth::Session;
use crate::error::Result;
use crate::layout::current as layout;
use crate::transport::HttpRequest;
use crate::types::{GameState, HeroAttributes, HeroInventory, TileInfo};
use serde::Deserialize;
use serde_json::json;

/// Fetch both dashboard pages.
pub async fn fetch_overview(session: &Session) -> Result<GameState> {
    tracing::debug!("Getting info from dorf1");
    let dorf1 = session.page(HttpRequest::get(layout::DORF1)).await?;
    let overview = parse_dorf1(&dorf1)?;

    tracing::debug!("Getting info from dorf2");
    let dorf2 = session.page(HttpRequest::get(layout::DORF2)).await?;
    let buildings = parse_dorf2(&dorf2)?;

    Ok(GameState {
        overview,
        buildings,
    })
}

pub async fn fetch_hero_attributes(session: &Session) -> Result<HeroAttributes> {
    tracing::debug!("Getting hero attributes");
    let page = session.page(HttpRequest::get(layout::HERO_ATTRIBUTES)).await?;
    parse_hero_attributes(&page)
}

pub async fn fetch_hero_inventory(session: &Session) -> Result<HeroInventory> {
    tracing::debug!("Getting hero inventory");
    let body = session.api(HttpRequest::get(layout::HERO_INVENTORY)).await?;
    parse_hero_inventory(&body)
}

#[derive(Debug, Deserialize)]
struct TileResponse {
    html: String,
}

pub async fn fetch_tile(session: &Session, x: i32, y: i32) -> Result<TileInfo> {
    tracing::debug!("Getting tile info of ({x}, {y})");
    let body = session
        .api(HttpRequest::post(layout::TILE_DETAILS).json(json!({ "x": x, "y": y })))
        .await?;
    let tile: TileResponse = serde_json::from_str(&body)?;
    parse_tile(&tile.html)
}
