//! Map tile details fragment.
//!
//! The fragment has no explicit tile type. It is sniffed from the markup in
//! a fixed order:
//!
//! 1. no `#map_details` panel: wilderness
//! 2. `oasis` class on `#tileDetails`: oasis
//! 3. `village` class with a village-info table: village
//! 4. `village` class without one: abandoned valley
//! 5. anything else: [`TileInfo::Unknown`]

use crate::error::{Error, Result};
use crate::layout::current as layout;
use crate::markup::{self, ascii_only};
use crate::types::{FieldDistribution, OasisBonus, TileInfo, TileTroop};
use scraper::{ElementRef, Html};

pub fn parse_tile(html: &str) -> Result<TileInfo> {
    let doc = Html::parse_fragment(html);
    let root = doc.root_element();

    let Some(details) = markup::find_first(root, layout::MAP_DETAILS)? else {
        return Ok(TileInfo::Wilderness);
    };
    let panel = markup::select_first(root, layout::TILE_DETAILS_PANEL)?;

    if markup::has_class(panel, layout::OASIS_CLASS) {
        return parse_oasis(details);
    }
    if markup::has_class(panel, layout::VILLAGE_CLASS) {
        return match markup::find_first(details, layout::VILLAGE_INFO)? {
            Some(info) => parse_village(root, details, info),
            None => parse_abandoned_valley(details),
        };
    }

    tracing::warn!("unrecognised tile details panel");
    Ok(TileInfo::Unknown {
        classes: markup::classes(panel),
    })
}

/// Rows carrying both a description and a value cell.
fn described_rows<'a>(
    scope: ElementRef<'a>,
    rows: &str,
) -> Result<Vec<(ElementRef<'a>, ElementRef<'a>)>> {
    let mut out = Vec::new();
    for row in markup::select_all(scope, rows)? {
        let desc = markup::find_first(row, layout::ROW_DESC)?;
        let val = markup::find_first(row, layout::ROW_VALUE)?;
        if let (Some(desc), Some(val)) = (desc, val) {
            out.push((desc, val));
        }
    }
    Ok(out)
}

fn parse_oasis(details: ElementRef<'_>) -> Result<TileInfo> {
    let distribution = described_rows(details, layout::DISTRIBUTION_ROWS)?
        .into_iter()
        .map(|(desc, val)| OasisBonus {
            resource: markup::text(desc),
            value: ascii_only(&markup::text(val)).trim().to_string(),
        })
        .collect();

    let troops = described_rows(details, layout::TROOP_INFO_ROWS)?
        .into_iter()
        .map(|(desc, val)| -> Result<TileTroop> {
            Ok(TileTroop {
                name: markup::text(desc),
                count: markup::number(val, "oasis troop count")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TileInfo::Oasis {
        distribution,
        troops,
    })
}

fn parse_village(
    root: ElementRef<'_>,
    details: ElementRef<'_>,
    info: ElementRef<'_>,
) -> Result<TileInfo> {
    let cells = markup::select_all(details, layout::DISTRIBUTION_CELLS)?;
    let resource_fields = layout::DISTRIBUTION_ORDER
        .into_iter()
        .zip(cells)
        .map(|(resource, cell)| -> Result<FieldDistribution> {
            Ok(FieldDistribution {
                resource,
                count: markup::number(cell, "field distribution")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TileInfo::Village {
        tribe: markup::text(markup::select_first(info, layout::TRIBE)?),
        owner: markup::text(markup::select_first(info, layout::OWNER)?),
        capital: markup::exists(root, layout::CAPITAL_MARKER)?,
        resource_fields,
    })
}

fn parse_abandoned_valley(details: ElementRef<'_>) -> Result<TileInfo> {
    let mut values = Vec::new();
    for row in markup::select_all(details, layout::DISTRIBUTION_ROWS)? {
        if let Some(val) = markup::find_first(row, layout::ROW_VALUE)? {
            values.push(val);
        }
    }
    if values.is_empty() {
        return Err(Error::parse("abandoned valley without field distribution"));
    }

    let resource_fields = layout::DISTRIBUTION_ORDER
        .into_iter()
        .zip(values)
        .map(|(resource, val)| -> Result<FieldDistribution> {
            Ok(FieldDistribution {
                resource,
                count: markup::number(val, "field distribution")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TileInfo::AbandonedValley { resource_fields })
}
