//! Resource overview page (dorf1).

use crate::error::{Error, Result};
use crate::layout::current as layout;
use crate::markup::{self, ascii_only};
use crate::types::*;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::collections::btree_map::{BTreeMap, Entry};

/// Parse everything the resource overview shows.
pub fn parse_dorf1(html: &str) -> Result<VillageOverview> {
    let doc = Html::parse_document(html);
    let root = doc.root_element();

    Ok(VillageOverview {
        stock: parse_stock(root)?,
        production: parse_production(root)?,
        resource_fields: parse_resource_fields(root)?,
        troops: parse_troops(root)?,
        movements: parse_movements(root)?,
        building_list: parse_building_list(root)?,
        village_list: parse_village_list(root)?,
        loyalty: parse_loyalty(root)?,
        culture_points: parse_culture_points(root)?,
    })
}

fn nth_number(cells: &[ElementRef<'_>], index: usize, what: &str) -> Result<i64> {
    let cell = cells
        .get(index)
        .ok_or_else(|| Error::parse(format!("{what}: cell {index} missing")))?;
    markup::number(*cell, what)
}

fn parse_stock(root: ElementRef<'_>) -> Result<StockSnapshot> {
    let stock = markup::select_first(root, layout::STOCK_BAR)?;

    let warehouse_capacity = markup::number(
        markup::select_first(stock, layout::WAREHOUSE_CAPACITY)?,
        "warehouse capacity",
    )?;
    let buttons = markup::select_all(stock, layout::WAREHOUSE_BUTTONS)?;
    let [lumber, clay, iron] = layout::WAREHOUSE_ORDER;

    let granary_capacity = markup::number(
        markup::select_first(stock, layout::GRANARY_CAPACITY)?,
        "granary capacity",
    )?;
    let granary = markup::select_all(stock, layout::GRANARY_BUTTONS)?;

    Ok(StockSnapshot {
        warehouse_capacity,
        lumber: nth_number(&buttons, 0, lumber.name())?,
        clay: nth_number(&buttons, 1, clay.name())?,
        iron: nth_number(&buttons, 2, iron.name())?,
        granary_capacity,
        crop: nth_number(&granary, 0, "crop")?,
        free_crop: nth_number(&granary, 1, "free crop")?,
    })
}

fn parse_production(root: ElementRef<'_>) -> Result<ProductionSnapshot> {
    let rows = markup::select_all(root, layout::PRODUCTION_ROWS)?;
    let row_value = |index: usize| -> Result<i64> {
        let resource = layout::PRODUCTION_ORDER[index];
        let row = rows.get(index).ok_or_else(|| {
            Error::parse(format!("production row {index} ({resource}) missing"))
        })?;
        let cell = markup::select_first(*row, layout::PRODUCTION_VALUE)?;
        markup::number(cell, resource.name())
    };

    Ok(ProductionSnapshot {
        lumber: row_value(0)?,
        clay: row_value(1)?,
        iron: row_value(2)?,
        crop: row_value(3)?,
    })
}

/// The number captured by the first class token matching `re`.
fn class_number(el: ElementRef<'_>, re: &Regex, what: &str) -> Result<u32> {
    el.value()
        .classes()
        .find_map(|c| re.captures(c))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| Error::parse(format!("resource field has no {what} class")))
}

/// Resource fields ordered by slot id; a repeated slot keeps its first
/// occurrence.
fn parse_resource_fields(root: ElementRef<'_>) -> Result<Vec<ResourceField>> {
    let slot_re = markup::regex(layout::SLOT_CLASS)?;
    let gid_re = markup::regex(layout::GID_CLASS)?;
    let level_re = markup::regex(layout::LEVEL_CLASS)?;
    let mut slots = BTreeMap::new();

    for field in markup::select_all(root, layout::RESOURCE_FIELDS)? {
        let id = class_number(field, &slot_re, "slot")?;
        let resource_id = class_number(field, &gid_re, "gid")?;
        let level = class_number(field, &level_re, "level")?;
        let name = Resource::from_gid(resource_id).ok_or_else(|| {
            Error::parse(format!("slot {id}: unknown resource gid {resource_id}"))
        })?;
        let id = u8::try_from(id)
            .map_err(|_| Error::parse(format!("slot id {id} out of range")))?;
        match slots.entry(id) {
            Entry::Vacant(slot) => {
                slot.insert(ResourceField {
                    id,
                    resource_id,
                    level,
                    name,
                });
            }
            Entry::Occupied(_) => {
                tracing::debug!("resource field {id} listed twice, keeping the first")
            }
        }
    }

    Ok(slots.into_values().collect())
}

/// A "no troops" marker anywhere in the table means the village has none.
fn parse_troops(root: ElementRef<'_>) -> Result<Vec<Troop>> {
    let rows = markup::select_all(root, layout::TROOP_ROWS)?;
    for row in &rows {
        if markup::exists(*row, layout::NO_TROOPS)? {
            return Ok(Vec::new());
        }
    }

    rows.into_iter()
        .map(|row| -> Result<Troop> {
            Ok(Troop {
                name: markup::text(markup::select_first(row, layout::TROOP_NAME)?),
                count: markup::number(
                    markup::select_first(row, layout::TROOP_COUNT)?,
                    "troop count",
                )?,
            })
        })
        .collect()
}

/// Single pass in document order. A row whose text contains a direction
/// label switches the direction for the rows after it; rows before the
/// first label belong to neither list.
fn parse_movements(root: ElementRef<'_>) -> Result<Movements> {
    let mut movements = Movements::default();
    let Some(table) = markup::find_first(root, layout::MOVEMENTS_TABLE)? else {
        return Ok(movements);
    };

    let mut direction = None;
    for row in markup::select_all(table, layout::MOVEMENT_ROWS)? {
        let row_text = markup::text(row);
        if row_text.contains(layout::INCOMING_LABEL) {
            direction = Some(Direction::Incoming);
            continue;
        }
        if row_text.contains(layout::OUTGOING_LABEL) {
            direction = Some(Direction::Outgoing);
            continue;
        }
        let Some(direction) = direction else {
            continue;
        };

        let movement = parse_movement_row(row, direction)?;
        match direction {
            Direction::Incoming => movements.incoming.push(movement),
            Direction::Outgoing => movements.outgoing.push(movement),
        }
    }
    Ok(movements)
}

fn parse_movement_row(row: ElementRef<'_>, direction: Direction) -> Result<Movement> {
    let summary = markup::text(markup::select_first(row, layout::MOVEMENT_SUMMARY)?);
    let mut parts = summary.split_whitespace();
    let count = parts
        .next()
        .ok_or_else(|| Error::parse("movement summary is empty"))?;
    let count = markup::parse_number(count, "movement count")?;
    let kind = parts.collect::<Vec<_>>().join(" ");
    if kind.is_empty() {
        return Err(Error::parse(format!("movement {summary:?} has no type")));
    }

    Ok(Movement {
        direction,
        kind,
        count,
        duration: markup::text(markup::select_first(row, layout::MOVEMENT_TIMER)?),
    })
}

fn parse_building_list(root: ElementRef<'_>) -> Result<Vec<BuildingListEntry>> {
    markup::select_all(root, layout::BUILDING_LIST)?
        .into_iter()
        .map(|entry| -> Result<BuildingListEntry> {
            Ok(BuildingListEntry {
                name: markup::first_text(markup::select_first(entry, layout::BUILDING_LIST_NAME)?),
                level: markup::text(markup::select_first(entry, layout::BUILDING_LIST_LEVEL)?),
                duration: markup::text(markup::select_first(entry, layout::BUILDING_LIST_TIMER)?),
            })
        })
        .collect()
}

/// Coordinates render as "(x" and "y)" with a typographic minus.
fn parse_coordinate(raw: &str, what: &str) -> Result<i32> {
    let cleaned = ascii_only(raw);
    let cleaned = cleaned
        .trim()
        .trim_matches(|c: char| c == '(' || c == ')' || c == '|' || c.is_whitespace());
    cleaned
        .parse()
        .map_err(|_| Error::parse(format!("{what}: not a coordinate: {raw:?}")))
}

fn parse_village_list(root: ElementRef<'_>) -> Result<Vec<VillageListEntry>> {
    markup::select_all(root, layout::VILLAGE_LIST)?
        .into_iter()
        .map(|entry| -> Result<VillageListEntry> {
            let x = markup::text(markup::select_first(entry, layout::VILLAGE_X)?);
            let y = markup::text(markup::select_first(entry, layout::VILLAGE_Y)?);
            Ok(VillageListEntry {
                name: markup::text(markup::select_first(entry, layout::VILLAGE_NAME)?),
                coordinates: Coordinates {
                    x: parse_coordinate(&x, "x")?,
                    y: parse_coordinate(&y, "y")?,
                },
                current: markup::has_class(entry, layout::ACTIVE_CLASS),
            })
        })
        .collect()
}

fn parse_loyalty(root: ElementRef<'_>) -> Result<String> {
    let loyalty = markup::text(markup::select_first(root, layout::LOYALTY)?);
    Ok(ascii_only(&loyalty).trim().to_string())
}

fn parse_culture_points(root: ElementRef<'_>) -> Result<CulturePoints> {
    let info = markup::select_first(root, layout::EXPANSION_SLOT_INFO)?;
    let title = ascii_only(markup::attr(info, "title")?).replace(',', "");
    let fraction = markup::regex(layout::CULTURE_FRACTION)?;

    let caps = fraction
        .captures_iter(&title)
        .last()
        .ok_or_else(|| Error::parse("no culture point fraction in expansion slot info"))?;
    Ok(CulturePoints {
        current: markup::parse_number(&caps[1], "culture points")?,
        next_village: markup::parse_number(&caps[2], "culture points for next village")?,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A trimmed-down resource overview with every section the parser reads.
    pub(crate) fn dorf1_html(warehouse: &str, granary: &str) -> String {
        format!(
            r#"<html><body>
<div id="sidebarBoxActiveVillage">
  <div class="playerName">alice</div>
  <div class="loyalty"><span>&#x202d;100&#x202c;%</span></div>
</div>
<div id="stockBar">
  <div class="warehouse">
    <div class="capacity"><div class="value">&#x202d;{warehouse}&#x202c;</div></div>
    <a class="stockBarButton"><span class="value">&#x202d;1,234&#x202c;</span></a>
    <a class="stockBarButton"><span class="value">980</span></a>
    <a class="stockBarButton"><span class="value">2,005</span></a>
  </div>
  <div class="granary">
    <div class="capacity"><div class="value">{granary}</div></div>
    <a class="stockBarButton"><span class="value">1,500</span></a>
    <a class="stockBarButton"><span class="value">&#x202d;&minus;12&#x202c;</span></a>
  </div>
</div>
<div id="resourceFieldContainer">
  <a class="level colorLayer good buildingSlot1 gid1 level3" href="/build.php?id=1"></a>
  <a class="level colorLayer buildingSlot2 gid4 level0" href="/build.php?id=2"></a>
  <a class="level colorLayer buildingSlot3 gid2 level10" href="/build.php?id=3"></a>
</div>
<div class="villageInfobox production">
  <table id="production"><tbody>
    <tr><td class="res">Lumber:</td><td class="num">&#x202d;&#x202d;120&#x202c;&#x202c;</td></tr>
    <tr><td class="res">Clay:</td><td class="num">100</td></tr>
    <tr><td class="res">Iron:</td><td class="num">1,080</td></tr>
    <tr><td class="res">Crop:</td><td class="num">&#x202d;&#x2212;27&#x202c;</td></tr>
  </tbody></table>
</div>
<div class="villageInfobox troops">
  <table id="troops"><tbody>
    <tr><td class="ico"></td><td class="num">15</td><td class="un">Legionnaire</td></tr>
    <tr><td class="ico"></td><td class="num">1,200</td><td class="un">Praetorian</td></tr>
  </tbody></table>
</div>
<div class="villageInfobox movements">
  <table id="movements"><tbody>
    <tr><th colspan="3">Troop movements:</th></tr>
    <tr><td><div class="mov">99 Ghost</div><div class="dur_r"><span class="timer">0:00:01</span></div></td></tr>
    <tr><th colspan="3">Incoming</th></tr>
    <tr><td><div class="mov">2 Attacks</div><div class="dur_r">in <span class="timer">0:12:30</span></div></td></tr>
    <tr><td><div class="mov">1 Reinf.</div><div class="dur_r">in <span class="timer">1:02:03</span></div></td></tr>
    <tr><th colspan="3">Outgoing</th></tr>
    <tr><td><div class="mov">3 Raids</div><div class="dur_r">in <span class="timer">0:05:00</span></div></td></tr>
  </tbody></table>
</div>
<div class="buildingList"><ul>
  <li><div class="name">Woodcutter <span class="lvl">Level 4</span></div>
      <div class="buildDuration"><span class="timer">0:10:00</span></div></li>
</ul></div>
<div id="sidebarBoxVillagelist"><div class="villageList">
  <div class="listEntry village active"><span class="name">Capital</span>
    <span class="coordinatesGrid"><span class="coordinateX">(&#x202d;&#x2212;12&#x202c;</span>
    <span class="coordinatePipe">|</span><span class="coordinateY">&#x202d;34&#x202c;)</span></span></div>
  <div class="listEntry village"><span class="name">Second</span>
    <span class="coordinatesGrid"><span class="coordinateX">(5</span>
    <span class="coordinateY">&#x2212;7)</span></span></div>
</div></div>
<div class="expansionSlotInfo" title="Culture points: 1,200/500 &#x202d;2,310/4,000&#x202c;"></div>
</body></html>"#
        )
    }

    #[test]
    fn test_stock_strips_separators_and_marks() {
        let overview = parse_dorf1(&dorf1_html("12,345", "8,000")).unwrap();
        assert_eq!(
            overview.stock,
            StockSnapshot {
                warehouse_capacity: 12345,
                lumber: 1234,
                clay: 980,
                iron: 2005,
                granary_capacity: 8000,
                crop: 1500,
                free_crop: -12,
            }
        );
    }

    #[test]
    fn test_production_order() {
        let overview = parse_dorf1(&dorf1_html("800", "800")).unwrap();
        assert_eq!(
            overview.production,
            ProductionSnapshot {
                lumber: 120,
                clay: 100,
                iron: 1080,
                crop: -27,
            }
        );
    }

    #[test]
    fn test_resource_fields_from_class_tokens() {
        let overview = parse_dorf1(&dorf1_html("800", "800")).unwrap();
        let fields = &overview.resource_fields;
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].id, 1);
        assert_eq!(fields[0].name, Resource::Lumber);
        assert_eq!(fields[0].level, 3);
        assert_eq!(fields[1].resource_id, 4);
        assert_eq!(fields[1].name, Resource::Crop);
        assert_eq!(fields[2].level, 10);
    }

    #[test]
    fn test_repeated_resource_field_keeps_first() {
        let html = dorf1_html("800", "800").replace(
            r#"<a class="level colorLayer buildingSlot3 gid2 level10""#,
            r#"<a class="level colorLayer buildingSlot1 gid3 level9" href="/build.php?id=1"></a>
  <a class="level colorLayer buildingSlot3 gid2 level10""#,
        );
        let fields = parse_dorf1(&html).unwrap().resource_fields;
        let ids: Vec<u8> = fields.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(fields[0].name, Resource::Lumber);
        assert_eq!(fields[0].level, 3);
    }

    #[test]
    fn test_short_stock_bar_is_parse_error() {
        let html = dorf1_html("800", "800").replace(
            r#"<a class="stockBarButton"><span class="value">2,005</span></a>"#,
            "",
        );
        let err = parse_dorf1(&html).unwrap_err();
        assert!(err.to_string().contains("iron"));
    }

    #[test]
    fn test_troops() {
        let overview = parse_dorf1(&dorf1_html("800", "800")).unwrap();
        assert_eq!(
            overview.troops,
            vec![
                Troop {
                    name: "Legionnaire".into(),
                    count: 15
                },
                Troop {
                    name: "Praetorian".into(),
                    count: 1200
                },
            ]
        );
    }

    #[test]
    fn test_no_troops_marker_wins() {
        let html = r#"<div class="villageInfobox"><table id="troops"><tbody>
            <tr><td class="num">4</td><td class="un">Clubswinger</td></tr>
            <tr><td class="noTroops">none</td></tr>
        </tbody></table></div>"#;
        let doc = Html::parse_document(html);
        assert!(parse_troops(doc.root_element()).unwrap().is_empty());
    }

    #[test]
    fn test_movements_follow_direction_labels() {
        let overview = parse_dorf1(&dorf1_html("800", "800")).unwrap();
        let movements = &overview.movements;
        assert_eq!(movements.incoming.len(), 2);
        assert_eq!(movements.outgoing.len(), 1);
        assert_eq!(movements.incoming[0].kind, "Attacks");
        assert_eq!(movements.incoming[0].count, 2);
        assert_eq!(movements.incoming[1].duration, "1:02:03");
        assert_eq!(movements.outgoing[0].kind, "Raids");
        assert_eq!(movements.outgoing[0].direction, Direction::Outgoing);
        // The row before any label is dropped.
        assert!(movements
            .incoming
            .iter()
            .chain(&movements.outgoing)
            .all(|m| m.kind != "Ghost"));
    }

    #[test]
    fn test_missing_movement_table_is_empty() {
        let doc = Html::parse_document("<html><body></body></html>");
        let movements = parse_movements(doc.root_element()).unwrap();
        assert_eq!(movements, Movements::default());
    }

    #[test]
    fn test_building_list_and_villages() {
        let overview = parse_dorf1(&dorf1_html("800", "800")).unwrap();
        assert_eq!(
            overview.building_list,
            vec![BuildingListEntry {
                name: "Woodcutter".into(),
                level: "Level 4".into(),
                duration: "0:10:00".into(),
            }]
        );
        assert_eq!(overview.village_list.len(), 2);
        assert_eq!(overview.village_list[0].coordinates, Coordinates { x: -12, y: 34 });
        assert!(overview.village_list[0].current);
        assert_eq!(overview.village_list[1].coordinates, Coordinates { x: 5, y: -7 });
        assert!(!overview.village_list[1].current);
    }

    #[test]
    fn test_loyalty_and_culture_points() {
        let overview = parse_dorf1(&dorf1_html("800", "800")).unwrap();
        assert_eq!(overview.loyalty, "100%");
        assert_eq!(
            overview.culture_points,
            CulturePoints {
                current: 2310,
                next_village: 4000
            }
        );
    }

    #[test]
    fn test_missing_stock_bar_is_parse_error() {
        let err = parse_dorf1("<html><body></body></html>").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
