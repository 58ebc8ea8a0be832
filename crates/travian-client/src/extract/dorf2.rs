//! Building grid page (dorf2).

use crate::error::{Error, Result};
use crate::layout::current as layout;
use crate::markup;
use crate::types::Building;
use scraper::Html;
use std::collections::btree_map::{BTreeMap, Entry};

/// Parse the interior building slots, ordered by slot id.
///
/// The grid markup can repeat a slot; the first occurrence wins.
pub fn parse_dorf2(html: &str) -> Result<Vec<Building>> {
    let doc = Html::parse_document(html);
    let mut slots: BTreeMap<u8, Building> = BTreeMap::new();

    for div in markup::select_all(doc.root_element(), layout::VILLAGE_CONTENT_SLOTS)? {
        let Some(aid) = div.value().attr(layout::SLOT_ATTR) else {
            continue;
        };
        let id: u8 = aid
            .trim()
            .parse()
            .map_err(|_| Error::parse(format!("bad slot id {aid:?}")))?;
        let gid = markup::attr(div, layout::GID_ATTR)?;
        let building_id = u32::try_from(markup::parse_number(gid, "building type")?)
            .map_err(|_| Error::parse(format!("slot {id}: bad building type {gid:?}")))?;
        let name = div.value().attr(layout::NAME_ATTR).unwrap_or("").to_string();
        let level = if name.is_empty() {
            0
        } else {
            let link = markup::select_first(div, layout::LEVEL_LINK)?;
            let level = markup::attr(link, layout::LEVEL_ATTR)?;
            u32::try_from(markup::parse_number(level, "building level")?)
                .map_err(|_| Error::parse(format!("slot {id}: bad level {level:?}")))?
        };

        match slots.entry(id) {
            Entry::Vacant(slot) => {
                slot.insert(Building {
                    id,
                    building_id,
                    name,
                    level,
                });
            }
            Entry::Occupied(_) => tracing::debug!("slot {id} listed twice, keeping the first"),
        }
    }

    Ok(slots.into_values().collect())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const DORF2: &str = r#"<html><body>
<div id="villageContent">
  <div class="buildingSlot a19 g19" data-aid="19" data-gid="19" data-name="Barracks">
    <a class="level" data-level="3" href="/build.php?id=19&amp;gid=19"></a>
  </div>
  <div class="buildingSlot a26 g15" data-aid="26" data-gid="15" data-name="Main Building">
    <div class="labelLayer"><a data-level="7" href="/build.php?id=26&amp;gid=15"></a></div>
  </div>
  <div class="buildingSlot a21 g0" data-aid="21" data-gid="0" data-name="">
    <a href="/build.php?id=21"></a>
  </div>
  <div class="buildingSlot a19 g10" data-aid="19" data-gid="10" data-name="Warehouse">
    <a data-level="9"></a>
  </div>
  <div class="decoration"></div>
</div>
</body></html>"#;

    #[test]
    fn test_buildings_ordered_by_slot() {
        let buildings = parse_dorf2(DORF2).unwrap();
        let ids: Vec<u8> = buildings.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![19, 21, 26]);
        assert_eq!(buildings[2].name, "Main Building");
        assert_eq!(buildings[2].level, 7);
    }

    #[test]
    fn test_duplicate_slot_keeps_first() {
        let buildings = parse_dorf2(DORF2).unwrap();
        let slot19: Vec<_> = buildings.iter().filter(|b| b.id == 19).collect();
        assert_eq!(slot19.len(), 1);
        assert_eq!(slot19[0].building_id, 19);
        assert_eq!(slot19[0].level, 3);
    }

    #[test]
    fn test_empty_slot_has_level_zero() {
        let buildings = parse_dorf2(DORF2).unwrap();
        let empty = buildings.iter().find(|b| b.id == 21).unwrap();
        assert_eq!(empty.building_id, 0);
        assert_eq!(empty.level, 0);
        assert!(empty.name.is_empty());
    }
}
