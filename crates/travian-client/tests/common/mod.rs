//! Shared game-server fixtures for the integration tests.
#![allow(dead_code)]

use serde_json::json;
use travian_client::{authenticate, Credentials, HttpTransport, Session};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USERNAME: &str = "alice";
pub const TOKEN: &str = "tok-42";

/// A dashboard with the given storage capacities and a single resource
/// field at slot 1 (woodcutter, level 2).
pub fn dashboard(warehouse: u32, granary: u32) -> String {
    format!(
        r#"<html><body>
<div id="sidebarBoxActiveVillage">
  <div class="playerName">{USERNAME}</div>
  <div class="loyalty"><span>100%</span></div>
</div>
<div id="stockBar">
  <div class="warehouse"><div class="capacity"><div class="value">{warehouse}</div></div>
    <a class="stockBarButton">500</a><a class="stockBarButton">500</a><a class="stockBarButton">500</a>
  </div>
  <div class="granary"><div class="capacity"><div class="value">{granary}</div></div>
    <a class="stockBarButton">400</a><a class="stockBarButton">20</a>
  </div>
</div>
<div id="resourceFieldContainer">
  <a class="level colorLayer buildingSlot1 gid1 level2" href="/build.php?id=1"></a>
</div>
<div class="villageInfobox production"><table id="production"><tbody>
  <tr><td class="num">30</td></tr><tr><td class="num">30</td></tr>
  <tr><td class="num">30</td></tr><tr><td class="num">25</td></tr>
</tbody></table></div>
<div class="villageInfobox troops"><table id="troops"><tbody>
  <tr><td class="noTroops">none</td></tr>
</tbody></table></div>
<div class="expansionSlotInfo" title="Culture points: 310/2000"></div>
</body></html>"#
    )
}

/// Interior grid with a barracks at slot 19 and an empty slot 20.
pub const VILLAGE_CENTRE: &str = r#"<html><body><div id="villageContent">
  <div class="buildingSlot a19 g19" data-aid="19" data-gid="19" data-name="Barracks">
    <a class="level" data-level="1"></a>
  </div>
  <div class="buildingSlot a20 g0" data-aid="20" data-gid="0" data-name=""><a></a></div>
</div></body></html>"#;

/// Build page for slot 1, costs in lumber/clay/iron/crop order.
pub fn field_page(costs: [u32; 4], affordable: bool) -> String {
    let class = if affordable { "green build" } else { "gold" };
    let [lumber, clay, iron, crop] = costs;
    format!(
        r#"<html><body><div id="contract">
  <div class="resource">{lumber}</div><div class="resource">{clay}</div>
  <div class="resource">{iron}</div><div class="resource">{crop}</div><div class="resource">1</div>
</div>
<div class="duration">0:08:00</div>
<div class="upgradeButtonsContainer">
  <button class="{class}" onclick="window.location.href = '/dorf1.php?a=1&amp;c=s3cr3t'; return false;">Upgrade</button>
</div></body></html>"#
    )
}

pub fn inventory(lumber: i64, max_lumber: i64, village_lumber: i64) -> serde_json::Value {
    let item = |id: u64, name: &str, equipped: i64, amount: i64, max: i64| {
        json!({ "id": id, "name": name, "alreadyEquipped": equipped, "amount": amount, "maxInput": max })
    };
    json!({
        "checksum": "abc123",
        "viewData": { "itemsInventory": [
            item(145, "Lumber", village_lumber, lumber, max_lumber),
            item(146, "Clay", 0, 10, 10),
            item(147, "Iron", 0, 10, 10),
            item(148, "Crop", 0, 10, 10),
        ]}
    })
}

/// Mount the login handshake and both dashboards.
pub async fn mount_game(server: &MockServer, warehouse: u32, granary: u32) {
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "nonce": "n-1" })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/n-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": TOKEN })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dorf1.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(dashboard(warehouse, granary)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dorf2.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(VILLAGE_CENTRE))
        .mount(server)
        .await;
}

pub async fn login(server: &MockServer) -> Session {
    let transport = HttpTransport::with_base_url(&server.uri()).unwrap();
    let credentials = Credentials::new(USERNAME, "hunter2", "unused.example.com");
    authenticate(transport, &credentials).await.unwrap()
}
