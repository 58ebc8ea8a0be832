//! Move resources from the hero's inventory into the active village.

use crate::auth::Session;
use crate::error::{Error, Result};
use crate::extract::fetch_hero_inventory;
use crate::layout::current as layout;
use crate::transport::HttpRequest;
use crate::types::Resource;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    Ok,
    InvalidAmount,
    NotEnoughInInventory,
    NotEnoughCapacity,
}

impl TransferStatus {
    pub fn message(self) -> &'static str {
        match self {
            TransferStatus::Ok => "ok",
            TransferStatus::InvalidAmount => "amount should be positive",
            TransferStatus::NotEnoughInInventory => "no enough resource in hero's inventory",
            TransferStatus::NotEnoughCapacity => "no enough space for warehouse or granary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferResult {
    pub transferred: bool,
    pub status: TransferStatus,
    pub message: String,
    pub resource: Resource,
    pub amount: i64,
    /// Village-held amount per resource, re-read after a transfer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_resources: Option<BTreeMap<Resource, i64>>,
}

impl TransferResult {
    fn new(status: TransferStatus, resource: Resource, amount: i64) -> Self {
        Self {
            transferred: status == TransferStatus::Ok,
            status,
            message: status.message().to_string(),
            resource,
            amount,
            current_resources: None,
        }
    }
}

/// Transfer `amount` of `resource` from the hero to the village.
///
/// The amount must fit both what the hero carries and what the village
/// storage can take. The submission carries the inventory checksum, so a
/// stale snapshot is rejected server-side.
pub async fn transfer_from_hero(
    session: &Session,
    resource: Resource,
    amount: i64,
) -> Result<TransferResult> {
    if amount <= 0 {
        tracing::warn!("Refusing to transfer {amount} {resource}");
        return Ok(TransferResult::new(TransferStatus::InvalidAmount, resource, amount));
    }

    let inventory = fetch_hero_inventory(session).await?;
    let item = inventory
        .resources
        .get(&resource)
        .ok_or_else(|| Error::parse(format!("{resource} missing from hero inventory")))?;

    if amount > item.amount {
        tracing::warn!("Failed, no enough {resource} in hero's inventory");
        return Ok(TransferResult::new(TransferStatus::NotEnoughInInventory, resource, amount));
    }
    if amount > item.max_transfer {
        tracing::warn!("Failed, no enough space for warehouse or granary");
        return Ok(TransferResult::new(TransferStatus::NotEnoughCapacity, resource, amount));
    }

    session
        .api(HttpRequest::post(layout::HERO_INVENTORY_CLICK).json(json!({
            "action": "inventory",
            "checksum": inventory.checksum,
            "id": item.transfer_id,
            "context": "inventory",
            "amount": amount,
        })))
        .await?;

    let after = fetch_hero_inventory(session).await?;
    tracing::info!("Transferred {amount} {resource} from hero's inventory to the village");

    let mut result = TransferResult::new(TransferStatus::Ok, resource, amount);
    result.current_resources = Some(
        after
            .resources
            .iter()
            .map(|(resource, item)| (*resource, item.village))
            .collect(),
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::inventory_json;
    use crate::transport::fake::FakeTransport;
    use crate::transport::{Body, Method};
    use std::sync::Arc;

    const INVENTORY: &str = "/api/v1/hero/v2/screen/inventory";
    const CLICK: &str = "/api/v1/hero/v2/inventory/click";

    fn transport(lumber: i64, max_lumber: i64) -> Arc<FakeTransport> {
        Arc::new(
            FakeTransport::new()
                .route(Method::Get, INVENTORY, &[], &inventory_json(lumber, max_lumber))
                .route(Method::Post, CLICK, &[], "{}"),
        )
    }

    fn clicks(transport: &FakeTransport) -> Vec<HttpRequest> {
        transport
            .requests()
            .into_iter()
            .filter(|r| r.path == CLICK)
            .collect()
    }

    #[tokio::test]
    async fn test_transfer_submits_with_checksum() {
        let transport = transport(400, 800);
        let session = Session::from_parts(transport.clone(), "alice", "t0");

        let result = transfer_from_hero(&session, Resource::Lumber, 250).await.unwrap();
        assert!(result.transferred);
        assert_eq!(result.message, "ok");
        let current = result.current_resources.unwrap();
        assert_eq!(current[&Resource::Lumber], 300);
        assert_eq!(current[&Resource::Crop], 330);

        let clicks = clicks(&transport);
        assert_eq!(clicks.len(), 1);
        assert_eq!(clicks[0].bearer.as_deref(), Some("t0"));
        match &clicks[0].body {
            Body::Json(body) => {
                assert_eq!(body["checksum"], "c0ffee");
                assert_eq!(body["id"], 145);
                assert_eq!(body["amount"], 250);
                assert_eq!(body["context"], "inventory");
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_amount_over_inventory() {
        let transport = transport(400, 800);
        let session = Session::from_parts(transport.clone(), "alice", "t0");

        let result = transfer_from_hero(&session, Resource::Lumber, 401).await.unwrap();
        assert!(!result.transferred);
        assert_eq!(result.message, "no enough resource in hero's inventory");
        assert!(clicks(&transport).is_empty());
    }

    #[tokio::test]
    async fn test_amount_over_max_transfer() {
        let transport = transport(400, 100);
        let session = Session::from_parts(transport.clone(), "alice", "t0");

        let result = transfer_from_hero(&session, Resource::Lumber, 150).await.unwrap();
        assert_eq!(result.status, TransferStatus::NotEnoughCapacity);
        assert_eq!(result.message, "no enough space for warehouse or granary");
        assert!(clicks(&transport).is_empty());
    }

    #[tokio::test]
    async fn test_zero_amount_makes_no_request() {
        let transport = transport(400, 800);
        let session = Session::from_parts(transport.clone(), "alice", "t0");

        let result = transfer_from_hero(&session, Resource::Iron, 0).await.unwrap();
        assert_eq!(result.status, TransferStatus::InvalidAmount);
        assert!(transport.requests().is_empty());
    }
}
