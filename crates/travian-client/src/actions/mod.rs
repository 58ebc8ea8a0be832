//! Action Submitter: multi-step workflows that read a contextual page,
//! decide feasibility and optionally submit.
//!
//! Submissions are fire-and-forget: nothing is read back from them, and a
//! caller that wants to see the effect re-fetches state. Feasibility
//! outcomes are returned as values with a human-readable message.

mod transfer;
mod units;
mod upgrade;

pub use transfer::{transfer_from_hero, TransferResult, TransferStatus};
pub use units::{
    list_producible_units, parse_training_form, parse_units, produce_units, ProductionDetail,
    ProductionResult, TrainingForm,
};
pub use upgrade::{
    parse_building_contract, parse_building_options, parse_upgrade_page, upgrade, UpgradeButton,
    UpgradePage, UpgradeRequest, UpgradeResult, UpgradeStatus,
};

use crate::error::{Error, Result};
use crate::layout::current as layout;
use crate::markup;
use crate::types::Demand;
use scraper::ElementRef;

/// Map cost cells to a [`Demand`] in layout order.
pub(crate) fn parse_demand(cells: &[ElementRef<'_>]) -> Result<Demand> {
    if cells.len() < layout::DEMAND_REQUIRED {
        return Err(Error::parse(format!(
            "expected at least {} cost cells, found {}",
            layout::DEMAND_REQUIRED,
            cells.len()
        )));
    }
    let mut demand = Demand::default();
    for (field, cell) in layout::DEMAND_ORDER.into_iter().zip(cells) {
        demand.set(field, markup::number(*cell, field.name())?);
    }
    Ok(demand)
}

/// The submission URL quoted inside a button's onclick handler.
pub(crate) fn onclick_url(button: ElementRef<'_>) -> Result<String> {
    let onclick = markup::attr(button, layout::ONCLICK_ATTR)?;
    onclick
        .split('\'')
        .nth(1)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::parse(format!("no URL in onclick handler {onclick:?}")))
}
