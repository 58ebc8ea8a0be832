//! Travian client: log in to a game server, scrape village and hero state
//! from server-rendered pages, and submit upgrade, training and hero
//! transfer actions.
//!
//! Every operation takes an authenticated [`Session`] produced by
//! [`authenticate`]. Nothing is cached: each call re-fetches and re-parses.

pub mod actions;
pub mod auth;
pub mod error;
pub mod extract;
pub mod layout;
pub mod markup;
pub mod transport;
pub mod types;

pub use actions::{
    list_producible_units, produce_units, transfer_from_hero, upgrade, ProductionResult,
    TransferResult, TransferStatus, UpgradeRequest, UpgradeResult, UpgradeStatus,
};
pub use auth::{authenticate, Credentials, Session};
pub use error::{AuthFailure, Error, Result};
pub use extract::{fetch_hero_attributes, fetch_hero_inventory, fetch_overview, fetch_tile};
pub use transport::{HttpTransport, Transport};
pub use types::*;
