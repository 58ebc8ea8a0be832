//! Page layout contracts.
//!
//! Every selector, endpoint and positional assumption the extractors rely on
//! lives in a versioned submodule. Extractors read only through [`current`];
//! adapting to changed markup means adding a `vN` module and repointing
//! `current`, never editing an existing version in place.

pub mod v1;

pub use v1 as current;
