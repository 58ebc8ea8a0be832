//! `type=count` arguments of the `train` command.

use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("expected <type>=<count>, got {0:?}")]
    Malformed(String),
    #[error("count for {unit} is not a non-negative integer: {count:?}")]
    BadCount { unit: String, count: String },
}

/// Build a production plan from `t1=5`-style arguments. A repeated unit
/// type keeps the last count.
pub fn parse_plan<S: AsRef<str>>(args: &[S]) -> Result<BTreeMap<String, i64>, PlanError> {
    let mut plan = BTreeMap::new();
    for arg in args {
        let arg = arg.as_ref();
        let (unit, count) = arg
            .split_once('=')
            .filter(|(unit, _)| !unit.trim().is_empty())
            .ok_or_else(|| PlanError::Malformed(arg.to_string()))?;
        let parsed = count
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|n| *n >= 0)
            .ok_or_else(|| PlanError::BadCount {
                unit: unit.to_string(),
                count: count.to_string(),
            })?;
        plan.insert(unit.trim().to_string(), parsed);
    }
    Ok(plan)
}
