//! Implementations of failure group strategies.

pub mod even_split;
pub mod subnet;

use crate::{
    error::{Error, Result},
    failure_group_strategy::FailureGroupStrategy,
};

use self::{even_split::EvenSplitStrategy, subnet::SubnetStrategy};

/// Picks a strategy by name.
///
/// `auto` splits storage evenly within a single zone and by subnet across several zones.
pub fn resolve(name: &str, multi_az: bool) -> Result<Box<dyn FailureGroupStrategy>> {
    match name {
        "auto" if multi_az => Ok(Box::new(SubnetStrategy::new())),
        "auto" | "split" => Ok(Box::new(EvenSplitStrategy::new())),
        "subnet" => Ok(Box::new(SubnetStrategy::new())),
        x => Err(Error::UnknownStrategy(x.to_string())),
    }
}
