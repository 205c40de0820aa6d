#![doc = include_str!("../../../README.md")]

pub mod cluster_definition;
pub mod document;
pub mod error;
pub mod failure_group_strategies;
pub mod failure_group_strategy;
pub mod inventory;
pub mod node;
pub mod quorum;
pub mod role_planner;
pub mod storage;
