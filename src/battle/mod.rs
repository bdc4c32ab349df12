pub mod action_stack;
pub mod arena;
pub mod calculators;
pub mod conditions;
pub mod damage;
pub mod engine;
pub mod legality;
pub mod options;
pub mod rng;
pub mod state;
pub mod stats;
pub mod targeting;
pub mod turn_orchestrator;

#[cfg(test)]
pub(crate) mod tests;
