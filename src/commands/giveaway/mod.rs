pub mod delivery;
pub mod eligibility;
pub mod formatters;
pub mod handlers;
pub mod interactions;
pub mod manager;
pub mod models;
pub mod parser;
pub mod service;
pub mod strategies;

pub use crate::commands::giveaway::handlers::{
    // Giveaway lifecycle
    start_giveaway,
    end_giveaway,
    cancel_giveaway,
    reroll_giveaway,

    // Channel management
    setup_giveaway,
};
