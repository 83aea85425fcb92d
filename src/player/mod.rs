// Player registry: the durable stat records and their owner-facing API

pub use handlers::{
    create_player, find_player_by_email, get_player, replace_player, update_player_totals,
};

mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
