//! Card catalog and deck loaders
//!
//! Parsers for the JSON card catalog and the `.deck` list format

pub mod card;
pub mod database;
pub mod database_async;
pub mod deck;
pub mod game_init;

pub use card::{parse_damage, CardLoader};
pub use database::CardDatabase;
pub use database_async::AsyncCardDatabase;
pub use deck::{DeckEntry, DeckList, DeckLoader};
pub use game_init::GameInitializer;
