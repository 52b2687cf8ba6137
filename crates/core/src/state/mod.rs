pub mod db;
pub mod favorites;
pub mod io;
pub mod storage;

pub use db::PokedexDb;

pub use favorites::{
    FavoriteEntry, FavoritesCollection, FavoritesStore, StoreEpoch, FAVORITES_KEY,
};
pub use storage::{open_durable, DurableStorage, MemoryStorage, SqliteStorage};
