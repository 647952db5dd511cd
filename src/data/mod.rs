mod game_items;

pub use game_items::{GameDataSet, GameItem};
