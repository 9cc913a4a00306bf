pub mod clothing;
pub mod outfits;
pub mod postgres;
pub mod styles;
pub mod users;
pub mod weather;

pub use clothing::{ClothingRepository, ItemRemoval, PgClothingRepository};
pub use outfits::{CreateOutcome, OutfitRepository, PgOutfitRepository, UnlinkOutcome};
pub use postgres::create_pool;
pub use styles::{PgStyleRepository, StyleRepository};
pub use users::{PgUserRepository, UserRepository};
pub use weather::{PgWeatherRepository, WeatherRepository};
