pub mod clothing;
pub mod outfit;
pub mod pagination;
pub mod style;
pub mod user;
pub mod weather;

pub use clothing::{ClothingItem, ClothingType, NewClothingItem, Photo};
pub use outfit::{NewOutfit, Outfit, OutfitDetails};
pub use pagination::{Page, Paginated};
pub use style::{Style, StyleFilter, StyleQuery};
pub use user::User;
pub use weather::{Weather, WeatherFilter, WeatherQuery, FALLBACK_WEATHER};

pub type UserId = i32;
pub type ClothingItemId = i32;
pub type OutfitId = i32;
pub type WeatherId = i32;
pub type StyleId = i32;
