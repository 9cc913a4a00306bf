pub mod clothing;
pub mod outfits;
pub mod recommendation;

pub use clothing::ClothingService;
pub use outfits::OutfitService;
pub use recommendation::OutfitRecommender;
