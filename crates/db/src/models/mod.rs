//! Entity models and DTOs.

pub mod collection;
pub mod community;
pub mod folder;
pub mod item;
pub mod moderation;
pub mod recommended;
pub mod user;
pub mod wishlist;

pub use collection::{Collection, CoverImageFit, CreateCollection, UpdateCollection};
pub use community::{
    CommunityCollection, CommunityItem, CreateCommunityCollection, CreateCommunityItem,
};
pub use folder::{CreateFolder, Folder};
pub use item::{CollectionItemCounts, CreateItem, Item, ItemImageUpdate, UpdateItem};
pub use moderation::{
    BlogPost, ContentReport, CreateBlogPost, CreateContentReport, CreateVerificationToken,
    VerificationToken,
};
pub use recommended::{
    CreateRecommendedCollection, CreateRecommendedItem, RecommendedCollection, RecommendedItem,
    UpdateRecommendedCollection,
};
pub use user::{AuthorSummary, CreateUser, User};
pub use wishlist::{CreateWishlistEntry, WishlistEntry};
