pub mod carts;
pub mod documents;
pub mod masters;
pub mod orders;
pub mod recommendations;
pub mod routing;

pub use carts::CartService;
pub use documents::DocumentService;
pub use masters::MasterDataService;
pub use orders::OrderService;
pub use recommendations::RecommendationService;
pub use routing::RoutingService;
