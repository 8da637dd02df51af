//! Marketplace Domain Models

pub mod cart;
pub mod coupon;
pub mod notification;
pub mod offer;
pub mod points;
pub mod product;
pub mod user;
pub mod vendor;
pub mod wallet;

pub use cart::CartLine;
pub use coupon::Coupon;
pub use notification::Notification;
pub use offer::{Offer, OfferScope};
pub use points::{PointsKind, PointsSummary, PointsTransaction, UserPoints};
pub use product::{Product, SizeStock};
pub use user::{Role, User};
pub use vendor::Vendor;
pub use wallet::{TxnKind, TxnStatus, VendorWallet, WalletSummary, WalletTransaction};
