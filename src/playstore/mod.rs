pub mod client;
pub mod page;

pub use client::{ListingClient, PlayStoreClient};
pub use page::extract_last_updated;
