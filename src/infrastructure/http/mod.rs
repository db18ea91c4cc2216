//! Plain HTTP adapters.

mod fetcher;

pub use fetcher::AssetFetcher;
