pub mod eia;
mod fetch;
pub mod noaa;
pub mod openweather;

pub use self::fetch::Fetcher;
