// Source module: where raw order tables come from.

pub mod fetcher;
pub mod traits;

pub use fetcher::{FileSource, HttpSource};
pub use traits::DatasetSource;

/// Picks an HTTP source for `http(s)://` locations and a file source otherwise.
pub fn from_location(location: &str) -> Box<dyn DatasetSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(location))
    } else {
        Box::new(FileSource::new(location))
    }
}
