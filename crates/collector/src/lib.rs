pub mod api;
pub mod logic;
pub mod structs;

pub use api::{BlueskyFetcher, PostFetcher, DEFAULT_SERVICE_URL};
pub use logic::{
    Collection, FailurePolicy, PostCollector, Recovery, WildcardOptions, DEFAULT_LANGUAGE,
    DEFAULT_PAGE_SIZE, DEFAULT_RETRY_DELAY,
};
pub use structs::{PostView, SearchPage};
