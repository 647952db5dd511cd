mod payload;
mod transport;

pub use payload::{decode, CommunityItem, CommunitySearch, FallbackItem, PrimaryItem};

pub use transport::{segment_url, HttpTransport, JsonRequest, Transport};
