// Client for the vmrest administration API of a voicemail server

pub mod cache;
pub mod config;
pub mod display;
pub mod error;
pub mod result;
pub mod search_spaces;
pub mod servers;
pub mod timezones;
pub mod transport;
pub mod xml;

// Re-export key types for convenience
pub use cache::{MissHook, Resource, ResourceCache};
pub use config::ServerConfig;
pub use display::{compare_by_display, sort_by_display, Selectable};
pub use error::{CacheError, ClientError, DisplayError, XmlError};
pub use result::WebCallResult;
pub use search_spaces::{SearchSpaceMember, SearchSpaceMembers};
pub use servers::{ServerState, VmsServer, VmsServers};
pub use timezones::{TimeZone, TimeZones};
pub use transport::{ConnectionServer, HttpTransport, StaticTransport, Transport};
pub use xml::{FieldMap, PropertyDump, XmlElement};
