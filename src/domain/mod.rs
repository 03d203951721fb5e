pub mod entities;
pub mod errors;
pub mod ports;
pub mod remote;

// Re-export the domain boundary types and ports.
pub use entities::{AddedSite, CachedSite, SiteSummary, Theme, Token};
pub use errors::{RemoteError, SyncError};
pub use ports::{Slot, StateStore};
pub use remote::{
    AddSiteRequest, CommentsApi, RegisterOutcome, RegistrationFields, RemoteSite, SiteEnvelope,
    SiteResponse, SiteSettings, Verbatim, WebsiteRecord,
};
