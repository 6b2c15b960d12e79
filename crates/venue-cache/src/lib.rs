//! Cache store access for venue searches.
//!
//! ```text
//! CacheFacade<S>                 <- bounded-time "compute or fetch from cache"
//!   └── S: CacheService
//!        CacheProvider (enum)    <- dispatch chosen from config
//!          ├── Redis(RedisCacheService)
//!          ├── Memory(MemoryCacheService)
//!          └── NoOp(NoOpCacheService)
//! ```
//!
//! Every cache failure is non-fatal: reads degrade to a direct fetch and
//! writes are best-effort.

pub mod errors;
pub mod facade;
pub mod provider;
pub mod providers;
pub mod traits;

pub use errors::{CacheError, CacheResult};
pub use facade::{CacheFacade, Fetched, Lookup, Provenance, StoreLatch};
pub use provider::CacheProvider;
pub use providers::{MemoryCacheService, NoOpCacheService, RedisCacheService};
pub use traits::CacheService;
