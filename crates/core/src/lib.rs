pub mod cache;
pub mod config;
pub mod container;
pub mod debrid;
pub mod filter;
pub mod media;
pub mod parser;
pub mod testing;

pub use cache::{CacheError, CacheTask, InMemoryResultCache, ResultCache, SqliteResultCache};
pub use config::{
    load_config, load_config_from_str, validate_config, CacheConfig, Config, ConfigError,
    FilterConfig, ServerConfig,
};
pub use container::{AvailabilityReport, TorrentSmartContainer};
pub use debrid::{ProviderKind, ReconcileError};
pub use filter::{apply_filters, HasParsedMetadata, QualityExclusionFilter, StreamFilter};
pub use media::{FileCandidate, MediaCriteria, MediaKind, ParsedMetadata, Privacy, TorrentItem};
pub use parser::{season_episode_in_filename, FilenameParser, ParsedFilename, SceneFilenameParser};
