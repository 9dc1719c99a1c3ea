pub mod debug_dump;
pub mod fetcher;
pub mod panel;
pub mod record_store;
pub mod selection;

pub use debug_dump::DebugDump;
pub use fetcher::{FetchOutcome, PageFetcher};
pub use panel::{InfoPanelReader, PanelOutcome, INFO_TAB_LABEL};
pub use record_store::{load_candidates, ResultStore};
pub use selection::select_pending;
