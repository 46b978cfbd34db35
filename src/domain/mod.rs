//! Transport-agnostic domain logic: products, filters, baseline state,
//! the catalog diff and the command table.

pub mod command;
pub mod diff;
pub mod filter;
pub mod money;
pub mod product;
pub mod state;

pub use command::{parse_command, Command, CommandKind, CommandParseError, COMMANDS};
pub use diff::{apply_observations, AlertPlan, CatalogDiff, PriceDrop};
pub use filter::AlertFilter;
pub use money::Price;
pub use product::{NormalizedProduct, Normalizer, RawProduct, StockStatus};
pub use state::{MonitorState, SeenEntry};
