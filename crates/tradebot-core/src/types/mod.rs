//! Core data types for the execution engine.

mod bar;
mod bundle;
mod granularity;
mod indexing;
mod ledger;
mod order;
mod position;
mod scan;

pub use bar::{Bar, BarSeries};
pub use bundle::{AuxData, BaseData, DataBundle, MtfData};
pub use granularity::Granularity;
pub use indexing::BarIndexing;
pub use ledger::{OrderRecord, OrderRecordStatus, TradeRecord, TradeStatus};
pub use order::{
    Direction, Order, OrderDraft, OrderIntent, OrderKind, QualifiedOrder, SizingMethod,
};
pub use position::Position;
pub use scan::{ScanDetails, ScanHit};
