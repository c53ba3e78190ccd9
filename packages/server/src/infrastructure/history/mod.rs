//! メッセージ履歴の実装
//!
//! - `inmemory`: 件数と TTL で上限のあるインメモリ履歴
//! - `sweeper`: アイドル時にメモリを回収する定期 TTL 掃除

pub mod inmemory;
pub mod sweeper;

pub use inmemory::InMemoryMessageHistory;
pub use sweeper::spawn_sweeper;
