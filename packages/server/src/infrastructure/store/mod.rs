//! MessageStore trait の具体的な実装
//!
//! - `inmemory`: インメモリ実装（接続状態を切り替え可能）
//! - 将来的に: `mongodb`, `postgres` など

pub mod inmemory;

pub use inmemory::InMemoryMessageStore;
