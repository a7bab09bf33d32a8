//! # 存储模块
//!
//! 会话数据的键值存储端口与实现

pub mod abstract_storage;
pub mod keys;

pub use abstract_storage::{
    MemoryStorage, RedisStorage, StorageProvider, StorageProviderType, UnifiedStorageManager,
};
pub use keys::StorageKey;
