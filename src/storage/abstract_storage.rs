//! # 存储抽象层
//!
//! 提供统一的键值存储接口，支持内存存储和Redis存储。存储语义对齐浏览器
//! 本地存储：值一律是字符串，结构化数据在管理器层做JSON编解码。

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::config::{StorageConfig, StorageType};
use crate::error::{Result, WhisprError};

/// 存储抽象trait
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// 获取存储值
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// 设置存储值
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// 批量设置存储值（单次逻辑事务，不产生部分写入）
    async fn set_many(&self, entries: &[(&str, String)]) -> Result<()>;

    /// 删除存储值
    async fn remove(&self, key: &str) -> Result<()>;

    /// 原子地读取并删除存储值
    async fn take(&self, key: &str) -> Result<Option<String>>;

    /// 检查键是否存在
    async fn exists(&self, key: &str) -> Result<bool>;

    /// 清空所有存储
    async fn clear(&self) -> Result<()>;
}

/// 内存存储实现
pub struct MemoryStorage {
    data: Arc<RwLock<HashMap<String, String>>>,
    max_entries: usize,
}

impl MemoryStorage {
    /// 创建内存存储
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
            max_entries,
        }
    }

    fn ensure_capacity(data: &mut HashMap<String, String>, max_entries: usize, incoming: usize) {
        // 容量满时移除任意旧键（会话键集合远小于容量上限，正常不会触发）
        while data.len() + incoming > max_entries {
            let Some(key) = data.keys().next().cloned() else {
                break;
            };
            data.remove(&key);
        }
    }
}

#[async_trait]
impl StorageProvider for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let data = self.data.read().unwrap();
        Ok(data.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut data = self.data.write().unwrap();
        Self::ensure_capacity(&mut data, self.max_entries, 1);
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        // 单次加锁写入全部键值
        let mut data = self.data.write().unwrap();
        Self::ensure_capacity(&mut data, self.max_entries, entries.len());
        for (key, value) in entries {
            data.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut data = self.data.write().unwrap();
        data.remove(key);
        Ok(())
    }

    async fn take(&self, key: &str) -> Result<Option<String>> {
        let mut data = self.data.write().unwrap();
        Ok(data.remove(key))
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let data = self.data.read().unwrap();
        Ok(data.contains_key(key))
    }

    async fn clear(&self) -> Result<()> {
        let mut data = self.data.write().unwrap();
        data.clear();
        Ok(())
    }
}

/// Redis存储实现
pub struct RedisStorage {
    client: redis::Client,
}

impl RedisStorage {
    /// 创建Redis存储
    pub fn new(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| WhisprError::storage_with_source("创建Redis客户端失败", e))?;

        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| WhisprError::storage_with_source("获取Redis连接失败", e))
    }
}

#[async_trait]
impl StorageProvider for RedisStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;

        let result: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| WhisprError::storage_with_source("Redis GET失败", e))?;

        Ok(result)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.connection().await?;

        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| WhisprError::storage_with_source("Redis SET失败", e))?;

        Ok(())
    }

    async fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut conn = self.connection().await?;

        // MSET 保证多键写入的原子性
        let mut cmd = redis::cmd("MSET");
        for (key, value) in entries {
            cmd.arg(*key).arg(value);
        }
        cmd.query_async::<()>(&mut conn)
            .await
            .map_err(|e| WhisprError::storage_with_source("Redis MSET失败", e))?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut conn = self.connection().await?;

        redis::cmd("DEL")
            .arg(key)
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| WhisprError::storage_with_source("Redis DEL失败", e))?;

        Ok(())
    }

    async fn take(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;

        // GETDEL 在服务端原子执行读取加删除
        let result: Option<String> = redis::cmd("GETDEL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| WhisprError::storage_with_source("Redis GETDEL失败", e))?;

        Ok(result)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;

        let exists: bool = redis::cmd("EXISTS")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| WhisprError::storage_with_source("Redis EXISTS失败", e))?;

        Ok(exists)
    }

    async fn clear(&self) -> Result<()> {
        let mut conn = self.connection().await?;

        redis::cmd("FLUSHDB")
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| WhisprError::storage_with_source("Redis FLUSHDB失败", e))?;

        Ok(())
    }
}

/// 存储提供者枚举 - 静态分发两种实现
pub enum StorageProviderType {
    /// 内存存储
    Memory(MemoryStorage),
    /// Redis存储
    Redis(RedisStorage),
}

impl StorageProviderType {
    /// 获取存储值
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            Self::Memory(storage) => storage.get(key).await,
            Self::Redis(storage) => storage.get(key).await,
        }
    }

    /// 设置存储值
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        match self {
            Self::Memory(storage) => storage.set(key, value).await,
            Self::Redis(storage) => storage.set(key, value).await,
        }
    }

    /// 批量设置存储值
    pub async fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        match self {
            Self::Memory(storage) => storage.set_many(entries).await,
            Self::Redis(storage) => storage.set_many(entries).await,
        }
    }

    /// 删除存储值
    pub async fn remove(&self, key: &str) -> Result<()> {
        match self {
            Self::Memory(storage) => storage.remove(key).await,
            Self::Redis(storage) => storage.remove(key).await,
        }
    }

    /// 原子地读取并删除存储值
    pub async fn take(&self, key: &str) -> Result<Option<String>> {
        match self {
            Self::Memory(storage) => storage.take(key).await,
            Self::Redis(storage) => storage.take(key).await,
        }
    }

    /// 检查键是否存在
    pub async fn exists(&self, key: &str) -> Result<bool> {
        match self {
            Self::Memory(storage) => storage.exists(key).await,
            Self::Redis(storage) => storage.exists(key).await,
        }
    }

    /// 清空所有存储
    pub async fn clear(&self) -> Result<()> {
        match self {
            Self::Memory(storage) => storage.clear().await,
            Self::Redis(storage) => storage.clear().await,
        }
    }
}

/// 统一存储管理器
pub struct UnifiedStorageManager {
    provider: StorageProviderType,
}

impl UnifiedStorageManager {
    /// 根据配置创建存储管理器
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let provider = match config.storage_type {
            StorageType::Memory => {
                tracing::info!("使用内存存储，最大条目数: {}", config.memory_max_entries);
                StorageProviderType::Memory(MemoryStorage::new(config.memory_max_entries))
            }
            StorageType::Redis => {
                let redis = config
                    .redis
                    .as_ref()
                    .ok_or_else(|| WhisprError::config("选择Redis存储时必须提供Redis配置"))?;
                tracing::info!("使用Redis存储，URL: {}", redis.url);
                StorageProviderType::Redis(RedisStorage::new(&redis.url)?)
            }
        };

        Ok(Self { provider })
    }

    /// 从现有提供者创建存储管理器
    #[must_use]
    pub const fn from_provider(provider: StorageProviderType) -> Self {
        Self { provider }
    }

    /// 获取存储提供者的引用
    #[must_use]
    pub const fn provider(&self) -> &StorageProviderType {
        &self.provider
    }

    /// 获取存储值
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        self.provider.get(key).await
    }

    /// 设置存储值
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.provider.set(key, value).await
    }

    /// 批量设置存储值
    pub async fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        self.provider.set_many(entries).await
    }

    /// 删除存储值
    pub async fn remove(&self, key: &str) -> Result<()> {
        self.provider.remove(key).await
    }

    /// 原子地读取并删除存储值
    pub async fn take(&self, key: &str) -> Result<Option<String>> {
        self.provider.take(key).await
    }

    /// 检查键是否存在
    pub async fn exists(&self, key: &str) -> Result<bool> {
        self.provider.exists(key).await
    }

    /// 清空所有存储
    pub async fn clear(&self) -> Result<()> {
        self.provider.clear().await
    }

    /// 读取并反序列化JSON值
    pub async fn get_json<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.provider.get(key).await? {
            Some(raw) => {
                let value = serde_json::from_str(&raw)
                    .map_err(|e| WhisprError::serialization("反序列化存储值失败", e))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// 序列化并写入JSON值
    pub async fn set_json<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync,
    {
        let raw = serde_json::to_string(value)
            .map_err(|e| WhisprError::serialization("序列化存储值失败", e))?;
        self.provider.set(key, &raw).await
    }
}
