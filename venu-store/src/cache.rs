use async_trait::async_trait;
use redis::AsyncCommands;
use uuid::Uuid;

use venu_core::models::RatingAggregate;
use venu_core::store::{AggregateCache, CacheError};

/// TTL backstop for cached aggregates; invalidation on write is the primary
/// freshness mechanism.
const RATING_TTL_SECONDS: u64 = 300;

#[derive(Clone)]
pub struct RedisClient {
    client: redis::Client,
}

impl RedisClient {
    pub async fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }
}

fn rating_key(organizer_id: Uuid) -> String {
    format!("organizer:{}:rating", organizer_id)
}

fn cache_error(err: impl std::fmt::Display) -> CacheError {
    CacheError(err.to_string())
}

#[async_trait]
impl AggregateCache for RedisClient {
    async fn get(&self, organizer_id: Uuid) -> Result<Option<RatingAggregate>, CacheError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(cache_error)?;
        let raw: Option<String> = conn.get(rating_key(organizer_id)).await.map_err(cache_error)?;
        match raw {
            Some(payload) => Ok(Some(serde_json::from_str(&payload).map_err(cache_error)?)),
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        organizer_id: Uuid,
        aggregate: RatingAggregate,
    ) -> Result<(), CacheError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(cache_error)?;
        let payload = serde_json::to_string(&aggregate).map_err(cache_error)?;
        conn.set_ex::<_, _, ()>(rating_key(organizer_id), payload, RATING_TTL_SECONDS)
            .await
            .map_err(cache_error)?;
        Ok(())
    }

    async fn invalidate(&self, organizer_id: Uuid) -> Result<(), CacheError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(cache_error)?;
        conn.del::<_, ()>(rating_key(organizer_id))
            .await
            .map_err(cache_error)?;
        Ok(())
    }
}
