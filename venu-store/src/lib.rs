pub mod app_config;
pub mod cache;
pub mod database;
pub mod review_repo;

pub use app_config::Config;
pub use cache::RedisClient;
pub use database::DbClient;
pub use review_repo::PgReviewStore;
