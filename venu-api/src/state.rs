use std::sync::Arc;

use venu_core::ReviewWriter;

#[derive(Clone)]
pub struct AppState {
    pub reviews: Arc<ReviewWriter>,
}
