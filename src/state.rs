use std::sync::Arc;

use crate::external::upstream::UpstreamClient;
use crate::store::CatalogStore;

#[derive(Clone)]
pub struct AppState {
    /// Historical prices and ticker search.
    pub price_api: Arc<dyn UpstreamClient>,
    /// Full stock list used to seed the catalog.
    pub catalog_api: Arc<dyn UpstreamClient>,
    pub catalog: Arc<dyn CatalogStore>,
}
