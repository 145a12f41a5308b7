use std::sync::Arc;

use crate::application::services::{MappingService, MappingSettings};
use crate::domain::repositories::MappingRepository;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub mapping_service: Arc<MappingService<dyn MappingRepository>>,
}

impl AppState {
    pub fn new(repository: Arc<dyn MappingRepository>, settings: MappingSettings) -> Self {
        Self {
            mapping_service: Arc::new(MappingService::new(repository, settings)),
        }
    }
}
