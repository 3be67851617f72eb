//! Shared application state for all routes.

use crate::service::CourseService;
use crate::store::CourseStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub service: CourseService,
}

impl AppState {
    pub fn new(service: CourseService) -> Self {
        Self { service }
    }

    pub fn store(&self) -> &Arc<dyn CourseStore> {
        self.service.store()
    }
}
