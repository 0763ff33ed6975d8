//! Business logic services

pub mod auth;
pub mod catalog;
pub mod lending;
pub mod members;
pub mod settlement;
pub mod stats;

use std::sync::Arc;

use crate::{clock::Clock, config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub members: members::MembersService,
    pub lending: lending::LendingService,
    pub settlement: settlement::SettlementService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository and clock
    pub fn new(repository: Repository, auth_config: AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone()),
            members: members::MembersService::new(repository.clone()),
            lending: lending::LendingService::new(repository.clone(), clock.clone()),
            settlement: settlement::SettlementService::new(repository.clone(), clock.clone()),
            stats: stats::StatsService::new(repository, clock),
        }
    }
}
