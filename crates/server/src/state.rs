use std::sync::Arc;

use service::{
    auth::CredentialHasher,
    domain::Calculation,
    runtime::Stores,
    storage::{EntityStore, UserStore},
    CalculationService, UserService,
};

/// Shared handler state: one service per resource, over whichever backend is live.
#[derive(Clone)]
pub struct AppState {
    pub calculations: Arc<CalculationService<dyn EntityStore<Calculation>>>,
    pub users: Arc<UserService<dyn UserStore>>,
}

impl AppState {
    pub fn new(stores: Stores, hasher: CredentialHasher) -> Self {
        Self {
            calculations: Arc::new(CalculationService::new(stores.calculations)),
            users: Arc::new(UserService::new(stores.users, hasher)),
        }
    }
}
