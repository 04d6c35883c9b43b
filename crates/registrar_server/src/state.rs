use registrar_core::prelude::*;
use registrar_engine::ReconciliationEngine;

#[derive(Clone)]
pub struct AppState<S: RegistrarServices> {
    pub engine: ReconciliationEngine<S>,
}

impl<S: RegistrarServices> AppState<S> {
    pub fn engine(&self) -> &ReconciliationEngine<S> {
        &self.engine
    }
}
