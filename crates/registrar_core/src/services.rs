use crate::traits::*;

/// The collaborators of the reconciliation engine.
pub trait RegistrarServices: Send + Sync + 'static + Clone {
    type Content: ContentStore;
    type Ledger: LedgerGateway;
    type Registry: DefinitionRegistry;
    type Members: MemberDirectory;
    type Validator: SchemaValidator;

    fn content(&self) -> &Self::Content;
    fn ledger(&self) -> &Self::Ledger;
    fn registry(&self) -> &Self::Registry;
    fn members(&self) -> &Self::Members;
    fn validator(&self) -> &Self::Validator;
}

#[derive(Clone)]
pub struct CoreServices<C, L, R, M, V> {
    pub content: C,
    pub ledger: L,
    pub registry: R,
    pub members: M,
    pub validator: V,
}

impl<C, L, R, M, V> RegistrarServices for CoreServices<C, L, R, M, V>
where
    C: ContentStore,
    L: LedgerGateway,
    R: DefinitionRegistry,
    M: MemberDirectory,
    V: SchemaValidator,
{
    type Content = C;
    type Ledger = L;
    type Registry = R;
    type Members = M;
    type Validator = V;

    fn content(&self) -> &C {
        &self.content
    }
    fn ledger(&self) -> &L {
        &self.ledger
    }
    fn registry(&self) -> &R {
        &self.registry
    }
    fn members(&self) -> &M {
        &self.members
    }
    fn validator(&self) -> &V {
        &self.validator
    }
}
