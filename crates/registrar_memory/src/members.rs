use registrar_core::prelude::*;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct MemoryMemberDirectory {
    members: Arc<RwLock<HashMap<String, Member>>>,
}

impl MemoryMemberDirectory {
    pub async fn register(&self, member: Member) {
        self.members
            .write()
            .await
            .insert(member.address.clone(), member);
    }
}

impl MemberDirectory for MemoryMemberDirectory {
    async fn resolve_address(&self, address: &str) -> Result<Option<Member>, DirectoryError> {
        Ok(self.members.read().await.get(address).cloned())
    }
}
