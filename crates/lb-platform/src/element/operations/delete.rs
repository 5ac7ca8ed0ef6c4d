//! Delete Element Use Case

use std::sync::Arc;
use tracing::info;

use crate::shared::error::{PlatformError, Result};
use crate::ElementRepository;

#[derive(Debug, Clone)]
pub struct DeleteElementCommand {
    pub namespace_id: String,
    pub key: String,
}

pub struct DeleteElementUseCase {
    element_repo: Arc<dyn ElementRepository>,
}

impl DeleteElementUseCase {
    pub fn new(element_repo: Arc<dyn ElementRepository>) -> Self {
        Self { element_repo }
    }

    pub async fn execute(&self, command: DeleteElementCommand) -> Result<()> {
        let key = command.key.to_lowercase();
        if !self.element_repo.delete(&command.namespace_id, &key).await? {
            return Err(PlatformError::element_not_found(command.namespace_id, key));
        }

        info!(namespace = %command.namespace_id, key = %key, "Element deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_support::{fixture, seed_namespace};
    use crate::Element;

    #[tokio::test]
    async fn test_delete_twice() {
        let fx = fixture();
        seed_namespace(&fx, "demo").await;
        fx.repos.elements.insert(&Element::paste("demo", "k", "x")).await.unwrap();
        let use_case = DeleteElementUseCase::new(fx.repos.elements.clone());
        let command = DeleteElementCommand {
            namespace_id: "demo".to_string(),
            key: "K".to_string(),
        };

        use_case.execute(command.clone()).await.unwrap();
        let again = use_case.execute(command).await;
        assert!(matches!(again, Err(PlatformError::ElementNotFound { .. })));
    }
}
