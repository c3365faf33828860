use crate::domain::repository::CodePoolRepository;
use crate::domain::types::{Dashboard, DiscountCode};
use crate::error::CodepoolError;

pub struct DashboardUseCase<P: CodePoolRepository> {
    pub pool: P,
}

impl<P: CodePoolRepository> DashboardUseCase<P> {
    pub async fn execute(&self) -> Result<Dashboard, CodepoolError> {
        self.pool.dashboard().await
    }
}

pub struct ListCodesUseCase<P: CodePoolRepository> {
    pub pool: P,
}

impl<P: CodePoolRepository> ListCodesUseCase<P> {
    pub async fn execute(&self) -> Result<Vec<DiscountCode>, CodepoolError> {
        self.pool.list().await
    }
}
