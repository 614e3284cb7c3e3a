use crate::core::mapping::flatten_vpc_response;
use crate::core::session::Session;
use crate::domain::diagnostics::Diagnostics;
use crate::domain::model::VpcState;
use crate::domain::ports::VpcApi;

pub const LIST_SUMMARY: &str = "Unable to List VPCs";

/// 列出組織底下所有 VPC 的資料來源
pub struct VpcListDataSource<'a, A: VpcApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: VpcApi + ?Sized> VpcListDataSource<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    pub async fn read(&self, session: &Session) -> Result<Vec<VpcState>, Diagnostics> {
        let items = self
            .api
            .list_vpcs(session.token(), session.org_id())
            .await
            .map_err(|e| {
                tracing::error!("❌ List VPCs failed: {}", e);
                Diagnostics::from_error(LIST_SUMMARY, &e)
            })?;

        tracing::info!("📡 Listed {} VPCs for org {}", items.len(), session.org_id());
        Ok(items
            .into_iter()
            .map(|item| flatten_vpc_response(item, None))
            .collect())
    }
}
