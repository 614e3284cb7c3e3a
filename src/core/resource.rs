use crate::core::mapping::{expand_vpc_request, flatten_vpc_response};
use crate::core::session::Session;
use crate::domain::diagnostics::{Diagnostic, Diagnostics};
use crate::domain::model::VpcState;
use crate::domain::ports::VpcApi;
use crate::utils::validation::Validate;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

pub const CREATE_SUMMARY: &str = "Unable to Create VPC";
pub const READ_SUMMARY: &str = "Unable to Get VPC";
pub const UPDATE_SUMMARY: &str = "Unable to Update VPC";
pub const DELETE_SUMMARY: &str = "Unable to Delete VPC";
pub const INVALID_CONFIG_SUMMARY: &str = "Invalid VPC Configuration";
pub const CREATED_NOT_REFRESHED_SUMMARY: &str = "VPC Created But Not Refreshed";

/// 建立失敗。遠端物件已存在時 `created` 帶著已取得 id 的狀態，呼叫端必須保存它
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateError {
    pub diagnostics: Diagnostics,
    pub created: Option<VpcState>,
}

impl CreateError {
    fn failed(diagnostics: Diagnostics) -> Self {
        Self {
            diagnostics,
            created: None,
        }
    }
}

/// 計畫結果：與先前狀態比較後需要做的事
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlanAction {
    Create,
    NoOp,
    Update { changed: Vec<&'static str> },
    Replace { changed: Vec<&'static str> },
    Delete,
}

impl std::fmt::Display for PlanAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanAction::Create => write!(f, "create"),
            PlanAction::NoOp => write!(f, "no-op"),
            PlanAction::Update { changed } => write!(f, "update ({})", changed.join(", ")),
            PlanAction::Replace { changed } => {
                write!(f, "replace ({} forces replacement)", changed.join(", "))
            }
            PlanAction::Delete => write!(f, "delete"),
        }
    }
}

/// 比較先前狀態與宣告狀態，判斷要建立、更新、重建或不動
pub fn plan(prior: Option<&VpcState>, planned: &VpcState) -> PlanAction {
    let Some(prior) = prior.filter(|p| p.id.is_some()) else {
        return PlanAction::Create;
    };

    let replace = planned.replace_changes(prior);
    if !replace.is_empty() {
        return PlanAction::Replace { changed: replace };
    }

    let changed = planned.mutable_changes(prior);
    if changed.is_empty() {
        PlanAction::NoOp
    } else {
        PlanAction::Update { changed }
    }
}

/// The `vpc_network` resource: create/read/update/delete against the remote API.
pub struct VpcResource<'a, A: VpcApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: VpcApi + ?Sized> VpcResource<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// 建立後立即讀回；讀回失敗時 `CreateError::created` 仍帶著遠端 id
    pub async fn create(&self, session: &Session, planned: &VpcState) -> Result<VpcState, CreateError> {
        validate_state(planned).map_err(CreateError::failed)?;

        let request = expand_vpc_request(planned);
        let created = self
            .api
            .create_vpc(session.token(), session.org_id(), &request)
            .await
            .map_err(|e| {
                tracing::error!("❌ Create VPC '{}' failed: {}", planned.name, e);
                CreateError::failed(Diagnostics::from_error(CREATE_SUMMARY, &e))
            })?;

        tracing::info!("✅ Created VPC '{}' with id {}", planned.name, created.id);

        let mut state = planned.clone();
        state.id = Some(created.id.clone());

        match self.read(session, &state).await {
            Ok(fresh) => Ok(fresh),
            Err(mut diagnostics) => {
                tracing::warn!("⚠️ VPC {} created but read-back failed", created.id);
                diagnostics.push(Diagnostic::warning(
                    CREATED_NOT_REFRESHED_SUMMARY,
                    format!(
                        "VPC {} exists remotely but could not be read back; it is tracked with the declared values until the next refresh",
                        created.id
                    ),
                ));
                Err(CreateError {
                    diagnostics,
                    created: Some(state),
                })
            }
        }
    }

    pub async fn read(&self, session: &Session, current: &VpcState) -> Result<VpcState, Diagnostics> {
        let vpc_id = current.id.as_deref().ok_or_else(|| {
            Diagnostics::single_error(READ_SUMMARY, "VPC has no identifier; it has not been created")
        })?;

        let response = self
            .api
            .get_vpc(session.token(), session.org_id(), vpc_id)
            .await
            .map_err(|e| {
                tracing::error!("❌ Read VPC {} failed: {}", vpc_id, e);
                Diagnostics::from_error(READ_SUMMARY, &e)
            })?;

        tracing::debug!("Read VPC {}", vpc_id);
        Ok(flatten_vpc_response(response, current.last_updated.clone()))
    }

    /// 只有可變欄位有差異時才送出完整替換內容並更新時間戳，最後一律讀回
    pub async fn update(
        &self,
        session: &Session,
        prior: &VpcState,
        planned: &VpcState,
    ) -> Result<VpcState, Diagnostics> {
        let vpc_id = prior.id.as_deref().ok_or_else(|| {
            Diagnostics::single_error(UPDATE_SUMMARY, "VPC has no identifier; it has not been created")
        })?;

        let replace = planned.replace_changes(prior);
        if !replace.is_empty() {
            return Err(Diagnostics::single_error(
                UPDATE_SUMMARY,
                format!(
                    "Changing {} requires replacing VPC {}; it cannot be updated in place",
                    replace.join(", "),
                    vpc_id
                ),
            ));
        }

        validate_state(planned)?;

        let mut next = planned.clone();
        next.id = prior.id.clone();
        next.last_updated = prior.last_updated.clone();

        let changed = planned.mutable_changes(prior);
        if changed.is_empty() {
            tracing::debug!("VPC {} has no changes, skipping replace call", vpc_id);
        } else {
            tracing::info!("Updating VPC {}: {}", vpc_id, changed.join(", "));
            let request = expand_vpc_request(planned);
            self.api
                .replace_vpc(session.token(), session.org_id(), vpc_id, &request)
                .await
                .map_err(|e| {
                    tracing::error!("❌ Update VPC {} failed: {}", vpc_id, e);
                    Diagnostics::from_error(UPDATE_SUMMARY, &e)
                })?;
            next.last_updated = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }

        self.read(session, &next).await
    }

    /// 成功時清除本地 id，失敗時保留
    pub async fn delete(&self, session: &Session, current: &mut VpcState) -> Result<(), Diagnostics> {
        let vpc_id = current.id.clone().ok_or_else(|| {
            Diagnostics::single_error(DELETE_SUMMARY, "VPC has no identifier; nothing to delete")
        })?;

        self.api
            .delete_vpc(session.token(), session.org_id(), &vpc_id)
            .await
            .map_err(|e| {
                tracing::error!("❌ Delete VPC {} failed: {}", vpc_id, e);
                Diagnostics::from_error(DELETE_SUMMARY, &e)
            })?;

        tracing::info!("🗑️ Deleted VPC {}", vpc_id);
        current.id = None;
        Ok(())
    }
}

fn validate_state(state: &VpcState) -> Result<(), Diagnostics> {
    state
        .validate()
        .map_err(|e| Diagnostics::from_error(INVALID_CONFIG_SUMMARY, &e))
}
