use crate::config::manifest::Manifest;
use crate::core::provider::Provider;
use crate::core::resource::{plan, CreateError, PlanAction};
use crate::core::session::Session;
use crate::domain::diagnostics::{Diagnostic, Diagnostics};
use crate::domain::model::{StateDocument, VpcState};
use crate::domain::ports::{StateStore, VpcApi};
use serde::Serialize;

const STATE_READ_SUMMARY: &str = "Unable to Read State";
const STATE_WRITE_SUMMARY: &str = "Unable to Write State";
const UNRECORDED_SUMMARY: &str = "Remote Change Not Recorded";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedChange {
    pub address: String,
    #[serde(flatten)]
    pub action: PlanAction,
}

/// 本地主機：讀寫狀態檔，依宣告檔驅動 provider 的各項操作
pub struct ProviderEngine<A: VpcApi, S: StateStore> {
    provider: Provider<A>,
    store: S,
}

impl<A: VpcApi, S: StateStore> ProviderEngine<A, S> {
    pub fn new(provider: Provider<A>, store: S) -> Self {
        Self { provider, store }
    }

    pub fn provider(&self) -> &Provider<A> {
        &self.provider
    }

    pub async fn load_state(&self) -> Result<StateDocument, Diagnostics> {
        let data = self
            .store
            .read_state()
            .await
            .map_err(|e| Diagnostics::from_error(STATE_READ_SUMMARY, &e))?;

        match data {
            Some(bytes) => StateDocument::from_slice(&bytes)
                .map_err(|e| Diagnostics::from_error(STATE_READ_SUMMARY, &e)),
            None => Ok(StateDocument::default()),
        }
    }

    async fn save_state(&self, state: &StateDocument) -> Result<(), Diagnostics> {
        let bytes = state
            .to_vec()
            .map_err(|e| Diagnostics::from_error(STATE_WRITE_SUMMARY, &e))?;
        self.store.write_state(&bytes).await.map_err(|e| {
            tracing::error!("❌ Failed to persist state: {}", e);
            Diagnostics::from_error(STATE_WRITE_SUMMARY, &e)
        })
    }

    /// 遠端已變更後寫回狀態；寫入失敗時把錯誤與未記錄的遠端變更一起放進 diagnostics
    async fn persist(
        &self,
        state: &StateDocument,
        diagnostics: &mut Diagnostics,
        unrecorded: String,
    ) -> bool {
        match self.save_state(state).await {
            Ok(()) => true,
            Err(diags) => {
                diagnostics.extend(diags);
                diagnostics.push(Diagnostic::warning(UNRECORDED_SUMMARY, unrecorded));
                false
            }
        }
    }

    /// 只比較，不呼叫遠端
    pub async fn plan(&self, manifest: &Manifest) -> Result<Vec<PlannedChange>, Diagnostics> {
        let state = self.load_state().await?;
        let mut changes = Vec::new();

        for (address, planned) in manifest.resources() {
            let action = plan(state.resources.get(&address), planned);
            changes.push(PlannedChange { address, action });
        }

        for address in orphaned_addresses(manifest, &state) {
            changes.push(PlannedChange {
                address,
                action: PlanAction::Delete,
            });
        }

        Ok(changes)
    }

    /// 逐一套用宣告；每個遠端變更完成就寫回狀態，單一資源失敗不影響其他資源。
    /// 狀態寫入失敗時立即停止，回傳目前累積的所有 diagnostics。
    pub async fn apply(
        &self,
        session: &Session,
        manifest: &Manifest,
    ) -> Result<Vec<PlannedChange>, Diagnostics> {
        let mut state = self.load_state().await?;
        let mut diagnostics = Diagnostics::new();
        let mut applied = Vec::new();
        let resource = self.provider.resource();

        for (address, planned) in manifest.resources() {
            let prior = state.resources.get(&address).cloned();
            let action = plan(prior.as_ref(), planned);
            tracing::info!("📋 {}: {}", address, action);

            let (next, diags) = match (&action, prior) {
                (PlanAction::NoOp, _) => continue,
                (PlanAction::Update { .. }, Some(prior)) => {
                    match resource.update(session, &prior, planned).await {
                        Ok(next) => (Some(next), Diagnostics::new()),
                        Err(diags) => (None, diags),
                    }
                }
                (PlanAction::Replace { .. }, Some(mut prior)) => {
                    let old_id = prior.id.clone().unwrap_or_default();
                    if let Err(diags) = resource.delete(session, &mut prior).await {
                        diagnostics.extend(diags);
                        continue;
                    }
                    state.resources.remove(&address);
                    let unrecorded = format!(
                        "VPC {} was deleted for replacement but {} is still recorded in local state",
                        old_id, address
                    );
                    if !self.persist(&state, &mut diagnostics, unrecorded).await {
                        return Err(diagnostics);
                    }
                    create_outcome(resource.create(session, planned).await)
                }
                _ => create_outcome(resource.create(session, planned).await),
            };

            let failed = diags.has_error();
            diagnostics.extend(diags);

            // 建立成功但讀回失敗時 next 仍有值，必須記錄以免下次重複建立
            if let Some(next) = next {
                let id = next.id.clone().unwrap_or_default();
                state.resources.insert(address.clone(), next);
                let unrecorded = format!(
                    "VPC {} ({}) was changed remotely but local state could not be updated",
                    id, address
                );
                if !self.persist(&state, &mut diagnostics, unrecorded).await {
                    return Err(diagnostics);
                }
                if !failed {
                    applied.push(PlannedChange { address, action });
                }
            }
        }

        for address in orphaned_addresses(manifest, &state) {
            let Some(mut current) = state.resources.get(&address).cloned() else {
                continue;
            };
            let id = current.id.clone().unwrap_or_default();
            match self.destroy_one(session, &mut current).await {
                Ok(()) => {
                    state.resources.remove(&address);
                    let unrecorded = format!(
                        "VPC {} was deleted but {} is still recorded in local state",
                        id, address
                    );
                    if !self.persist(&state, &mut diagnostics, unrecorded).await {
                        return Err(diagnostics);
                    }
                    applied.push(PlannedChange {
                        address,
                        action: PlanAction::Delete,
                    });
                }
                Err(diags) => diagnostics.extend(diags),
            }
        }

        if diagnostics.has_error() {
            Err(diagnostics)
        } else {
            Ok(applied)
        }
    }

    /// 重新讀取每個已追蹤的資源；讀取失敗的資源保留原狀態
    pub async fn refresh(&self, session: &Session) -> Result<StateDocument, Diagnostics> {
        let mut state = self.load_state().await?;
        let mut diagnostics = Diagnostics::new();
        let resource = self.provider.resource();

        let addresses: Vec<String> = state.resources.keys().cloned().collect();
        for address in addresses {
            let Some(current) = state.resources.get(&address).cloned() else {
                continue;
            };
            match resource.read(session, &current).await {
                Ok(fresh) => {
                    state.resources.insert(address, fresh);
                }
                Err(diags) => diagnostics.extend(diags),
            }
        }

        if let Err(diags) = self.save_state(&state).await {
            diagnostics.extend(diags);
        }

        if diagnostics.has_error() {
            Err(diagnostics)
        } else {
            Ok(state)
        }
    }

    pub async fn destroy(&self, session: &Session) -> Result<Vec<PlannedChange>, Diagnostics> {
        let mut state = self.load_state().await?;
        let mut diagnostics = Diagnostics::new();
        let mut destroyed = Vec::new();

        let addresses: Vec<String> = state.resources.keys().cloned().collect();
        for address in addresses {
            let Some(mut current) = state.resources.get(&address).cloned() else {
                continue;
            };
            let id = current.id.clone().unwrap_or_default();
            match self.destroy_one(session, &mut current).await {
                Ok(()) => {
                    state.resources.remove(&address);
                    let unrecorded = format!(
                        "VPC {} was deleted but {} is still recorded in local state",
                        id, address
                    );
                    if !self.persist(&state, &mut diagnostics, unrecorded).await {
                        return Err(diagnostics);
                    }
                    destroyed.push(PlannedChange {
                        address,
                        action: PlanAction::Delete,
                    });
                }
                Err(diags) => diagnostics.extend(diags),
            }
        }

        if diagnostics.has_error() {
            Err(diagnostics)
        } else {
            Ok(destroyed)
        }
    }

    async fn destroy_one(&self, session: &Session, current: &mut VpcState) -> Result<(), Diagnostics> {
        if current.id.is_none() {
            return Ok(());
        }
        self.provider.resource().delete(session, current).await
    }
}

fn create_outcome(result: Result<VpcState, CreateError>) -> (Option<VpcState>, Diagnostics) {
    match result {
        Ok(created) => (Some(created), Diagnostics::new()),
        Err(e) => (e.created, e.diagnostics),
    }
}

fn orphaned_addresses(manifest: &Manifest, state: &StateDocument) -> Vec<String> {
    state
        .resources
        .keys()
        .filter(|address| {
            !manifest
                .vpc
                .keys()
                .any(|label| &Manifest::address(label) == *address)
        })
        .cloned()
        .collect()
}
