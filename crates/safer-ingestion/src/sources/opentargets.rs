//! Open Targets Platform GraphQL client.
//!
//! Open Targets integrates target–disease evidence, drug mechanisms,
//! indications and FAERS-derived adverse events. All calls go through a single
//! GraphQL endpoint.
//!
//! API docs: https://platform-docs.opentargets.org/data-access/graphql-api
//! Endpoint: https://api.platform.opentargets.org/api/v4/graphql
//!
//! Adverse-event `logLR` (log-likelihood ratio) is used as the signal strength.

use std::time::Duration;

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use safer_common::entities::{
    AssociationRecord, CanonicalTarget, DrugMetadata, IndicationRecord, SafetySignal,
};
use safer_common::sandbox::SandboxClient as Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::{AssociationSource, DrugResolver, IndicationSource, SafetySignalSource, TargetEnumerator};
use crate::mechanism::map_targets_from_mechanisms;
use crate::models::{
    DrugAdverseEvents, DrugData, DrugIndicationsNode, DrugMechanisms, DrugNode, GraphQlResponse,
    TargetData,
};

pub const OPEN_TARGETS_GRAPHQL_URL: &str = "https://api.platform.opentargets.org/api/v4/graphql";

const DRUG_QUERY: &str = r#"
query DrugByChEMBL($chemblId: String!) {
  drug(chemblId: $chemblId) {
    id
    name
    drugType
    maximumClinicalTrialPhase
    description
  }
}"#;

const MECHANISMS_QUERY: &str = r#"
query DrugMechanisms($chemblId: String!) {
  drug(chemblId: $chemblId) {
    mechanismsOfAction {
      rows {
        mechanismOfAction
        actionType
        targets {
          id
          approvedSymbol
        }
      }
    }
  }
}"#;

const ASSOCIATIONS_QUERY: &str = r#"
query TargetDiseases($ensemblId: String!, $size: Int!) {
  target(ensemblId: $ensemblId) {
    associatedDiseases(page: { index: 0, size: $size }) {
      rows {
        disease {
          id
          name
        }
        score
      }
    }
  }
}"#;

const INDICATIONS_QUERY: &str = r#"
query DrugIndications($chemblId: String!) {
  drug(chemblId: $chemblId) {
    indications {
      rows {
        disease {
          id
          name
          therapeuticAreas {
            name
          }
        }
        maxPhaseForIndication
      }
    }
  }
}"#;

const SAFETY_QUERY: &str = r#"
query DrugSafety($chemblId: String!, $size: Int!) {
  drug(chemblId: $chemblId) {
    adverseEvents(page: { index: 0, size: $size }) {
      rows {
        name
        count
        logLR
      }
    }
  }
}"#;

/// Open Targets client covering every evidence source the pipeline needs.
pub struct OpenTargetsClient {
    client: Client,
    endpoint: String,
    page_size: usize,
}

impl OpenTargetsClient {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::new()?,
            endpoint: OPEN_TARGETS_GRAPHQL_URL.to_string(),
            page_size: 100,
        })
    }

    /// Client against a custom endpoint (mirror or local proxy).
    pub fn with_endpoint(endpoint: &str, timeout: Duration, page_size: usize) -> anyhow::Result<Self> {
        let mut client = Client::with_timeout(timeout)?;
        if let Some(host) = url::Url::parse(endpoint).ok().and_then(|u| u.host_str().map(String::from)) {
            client.allow_domain(&host);
        }
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            page_size: page_size.max(1),
        })
    }

    /// POST a GraphQL query and unwrap `data`. GraphQL `errors` and non-2xx
    /// statuses are errors.
    async fn query<T: DeserializeOwned>(&self, query: &str, variables: Value) -> anyhow::Result<T> {
        let resp = self.client
            .post(&self.endpoint)?
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), &body));
        }

        unwrap_response(resp.json().await?)
    }
}

// ── Response handling ─────────────────────────────────────────────────────────

fn status_error(status: u16, body: &str) -> anyhow::Error {
    anyhow!("Open Targets API returned status code {}: {}", status, body)
}

/// `data` of a GraphQL response. The first entry of `errors` wins over any data.
fn unwrap_response<T>(payload: GraphQlResponse<T>) -> anyhow::Result<T> {
    if let Some(err) = payload.errors.first() {
        bail!("GraphQL query error: {}", err.message);
    }
    payload
        .data
        .ok_or_else(|| anyhow!("Open Targets response carried no data"))
}

/// Association rows for `target_id`. A null target means Open Targets does
/// not know the id, which is an error; a known target may have no rows.
fn associations_from(target_id: &str, data: TargetData) -> anyhow::Result<Vec<AssociationRecord>> {
    let target = data
        .target
        .ok_or_else(|| anyhow!("Target {} not found", target_id))?;

    Ok(target
        .associated_diseases
        .unwrap_or_default()
        .rows
        .into_iter()
        .filter_map(|row| {
            let disease = row.disease?;
            Some(AssociationRecord {
                disease_id: disease.id,
                disease_name: disease.name,
                association_score: row.score,
            })
        })
        .collect())
}

#[async_trait]
impl DrugResolver for OpenTargetsClient {
    #[instrument(skip(self))]
    async fn resolve_drug(&self, chembl_id: &str) -> anyhow::Result<Option<DrugMetadata>> {
        debug!(chembl_id, "Resolving drug");
        let data: DrugData<DrugNode> = self.query(DRUG_QUERY, json!({ "chemblId": chembl_id })).await?;

        Ok(data.drug.map(|d| DrugMetadata {
            chembl_id: d.id,
            name: d.name,
            drug_type: d.drug_type,
            description: d.description,
            max_clinical_phase: d.maximum_clinical_trial_phase,
        }))
    }
}

#[async_trait]
impl TargetEnumerator for OpenTargetsClient {
    #[instrument(skip(self))]
    async fn drug_targets(&self, chembl_id: &str) -> anyhow::Result<Vec<CanonicalTarget>> {
        let data: DrugData<DrugMechanisms> =
            self.query(MECHANISMS_QUERY, json!({ "chemblId": chembl_id })).await?;

        let drug = data
            .drug
            .ok_or_else(|| anyhow!("Drug {} not found in Open Targets", chembl_id))?;
        let rows = drug.mechanisms_of_action.unwrap_or_default().rows;

        let targets = map_targets_from_mechanisms(&rows);
        debug!(mechanisms = rows.len(), targets = targets.len(), "Mechanisms mapped to targets");
        Ok(targets)
    }
}

#[async_trait]
impl AssociationSource for OpenTargetsClient {
    #[instrument(skip(self))]
    async fn target_associations(&self, target_id: &str) -> anyhow::Result<Vec<AssociationRecord>> {
        let data: TargetData = self
            .query(ASSOCIATIONS_QUERY, json!({ "ensemblId": target_id, "size": self.page_size }))
            .await?;

        let records = associations_from(target_id, data)?;

        debug!(target_id, count = records.len(), "Associations fetched");
        Ok(records)
    }
}

#[async_trait]
impl IndicationSource for OpenTargetsClient {
    #[instrument(skip(self))]
    async fn drug_indications(&self, chembl_id: &str) -> anyhow::Result<Vec<IndicationRecord>> {
        let data: DrugData<DrugIndicationsNode> =
            self.query(INDICATIONS_QUERY, json!({ "chemblId": chembl_id })).await?;

        let Some(drug) = data.drug else {
            return Ok(Vec::new());
        };

        let records = drug
            .indications
            .unwrap_or_default()
            .rows
            .into_iter()
            .filter_map(|row| {
                let disease = row.disease?;
                Some(IndicationRecord {
                    disease_id: disease.id?,
                    disease_name: disease.name,
                    max_phase: row.max_phase_for_indication,
                    therapeutic_areas: disease
                        .therapeutic_areas
                        .into_iter()
                        .filter_map(|ta| ta.name)
                        .collect(),
                })
            })
            .collect();

        Ok(records)
    }
}

#[async_trait]
impl SafetySignalSource for OpenTargetsClient {
    #[instrument(skip(self))]
    async fn safety_signals(&self, chembl_id: &str) -> anyhow::Result<Vec<SafetySignal>> {
        let data: DrugData<DrugAdverseEvents> = self
            .query(SAFETY_QUERY, json!({ "chemblId": chembl_id, "size": self.page_size }))
            .await?;

        let rows = data
            .drug
            .and_then(|d| d.adverse_events)
            .unwrap_or_default()
            .rows;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                Some(SafetySignal {
                    event: row.name?,
                    count: row.count,
                    signal_strength: row.log_lr,
                })
            })
            .collect())
    }
}
