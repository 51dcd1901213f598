//! Open Targets Platform GraphQL response shapes.
//!
//! Only the fields the pipeline reads are modelled; everything is optional so
//! partially populated rows deserialize and get filtered downstream.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Rows<T> {
    #[serde(default)]
    pub rows: Vec<T>,
}

impl<T> Default for Rows<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

// ── Drug identity ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DrugData<T> {
    pub drug: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugNode {
    pub id: String,
    pub name: Option<String>,
    pub drug_type: Option<String>,
    pub maximum_clinical_trial_phase: Option<f64>,
    pub description: Option<String>,
}

// ── Mechanisms of action ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugMechanisms {
    #[serde(default)]
    pub mechanisms_of_action: Option<Rows<MechanismRow>>,
}

/// One mechanism-of-action row: what the drug does, and to which targets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MechanismRow {
    pub mechanism_of_action: Option<String>,
    pub action_type: Option<String>,
    #[serde(default)]
    pub targets: Vec<MechanismTarget>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MechanismTarget {
    pub id: Option<String>,
    pub approved_symbol: Option<String>,
}

// ── Target → disease associations ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TargetData {
    pub target: Option<TargetAssociations>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetAssociations {
    #[serde(default)]
    pub associated_diseases: Option<Rows<AssociationRow>>,
}

#[derive(Debug, Deserialize)]
pub struct AssociationRow {
    pub disease: Option<DiseaseRef>,
    pub score: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseRef {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub therapeutic_areas: Vec<NamedRef>,
}

#[derive(Debug, Deserialize)]
pub struct NamedRef {
    pub name: Option<String>,
}

// ── Indications ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DrugIndicationsNode {
    #[serde(default)]
    pub indications: Option<Rows<IndicationRow>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicationRow {
    pub disease: Option<DiseaseRef>,
    pub max_phase_for_indication: Option<f64>,
}

// ── Adverse events ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugAdverseEvents {
    #[serde(default)]
    pub adverse_events: Option<Rows<AdverseEventRow>>,
}

#[derive(Debug, Deserialize)]
pub struct AdverseEventRow {
    pub name: Option<String>,
    pub count: Option<i64>,
    #[serde(rename = "logLR")]
    pub log_lr: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_association_payload_deserializes() {
        let payload = serde_json::json!({
            "data": {
                "target": {
                    "associatedDiseases": {
                        "rows": [
                            { "disease": { "id": "EFO_0000685", "name": "rheumatoid arthritis" }, "score": 0.71 },
                            { "disease": null, "score": 0.2 }
                        ]
                    }
                }
            }
        });
        let resp: GraphQlResponse<TargetData> = serde_json::from_value(payload).unwrap();
        let rows = resp.data.unwrap().target.unwrap().associated_diseases.unwrap().rows;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].score, Some(0.71));
        assert!(rows[1].disease.is_none());
        assert!(resp.errors.is_empty());
    }

    #[test]
    fn test_graphql_errors_deserialize() {
        let payload = serde_json::json!({
            "data": null,
            "errors": [{ "message": "Cannot query field \"foo\"" }]
        });
        let resp: GraphQlResponse<TargetData> = serde_json::from_value(payload).unwrap();
        assert!(resp.data.is_none());
        assert_eq!(resp.errors[0].message, "Cannot query field \"foo\"");
    }

    #[test]
    fn test_missing_rows_default_to_empty() {
        let payload = serde_json::json!({
            "target": { "associatedDiseases": {} }
        });
        let data: TargetData = serde_json::from_value(payload).unwrap();
        assert!(data.target.unwrap().associated_diseases.unwrap().rows.is_empty());
    }

    #[test]
    fn test_adverse_event_log_lr_field() {
        let payload = serde_json::json!({
            "drug": { "adverseEvents": { "rows": [ { "name": "gastrointestinal haemorrhage", "count": 1442, "logLR": 1654.3 } ] } }
        });
        let data: DrugData<DrugAdverseEvents> = serde_json::from_value(payload).unwrap();
        let rows = data.drug.unwrap().adverse_events.unwrap().rows;
        assert_eq!(rows[0].log_lr, Some(1654.3));
        assert_eq!(rows[0].count, Some(1442));
    }
}
