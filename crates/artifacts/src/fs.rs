//! Filesystem-backed artifact store.
//!
//! Lays artifacts out the way the pipeline names them:
//! `contracts/contract.{dataset}.yaml` for contracts,
//! `artifacts/proposals/{dataset}.{run_id}.json` for proposals,
//! `artifacts/sandbox/` for reports and coverage, `artifacts/decisions/`
//! for decision files, `artifacts/reviews/` for review snapshots.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dataqa_core::{
    parse_proposals, Contract, CoverageSummary, DecisionSet, Proposal, RunRef, SuiteRevision,
    ValidationReport,
};
use tokio::fs;

use super::{ArtifactError, ArtifactStore, Result};

/// Artifact store rooted in a local directory.
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    /// Create a store rooted at `root`. This creates the artifact
    /// subdirectories needed for reads and writes.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("contracts")).await?;
        fs::create_dir_all(root.join("artifacts").join("proposals")).await?;
        fs::create_dir_all(root.join("artifacts").join("sandbox")).await?;
        fs::create_dir_all(root.join("artifacts").join("decisions")).await?;
        fs::create_dir_all(root.join("artifacts").join("reviews")).await?;

        Ok(Self { root })
    }

    fn contract_path(&self, dataset: &str) -> PathBuf {
        self.root
            .join("contracts")
            .join(format!("contract.{dataset}.yaml"))
    }
    fn proposals_path(&self, run: &RunRef) -> PathBuf {
        self.root
            .join("artifacts")
            .join("proposals")
            .join(format!("{run}.json"))
    }
    fn report_path(&self, run: &RunRef) -> PathBuf {
        self.root
            .join("artifacts")
            .join("sandbox")
            .join(format!("{run}.report.json"))
    }
    fn decisions_path(&self, run: &RunRef) -> PathBuf {
        self.root
            .join("artifacts")
            .join("decisions")
            .join(format!("{run}.decision.json"))
    }
    fn coverage_path(&self, run: &RunRef, ext: &str) -> PathBuf {
        self.root
            .join("artifacts")
            .join("sandbox")
            .join(format!("{run}.coverage.{ext}"))
    }
    fn revisions_path(&self, dataset: &str) -> PathBuf {
        self.root
            .join("artifacts")
            .join("reviews")
            .join(format!("{dataset}.json"))
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn load_contract(&self, dataset: &str) -> Result<Contract> {
        let path = self.contract_path(dataset);
        let raw = read_required(&path).await?;
        Ok(serde_yaml::from_str(&raw)?)
    }

    async fn load_proposals(&self, run: &RunRef) -> Result<Vec<Proposal>> {
        let path = self.proposals_path(run);
        let raw = read_required(&path).await?;
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        Ok(parse_proposals(&value)?)
    }

    async fn load_report(&self, run: &RunRef) -> Result<Option<ValidationReport>> {
        read_json(&self.report_path(run)).await
    }

    async fn load_revisions(&self, dataset: &str) -> Result<Option<Vec<SuiteRevision>>> {
        read_json(&self.revisions_path(dataset)).await
    }

    async fn save_decisions(&self, run: &RunRef, decisions: &DecisionSet) -> Result<()> {
        let path = self.decisions_path(run);
        let json = serde_json::to_string_pretty(decisions)?;
        write_atomic(&path, json.as_bytes()).await?;
        tracing::info!(run = %run, path = %path.display(), "wrote decisions");
        Ok(())
    }

    async fn load_decisions(&self, run: &RunRef) -> Result<Option<DecisionSet>> {
        read_json(&self.decisions_path(run)).await
    }

    async fn save_coverage(&self, run: &RunRef, summary: &CoverageSummary) -> Result<()> {
        let json = serde_json::to_string_pretty(summary)?;
        write_atomic(&self.coverage_path(run, "json"), json.as_bytes()).await?;

        let csv = dataqa_coverage::to_csv(summary);
        write_atomic(&self.coverage_path(run, "csv"), csv.as_bytes()).await?;

        tracing::info!(run = %run, "wrote coverage reports");
        Ok(())
    }
}

async fn read_required(path: &Path) -> Result<String> {
    match fs::read_to_string(path).await {
        Ok(raw) => Ok(raw),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ArtifactError::Missing {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(e.into()),
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write content under a temp name and rename it into place, so readers
/// never observe a partial artifact.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("artifact");
    let tmp = path.with_file_name(format!("{name}.tmp"));
    fs::write(&tmp, bytes).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use dataqa_core::{CheckId, Decision};

    async fn store(dir: &tempfile::TempDir) -> FsArtifactStore {
        FsArtifactStore::new(dir.path()).await.unwrap()
    }

    fn run() -> RunRef {
        RunRef::new("orders", "20251123115408")
    }

    #[tokio::test]
    async fn missing_contract_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        assert!(matches!(
            store.load_contract("orders").await,
            Err(ArtifactError::Missing { .. })
        ));
    }

    #[tokio::test]
    async fn contract_round_trips_through_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        let path = dir.path().join("contracts").join("contract.orders.yaml");
        fs::write(&path, "schema:\n  - quality:\n      - rule: order_id_unique\n")
            .await
            .unwrap();

        let contract = store.load_contract("orders").await.unwrap();
        assert_eq!(contract.rule_names().unwrap(), vec!["order_id_unique"]);
    }

    #[tokio::test]
    async fn missing_proposals_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        assert!(matches!(
            store.load_proposals(&run()).await,
            Err(ArtifactError::Missing { .. })
        ));
    }

    #[tokio::test]
    async fn proposals_load_from_either_shape() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        let path = dir
            .path()
            .join("artifacts")
            .join("proposals")
            .join("orders.20251123115408.json");
        fs::write(
            &path,
            r#"{"proposals": [{"check_id": "c", "type": "unique", "column": "id"}]}"#,
        )
        .await
        .unwrap();

        let proposals = store.load_proposals(&run()).await.unwrap();
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].check_id.as_str(), "c");
    }

    #[tokio::test]
    async fn absent_report_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        assert!(store.load_report(&run()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn decisions_round_trip_and_leave_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;

        let mut decisions = DecisionSet::new();
        decisions.insert(
            CheckId::from("c"),
            Decision {
                likelihood: 0.9,
                evidence: 0.0,
                history: 0.5,
                confidence: 0.46,
                go: false,
            },
        );
        store.save_decisions(&run(), &decisions).await.unwrap();

        let loaded = store.load_decisions(&run()).await.unwrap().unwrap();
        assert_eq!(loaded, decisions);

        let mut entries = fs::read_dir(dir.path().join("artifacts").join("decisions"))
            .await
            .unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            assert_ne!(
                entry.path().extension().and_then(|s| s.to_str()),
                Some("tmp")
            );
        }
    }

    #[tokio::test]
    async fn rewriting_decisions_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;

        let decisions = DecisionSet::new();
        store.save_decisions(&run(), &decisions).await.unwrap();
        let first = fs::read(store.decisions_path(&run())).await.unwrap();
        store.save_decisions(&run(), &decisions).await.unwrap();
        let second = fs::read(store.decisions_path(&run())).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn coverage_writes_the_json_and_csv_pair() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;

        let summary = CoverageSummary {
            dataset: "orders".to_string(),
            run_id: "20251123115408".to_string(),
            proposal_coverage: dataqa_core::CoverageStat {
                covered: 0,
                total: 0,
                pct: 1.0,
            },
            expectation_coverage: dataqa_core::CoverageStat {
                covered: 0,
                total: 0,
                pct: 1.0,
            },
            table: vec![],
            unmapped_existing: vec![],
            proposal_only_existing: vec![],
        };
        store.save_coverage(&run(), &summary).await.unwrap();

        let json = fs::read_to_string(store.coverage_path(&run(), "json"))
            .await
            .unwrap();
        assert!(json.contains("\"proposal_coverage\""));
        let csv = fs::read_to_string(store.coverage_path(&run(), "csv"))
            .await
            .unwrap();
        assert!(csv.starts_with("rule,proposals,expectations"));
    }

    #[tokio::test]
    async fn revisions_load_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        assert!(store.load_revisions("orders").await.unwrap().is_none());

        let revisions = vec![SuiteRevision {
            number: 7,
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
            merged: true,
            content: "meta={\"check_id\": \"c\"}".to_string(),
        }];
        let path = dir.path().join("artifacts").join("reviews").join("orders.json");
        fs::write(&path, serde_json::to_string(&revisions).unwrap())
            .await
            .unwrap();

        let loaded = store.load_revisions("orders").await.unwrap().unwrap();
        assert_eq!(loaded, revisions);
    }
}
