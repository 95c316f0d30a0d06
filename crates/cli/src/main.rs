//! DataQA CLI - contract coverage reconciliation and check gating.

use anyhow::Result;
use chrono::{NaiveDate, TimeZone, Utc};
use clap::{Parser, Subcommand};
use dataqa_artifacts::{ArtifactStore, FsArtifactStore};
use dataqa_core::{RunRef, Time};
use dataqa_coverage::{reconcile, render_table, ProposalIndex};
use dataqa_gate::{gate, promote, AcceptanceIndex, GateConfig, GateOutcome, NeutralHistory};
use tracing::{warn, Level};

#[derive(Parser)]
#[command(name = "dataqa")]
#[command(about = "Data-quality check coverage and gating", long_about = None)]
struct Cli {
    /// Artifact root directory
    #[arg(long, default_value = ".")]
    root: std::path::PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a dataset's contract rule catalog
    Rules {
        /// Dataset name
        dataset: String,
    },
    /// Reconcile rule coverage for a run and write the coverage reports
    Coverage {
        /// Dataset name
        dataset: String,
        /// Run identifier
        run_id: String,
    },
    /// Gate a run's proposals and write the decision file
    Gate {
        /// Dataset name
        dataset: String,
        /// Run identifier
        run_id: String,
        /// Minimum confidence for promotion
        #[arg(long, default_value = "0.5")]
        threshold: f64,
        /// Ignore review history opened before this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();
    let store = FsArtifactStore::new(&cli.root).await?;

    match cli.command {
        Commands::Rules { dataset } => {
            let contract = store.load_contract(&dataset).await?;
            for rule in contract.rule_names()? {
                println!("{rule}");
            }
        }
        Commands::Coverage { dataset, run_id } => {
            let run = RunRef::new(dataset, run_id);
            let contract = store.load_contract(&run.dataset).await?;
            let rules = contract.rule_names()?;
            let proposals = store.load_proposals(&run).await?;
            let index = ProposalIndex::from_proposals(&proposals);
            let extraction = store.load_report(&run).await?.unwrap_or_default().extract();
            if extraction.dropped > 0 {
                warn!(
                    dropped = extraction.dropped,
                    "report entries without a check_id tag were skipped"
                );
            }

            let summary = reconcile(&run, &rules, &index, &extraction.results);

            let prop = &summary.proposal_coverage;
            let exp = &summary.expectation_coverage;
            println!(
                "Proposal coverage: {}/{} rules covered ({:.2}%)",
                prop.covered,
                prop.total,
                prop.pct * 100.0
            );
            println!(
                "Expectations coverage: {}/{} rules covered ({:.2}%)",
                exp.covered,
                exp.total,
                exp.pct * 100.0
            );
            println!();
            print!("{}", render_table(&summary));

            if !summary.unmapped_existing.is_empty() {
                println!("\nUnmapped existing check_ids (no matching proposal):");
                for check_id in &summary.unmapped_existing {
                    println!("  - {check_id}");
                }
            }
            if !summary.proposal_only_existing.is_empty() {
                println!("\nExisting checks that match proposals but aren't tied to any contract rule:");
                for check_id in &summary.proposal_only_existing {
                    println!("  - {check_id}");
                }
            }

            store.save_coverage(&run, &summary).await?;
            println!("\nWrote coverage reports for {run}");
        }
        Commands::Gate {
            dataset,
            run_id,
            threshold,
            since,
        } => {
            let run = RunRef::new(dataset, run_id);
            let proposals = store.load_proposals(&run).await?;
            let extraction = store.load_report(&run).await?.unwrap_or_default().extract();
            let config = GateConfig { threshold };

            let decisions = match store.load_revisions(&run.dataset).await? {
                Some(revisions) => {
                    let history = AcceptanceIndex::from_revisions(&revisions, cutoff(since)?);
                    gate(&proposals, &extraction.results, &history, &config)
                }
                None => gate(&proposals, &extraction.results, &NeutralHistory, &config),
            };

            for (check_id, decision) in &decisions {
                println!(
                    "{check_id}: likelihood={:.2} evidence={:.2} history={:.2} confidence={:.2} go={}",
                    decision.likelihood,
                    decision.evidence,
                    decision.history,
                    decision.confidence,
                    decision.go
                );
            }

            store.save_decisions(&run, &decisions).await?;

            match promote(&proposals, &decisions)? {
                GateOutcome::Promoted(kept) => {
                    println!("{} of {} proposals promoted", kept.len(), proposals.len());
                }
                GateOutcome::NoChanges => {
                    println!("No proposals passed the gating criteria.");
                }
            }
        }
    }

    Ok(())
}

fn cutoff(since: Option<String>) -> Result<Time> {
    let Some(since) = since else {
        // No cutoff: include all collected history.
        return Ok(Time::default());
    };
    let date = NaiveDate::parse_from_str(&since, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid --since date `{since}`: {e}"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow::anyhow!("invalid --since date `{since}`"))?;
    Ok(Utc.from_utc_datetime(&midnight))
}
