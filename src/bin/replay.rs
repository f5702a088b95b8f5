use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use clap::Parser;
use coin_grid_agent::engine::MoveDecisionEngine;
use coin_grid_agent::protocol::decode_snapshot;
use coin_grid_agent::types::{DecisionState, Move, Target};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Feeds recorded game_state payloads (one JSON object per line) through
/// the decision engine and reports what it would have played.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    input: PathBuf,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
struct ReplayLine {
    index: usize,
    #[serde(rename = "move")]
    mv: Move,
    state: DecisionState,
    target: Option<Target>,
    #[serde(rename = "pathLen")]
    path_len: usize,
    #[serde(rename = "fallbackRemaining")]
    fallback_remaining: usize,
}

#[derive(Clone, Debug, Serialize)]
struct SkippedLine {
    index: usize,
    error: String,
}

#[derive(Debug, Default)]
struct ReplayRun {
    total_lines: usize,
    decided: Vec<ReplayLine>,
    skipped: Vec<SkippedLine>,
}

#[derive(Clone, Debug, Serialize)]
struct ReplaySummary {
    #[serde(rename = "generatedAt")]
    generated_at: String,
    #[serde(rename = "totalLines")]
    total_lines: usize,
    decided: usize,
    skipped: usize,
    #[serde(rename = "stateCounts")]
    state_counts: BTreeMap<String, usize>,
    #[serde(rename = "fallbackRemaining")]
    fallback_remaining: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let text = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let mut engine = cli
        .seed
        .map(MoveDecisionEngine::with_seed)
        .unwrap_or_default();
    let run = replay(&text, &mut engine);

    for skipped in &run.skipped {
        tracing::warn!(line = skipped.index, error = %skipped.error, "snapshot skipped");
    }
    for line in &run.decided {
        println!("{}", serde_json::to_string(line)?);
    }

    let summary = build_summary(&run, engine.fallback().len(), now_rfc3339());
    tracing::info!(
        total = summary.total_lines,
        decided = summary.decided,
        skipped = summary.skipped,
        "replay finished"
    );

    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            tracing::error!(path = %path.display(), %error, "summary write failed");
            std::process::exit(2);
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

fn replay(text: &str, engine: &mut MoveDecisionEngine) -> ReplayRun {
    let mut run = ReplayRun::default();
    for (offset, raw) in text.lines().enumerate() {
        let index = offset + 1;
        if raw.trim().is_empty() {
            continue;
        }
        run.total_lines += 1;
        match decode_snapshot(raw.as_bytes()) {
            Ok(snapshot) => {
                let decision = engine.on_snapshot(&snapshot);
                run.decided.push(ReplayLine {
                    index,
                    mv: decision.mv,
                    state: decision.state,
                    target: decision.target,
                    path_len: decision.path_len,
                    fallback_remaining: engine.fallback().len(),
                });
            }
            Err(error) => run.skipped.push(SkippedLine {
                index,
                error: error.to_string(),
            }),
        }
    }
    run
}

fn state_key(state: DecisionState) -> String {
    match state {
        DecisionState::NoTarget => "no_target",
        DecisionState::HasPath => "has_path",
        DecisionState::NoPath => "no_path",
    }
    .to_string()
}

fn build_summary(
    run: &ReplayRun,
    fallback_remaining: usize,
    generated_at: String,
) -> ReplaySummary {
    let mut state_counts = BTreeMap::new();
    for line in &run.decided {
        *state_counts.entry(state_key(line.state)).or_insert(0) += 1;
    }
    ReplaySummary {
        generated_at,
        total_lines: run.total_lines,
        decided: run.decided.len(),
        skipped: run.skipped.len(),
        state_counts,
        fallback_remaining,
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn write_summary(path: &Path, summary: &ReplaySummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
    std::fs::write(path, summary_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDING: &str = concat!(
        r#"{"currentPosition":[5,5],"coin1":[[5,7]],"coin2":[],"coin3":[],"walls":[]}"#,
        "\n",
        "\n",
        "not json\n",
        r#"{"currentPosition":[0,0],"coin1":[],"coin2":[],"coin3":[],"walls":[]}"#,
        "\n",
        r#"{"currentPosition":[11,0],"coin1":[],"coin2":[],"coin3":[],"walls":[]}"#,
        "\n",
    );

    #[test]
    fn replay_decides_valid_lines_and_skips_the_rest() {
        let mut engine = MoveDecisionEngine::with_seed(1);
        let run = replay(RECORDING, &mut engine);

        assert_eq!(run.total_lines, 4);
        assert_eq!(run.decided.len(), 2);
        assert_eq!(run.skipped.len(), 2);
        assert_eq!(run.skipped[0].index, 3);
        assert_eq!(run.skipped[1].index, 5);

        assert_eq!(run.decided[0].index, 1);
        assert_eq!(run.decided[0].mv, Move::Right);
        assert_eq!(run.decided[0].state, DecisionState::HasPath);
        assert_eq!(run.decided[1].index, 4);
        assert_eq!(run.decided[1].state, DecisionState::NoPath);
        assert_eq!(run.decided[1].fallback_remaining, 3);
    }

    #[test]
    fn summary_counts_states() {
        let mut engine = MoveDecisionEngine::with_seed(2);
        let run = replay(RECORDING, &mut engine);
        let summary = build_summary(&run, engine.fallback().len(), "t".to_string());

        assert_eq!(summary.decided, 2);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.state_counts.get("has_path"), Some(&1));
        assert_eq!(summary.state_counts.get("no_path"), Some(&1));
        assert_eq!(summary.state_counts.get("no_target"), None);
        assert_eq!(summary.fallback_remaining, 3);
    }

    #[test]
    fn write_summary_round_trips_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let generated_at = "2026-01-01T00:00:00.000Z".to_string();
        let summary = build_summary(&ReplayRun::default(), 4, generated_at);
        write_summary(&path, &summary).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["fallbackRemaining"], 4);
        assert_eq!(value["generatedAt"], "2026-01-01T00:00:00.000Z");
    }

    #[test]
    fn write_summary_returns_error_when_parent_does_not_exist() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("summary.json");
        let summary = build_summary(&ReplayRun::default(), 4, now_rfc3339());
        assert!(write_summary(&target, &summary).is_err());
    }
}
