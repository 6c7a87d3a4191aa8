use std::path::PathBuf;

use ai_llm_service::LlmProvider;
use artifact_forge::ArtifactSelection;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "testcase-forge",
    version,
    about = "Generate Azure DevOps test cases and TestNG skeletons from acceptance criteria"
)]
pub struct Cli {
    /// Output directory for generated artifacts (overrides OUTPUT_DIR)
    #[arg(long, global = true)]
    pub out: Option<PathBuf>,

    /// Debug logs for workspace crates
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rebuild the reference index from the corpus
    Ingest {
        /// Files or directories to index (overrides CORPUS_PATHS)
        #[arg(long, num_args = 1..)]
        corpus: Vec<PathBuf>,
    },

    /// Generate artifacts for one set of acceptance criteria
    Generate {
        /// File with the acceptance criteria, `-` for stdin
        #[arg(long)]
        input: PathBuf,

        /// Generator backend: ollama, openai or stub (overrides LLM_KIND)
        #[arg(long)]
        llm: Option<LlmProvider>,

        /// Model name for the selected backend
        #[arg(long)]
        model: Option<String>,

        /// Which artifacts to produce: testcase, script or both
        #[arg(long, default_value = "both")]
        agent: ArtifactSelection,

        /// Reference windows to retrieve (overrides RAG_TOP_K)
        #[arg(long)]
        top_k: Option<usize>,
    },

    /// Publish a generated test-case document to Azure DevOps
    Push {
        /// Test-case YAML; defaults to <out>/ado_testcases.yaml
        #[arg(long)]
        input: Option<PathBuf>,

        /// Print the requests instead of sending them
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        dry_run: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_flags_parse() {
        let cli = Cli::try_parse_from([
            "testcase-forge",
            "generate",
            "--input",
            "story.txt",
            "--llm",
            "stub",
            "--agent",
            "script",
            "--top-k",
            "2",
            "--out",
            "build",
        ])
        .unwrap();
        assert_eq!(cli.out, Some(PathBuf::from("build")));
        match cli.command {
            Command::Generate {
                llm, agent, top_k, ..
            } => {
                assert_eq!(llm, Some(LlmProvider::Stub));
                assert_eq!(agent, ArtifactSelection::Script);
                assert_eq!(top_k, Some(2));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn push_is_dry_run_unless_disabled() {
        let cli = Cli::try_parse_from(["testcase-forge", "push"]).unwrap();
        assert!(matches!(cli.command, Command::Push { dry_run: true, .. }));

        let cli = Cli::try_parse_from(["testcase-forge", "push", "--dry-run", "false"]).unwrap();
        assert!(matches!(cli.command, Command::Push { dry_run: false, .. }));
    }

    #[test]
    fn unknown_agent_is_rejected() {
        assert!(
            Cli::try_parse_from(["testcase-forge", "generate", "--input", "x", "--agent", "all"])
                .is_err()
        );
    }
}
