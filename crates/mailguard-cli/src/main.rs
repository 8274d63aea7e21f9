mod display;
mod logging;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use mailguard_client::{ClassifyClient, ClientConfig, Controller};
use mailguard_core::{FormFields, Sample, ViewState, interpret};

#[derive(Parser)]
#[command(name = "mailguard", version, about = "Classify emails against the DLP service")]
struct Cli {
    /// Base URL the API endpoints hang off.
    #[arg(
        long,
        global = true,
        env = "MAILGUARD_API_URL",
        default_value = "http://localhost:5173/api"
    )]
    api_url: String,

    /// Sent as the `x-api-key` header.
    #[arg(long, global = true, env = "MAILGUARD_API_KEY", default_value = "DEMO_KEY")]
    api_key: String,

    /// Request timeout in seconds.
    #[arg(long, global = true, env = "MAILGUARD_TIMEOUT_SECS", default_value_t = 15)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compose an email and classify it.
    Classify(ClassifyArgs),
    /// Show classifier health and model metadata.
    Health,
    /// Ask the service which action it assigns to a score.
    Policy {
        #[arg(long)]
        score: f64,
    },
}

#[derive(Args)]
struct ClassifyArgs {
    /// Start from a canned email; explicit fields override it.
    #[arg(long, value_enum)]
    sample: Option<SampleArg>,
    #[arg(long)]
    from: Option<String>,
    #[arg(long)]
    to: Option<String>,
    #[arg(long)]
    subject: Option<String>,
    #[arg(long)]
    body: Option<String>,
    /// Comma-separated attachment filenames, e.g. "example.xlsx, data.csv".
    #[arg(long)]
    attachments: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum SampleArg {
    Sensitive,
    Normal,
}

impl From<SampleArg> for Sample {
    fn from(arg: SampleArg) -> Self {
        match arg {
            SampleArg::Sensitive => Sample::Sensitive,
            SampleArg::Normal => Sample::Normal,
        }
    }
}

impl ClassifyArgs {
    fn into_fields(self) -> FormFields {
        let mut fields = self
            .sample
            .map(|s| Sample::from(s).fields())
            .unwrap_or_default();
        if let Some(from) = self.from {
            fields.from = from;
        }
        if let Some(to) = self.to {
            fields.to = to;
        }
        if let Some(subject) = self.subject {
            fields.subject = subject;
        }
        if let Some(body) = self.body {
            fields.body = body;
        }
        if let Some(attachments) = self.attachments {
            fields.attachments_csv = attachments;
        }
        fields
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    logging::init_tracing("warn");
    let cli = Cli::parse();
    tracing::debug!("mailguard v{}", env!("CARGO_PKG_VERSION"));

    let client = ClassifyClient::new(ClientConfig {
        api_base: cli.api_url,
        api_key: cli.api_key,
        timeout: Duration::from_secs(cli.timeout_secs),
    })
    .context("building classifier client")?;

    match cli.command {
        Command::Classify(args) => {
            let fields = args.into_fields();
            let controller = Controller::new(Arc::new(client));
            controller
                .submit(&fields)
                .await
                .context("classification task panicked")?;

            let state = controller.state();
            print!("{}", display::render(&interpret(&state)));
            if matches!(state, ViewState::Failure(_)) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Health => {
            let health = client.health().await.context("checking classifier health")?;
            print!("{}", display::render_health(&health));
        }
        Command::Policy { score } => {
            let action = client
                .apply_policy(score)
                .await
                .context("applying policy")?;
            println!("{action}");
        }
    }
    Ok(ExitCode::SUCCESS)
}
