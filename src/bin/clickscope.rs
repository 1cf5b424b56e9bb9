use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use clickscope::dataset::{self, DatasetHandle};
use clickscope::filter::FilterSpec;
use clickscope::ingest::{IngestOptions, TracingObserver};
use clickscope::schema;
use clickscope::user_agent::WootheeClassifier;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "clickscope", version, about = "Normalize and filter web-analytics CSV logs")]
struct Cli {
    /// Field delimiter (single byte)
    #[arg(long, global = true, env = "CLICKSCOPE_DELIMITER", default_value_t = ',')]
    delimiter: char,

    /// More diagnostics on stderr (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the header carries every mandatory column
    Validate { file: PathBuf },
    /// Validate and ingest a file, printing the values for each filter control
    Upload { file: PathBuf },
    /// Print the records matching every given constraint
    Filter(FilterArgs),
}

#[derive(Args, Debug)]
struct FilterArgs {
    file: PathBuf,

    #[arg(long)] browser: Option<String>,
    #[arg(long)] os: Option<String>,
    #[arg(long)] device: Option<String>,
    #[arg(long)] domain: Option<String>,
    /// Reduced page path, e.g. `blog/posts`
    #[arg(long)] page: Option<String>,
    /// Referral domain
    #[arg(long)] referral: Option<String>,

    /// Constraint on any column, `key=value`. May be repeated.
    #[arg(long = "where", value_name = "KEY=VALUE")]
    where_: Vec<String>,

    /// Full filter spec as a JSON object; flags override its entries
    #[arg(long = "spec-json")]
    spec_json: Option<String>,
}

impl FilterArgs {
    fn to_spec(&self) -> anyhow::Result<FilterSpec> {
        let mut spec = match &self.spec_json {
            Some(raw) => serde_json::from_str::<FilterSpec>(raw).context("invalid --spec-json")?,
            None => FilterSpec::new(),
        };
        let named = [
            ("browser", &self.browser),
            ("os", &self.os),
            ("device", &self.device),
            ("domain", &self.domain),
            ("page", &self.page),
            ("referral", &self.referral),
        ];
        for (key, value) in named {
            if let Some(v) = value {
                spec.insert(key, v.clone());
            }
        }
        for pair in &self.where_ {
            let Some((k, v)) = pair.split_once('=') else {
                bail!("expected KEY=VALUE, got `{pair}`");
            };
            spec.insert(k.trim(), v);
        }
        Ok(spec)
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    if atty::is(atty::Stream::Stdout) {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", serde_json::to_string(value)?);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    clickscope::logging::init_logging(cli.verbose);

    let Ok(delimiter) = u8::try_from(cli.delimiter) else {
        bail!("delimiter must be a single-byte character, got `{}`", cli.delimiter);
    };
    let options = IngestOptions::default().with_delimiter(delimiter);
    let classifier = WootheeClassifier::new();
    let mut observer = TracingObserver;

    match &cli.command {
        Command::Validate { file } => {
            schema::validate_file(file, &options)?;
            print_json(&serde_json::json!({ "valid": true }))?;
        }
        Command::Upload { file } => {
            let handle = DatasetHandle::new(file);
            let summary = dataset::upload(&handle, &classifier, &options, &mut observer)?;
            print_json(&summary)?;
        }
        Command::Filter(args) => {
            let spec = args.to_spec()?;
            let handle = DatasetHandle::new(&args.file);
            let outcome = dataset::filter(&handle, &spec, &classifier, &options, &mut observer)?;
            print_json(&outcome)?;
        }
    }
    Ok(())
}
