use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use diagnosis_core::{HomeCoordinator, Input, LocaleStore, MockDiagnosisService, Rendered};
use shared::domain::Locale;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{ViewCommand, HELP};
use config::{load_settings, Settings, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    failure_rate: Option<f64>,
    #[arg(long)]
    latency_ms: Option<u64>,
    #[arg(long)]
    dataset: Option<PathBuf>,
    #[arg(long)]
    locale: Option<Locale>,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(seed) = self.seed {
            settings.rng_seed = Some(seed);
        }
        if let Some(rate) = self.failure_rate {
            settings.set_failure_rate(rate);
        }
        if let Some(ms) = self.latency_ms {
            settings.fetch_latency_ms = ms;
        }
        if let Some(path) = &self.dataset {
            settings.dataset_path = Some(path.clone());
        }
        if let Some(locale) = self.locale {
            settings.locale = locale;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config);
    args.apply(&mut settings);
    info!(?settings, "starting diagnosis list");

    let locale = Arc::new(LocaleStore::new(settings.locale));
    let source = Arc::new(MockDiagnosisService::new(settings.service_config()));
    let coordinator = HomeCoordinator::new(source, Arc::clone(&locale));
    let (triggers, input) = Input::channel();
    let mut output = coordinator.transform(input);

    println!("{HELP}");
    print_rendered(&output.current());
    triggers.view_active();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                match ViewCommand::parse(&line) {
                    Some(ViewCommand::Refresh) => triggers.view_active(),
                    Some(ViewCommand::Filter(selection)) => triggers.select_filter(selection),
                    Some(ViewCommand::ToggleLocale) => {
                        locale.toggle();
                    }
                    Some(ViewCommand::Show) => print_rendered(&output.current()),
                    Some(ViewCommand::Help) => println!("{HELP}"),
                    Some(ViewCommand::Quit) => break,
                    None if line.trim().is_empty() => {}
                    None => println!("unknown command '{}'; type 'help'", line.trim()),
                }
            }
            rendered = output.changed() => match rendered {
                Some(rendered) => print_rendered(&rendered),
                None => break,
            },
        }
    }

    Ok(())
}

fn print_rendered(rendered: &Rendered) {
    let labels: Vec<String> = rendered
        .filter_labels
        .iter()
        .enumerate()
        .map(|(index, label)| {
            if index as i64 == rendered.filter.index() {
                format!("[{label}]")
            } else {
                label.clone()
            }
        })
        .collect();

    println!();
    println!("== {} ==  ({})", rendered.title_text, rendered.change_language_label);
    println!("{}", labels.join(" "));
    let Some(list) = &rendered.list else {
        println!("loading...");
        return;
    };
    println!("{}", list.count_text);
    for record in &list.items {
        let status = format!("{:?}", record.status);
        let kind = format!("{:?}", record.diagnosis_type);
        println!(
            "  {:<8} {:<14} {:<10} {:<11} {:<13} {kind}",
            record.id.as_str(),
            record.vehicle_name,
            record.license_plate,
            record.date,
            status,
        );
    }
}
