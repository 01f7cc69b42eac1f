use std::{path::PathBuf, sync::Arc};

use alma_batch_rs::{
    config::ImporterConfig,
    core::{
        field::ItemField,
        job::JobStatus,
        launcher::{ImportRequest, JobLauncherBuilder},
        repository::{InMemoryJobRepository, JobRepository},
    },
    item::{alma::AlmaClient, logger::LoggerNotifier},
};
use anyhow::{bail, Context};
use clap::{Arg, ArgAction, Command};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let matches = Command::new("alma-batch")
        .about("Update one item field for every barcode listed in CSV files")
        .arg(
            Arg::new("config")
                .long("config")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("institution")
                .long("institution")
                .required(true)
                .help("Institution code whose API key is used"),
        )
        .arg(
            Arg::new("field")
                .long("field")
                .default_value("internal_note_1")
                .value_parser(clap::value_parser!(ItemField)),
        )
        .arg(
            Arg::new("email")
                .long("email")
                .required(true)
                .help("Recipient of the report"),
        )
        .arg(
            Arg::new("files")
                .required(true)
                .action(ArgAction::Append)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .get_matches();

    let config_path = matches
        .get_one::<PathBuf>("config")
        .context("--config is required")?;
    let config = ImporterConfig::from_path(config_path)?.with_env_overrides()?;
    let institution = matches
        .get_one::<String>("institution")
        .context("--institution is required")?;
    let credential = config.credential_for(institution)?.clone();
    let field = matches
        .get_one::<ItemField>("field")
        .copied()
        .unwrap_or_default();
    let email = matches
        .get_one::<String>("email")
        .context("--email is required")?;
    let files: Vec<PathBuf> = matches
        .get_many::<PathBuf>("files")
        .context("at least one file is required")?
        .cloned()
        .collect();

    // The blocking HTTP client is built outside the async runtime.
    let client = Arc::new(AlmaClient::from_config(&config)?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let repository = Arc::new(InMemoryJobRepository::default());

    let ids = runtime.block_on(async {
        let launcher = JobLauncherBuilder::new()
            .resolver(client.clone())
            .mutator(client.clone())
            .notifier(Arc::new(LoggerNotifier::default()))
            .repository(repository.clone())
            .workers(config.workers)
            .delimiter(config.delimiter_byte())
            .start()?;

        let mut ids = Vec::with_capacity(files.len());
        for path in files {
            let request =
                ImportRequest::new(path, field.as_str(), credential.clone(), email.as_str())
                    .institution(institution.as_str());
            ids.push(launcher.submit(request)?);
        }

        launcher.shutdown().await;
        Ok::<_, anyhow::Error>(ids)
    })?;

    let mut failed = 0;
    for id in &ids {
        let Some(job) = repository.find(id) else {
            continue;
        };
        match job.status {
            JobStatus::Succeeded => println!("{}\n", job.report.unwrap_or_default()),
            _ => {
                failed += 1;
                eprintln!(
                    "Import of {} failed: {}\n",
                    job.filename,
                    job.error.unwrap_or_default()
                );
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} imports failed", ids.len());
    }
    Ok(())
}
