use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;
use zipgate::{Cleanup, MimeClassifier, RelocationReport, SessionBuilder, ZipSession};

use crate::cli::app::{App, Commands};
use crate::settings::Settings;

pub fn run(app: App) -> anyhow::Result<()> {
    let settings = Settings::resolve(&app.opts)?;
    let stdout = io::stdout();

    match app.cmd {
        Commands::Extensions(arg) => {
            let session = open_pipeline(&arg.archive, &settings)?;
            session.scoped(|s| -> anyhow::Result<()> {
                let report = s.by_extension(&settings.extract)?;
                write_report(&mut stdout.lock(), &report)?;
                Ok(())
            })
        }
        Commands::Names(arg) => {
            let session = open_pipeline(&arg.archive, &settings)?;
            session.scoped(|s| -> anyhow::Result<()> {
                let report = s.by_names(&arg.names, &settings.extract)?;
                write_report(&mut stdout.lock(), &report)?;
                Ok(())
            })
        }
        Commands::All(arg) => {
            let mut builder = builder(&arg.archive, &settings);
            if let Some(destination) = &settings.destination {
                builder = builder.destination(destination);
            }
            let session = open(builder, &settings)?;
            session.scoped(|s| -> anyhow::Result<()> {
                let names = s.all()?;
                let mut out = stdout.lock();
                for name in names {
                    writeln!(out, "{name}")?;
                }
                Ok(())
            })
        }
        Commands::List(arg) => {
            // listing never deletes anything
            let builder = builder(&arg.archive, &settings).cleanup(Cleanup::default());
            let session = open(builder, &settings)?;
            session.scoped(|s| -> anyhow::Result<()> {
                let mut out = stdout.lock();
                for entry in s.entries()? {
                    writeln!(out, "{:>5} {:>10} {}", entry.index, entry.size, entry.name)?;
                }
                Ok(())
            })
        }
    }
}

fn builder(archive: &Path, settings: &Settings) -> SessionBuilder {
    SessionBuilder::new(archive)
        .base(&settings.base)
        .cleanup(settings.cleanup)
}

/// A session with both directories, as the validating strategies need.
fn open_pipeline(archive: &Path, settings: &Settings) -> anyhow::Result<ZipSession> {
    let mut builder = builder(archive, settings);
    if let Some(destination) = &settings.destination {
        builder = builder.destination(destination);
    }
    if let Some(staging) = &settings.staging {
        builder = builder.staging(staging);
    }
    open(builder, settings)
}

fn open(builder: SessionBuilder, settings: &Settings) -> anyhow::Result<ZipSession> {
    if settings.allow.is_empty() {
        tracing::debug!("no extensions allowed, every staged file will be rejected");
    }
    builder
        .open(MimeClassifier::new(settings.allow.clone()))
        .context("failed to open session")
}

/// Realized paths go to `out`, one per line, prefixed by the digest when there is one.
/// Everything that did not make it is logged.
fn write_report(out: &mut impl Write, report: &RelocationReport) -> io::Result<()> {
    for accepted in &report.accepted {
        match &accepted.digest {
            Some(digest) => writeln!(out, "{}  {}", digest, accepted.path.display())?,
            None => writeln!(out, "{}", accepted.path.display())?,
        }
    }

    for rejected in &report.rejected {
        tracing::warn!(entry = %rejected.entry, mime = %rejected.mime_type, "rejected");
    }
    for missing in &report.missing {
        tracing::warn!(entry = %missing, "missing from staging");
    }
    for failed in &report.failed {
        tracing::warn!(entry = %failed.entry, reason = %failed.reason, "failed");
    }

    tracing::info!(
        accepted = report.accepted.len(),
        rejected = report.rejected.len(),
        missing = report.missing.len(),
        failed = report.failed.len(),
        "done"
    );
    Ok(())
}
