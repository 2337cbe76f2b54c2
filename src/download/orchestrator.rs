//! End-to-end import: join the hotspot, pull the album, restore the network.

use std::path::Path;

use indicatif::ProgressBar;
use url::Url;

use crate::api::{resolve_manifest, HttpTransport, ResilientFetcher, Transport};
use crate::config::Config;
use crate::download::state::DownloadState;
use crate::error::{Error, Result};
use crate::fs::{check_output_dir, target_path, write_file, FilenameRule};
use crate::output::{create_item_bar, print_info};
use crate::wifi::{SessionManager, WifiBackend};

/// Import every file the console lists into the configured output directory.
///
/// Files are fetched strictly in index order, one at a time, and the first
/// failure ends the run. Files already written stay on disk. Once the
/// hotspot has been joined the session is released on every path out of
/// here, including a termination signal.
pub async fn run<B: WifiBackend>(
    config: &Config,
    backend: B,
    state: &mut DownloadState,
) -> Result<()> {
    let output_dir = config.output_dir()?;
    check_output_dir(output_dir)?;

    let rule = FilenameRule::new()?;
    let manifest_url = config.manifest_url()?;
    let fetcher = ResilientFetcher::new(HttpTransport::new(
        config.resource_timeout(),
        config.connectivity_poll(),
    )?);

    let mut manager = SessionManager::open(
        backend,
        config.options.interface.as_deref(),
        config.options.restore_mode,
    )
    .await?;

    let ssid = &config.hotspot.ssid;
    let network = manager.scan(ssid).await?;

    print_info(&format!("Connecting to {}...", ssid));
    let session = manager.associate(network, &config.hotspot.password).await?;
    tracing::debug!("Joined {} on {}", session.ssid(), session.interface());

    let result = tokio::select! {
        result = transfer(config, &fetcher, &rule, &manifest_url, output_dir, state) => result,
        () = shutdown_signal() => Err(Error::Interrupted),
    };

    print_info(&format!("Disconnecting from {}...", ssid));
    session.release().await;

    result
}

/// Resolve the index and download each listed file.
async fn transfer<T: Transport>(
    config: &Config,
    fetcher: &ResilientFetcher<T>,
    rule: &FilenameRule,
    manifest_url: &Url,
    output_dir: &Path,
    state: &mut DownloadState,
) -> Result<()> {
    let manifest = resolve_manifest(fetcher, manifest_url).await?;
    state.set_manifest(&manifest.console_name, manifest.filenames.len());

    print_info(&format!(
        "Downloading {} file(s) from {}...",
        manifest.filenames.len(),
        manifest.console_name
    ));

    let bar = if config.options.show_progress {
        create_item_bar(manifest.filenames.len() as u64, "Downloading")
    } else {
        ProgressBar::hidden()
    };

    for filename in &manifest.filenames {
        bar.set_message(filename.clone());
        if let Err(e) = download_file(config, fetcher, rule, output_dir, filename, state).await {
            bar.abandon();
            state.record_failed(filename, &e);
            return Err(e);
        }
        bar.inc(1);
    }

    bar.finish_and_clear();
    Ok(())
}

/// Validate, fetch and write a single file.
async fn download_file<T: Transport>(
    config: &Config,
    fetcher: &ResilientFetcher<T>,
    rule: &FilenameRule,
    output_dir: &Path,
    filename: &str,
    state: &mut DownloadState,
) -> Result<()> {
    // A bad name means the device no longer speaks the protocol we expect.
    rule.check(filename)?;

    tracing::debug!("Downloading {}", filename);
    let url = config.file_url(filename)?;
    let fetched = fetcher.fetch(&url).await?;

    let path = target_path(output_dir, filename);
    write_file(&path, &fetched.bytes).await?;
    tracing::debug!("Wrote {} bytes to {}", fetched.bytes.len(), path.display());

    state.record_written(filename, path, fetched.bytes.len() as u64);
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM/SIGHUP on unix.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::terminate()), signal(SignalKind::hangup())) {
            (Ok(mut term), Ok(mut hup)) => {
                tokio::select! {
                    _ = &mut ctrl_c => {},
                    _ = term.recv() => {},
                    _ = hup.recv() => {},
                }
                return;
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("Failed to install signal handlers: {}", e);
            }
        }
    }

    if let Err(e) = ctrl_c.await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
