//! Install command - run the fetch-verify-install pipeline and smoke test.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use octoget_core::smoke::VERSION_FLAG;
use octoget_core::{platform, smoke_test, InstallError, Installer, Manifest, TestError};

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Manifest describing the release to install
    #[arg(value_name = "MANIFEST", default_value = "octoget.toml")]
    pub manifest: PathBuf,

    /// Override the installation directory
    #[arg(long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Disable progress output
    #[arg(long)]
    pub no_progress: bool,
}

pub async fn execute(args: InstallArgs) -> Result<i32> {
    log::debug!("loading manifest {}", args.manifest.display());

    let manifest = match Manifest::load(&args.manifest) {
        Ok(manifest) => manifest,
        Err(e) => return Ok(fail_install(e)),
    };

    let descriptor = match manifest.into_descriptor(args.dir.as_deref()) {
        Ok(descriptor) => descriptor,
        Err(e) => return Ok(fail_install(e)),
    };

    println!(
        "{} {} {} for {}",
        style("Installing").green().bold(),
        style(&descriptor.name).white().bold(),
        style(&descriptor.version).yellow(),
        platform::platform()
    );

    let pb = if args.no_progress {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {bytes}/{total_bytes} {msg}")
                .unwrap()
                .progress_chars("=> "),
        );
        pb
    };
    pb.set_message("downloading");

    let installer = match Installer::new() {
        Ok(installer) => installer,
        Err(e) => {
            pb.finish_and_clear();
            return Ok(fail_install(e));
        }
    };

    let progress_pb = pb.clone();
    let progress = move |downloaded: u64, total: u64| {
        if total > 0 {
            progress_pb.set_length(total);
        }
        progress_pb.set_position(downloaded);
    };

    let binary = match installer.install(&descriptor, Some(&progress)).await {
        Ok(binary) => binary,
        Err(e) => {
            pb.finish_and_clear();
            return Ok(fail_install(e));
        }
    };
    pb.finish_and_clear();

    println!(
        "  {} installed {}",
        style("-").green(),
        style(binary.path().display()).white().bold()
    );

    if let Err(e) = smoke_test(&binary) {
        return Ok(fail_smoke_test(e));
    }

    println!(
        "{} {} {} responds to {}",
        style("Success:").green().bold(),
        descriptor.name,
        descriptor.version,
        VERSION_FLAG
    );

    Ok(0)
}

/// Report an install failure with a single-line message naming the step
fn fail_install(e: InstallError) -> i32 {
    eprintln!("{} {}", style("Error:").red().bold(), e);
    1
}

fn fail_smoke_test(e: TestError) -> i32 {
    eprintln!("{} {}", style("Error:").red().bold(), e);
    1
}
