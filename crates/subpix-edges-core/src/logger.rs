//! Stderr logger that tags each line with the detector stage.
//!
//! Lines look like `[  0.012s DEBUG hysteresis] low=3.825 high=76.500 ...`.
//! The tag is the innermost module of the `subpix_edges*` crate that emitted
//! the record, so gradient, hysteresis, refinement and denoise summaries can
//! be told apart at a glance. Records from other crates (image decoders,
//! argument parsing) are tagged with their crate name and only pass at
//! `Warn` or above.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

const OWN_CRATES: [&str; 3] = ["subpix_edges", "subpix_edges_core", "subpix_edges_zernike"];

/// Ceiling applied to records coming from outside the workspace.
const FOREIGN_MAX_LEVEL: LevelFilter = LevelFilter::Warn;

fn is_own_crate(krate: &str) -> bool {
    OWN_CRATES.contains(&krate)
}

/// Short tag for a log target.
///
/// `subpix_edges_zernike::hysteresis` becomes `hysteresis`; a crate root
/// such as `subpix_edges` keeps its name, and foreign targets collapse to
/// their crate name.
fn stage_label(target: &str) -> &str {
    let krate = target.split("::").next().unwrap_or(target);
    if is_own_crate(krate) {
        target.rsplit("::").next().unwrap_or(target)
    } else {
        krate
    }
}

struct StageLogger {
    level: LevelFilter,
    started: Instant,
}

impl StageLogger {
    fn max_level_for(&self, target: &str) -> LevelFilter {
        let krate = target.split("::").next().unwrap_or(target);
        if is_own_crate(krate) {
            self.level
        } else {
            self.level.min(FOREIGN_MAX_LEVEL)
        }
    }
}

impl Log for StageLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let _ = writeln!(
            std::io::stderr().lock(),
            "[{:7.3}s {:>5} {}] {}",
            elapsed,
            record.level(),
            stage_label(record.target()),
            record.args()
        );
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<StageLogger> = OnceLock::new();

/// Install the stage-tagged stderr logger.
///
/// `level` applies to the `subpix_edges*` crates. Only the first call
/// installs a logger; later calls are no-ops.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| StageLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// `EnvFilter` directives enabling `level` for the workspace crates and
/// `warn` for everything else.
#[cfg(feature = "tracing")]
fn default_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_ascii_lowercase();
    let mut directives = FOREIGN_MAX_LEVEL.to_string().to_ascii_lowercase();
    for krate in OWN_CRATES {
        directives.push_str(&format!(",{krate}={level}"));
    }
    directives
}

/// Install a `tracing` subscriber for the detector spans.
///
/// `RUST_LOG` takes precedence; otherwise `level` applies to the workspace crates
/// is used. Closing spans are printed so each instrumented detection call
/// reports its duration.
#[cfg(feature = "tracing")]
pub fn init_tracing(level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));
    let _ = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_timer(fmt::time::Uptime::default())
        .with_writer(std::io::stderr)
        .finish()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    fn metadata(level: Level, target: &str) -> Metadata<'_> {
        Metadata::builder().level(level).target(target).build()
    }

    #[test]
    fn stage_label_uses_innermost_module() {
        assert_eq!(stage_label("subpix_edges_zernike::hysteresis"), "hysteresis");
        assert_eq!(stage_label("subpix_edges_core::denoise"), "denoise");
        assert_eq!(stage_label("subpix_edges::pipeline"), "pipeline");
        assert_eq!(stage_label("subpix_edges"), "subpix_edges");
    }

    #[test]
    fn foreign_targets_collapse_to_crate() {
        assert_eq!(stage_label("png::decoder::stream"), "png");
        assert_eq!(stage_label("image"), "image");
    }

    #[test]
    fn foreign_records_are_capped_at_warn() {
        let logger = StageLogger {
            level: LevelFilter::Debug,
            started: Instant::now(),
        };
        assert!(logger.enabled(&metadata(Level::Debug, "subpix_edges_zernike::refine")));
        assert!(!logger.enabled(&metadata(Level::Trace, "subpix_edges_zernike::refine")));
        assert!(!logger.enabled(&metadata(Level::Info, "png::decoder")));
        assert!(logger.enabled(&metadata(Level::Warn, "png::decoder")));
    }

    #[test]
    fn quiet_level_also_quiets_foreign_crates() {
        let logger = StageLogger {
            level: LevelFilter::Error,
            started: Instant::now(),
        };
        assert!(!logger.enabled(&metadata(Level::Warn, "image")));
        assert!(logger.enabled(&metadata(Level::Error, "image")));
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn tracing_directives_scope_level_to_workspace() {
        assert_eq!(
            default_directives(LevelFilter::Debug),
            "warn,subpix_edges=debug,subpix_edges_core=debug,subpix_edges_zernike=debug"
        );
    }
}
