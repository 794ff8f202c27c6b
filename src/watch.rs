//! Document watcher: syncs the case-study document on startup, then again
//! whenever it changes on disk.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};

use casebook::diagnostics;
use casebook::error::Error;

use crate::commands::{self, Session};

/// Create a filesystem watcher that signals on the given channel whenever
/// a file called `file_name` is created, modified, or removed.
///
/// # Errors
///
/// Returns `Error::Watch` if the watcher cannot be created.
fn create_watcher(
    tx: crossbeam_channel::Sender<()>,
    file_name: OsString,
) -> Result<notify::RecommendedWatcher, Error> {
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && matches!(
                event.kind,
                notify::EventKind::Create(_)
                    | notify::EventKind::Modify(_)
                    | notify::EventKind::Remove(_)
            )
            && event.paths.iter().any(|p| return p.file_name() == Some(file_name.as_os_str()))
        {
            let _ = tx.send(());
        }
    })
    .map_err(|e| {
        return Error::Watch {
            reason: format!("watcher setup failed: {e}"),
        };
    });
}

/// Directory to watch for `document`. Editors often replace files rather
/// than write in place, so the parent is watched instead of the file.
fn watch_dir(document: &Path) -> PathBuf {
    return match document.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
}

/// Entry point for the watch command.
///
/// Runs an initial sync, then re-syncs after every burst of changes once
/// the configured quiet period has passed.
///
/// # Errors
///
/// Returns `Error::Watch` if the document path has no file name or the
/// watcher cannot be set up.
pub fn run(mut session: Session) -> Result<ExitCode, Error> {
    let document = session.config.document.clone();
    let Some(file_name) = document.file_name().map(OsString::from) else {
        return Err(Error::Watch {
            reason: format!("`{}` is not a file path", document.display()),
        });
    };

    eprintln!("watch: initial sync of {}", document.display());
    sync_once(&mut session, &document);

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(tx, file_name)?;
    let dir = watch_dir(&document);
    watcher.watch(&dir, RecursiveMode::NonRecursive).map_err(|e| {
        return Error::Watch {
            reason: format!("cannot watch {}: {e}", dir.display()),
        };
    })?;

    eprintln!("watch: monitoring {}, press Ctrl+C to stop", document.display());

    let debounce = Duration::from_millis(session.config.debounce_ms);
    while rx.recv().is_ok() {
        while rx.recv_timeout(debounce).is_ok() {}
        sync_once(&mut session, &document);
    }

    return Ok(ExitCode::SUCCESS);
}

/// Sync the document once, reporting failures without stopping the watch.
/// Content identical to the stored document is skipped, so the watcher's
/// own marker rewrites settle after one extra event.
fn sync_once(session: &mut Session, document: &Path) {
    let unchanged = std::fs::read_to_string(document).is_ok_and(|text| {
        return session
            .store
            .state()
            .case_study
            .as_ref()
            .is_some_and(|cs| return cs.content == text);
    });
    if unchanged {
        tracing::debug!(path = %document.display(), "document unchanged");
        return;
    }

    match commands::sync_document_file(session, document) {
        Ok(count) => eprintln!("watch: synced {count} headings"),
        Err(e) => diagnostics::print_error(&e),
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;

    #[test]
    fn bare_file_name_watches_current_dir() {
        assert_eq!(watch_dir(Path::new("case-study.md")), PathBuf::from("."));
        assert_eq!(watch_dir(Path::new("docs/story.md")), PathBuf::from("docs"));
    }
}
