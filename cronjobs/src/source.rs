// Job-file discovery: one file per job, named after the file stem.
//
// Each file carries a marker line ending in "cron: <spec>"; any comment
// prefix is allowed (e.g. "-- cron: @daily" for SQL). The whole file body is
// the statement bound to the job.

use crate::errors::SourceError;
use crate::executor::{Driver, StatementAction};
use crate::scheduler::Scheduler;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// A job definition lifted out of one file
#[derive(Debug, Clone)]
pub struct JobFile {
    pub name: String,
    pub spec: String,
    pub body: String,
    pub path: PathBuf,
}

/// Scan `dir` (non-recursive) for job files. Malformed files end up in the
/// returned error list; well-formed files are still returned, sorted by
/// name, so one bad file never blocks the rest.
pub fn scan(dir: &Path) -> Result<(Vec<JobFile>, Vec<SourceError>), SourceError> {
    let marker = Regex::new(r"(?m)^.*?cron:\s+(.*)$").expect("Invalid regex pattern");

    let dirents = fs::read_dir(dir).map_err(|e| SourceError::Io {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut jobs = Vec::new();
    let mut failures = Vec::new();
    for dirent in dirents {
        let dirent = match dirent {
            Ok(d) => d,
            Err(e) => {
                failures.push(SourceError::Io {
                    path: dir.to_path_buf(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let path = dirent.path();
        if !path.is_file() {
            continue;
        }
        match load_file(&path, &marker) {
            Ok(job) => jobs.push(job),
            Err(e) => failures.push(e),
        }
    }

    jobs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok((jobs, failures))
}

fn load_file(path: &Path, marker: &Regex) -> Result<JobFile, SourceError> {
    let body = fs::read_to_string(path).map_err(|e| SourceError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let captures = marker
        .captures(&body)
        .ok_or_else(|| SourceError::MissingSpec {
            path: path.to_path_buf(),
        })?;
    let spec = captures[1].trim().to_string();

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    debug!(job = %name, spec = %spec, path = %path.display(), "job file loaded");
    Ok(JobFile {
        name,
        spec,
        body,
        path: path.to_path_buf(),
    })
}

/// Read every job file in `dir` and register it with `scheduler`, binding
/// each file body to `driver` as a statement action. Per-file failures
/// (missing marker, bad spec, duplicate name) are collected and returned;
/// the remaining files still register.
pub fn register_dir(
    scheduler: &mut Scheduler,
    driver: Arc<dyn Driver>,
    dir: &Path,
) -> Result<Vec<SourceError>, SourceError> {
    let (jobs, mut failures) = scan(dir)?;
    for job in jobs {
        let action = Arc::new(StatementAction::new(driver.clone(), job.body));
        if let Err(e) = scheduler.register(job.name, &job.spec, action) {
            failures.push(SourceError::Registration {
                path: job.path,
                source: e,
            });
        }
    }
    Ok(failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ExecutionError, RegistrationError};
    use crate::scheduler::SchedulerConfig;
    use async_trait::async_trait;
    use std::fs::File;
    use std::io::Write;

    struct NullDriver;

    #[async_trait]
    impl Driver for NullDriver {
        async fn execute(&self, _statement: &str) -> Result<(), ExecutionError> {
            Ok(())
        }
    }

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_scan_extracts_spec_and_body() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "cleanup.sql",
            "-- cron: @daily\nDELETE FROM sessions WHERE expired;\n",
        );

        let (jobs, failures) = scan(dir.path()).unwrap();
        assert!(failures.is_empty());
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].name, "cleanup");
        assert_eq!(jobs[0].spec, "@daily");
        assert!(jobs[0].body.contains("DELETE FROM sessions"));
    }

    #[test]
    fn test_scan_accepts_any_comment_prefix() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.sql", "-- cron: @hourly\nSELECT 1;\n");
        write_file(dir.path(), "b.lua", "# cron: 0 0 3 * * *\nprint('hi')\n");

        let (jobs, failures) = scan(dir.path()).unwrap();
        assert!(failures.is_empty());
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].spec, "@hourly");
        assert_eq!(jobs[1].spec, "0 0 3 * * *");
    }

    #[test]
    fn test_scan_reports_missing_marker_without_blocking_others() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "good.sql", "-- cron: @daily\nSELECT 1;\n");
        write_file(dir.path(), "bad.sql", "SELECT 2;\n");

        let (jobs, failures) = scan(dir.path()).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].name, "good");
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0], SourceError::MissingSpec { .. }));
    }

    #[test]
    fn test_scan_missing_directory() {
        let result = scan(Path::new("/nonexistent/jobs"));
        assert!(matches!(result, Err(SourceError::Io { .. })));
    }

    #[test]
    fn test_register_dir_registers_good_files_and_reports_bad_specs() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "good.sql", "-- cron: @daily\nSELECT 1;\n");
        write_file(dir.path(), "bad.sql", "-- cron: not a spec\nSELECT 2;\n");

        let mut scheduler = Scheduler::new(SchedulerConfig::default());
        let failures = register_dir(&mut scheduler, Arc::new(NullDriver), dir.path()).unwrap();

        assert_eq!(scheduler.len(), 1);
        assert_eq!(failures.len(), 1);
        assert!(matches!(
            failures[0],
            SourceError::Registration {
                source: RegistrationError::InvalidSpec(_),
                ..
            }
        ));
    }
}
