// File: ./src/export.rs
// Writes converted itineraries to disk.
use crate::converter::Converter;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use fs2::FileExt;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Sidecar lock file path: `trip.ics` -> `trip.ics.lock`.
fn get_lock_path(file_path: &Path) -> PathBuf {
    let mut lock_path = file_path.to_path_buf();
    if let Some(ext) = lock_path.extension() {
        let mut new_ext = ext.to_os_string();
        new_ext.push(".lock");
        lock_path.set_extension(new_ext);
    } else {
        lock_path.set_extension("lock");
    }
    lock_path
}

/// Run `f` while holding an exclusive lock on the sidecar of `file_path`.
pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let lock_path = get_lock_path(file_path);
    let file = fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .with_context(|| format!("Failed to open lock file '{}'", lock_path.display()))?;

    file.lock_exclusive()?;
    let result = f();
    FileExt::unlock(&file)?;
    result
}

/// Atomic write: Write to .tmp file then rename
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
    let path = path.as_ref();
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("Failed to write '{}'", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to move '{}' into place", path.display()))?;
    Ok(())
}

/// `notes/rome.txt` -> `rome.ics`. Inputs without a usable stem fall back to
/// `fallback`.
pub fn output_name_for(input: &Path, fallback: &str) -> String {
    match input.file_stem().and_then(|s| s.to_str()) {
        Some(stem) if !stem.is_empty() && stem != "-" => format!("{}.ics", stem),
        _ => fallback.to_string(),
    }
}

/// Output file names for `inputs`, in order.
///
/// Fails when two inputs would write the same file (`a/rome.txt` and
/// `b/rome.txt`, or `rome.txt` and `rome.md`). Names are compared
/// case-insensitively.
pub fn output_names(inputs: &[String], fallback: &str) -> Result<Vec<String>> {
    let mut claimed: HashMap<String, &str> = HashMap::with_capacity(inputs.len());
    let mut names = Vec::with_capacity(inputs.len());

    for input in inputs {
        let name = output_name_for(Path::new(input), fallback);
        if let Some(first) = claimed.insert(name.to_lowercase(), input.as_str()) {
            anyhow::bail!(
                "'{}' and '{}' would both be written to '{}'; convert them separately",
                first,
                input,
                name
            );
        }
        names.push(name);
    }
    Ok(names)
}

/// Convert `plan_text` and write it to `dir/file_name`.
///
/// Nothing is written when the conversion fails. The file is replaced in one
/// rename, so no lock file is left in the output directory.
pub fn export_itinerary(
    converter: &Converter,
    plan_text: &str,
    start_date: Option<NaiveDate>,
    dir: &Path,
    file_name: &str,
) -> Result<PathBuf> {
    let calendar = converter.build_calendar(plan_text, start_date)?;
    let bytes = calendar.to_bytes()?;

    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {:?}", dir))?;
    }
    let path = dir.join(file_name);
    atomic_write(&path, &bytes)?;

    log::info!("Wrote {} event(s) to {}", calendar.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_name_for() {
        assert_eq!(
            output_name_for(Path::new("notes/rome.txt"), "travel_itinerary.ics"),
            "rome.ics"
        );
        assert_eq!(
            output_name_for(Path::new("-"), "travel_itinerary.ics"),
            "travel_itinerary.ics"
        );
        assert_eq!(
            output_name_for(Path::new("plan"), "travel_itinerary.ics"),
            "plan.ics"
        );
    }

    #[test]
    fn test_output_names_keep_input_order() {
        let inputs = vec!["notes/rome.txt".to_string(), "paris.md".to_string()];
        let names = output_names(&inputs, "travel_itinerary.ics").unwrap();
        assert_eq!(names, vec!["rome.ics", "paris.ics"]);
    }

    #[test]
    fn test_output_names_reject_clashes() {
        for pair in [
            ["a/rome.txt", "b/rome.txt"],
            ["rome.txt", "rome.md"],
            ["Rome.txt", "rome.txt"],
        ] {
            let inputs: Vec<String> = pair.iter().map(|s| s.to_string()).collect();
            let err = output_names(&inputs, "travel_itinerary.ics").unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains(pair[0]), "{}", msg);
            assert!(msg.contains(pair[1]), "{}", msg);
            assert!(msg.contains(".ics"), "{}", msg);
        }
    }

    #[test]
    fn test_lock_path() {
        assert_eq!(
            get_lock_path(Path::new("/tmp/a.ics")),
            PathBuf::from("/tmp/a.ics.lock")
        );
        assert_eq!(get_lock_path(Path::new("/tmp/a")), PathBuf::from("/tmp/a.lock"));
    }
}
