use std::fs::File;
use std::path::Path;

use crate::error::AppError;
use crate::model::AllocationParams;

/// Write `allocation_params.json`, pretty-printed
pub(crate) fn write_allocation_json(path: &Path, params: &AllocationParams) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| AppError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(params)?;
    std::fs::write(path, json).map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn read_allocation_json(path: &Path) -> Result<AllocationParams, AppError> {
    let file = File::open(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_reader(file)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_constraint_override;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("allocation_params.json");

        let mut params = AllocationParams::new("m1");
        params.channel_constraints.clear();
        let (channel, constraint) = parse_constraint_override("sp_recruit_cost=1.0:2.0").unwrap();
        params.channel_constraints.insert(channel, constraint);

        write_allocation_json(&path, &params).unwrap();
        let back = read_allocation_json(&path).unwrap();
        assert_eq!(back, params);

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let mut keys: Vec<_> = raw.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["channel_constraints", "date_range", "export", "model", "total_budget"]
        );
        assert_eq!(raw["total_budget"], 7_000_000);
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_allocation_json(&dir.path().join("nope.json")),
            Err(AppError::Read { .. })
        ));
    }
}
