//! YAML export, the same document as the JSON export with a comment header

use std::io::Write;

use crate::error::{SpendwiseError, SpendwiseResult};
use crate::export::json::FullExport;
use crate::models::User;
use crate::storage::Storage;

pub fn export_full_yaml<W: Write>(
    storage: &Storage,
    user: &User,
    writer: &mut W,
) -> SpendwiseResult<()> {
    let export = FullExport::from_storage(storage, user)?;
    let io_err = |e: std::io::Error| SpendwiseError::Export(e.to_string());

    writeln!(writer, "# Spendwise export for {}", export.user.email).map_err(io_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(io_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(io_err)?;
    writeln!(writer).map_err(io_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| SpendwiseError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SpendwisePaths;
    use crate::models::Category;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_export() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SpendwisePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        let user = User::new("Ana", "ana@example.com", "hash".into());
        storage
            .categories
            .upsert(Category::new(user.id, "Food", 250, 700))
            .unwrap();

        let mut out = Vec::new();
        export_full_yaml(&storage, &user, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("# Spendwise export for ana@example.com"));
        assert!(text.contains("schema_version:"));
        assert!(text.contains("name: Food"));
        assert!(text.contains("max_limit: 700"));
    }
}
