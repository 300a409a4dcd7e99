//! Phase 4: Artifact Assembly
//!
//! Copies each manifest entry from a working copy into the output directory.
//! Directories are merged into the destination rather than replacing it, so
//! the backend and frontend `dist` trees end up side by side. When two entries
//! target the same file the later one in the manifest wins; the frontend's
//! `src/index.html` overwriting the backend's `dist/index.html` relies on it.
//!
//! The closing dependency install is a plain command run and is executed by
//! the orchestrator through [`crate::process::CommandRunner`].

use std::path::Path;

use log::info;

use crate::error::Result;
use crate::filesystem::FileOperations;

/// Execute one Phase 4 copy: merge `source` into `destination`.
pub fn execute(files: &dyn FileOperations, source: &Path, destination: &Path) -> Result<()> {
    info!("Copying {} -> {}", source.display(), destination.display());
    files.copy_recursive(source, destination)
}

#[cfg(test)]
mod tests {
    use super::execute;
    use crate::config::{DeploymentMode, DeploymentPlan, Step};
    use crate::filesystem::LocalFileOperations;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn populate_working_copies(root: &Path) {
        let back = root.join("repos/ajc-back");
        write(&back.join("dist/server.js"), "server");
        write(&back.join("dist/index.html"), "placeholder");
        write(&back.join("app.yaml"), "runtime: nodejs");
        write(&back.join("package.json"), r#"{"name":"back"}"#);
        write(&back.join("package-lock.json"), r#"{"lockfileVersion":3}"#);

        let front = root.join("repos/ajc-front");
        write(&front.join("dist/bundle.js"), "bundle");
        write(&front.join("package.json"), r#"{"name":"front"}"#);
        write(&front.join("src/index.html"), "<html>front</html>");
    }

    fn assemble(plan: &DeploymentPlan) {
        for step in plan.steps(DeploymentMode::Development).unwrap() {
            if let Step::CopyArtifact {
                source,
                destination,
            } = step
            {
                execute(&LocalFileOperations, &source, &destination).unwrap();
            }
        }
    }

    #[test]
    fn test_assembly_merges_both_dist_trees() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        populate_working_copies(root);
        fs::create_dir(root.join("app")).unwrap();
        let plan = DeploymentPlan::standard(root);

        assemble(&plan);

        let app = root.join("app");
        assert_eq!(fs::read_to_string(app.join("dist/server.js")).unwrap(), "server");
        assert_eq!(fs::read_to_string(app.join("dist/bundle.js")).unwrap(), "bundle");
        assert_eq!(
            fs::read_to_string(app.join("app.yaml")).unwrap(),
            "runtime: nodejs"
        );
    }

    #[test]
    fn test_assembly_takes_manifests_from_backend() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        populate_working_copies(root);
        fs::create_dir(root.join("app")).unwrap();
        let plan = DeploymentPlan::standard(root);

        assemble(&plan);

        let app = root.join("app");
        assert_eq!(
            fs::read_to_string(app.join("package.json")).unwrap(),
            r#"{"name":"back"}"#
        );
        assert!(app.join("package-lock.json").exists());
    }

    #[test]
    fn test_assembly_later_copy_wins_on_collision() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        populate_working_copies(root);
        fs::create_dir(root.join("app")).unwrap();
        let plan = DeploymentPlan::standard(root);

        assemble(&plan);

        assert_eq!(
            fs::read_to_string(root.join("app/dist/index.html")).unwrap(),
            "<html>front</html>"
        );
    }

    #[test]
    fn test_assembly_missing_artifact_fails() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let result = execute(
            &LocalFileOperations,
            &root.join("repos/ajc-back/dist"),
            &root.join("app/dist"),
        );
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_assembly_leaves_working_copy_behind_linked_entry_point() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        populate_working_copies(root);
        let public = root.join("repos/ajc-back/public/index.html");
        write(&public, "<html>back</html>");
        let placeholder = root.join("repos/ajc-back/dist/index.html");
        fs::remove_file(&placeholder).unwrap();
        std::os::unix::fs::symlink(&public, &placeholder).unwrap();
        fs::create_dir(root.join("app")).unwrap();
        let plan = DeploymentPlan::standard(root);

        assemble(&plan);

        assert_eq!(
            fs::read_to_string(root.join("app/dist/index.html")).unwrap(),
            "<html>front</html>"
        );
        assert_eq!(fs::read_to_string(&public).unwrap(), "<html>back</html>");
    }
}
