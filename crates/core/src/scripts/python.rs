use super::ScriptExtractor;
use crate::types::ProjectScript;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
pub struct PythonScriptExtractor;

impl PythonScriptExtractor {
    fn base_commands(manager: &str) -> Vec<ProjectScript> {
        match manager {
            "poetry" => vec![
                ProjectScript::new("install", "poetry install"),
                ProjectScript::new("run", "poetry run python main.py"),
                ProjectScript::new("shell", "poetry shell"),
                ProjectScript::new("test", "poetry run pytest"),
            ],
            "pipenv" => vec![
                ProjectScript::new("install", "pipenv install"),
                ProjectScript::new("run", "pipenv run python main.py"),
                ProjectScript::new("shell", "pipenv shell"),
                ProjectScript::new("test", "pipenv run pytest"),
            ],
            "conda" => vec![
                ProjectScript::new("install", "conda env update -f environment.yml"),
                ProjectScript::new("run", "python main.py"),
                ProjectScript::new("test", "pytest"),
            ],
            _ => vec![
                ProjectScript::new("install", "pip install -r requirements.txt"),
                ProjectScript::new("run", "python main.py"),
                ProjectScript::new("test", "pytest"),
            ],
        }
    }

    /// Entries of `[tool.poetry.scripts]`
    fn poetry_scripts(root: &Path) -> Vec<ProjectScript> {
        let path = root.join("pyproject.toml");
        let Ok(contents) = fs::read_to_string(&path) else {
            return Vec::new();
        };
        let doc: toml::Table = match contents.parse() {
            Ok(doc) => doc,
            Err(e) => {
                debug!("Failed to parse {:?}: {e}", path);
                return Vec::new();
            }
        };

        doc.get("tool")
            .and_then(|tool| tool.get("poetry"))
            .and_then(|poetry| poetry.get("scripts"))
            .and_then(|scripts| scripts.as_table())
            .map(|scripts| {
                scripts
                    .iter()
                    .filter_map(|(name, target)| {
                        let target = target.as_str()?;
                        Some(ProjectScript::new(
                            format!("poetry-{name}"),
                            format!("poetry run {target}"),
                        ))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl ScriptExtractor for PythonScriptExtractor {
    fn project_type(&self) -> &'static str {
        "python"
    }

    fn extract(&self, root: &Path, package_manager: Option<&str>) -> Vec<ProjectScript> {
        let manager = package_manager.unwrap_or("pip");
        let mut scripts = Self::base_commands(manager);

        if root.join("manage.py").is_file() {
            scripts.extend([
                ProjectScript::new("django-run", "python manage.py runserver"),
                ProjectScript::new("django-migrate", "python manage.py migrate"),
                ProjectScript::new("django-shell", "python manage.py shell"),
            ]);
        }

        if root.join("app.py").is_file() {
            scripts.push(ProjectScript::new("flask-run", "flask run"));
        }

        if manager == "poetry" {
            scripts.extend(Self::poetry_scripts(root));
        }

        scripts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(scripts: &[ProjectScript]) -> Vec<&str> {
        scripts.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_django_project_with_pip() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("requirements.txt"), "django\n").unwrap();
        fs::write(dir.path().join("manage.py"), "").unwrap();

        let scripts = PythonScriptExtractor.extract(dir.path(), Some("pip"));
        assert_eq!(
            names(&scripts),
            vec!["install", "run", "test", "django-run", "django-migrate", "django-shell"]
        );
        assert_eq!(scripts[0].command, "pip install -r requirements.txt");
    }

    #[test]
    fn test_poetry_scripts() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("pyproject.toml"),
            "[tool.poetry]\nname = \"demo\"\n\n[tool.poetry.scripts]\nserve = \"demo.main:serve\"\n",
        )
        .unwrap();
        fs::write(dir.path().join("app.py"), "").unwrap();

        let scripts = PythonScriptExtractor.extract(dir.path(), Some("poetry"));
        assert!(scripts.contains(&ProjectScript::new("flask-run", "flask run")));
        assert_eq!(
            scripts.last(),
            Some(&ProjectScript::new("poetry-serve", "poetry run demo.main:serve"))
        );
    }

    #[test]
    fn test_pipenv_commands() {
        let dir = TempDir::new().unwrap();
        let scripts = PythonScriptExtractor.extract(dir.path(), Some("pipenv"));
        assert_eq!(names(&scripts), vec!["install", "run", "shell", "test"]);
        assert_eq!(scripts[3].command, "pipenv run pytest");
    }
}
