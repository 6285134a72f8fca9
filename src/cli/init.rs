//! Init command implementation
//!
//! Scaffolds a GPU Portal deployment: `gpu-portal.toml`, `.env.example` and
//! a `.gitignore`.

use super::output::Output;
use std::fs;
use std::path::Path;

/// Name of the generated configuration file
pub const CONFIG_FILE: &str = "gpu-portal.toml";

/// Result of the init operation
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// Project already exists (gpu-portal.toml found)
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: std::path::PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// Host address for the server
    pub host: String,
    /// Port for the server
    pub port: u16,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing GPU Portal");

    let base_path = &config.path;

    let config_path = base_path.join(CONFIG_FILE);
    if config_path.exists() && !config.force {
        output.warning(&format!("{} already exists!", CONFIG_FILE));
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    if let Err(e) = fs::create_dir_all(base_path) {
        output.error(&format!("Failed to create {}: {}", base_path.display(), e));
        return InitResult::Error(e.to_string());
    }

    output.subheader("Creating configuration files");

    let toml_content = generate_config_toml(&config);
    if let Err(e) = write_file(&config_path, &toml_content, config.force) {
        output.error(&format!("Failed to create {}: {}", CONFIG_FILE, e));
        return InitResult::Error(e.to_string());
    }
    output.created("config", CONFIG_FILE);

    let env_example_path = base_path.join(".env.example");
    if let Err(e) = write_file(&env_example_path, &generate_env_example(), config.force) {
        output.error(&format!("Failed to create .env.example: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.created("env", ".env.example");

    let gitignore_path = base_path.join(".gitignore");
    if gitignore_path.exists() {
        output.skipped(".gitignore", "already exists");
    } else if let Err(e) = write_file(&gitignore_path, &generate_gitignore(), false) {
        output.warning(&format!("Failed to create .gitignore: {}", e));
    } else {
        output.created("file", ".gitignore");
    }

    output.complete("GPU Portal initialized successfully!");

    output.header("Next Steps");
    output.newline();
    output.info("1. Set up environment variables:");
    output.command("cp .env.example .env");
    output.command("# Edit .env and set JWT_SECRET (min 32 chars)");
    output.newline();
    output.info("2. Build the UI (optional):");
    output.command("cd ui && trunk build --release");
    output.newline();
    output.info("3. Start the server:");
    output.command("gpu-portal");
    output.newline();

    output.hint(&format!(
        "Portal will be available at http://{}:{}",
        config.host, config.port
    ));
    output.hint("API docs available at /swagger-ui/ (requires 'swagger-ui' feature)");

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(()); // Skip existing files unless force is true
    }
    fs::write(path, content)
}

fn generate_config_toml(config: &InitConfig) -> String {
    format!(
        r#"# GPU Portal configuration
# Changes are picked up while the server runs.

[server]
host = "{host}"
port = {port}
log_level = "info"
# "pretty" or "json"
log_format = "pretty"
# Allowed CORS origins; empty allows any
cors_origins = []

[auth]
# Environment variable holding the token signing secret (min 32 chars)
jwt_secret_env = "JWT_SECRET"
# Access token lifetime in seconds
jwt_access_expiry = 900

# Simulated backend latency in milliseconds
[mock]
auth = 1000
notifications = 1000
page_load = 1000
request_form = 800
submit_request = 1500
profile_save = 1000

[ui]
# Served from disk when the binary is built without the `ui` feature
dist_dir = "ui/dist"
"#,
        host = config.host,
        port = config.port,
    )
}

fn generate_env_example() -> String {
    r#"# GPU Portal environment
# Copy to .env and fill in.

# Token signing secret, at least 32 characters
JWT_SECRET=change-me-to-a-long-random-secret-value

# Log filter; overrides server.log_level
# RUST_LOG=info,gpu_portal=debug
"#
    .to_string()
}

fn generate_gitignore() -> String {
    r#"# Build output
/target/
/ui/dist/

# Environment
.env

# Editors and OS
.idea/
.vscode/
.DS_Store
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::toml_config::PortalConfig;
    use tempfile::TempDir;

    fn create_test_config(temp_dir: &TempDir) -> InitConfig {
        InitConfig {
            path: temp_dir.path().to_path_buf(),
            force: false,
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }

    #[test]
    fn test_init_result_variants() {
        let results = [
            InitResult::Success,
            InitResult::AlreadyExists,
            InitResult::Error("boom".to_string()),
        ];
        assert!(matches!(results[2], InitResult::Error(ref msg) if msg == "boom"));
    }

    #[test]
    fn test_generated_toml_parses() {
        let config = InitConfig {
            path: ".".into(),
            force: false,
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        let content = generate_config_toml(&config);

        let parsed: PortalConfig = toml::from_str(&content).expect("generated toml should parse");
        assert_eq!(parsed.server.host, "0.0.0.0");
        assert_eq!(parsed.server.port, 8080);
        assert_eq!(parsed.mock.submit_request, 1500);
        assert_eq!(parsed.mock.request_form, 800);
        assert_eq!(parsed.auth.jwt_secret_env, "JWT_SECRET");
    }

    #[test]
    fn test_generate_env_example() {
        let content = generate_env_example();
        let secret = content
            .lines()
            .find_map(|line| line.strip_prefix("JWT_SECRET="))
            .expect("JWT_SECRET line");
        assert!(secret.len() >= 32);
    }

    #[test]
    fn test_generate_gitignore() {
        let content = generate_gitignore();

        assert!(content.contains(".env"));
        assert!(content.contains("/target/"));
        assert!(content.contains("/ui/dist/"));
    }

    #[test]
    fn test_write_file_creates_new() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("test.txt");

        let result = write_file(&file_path, "test content", false);
        assert!(result.is_ok());

        let content = fs::read_to_string(&file_path).expect("Failed to read file");
        assert_eq!(content, "test content");
    }

    #[test]
    fn test_write_file_skips_existing_without_force() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("test.txt");

        fs::write(&file_path, "original").expect("Failed to write");

        let result = write_file(&file_path, "new content", false);
        assert!(result.is_ok());

        let content = fs::read_to_string(&file_path).expect("Failed to read file");
        assert_eq!(content, "original");
    }

    #[test]
    fn test_write_file_overwrites_with_force() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("test.txt");

        fs::write(&file_path, "original").expect("Failed to write");

        let result = write_file(&file_path, "new content", true);
        assert!(result.is_ok());

        let content = fs::read_to_string(&file_path).expect("Failed to read file");
        assert_eq!(content, "new content");
    }

    #[test]
    fn test_run_creates_all_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = create_test_config(&temp_dir);
        let output = Output::no_color();

        let result = run(config, &output);

        assert!(matches!(result, InitResult::Success));
        assert!(temp_dir.path().join(CONFIG_FILE).exists());
        assert!(temp_dir.path().join(".env.example").exists());
        assert!(temp_dir.path().join(".gitignore").exists());
    }

    #[test]
    fn test_run_creates_missing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let nested = temp_dir.path().join("deploy/portal");
        let config = InitConfig {
            path: nested.clone(),
            force: false,
            host: "127.0.0.1".to_string(),
            port: 3000,
        };

        let result = run(config, &Output::no_color());

        assert!(matches!(result, InitResult::Success));
        assert!(nested.join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_run_already_exists_without_force() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "existing").expect("Failed to write");

        let config = create_test_config(&temp_dir);
        let result = run(config, &Output::no_color());

        assert!(matches!(result, InitResult::AlreadyExists));
        let content =
            fs::read_to_string(temp_dir.path().join(CONFIG_FILE)).expect("Failed to read");
        assert_eq!(content, "existing");
    }

    #[test]
    fn test_run_force_overwrites() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "existing").expect("Failed to write");

        let config = InitConfig {
            force: true,
            ..create_test_config(&temp_dir)
        };
        let result = run(config, &Output::no_color());

        assert!(matches!(result, InitResult::Success));
        let content =
            fs::read_to_string(temp_dir.path().join(CONFIG_FILE)).expect("Failed to read");
        assert!(content.contains("[server]"));
        assert!(!content.contains("existing"));
    }

    #[test]
    fn test_run_keeps_existing_gitignore() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join(".gitignore"), "custom\n").expect("Failed to write");

        let result = run(create_test_config(&temp_dir), &Output::no_color());

        assert!(matches!(result, InitResult::Success));
        let content =
            fs::read_to_string(temp_dir.path().join(".gitignore")).expect("Failed to read");
        assert_eq!(content, "custom\n");
    }
}
