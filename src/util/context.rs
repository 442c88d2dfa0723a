//! Per-run context.
//!
//! Built once at startup and passed by reference to every operation. The
//! toolchain and the developer environment are looked up lazily, on first
//! use, and then reused for the rest of the run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tokio::sync::OnceCell;

use crate::builder::devenv::{capture_dev_environment, DevEnvironment, DevEnvironmentCache};
use crate::builder::toolchain::{locate_installation, Tool, Toolchain};
use crate::core::project::find_root;
use crate::core::{CxxError, ProjectPaths};
use crate::util::config::{load_config, project_config_path, Config};
use crate::util::shell::Shell;

/// File name of the developer environment cache.
pub const DEVENV_CACHE_FILE: &str = "devenv.json";

/// Global context containing configuration, paths and lazily located tools.
#[derive(Debug)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Per-user config directory (holds config.toml)
    config_dir: Option<PathBuf>,

    /// Per-user local data directory (holds the environment cache)
    data_dir: Option<PathBuf>,

    /// Merged global and project configuration
    config: Config,

    shell: Arc<Shell>,

    toolchain: OnceCell<Toolchain>,
    dev_environment: OnceCell<DevEnvironment>,
}

impl GlobalContext {
    /// Create a context rooted at the current directory.
    pub fn new(shell: Arc<Shell>) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd, shell))
    }

    /// Create a context with a specific working directory.
    pub fn with_cwd(cwd: PathBuf, shell: Arc<Shell>) -> Self {
        let dirs = ProjectDirs::from("", "", "cxx");
        let config_dir = dirs.as_ref().map(|d| d.config_dir().to_path_buf());
        let data_dir = dirs.as_ref().map(|d| d.data_local_dir().to_path_buf());

        let global_config = config_dir.as_ref().map(|d| d.join("config.toml"));
        let project_config = find_root(&cwd).map(|root| project_config_path(&root));
        let config = load_config(global_config.as_deref(), project_config.as_deref());

        GlobalContext {
            cwd,
            config_dir,
            data_dir,
            config,
            shell,
            toolchain: OnceCell::new(),
            dev_environment: OnceCell::new(),
        }
    }

    /// Replace the loaded configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Use `data_dir` for the environment cache.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(data_dir.into());
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_dir(&self) -> Option<&Path> {
        self.config_dir.as_deref()
    }

    pub fn shell(&self) -> &Arc<Shell> {
        &self.shell
    }

    /// Resolve the project containing the working directory.
    pub fn project(&self) -> Result<ProjectPaths, CxxError> {
        ProjectPaths::discover(&self.cwd)
    }

    /// The located toolchain, computed on first use.
    pub async fn toolchain(&self) -> &Toolchain {
        self.toolchain
            .get_or_init(|| async {
                let installation = locate_installation(&self.config.toolchain).await;
                match &installation {
                    Some(i) => tracing::debug!("using installation {}", i),
                    None => tracing::debug!("no compiler suite installation found"),
                }
                let vcpkg_root = self
                    .config
                    .toolchain
                    .vcpkg_root
                    .clone()
                    .or_else(|| std::env::var_os("VCPKG_ROOT").map(PathBuf::from));
                Toolchain::new(installation, vcpkg_root)
            })
            .await
    }

    /// Path of `tool`, failing with `ToolNotFound` when it is absent.
    pub async fn require_tool(&self, tool: Tool) -> Result<PathBuf, CxxError> {
        self.toolchain().await.require(tool)
    }

    /// The environment cache, if a per-user data directory exists.
    pub fn dev_environment_cache(&self) -> Option<DevEnvironmentCache> {
        self.data_dir
            .as_ref()
            .map(|dir| DevEnvironmentCache::new(dir.join(DEVENV_CACHE_FILE)))
    }

    /// The developer environment, from the cache or a fresh capture.
    ///
    /// With `refresh` the cache is ignored and overwritten. Only the first
    /// call in a run does any work.
    pub async fn dev_environment(&self, refresh: bool) -> Result<&DevEnvironment> {
        self.dev_environment
            .get_or_try_init(|| async {
                let cache = self.dev_environment_cache();

                if !refresh {
                    if let Some(env) = cache.as_ref().and_then(DevEnvironmentCache::load) {
                        tracing::debug!("loaded developer environment from cache");
                        return Ok::<_, anyhow::Error>(env);
                    }
                }

                let env = capture_dev_environment(self.toolchain().await).await?;
                if let Some(cache) = &cache {
                    cache.store_or_warn(&env);
                }
                Ok::<_, anyhow::Error>(env)
            })
            .await
    }
}
