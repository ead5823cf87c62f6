//! Script exporters.
//!
//! The generator only produces statement strings. A [`ScriptExporter`]
//! receives them one at a time and writes or executes them.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info};

use crate::error::{MigrateError, Result};

/// Destination for generated statements.
#[async_trait]
pub trait ScriptExporter: Send {
    /// Prepare the destination. Called once before the first statement.
    async fn open(&mut self) -> Result<()>;

    /// Export one statement (without terminator).
    async fn export_script(&mut self, script: &str) -> Result<()>;

    /// Flush and release the destination.
    async fn close(&mut self) -> Result<()>;
}

/// Keeps statements in memory.
#[derive(Debug, Default)]
pub struct CollectingExporter {
    scripts: Vec<String>,
}

impl CollectingExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    pub fn into_scripts(self) -> Vec<String> {
        self.scripts
    }
}

#[async_trait]
impl ScriptExporter for CollectingExporter {
    async fn open(&mut self) -> Result<()> {
        Ok(())
    }

    async fn export_script(&mut self, script: &str) -> Result<()> {
        self.scripts.push(script.to_string());
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Writes statements to a file, each terminated by `;` and a newline.
#[derive(Debug)]
pub struct FileScriptExporter {
    path: PathBuf,
    writer: Option<BufWriter<fs::File>>,
}

impl FileScriptExporter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            writer: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ScriptExporter for FileScriptExporter {
    async fn open(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let file = fs::File::create(&self.path).await?;
        self.writer = Some(BufWriter::new(file));
        debug!("Opened script file {}", self.path.display());
        Ok(())
    }

    async fn export_script(&mut self, script: &str) -> Result<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            MigrateError::export(format!(
                "Script file {} is not open",
                self.path.display()
            ))
        })?;
        writer.write_all(script.as_bytes()).await?;
        writer.write_all(b";\n").await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().await?;
            debug!("Closed script file {}", self.path.display());
        }
        Ok(())
    }
}

/// Wraps an exporter and counts exported statements.
#[derive(Debug)]
pub struct CountingExporter<E> {
    inner: E,
    count: usize,
}

impl<E: ScriptExporter> CountingExporter<E> {
    pub fn new(inner: E) -> Self {
        Self { inner, count: 0 }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn into_inner(self) -> E {
        self.inner
    }
}

#[async_trait]
impl<E: ScriptExporter> ScriptExporter for CountingExporter<E> {
    async fn open(&mut self) -> Result<()> {
        self.inner.open().await
    }

    async fn export_script(&mut self, script: &str) -> Result<()> {
        self.inner.export_script(script).await?;
        self.count += 1;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.inner.close().await
    }
}

/// Open the exporter, export every statement in order, then close it.
///
/// The exporter is closed even when a statement fails; the first error is
/// returned.
pub async fn export_scripts<E>(exporter: &mut E, scripts: &[String]) -> Result<usize>
where
    E: ScriptExporter + ?Sized,
{
    exporter.open().await?;
    let mut exported = 0;
    let mut failure = None;
    for script in scripts {
        if let Err(e) = exporter.export_script(script).await {
            failure = Some(e);
            break;
        }
        exported += 1;
    }
    let closed = exporter.close().await;
    if let Some(e) = failure {
        return Err(e);
    }
    closed?;
    info!("Exported {} scripts", exported);
    Ok(exported)
}
