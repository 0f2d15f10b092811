//! Test doubles shared by the application-layer unit tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use crate::application::{
    ApplicationError,
    ports::{Filesystem, RendererKind, TemplateRenderer},
    registry::{UNIVERSAL_RENDERER, selection_key},
};
use crate::domain::{GeneratedFile, Platform, RenderContext, StateManagement};
use crate::error::{FledgeError, FledgeResult};

/// Renders two small files that embed the app name; counts calls.
pub struct StubRenderer {
    name: String,
    kind: RendererKind,
    calls: AtomicUsize,
}

impl StubRenderer {
    pub fn bundle(platform: Platform, state: StateManagement) -> Self {
        Self {
            name: selection_key(platform, state),
            kind: RendererKind::Bundle {
                platform,
                state_management: state,
            },
            calls: AtomicUsize::new(0),
        }
    }

    pub fn universal() -> Self {
        Self {
            name: UNIVERSAL_RENDERER.to_string(),
            kind: RendererKind::Universal,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TemplateRenderer for StubRenderer {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "stub"
    }

    fn kind(&self) -> RendererKind {
        self.kind
    }

    fn render(&self, context: &RenderContext) -> FledgeResult<Vec<GeneratedFile>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![
            GeneratedFile::new("README.md", context.render("# {{APP_NAME}}\n"))?,
            GeneratedFile::new(
                "lib/main.dart",
                context.render("// {{APP_NAME_PASCAL}} with {{STATE_MANAGEMENT}}\n"),
            )?,
        ])
    }
}

/// Always fails; counts calls.
pub struct FailingRenderer {
    name: String,
    calls: AtomicUsize,
}

impl FailingRenderer {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TemplateRenderer for FailingRenderer {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "always fails"
    }

    fn kind(&self) -> RendererKind {
        RendererKind::Universal
    }

    fn render(&self, _context: &RenderContext) -> FledgeResult<Vec<GeneratedFile>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(FledgeError::Internal {
            message: "template exploded".into(),
        })
    }
}

/// Panics on render.
pub struct PanickingRenderer(pub &'static str);

impl TemplateRenderer for PanickingRenderer {
    fn name(&self) -> &str {
        self.0
    }

    fn description(&self) -> &str {
        "panics"
    }

    fn kind(&self) -> RendererKind {
        RendererKind::Universal
    }

    fn render(&self, _context: &RenderContext) -> FledgeResult<Vec<GeneratedFile>> {
        panic!("index out of bounds in template");
    }
}

/// `std::fs` backed filesystem for tempdir tests.
pub struct StdFilesystem;

fn io_error(path: &Path, e: std::io::Error) -> FledgeError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
    .into()
}

impl Filesystem for StdFilesystem {
    fn create_dir_all(&self, path: &Path) -> FledgeResult<()> {
        std::fs::create_dir_all(path).map_err(|e| io_error(path, e))
    }

    fn write_file(&self, path: &Path, content: &str) -> FledgeResult<()> {
        std::fs::write(path, content).map_err(|e| io_error(path, e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn ensure_writable(&self, path: &Path) -> FledgeResult<()> {
        let meta = std::fs::metadata(path).map_err(|e| io_error(path, e))?;
        if meta.is_dir() && !meta.permissions().readonly() {
            Ok(())
        } else {
            Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "not a writable directory".into(),
            }
            .into())
        }
    }
}

/// Discards writes but records how many were in flight at once.
pub struct RecordingFilesystem {
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingFilesystem {
    pub fn with_delay_ms(ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(ms),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Filesystem for RecordingFilesystem {
    fn create_dir_all(&self, _path: &Path) -> FledgeResult<()> {
        Ok(())
    }

    fn write_file(&self, _path: &Path, _content: &str) -> FledgeResult<()> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        thread::sleep(self.delay);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }

    fn exists(&self, _path: &Path) -> bool {
        false
    }

    fn ensure_writable(&self, _path: &Path) -> FledgeResult<()> {
        Ok(())
    }
}

/// Panics when asked to write a file named `trigger`, or on any directory
/// creation when `trigger` is empty. Records the files it did write.
pub struct PanickingFilesystem {
    trigger: &'static str,
    written: Mutex<Vec<PathBuf>>,
}

impl PanickingFilesystem {
    pub fn on_write(file_name: &'static str) -> Self {
        Self {
            trigger: file_name,
            written: Mutex::new(Vec::new()),
        }
    }

    pub fn on_create_dir() -> Self {
        Self::on_write("")
    }

    pub fn written(&self) -> Vec<PathBuf> {
        let mut paths = self.written.lock().unwrap().clone();
        paths.sort();
        paths
    }
}

impl Filesystem for PanickingFilesystem {
    fn create_dir_all(&self, path: &Path) -> FledgeResult<()> {
        if self.trigger.is_empty() {
            panic!("mount vanished under {}", path.display());
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, _content: &str) -> FledgeResult<()> {
        if path.file_name().is_some_and(|name| name == self.trigger) {
            panic!("driver fault writing {}", path.display());
        }
        self.written.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, _path: &Path) -> bool {
        false
    }

    fn ensure_writable(&self, _path: &Path) -> FledgeResult<()> {
        Ok(())
    }
}
