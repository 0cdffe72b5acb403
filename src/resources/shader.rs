//! Shader source loading

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShaderError {
    #[error("failed to read shader source {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Shader pair a drawable is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    /// Interpolated per-vertex colour (position + colour layout).
    BakedColor,
    /// Texture sampled at unit 0 (position + uv layout).
    Textured,
}

impl ShaderKind {
    pub fn file_stem(&self) -> &'static str {
        match self {
            ShaderKind::BakedColor => "baked_color",
            ShaderKind::Textured => "textured",
        }
    }

    pub fn is_textured(&self) -> bool {
        matches!(self, ShaderKind::Textured)
    }

    pub fn vertex_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.vert.wgsl", self.file_stem()))
    }

    pub fn fragment_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.frag.wgsl", self.file_stem()))
    }
}

/// Vertex and fragment stage sources of one shader kind.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub kind: ShaderKind,
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    pub fn load(dir: &Path, kind: ShaderKind) -> Result<Self, ShaderError> {
        Ok(Self {
            kind,
            vertex: read_source(&kind.vertex_path(dir))?,
            fragment: read_source(&kind.fragment_path(dir))?,
        })
    }
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    log::trace!("Reading shader source {}", path.display());
    std::fs::read_to_string(path).map_err(|source| ShaderError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_follow_kind() {
        let dir = Path::new("shaders");
        assert_eq!(
            ShaderKind::BakedColor.vertex_path(dir),
            PathBuf::from("shaders/baked_color.vert.wgsl")
        );
        assert_eq!(
            ShaderKind::Textured.fragment_path(dir),
            PathBuf::from("shaders/textured.frag.wgsl")
        );
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = ShaderSource::load(Path::new("no/such/dir"), ShaderKind::BakedColor).unwrap_err();
        assert!(err.to_string().contains("baked_color.vert.wgsl"));
    }

    #[test]
    fn test_bundled_shaders_load() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders");
        for kind in [ShaderKind::BakedColor, ShaderKind::Textured] {
            let source = ShaderSource::load(&dir, kind).unwrap();
            assert!(source.vertex.contains("vs_main"));
            assert!(source.fragment.contains("fs_main"));
            assert!(source.vertex.contains("projection"));
        }
    }
}
