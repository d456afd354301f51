//! Marker project import/export
//!
//! Projects store clip bounds in frames at the project frame rate, so they
//! survive round-trips through editing tools that think in frames. Seconds
//! are recovered as `frames / frame_rate` on import and rounded back to
//! frames on export.

use crate::error::{ProjectError, ProjectResult};
use crate::marker::{Comment, Marker};
use crate::types::FrameRate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A clip annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub text: String,
}

/// One marker, bounds in frames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipRecord {
    pub id: String,
    pub start: i64,
    pub end: i64,
    #[serde(default)]
    pub comments: Vec<CommentRecord>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub silent: bool,
}

/// Serialized marker list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub frame_rate: f64,
    #[serde(default)]
    pub ntsc: bool,
    #[serde(default)]
    pub clips: Vec<ClipRecord>,
}

impl ProjectFile {
    /// Build a project from markers in store order
    ///
    /// Clip ids are 1-based positions.
    pub fn from_markers<'a>(
        markers: impl IntoIterator<Item = &'a Marker>,
        frame_rate: FrameRate,
    ) -> Self {
        let fps = frame_rate.fps();
        let clips = markers
            .into_iter()
            .enumerate()
            .map(|(i, m)| ClipRecord {
                id: (i + 1).to_string(),
                start: (m.start() * fps).round() as i64,
                end: (m.end() * fps).round() as i64,
                comments: m
                    .comments
                    .iter()
                    .map(|c| CommentRecord {
                        text: c.text.clone(),
                    })
                    .collect(),
                silent: m.is_silent,
            })
            .collect();

        Self {
            frame_rate: fps,
            ntsc: frame_rate.is_ntsc(),
            clips,
        }
    }

    /// Convert clips back into markers
    pub fn to_markers(&self) -> ProjectResult<(FrameRate, Vec<Marker>)> {
        let frame_rate =
            FrameRate::new(self.frame_rate).ok_or(ProjectError::InvalidFrameRate(self.frame_rate))?;
        let fps = frame_rate.fps();

        let markers = self
            .clips
            .iter()
            .map(|clip| {
                if clip.end <= clip.start || clip.start < 0 {
                    return Err(ProjectError::InvalidClip {
                        id: clip.id.clone(),
                        start: clip.start,
                        end: clip.end,
                    });
                }
                let mut marker = Marker::new(clip.start as f64 / fps, clip.end as f64 / fps);
                marker.comments = clip
                    .comments
                    .iter()
                    .map(|c| Comment::new(c.text.clone()))
                    .collect();
                marker.is_silent = clip.silent;
                Ok(marker)
            })
            .collect::<ProjectResult<Vec<_>>>()?;

        Ok((frame_rate, markers))
    }

    pub fn from_json(json: &str) -> ProjectResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> ProjectResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a project file from disk
    pub fn load(path: &Path) -> ProjectResult<Self> {
        log::info!("ProjectFile::load: {:?}", path);
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Write a project file, creating parent directories
    pub fn save(&self, path: &Path) -> ProjectResult<()> {
        log::info!("ProjectFile::save: {} clips to {:?}", self.clips.len(), path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(fps: f64) -> FrameRate {
        FrameRate::new(fps).unwrap()
    }

    #[test]
    fn test_export_frames_and_ids() {
        let markers = vec![
            Marker::new(1.0, 2.5).with_label("first"),
            Marker::silent(4.0, 4.2, 1),
        ];
        let project = ProjectFile::from_markers(&markers, rate(25.0));
        assert_eq!(project.frame_rate, 25.0);
        assert!(!project.ntsc);
        assert_eq!(project.clips[0].id, "1");
        assert_eq!(project.clips[0].start, 25);
        assert_eq!(project.clips[0].end, 63);
        assert_eq!(project.clips[0].comments[0].text, "first");
        assert_eq!(project.clips[1].id, "2");
        assert_eq!(project.clips[1].end, 105);
        assert!(project.clips[1].silent);
    }

    #[test]
    fn test_import_converts_frames() {
        let json = r#"{
            "frame_rate": 30.0,
            "clips": [{ "id": "a", "start": 30, "end": 75, "comments": [{ "text": "hi" }] }]
        }"#;
        let project = ProjectFile::from_json(json).unwrap();
        let (fr, markers) = project.to_markers().unwrap();
        assert_eq!(fr.fps(), 30.0);
        assert!((markers[0].start() - 1.0).abs() < 1e-9);
        assert!((markers[0].end() - 2.5).abs() < 1e-9);
        assert!((markers[0].duration() - 1.5).abs() < 1e-9);
        assert_eq!(markers[0].label(), Some("hi"));
        assert!(!markers[0].is_silent);
    }

    #[test]
    fn test_import_rejects_inverted_clip() {
        let project = ProjectFile {
            frame_rate: 25.0,
            ntsc: false,
            clips: vec![ClipRecord {
                id: "7".to_string(),
                start: 50,
                end: 50,
                comments: Vec::new(),
                silent: false,
            }],
        };
        assert!(matches!(
            project.to_markers(),
            Err(ProjectError::InvalidClip { .. })
        ));
    }

    #[test]
    fn test_import_rejects_zero_frame_rate() {
        let project = ProjectFile {
            frame_rate: 0.0,
            ntsc: false,
            clips: Vec::new(),
        };
        assert!(matches!(
            project.to_markers(),
            Err(ProjectError::InvalidFrameRate(_))
        ));
    }

    #[test]
    fn test_disk_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects").join("cut.json");
        let markers = vec![Marker::new(0.5, 1.5).with_label("take 2")];
        let project = ProjectFile::from_markers(&markers, rate(29.97));
        assert!(project.ntsc);
        project.save(&path).unwrap();

        let loaded = ProjectFile::load(&path).unwrap();
        assert_eq!(loaded, project);
        let (_, back) = loaded.to_markers().unwrap();
        assert!((back[0].start() - 0.5).abs() < 1.0 / 29.97);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            ProjectFile::load(Path::new("/nonexistent/cut.json")),
            Err(ProjectError::Io(_))
        ));
    }
}
