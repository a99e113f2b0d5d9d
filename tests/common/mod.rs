#![allow(dead_code)]

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use serde_json::{json, Value};

/// A scratch storage root plus a jobs directory.
pub struct Workspace {
    pub dir: tempfile::TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn jobs_dir(&self) -> PathBuf {
        self.root().join("jobs")
    }

    pub fn output(&self) -> PathBuf {
        self.root().join("output.json")
    }

    /// Stores `bytes` where `s3://bucket/key` resolves under the root.
    pub fn put_object(&self, uri: &str, bytes: impl AsRef<[u8]>) {
        let rest = uri.strip_prefix("s3://").expect("s3 uri");
        write_file(&self.root().join(rest), bytes.as_ref());
    }

    pub fn put_job(&self, job_name: &str, description: &Value) {
        write_file(
            &self.jobs_dir().join(format!("{job_name}.json")),
            description.to_string().as_bytes(),
        );
    }

    pub fn put_manifest(&self, uri: &str, lines: &[Value]) {
        let content: Vec<String> = lines.iter().map(Value::to_string).collect();
        self.put_object(uri, content.join("\n") + "\n");
    }
}

pub fn write_file(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bytes).expect("write file");
}

pub fn job_description(status: &str, keywords: &[&str], manifest_uri: &str) -> Value {
    json!({
        "LabelingJobStatus": status,
        "HumanTaskConfig": {"TaskKeywords": keywords},
        "LabelingJobOutput": {"OutputDatasetS3Uri": manifest_uri}
    })
}

/// One bounding-box manifest line; boxes are `(class_id, left, top, width, height)`.
pub fn bbox_line(
    job: &str,
    source_ref: &str,
    size: (u32, u32),
    boxes: &[(u64, f64, f64, f64, f64)],
    class_map: Value,
) -> Value {
    let annotations: Vec<Value> = boxes
        .iter()
        .map(|&(class_id, left, top, width, height)| {
            json!({"class_id": class_id, "left": left, "top": top, "width": width, "height": height})
        })
        .collect();
    let mut line = serde_json::Map::new();
    line.insert("source-ref".into(), json!(source_ref));
    line.insert(
        job.into(),
        json!({"image_size": [{"width": size.0, "height": size.1, "depth": 3}], "annotations": annotations}),
    );
    line.insert(
        format!("{job}-metadata"),
        json!({"class-map": class_map, "type": "groundtruth/object-detection", "human-annotated": "yes"}),
    );
    Value::Object(line)
}

/// The legend used by the segmentation fixtures.
pub fn seg_legend() -> Value {
    json!({
        "0": {"class-name": "BACKGROUND", "hex-color": "#ffffff", "confidence": 0.0},
        "1": {"class-name": "cat", "hex-color": "#ff7f0e", "confidence": 0.0},
        "2": {"class-name": "dog", "hex-color": "#1f77b4", "confidence": 0.0}
    })
}

pub fn seg_line(job: &str, source_ref: &str, label_ref: &str, legend: Value) -> Value {
    let mut line = serde_json::Map::new();
    line.insert("source-ref".into(), json!(source_ref));
    line.insert(format!("{job}-ref"), json!(label_ref));
    line.insert(
        format!("{job}-ref-metadata"),
        json!({"internal-color-map": legend, "type": "groundtruth/semantic-segmentation"}),
    );
    Value::Object(line)
}

pub fn track_line(job: &str, source_ref: &str, labels_ref: &str) -> Value {
    let mut line = serde_json::Map::new();
    line.insert("source-ref".into(), json!(source_ref));
    line.insert(format!("{job}-ref"), json!(labels_ref));
    Value::Object(line)
}

/// A sequence-label document; frames are `(frame_no, boxes)` with boxes
/// `(class_id, object_id, object_name, left, top, width, height)`.
pub fn sequence_labels(frames: &[(u64, Vec<(u64, &str, &str, f64, f64, f64, f64)>)]) -> Value {
    let frames: Vec<Value> = frames
        .iter()
        .map(|(frame_no, boxes)| {
            let annotations: Vec<Value> = boxes
                .iter()
                .map(|&(class_id, object_id, name, left, top, width, height)| {
                    json!({
                        "class-id": class_id, "object-id": object_id, "object-name": name,
                        "left": left, "top": top, "width": width, "height": height,
                        "label-category-attributes": {}
                    })
                })
                .collect();
            json!({"frame-no": frame_no, "frame": format!("{frame_no:06}.jpg"), "annotations": annotations})
        })
        .collect();
    json!({"tracking-annotations": frames})
}

/// A white RGBA label image with solid rectangles `(x, y, w, h, rgb)`.
pub fn label_png(width: u32, height: u32, regions: &[(u32, u32, u32, u32, [u8; 3])]) -> Vec<u8> {
    let mut img = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    for &(x0, y0, w, h, [r, g, b]) in regions {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                img.put_pixel(x, y, Rgba([r, g, b, 255]));
            }
        }
    }
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encode png");
    bytes
}

/// An RGB raster with solid rectangles, for library-level tests.
pub fn label_raster(width: u32, height: u32, regions: &[(u32, u32, u32, u32, [u8; 3])]) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    for &(x0, y0, w, h, rgb) in regions {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                img.put_pixel(x, y, Rgb(rgb));
            }
        }
    }
    img
}

pub fn read_json(path: &Path) -> Value {
    let text = fs::read_to_string(path).expect("read output");
    serde_json::from_str(&text).expect("parse output")
}
