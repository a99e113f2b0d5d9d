#![allow(dead_code)]

use gt2coco::catalog::{CategoryColorMap, ColorLegend, LegendEntry};
use gt2coco::coco::{
    AnnotationId, AnnotationRecord, Categories, CategoryId, CategoryRecord, CocoDocument,
    FrameDocument, FrameImageRecord, ImageId, ImageRecord, LabelValue, Scalar, SequenceDocuments,
    TrackedBoxRecord,
};
use gt2coco::Rgb;
use image::RgbImage;
use indexmap::IndexMap;
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Finite coordinates, including awkward fractions.
pub fn arb_coord() -> impl Strategy<Value = f64> {
    prop_oneof![
        (0u32..5000).prop_map(f64::from),
        (0u32..5000, 1u32..1000).prop_map(|(n, d)| n as f64 / d as f64),
        (0.0f64..1e6),
    ]
}

/// Numbers as a labeling tool writes them: integers or decimals.
pub fn arb_scalar() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        (-5000i64..5000).prop_map(Scalar::Int),
        arb_coord().prop_map(Scalar::Float),
    ]
}

pub fn arb_bbox() -> impl Strategy<Value = [Scalar; 4]> {
    [arb_scalar(), arb_scalar(), arb_scalar(), arb_scalar()]
}

pub fn arb_label_value() -> impl Strategy<Value = LabelValue> {
    prop_oneof![
        (0u64..1_000_000).prop_map(LabelValue::Number),
        "[a-z0-9-]{1,12}".prop_map(LabelValue::Text),
    ]
}

pub fn arb_annotation(id: u64, images: u64) -> impl Strategy<Value = AnnotationRecord> {
    (
        0..images,
        0u64..20,
        arb_bbox(),
        prop::collection::vec(prop::collection::vec(arb_coord(), 0..12), 0..3),
        arb_scalar(),
    )
        .prop_map(move |(image_id, category_id, bbox, segmentation, area)| AnnotationRecord {
            segmentation,
            iscrowd: 0,
            image_id: ImageId(image_id),
            category_id: CategoryId(category_id),
            id: AnnotationId(id),
            bbox,
            area,
        })
}

pub fn arb_document(max_images: u64, max_annotations: usize) -> impl Strategy<Value = CocoDocument> {
    (1..=max_images, 0..=max_annotations).prop_flat_map(|(images, annotations)| {
        let image_records = (0..images)
            .map(|id| {
                ("[a-z]{1,8}\\.jpg", 1u32..4096, 1u32..4096)
                    .prop_map(move |(name, w, h)| ImageRecord::new(id, name, w, h))
            })
            .collect::<Vec<_>>();
        let annotation_records = (0..annotations as u64)
            .map(|id| arb_annotation(id, images))
            .collect::<Vec<_>>();
        let categories = prop_oneof![
            prop::collection::vec(("[0-9]{1,2}", "[a-z ]{1,10}"), 0..5)
                .prop_map(|pairs| Categories::ClassMap(pairs.into_iter().collect::<IndexMap<_, _>>())),
            prop::collection::vec((0u64..20, "[a-z]{1,10}", any::<[u8; 3]>()), 0..5).prop_map(
                |records| Categories::Records(
                    records
                        .into_iter()
                        .map(|(id, name, rgb)| CategoryRecord {
                            supercategory: None,
                            id: LabelValue::Number(id),
                            name,
                            color: Some(Rgb(rgb)),
                        })
                        .collect()
                )
            ),
        ];
        (image_records, categories, annotation_records)
            .prop_map(|(images, categories, annotations)| CocoDocument::new(images, categories, annotations))
    })
}

pub fn arb_tracked_box(frame_no: u64) -> impl Strategy<Value = TrackedBoxRecord> {
    (arb_label_value(), arb_label_value(), arb_bbox(), arb_scalar()).prop_map(
        move |(category_id, id, bbox, area)| TrackedBoxRecord {
            iscrowd: 0,
            image_id: ImageId(frame_no),
            category_id,
            id,
            bbox,
            area,
        },
    )
}

pub fn arb_frame(frame_no: u64) -> impl Strategy<Value = FrameDocument> {
    (
        prop::collection::vec(arb_tracked_box(frame_no), 0..4),
        prop::collection::vec((arb_label_value(), "[a-z]{1,6}:[0-9]{1,2}"), 1..4),
    )
        .prop_map(move |(boxes, categories)| {
            let images = boxes
                .iter()
                .map(|b| FrameImageRecord {
                    file_name: format!("{frame_no:06}.jpg"),
                    height: b.bbox[3],
                    width: b.bbox[2],
                    id: ImageId(frame_no),
                })
                .collect();
            let categories = categories
                .into_iter()
                .map(|(id, name)| CategoryRecord {
                    supercategory: name.split(':').next().map(str::to_string),
                    id,
                    name,
                    color: None,
                })
                .collect();
            FrameDocument::new(images, Categories::Records(categories), boxes)
        })
}

pub fn arb_sequences(max_sequences: usize) -> impl Strategy<Value = SequenceDocuments> {
    prop::collection::vec(prop::collection::vec(0u64..500, 1..4), 1..=max_sequences).prop_flat_map(
        |sequences| {
            sequences
                .into_iter()
                .map(|frames| frames.into_iter().map(arb_frame).collect::<Vec<_>>())
                .collect::<Vec<_>>()
        },
    )
    .prop_map(|sequences| {
        sequences
            .into_iter()
            .enumerate()
            .map(|(i, frames)| (format!("sequence-{}", i + 1), frames))
            .collect()
    })
}

/// Legend colors used by the raster strategies; white is the background.
pub const PALETTE: [[u8; 3]; 4] = [[255, 0, 0], [0, 128, 0], [0, 0, 255], [255, 127, 14]];

pub fn palette_catalog() -> CategoryColorMap {
    let mut legend = ColorLegend::new();
    legend.insert(
        "0".into(),
        LegendEntry {
            hex_color: "#ffffff".into(),
            class_name: Some("BACKGROUND".into()),
        },
    );
    for (i, rgb) in PALETTE.iter().enumerate() {
        legend.insert(
            (i + 1).to_string(),
            LegendEntry {
                hex_color: Rgb(*rgb).to_string(),
                class_name: None,
            },
        );
    }
    CategoryColorMap::build([&legend], Rgb::WHITE).expect("palette catalog")
}

/// Small label rasters: white with pixels drawn from the palette.
pub fn arb_label_raster(max_side: u32) -> impl Strategy<Value = RgbImage> {
    (1..=max_side, 1..=max_side).prop_flat_map(|(w, h)| {
        prop::collection::vec(0usize..=PALETTE.len() * 2, (w * h) as usize).prop_map(move |cells| {
            let mut img = RgbImage::from_pixel(w, h, image::Rgb([255, 255, 255]));
            for (i, cell) in cells.into_iter().enumerate() {
                if let Some(rgb) = PALETTE.get(cell) {
                    img.put_pixel(i as u32 % w, i as u32 / w, image::Rgb(*rgb));
                }
            }
            img
        })
    })
}
