//! Color catalog: label-legend colors → category ids.
//!
//! Segmentation label images encode each class as a flat color. Every
//! manifest record carries the job's legend (`internal-color-map`), so the
//! catalog is built from the union of all legends before any image is
//! decoded.
//!
//! Ids are assigned after sorting the distinct colors, which makes them
//! independent of manifest order and stable across runs.

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::coco::{CategoryId, CategoryRecord};
use crate::color::Rgb;
use crate::error::ConvertError;

/// One entry of a label legend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    #[serde(rename = "hex-color")]
    pub hex_color: String,

    #[serde(rename = "class-name", default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

/// A label legend: legend index (as a string) → entry.
pub type ColorLegend = IndexMap<String, LegendEntry>;

/// A catalog color with its assigned category.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogEntry {
    pub id: CategoryId,
    pub color: Rgb,
    /// First class name the legends gave for this color.
    pub name: Option<String>,
}

/// Deterministic color → category mapping with the background removed.
#[derive(Clone, Debug)]
pub struct CategoryColorMap {
    background: Rgb,
    /// Entries in id order; `entries[i].id == i`.
    entries: Vec<CatalogEntry>,
    index: HashMap<Rgb, CategoryId>,
}

impl CategoryColorMap {
    /// Builds the catalog from every legend found in a manifest.
    ///
    /// # Errors
    /// - [`ConvertError::InvalidColor`] if a legend color is not `#rrggbb`.
    /// - [`ConvertError::MissingBackground`] if `background` appears in no
    ///   legend; every segmented image has a background, so its absence means
    ///   the background color is misconfigured.
    pub fn build<'a, I>(legends: I, background: Rgb) -> Result<Self, ConvertError>
    where
        I: IntoIterator<Item = &'a ColorLegend>,
    {
        let mut colors = BTreeSet::new();
        let mut names: HashMap<Rgb, String> = HashMap::new();

        for legend in legends {
            for entry in legend.values() {
                let color = Rgb::from_hex(&entry.hex_color)?;
                colors.insert(color);
                if let Some(name) = &entry.class_name {
                    names.entry(color).or_insert_with(|| name.clone());
                }
            }
        }

        if !colors.remove(&background) {
            return Err(ConvertError::MissingBackground { color: background });
        }

        let entries: Vec<CatalogEntry> = colors
            .into_iter()
            .enumerate()
            .map(|(i, color)| CatalogEntry {
                id: CategoryId::new(i as u64),
                color,
                name: names.remove(&color),
            })
            .collect();

        let index = entries.iter().map(|e| (e.color, e.id)).collect();

        Ok(Self {
            background,
            entries,
            index,
        })
    }

    /// The background color excluded from the catalog.
    pub fn background(&self) -> Rgb {
        self.background
    }

    /// Looks up the category of an exact color.
    #[inline]
    pub fn category_of(&self, color: Rgb) -> Option<CategoryId> {
        self.index.get(&color).copied()
    }

    /// Entries in category-id order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Category records for the output document, in id order.
    ///
    /// Colors without a legend class name are named by their hex value.
    pub fn category_records(&self) -> Vec<CategoryRecord> {
        self.entries
            .iter()
            .map(|entry| CategoryRecord {
                supercategory: None,
                id: entry.id.into(),
                name: entry
                    .name
                    .clone()
                    .unwrap_or_else(|| entry.color.to_string()),
                color: Some(entry.color),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legend(entries: &[(&str, Option<&str>)]) -> ColorLegend {
        entries
            .iter()
            .enumerate()
            .map(|(i, (hex, name))| {
                (
                    i.to_string(),
                    LegendEntry {
                        hex_color: hex.to_string(),
                        class_name: name.map(str::to_string),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn excludes_background_and_assigns_dense_ids() {
        let legends = vec![
            legend(&[("#ffffff", Some("BACKGROUND")), ("#2ca02c", Some("cat"))]),
            legend(&[("#ffffff", Some("BACKGROUND")), ("#1f77b4", Some("dog"))]),
        ];

        let catalog = CategoryColorMap::build(&legends, Rgb::WHITE).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.category_of(Rgb::WHITE), None);
        let ids: Vec<u64> = catalog.entries().iter().map(|e| e.id.as_u64()).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn ids_follow_sorted_color_order_not_legend_order() {
        let forward = vec![legend(&[("#ffffff", None), ("#ff0000", None), ("#00ff00", None)])];
        let backward = vec![legend(&[("#00ff00", None), ("#ff0000", None), ("#ffffff", None)])];

        let a = CategoryColorMap::build(&forward, Rgb::WHITE).unwrap();
        let b = CategoryColorMap::build(&backward, Rgb::WHITE).unwrap();

        assert_eq!(a.entries(), b.entries());
        assert_eq!(a.category_of(Rgb::new(0, 255, 0)), Some(CategoryId(0)));
        assert_eq!(a.category_of(Rgb::new(255, 0, 0)), Some(CategoryId(1)));
    }

    #[test]
    fn duplicate_colors_in_different_case_collapse() {
        let legends = vec![legend(&[("#FFFFFF", None), ("#AbCdEf", None), ("#abcdef", None)])];
        let catalog = CategoryColorMap::build(&legends, Rgb::WHITE).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn missing_background_is_an_error() {
        let legends = vec![legend(&[("#ff0000", None)])];
        let err = CategoryColorMap::build(&legends, Rgb::WHITE).unwrap_err();
        assert!(matches!(err, ConvertError::MissingBackground { color } if color == Rgb::WHITE));
    }

    #[test]
    fn empty_legend_set_is_missing_background() {
        let legends: Vec<ColorLegend> = Vec::new();
        assert!(CategoryColorMap::build(&legends, Rgb::WHITE).is_err());
    }

    #[test]
    fn invalid_hex_is_an_error() {
        let legends = vec![legend(&[("#ffffff", None), ("red", None)])];
        let err = CategoryColorMap::build(&legends, Rgb::WHITE).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidColor { .. }));
    }

    #[test]
    fn category_records_use_first_class_name_or_hex() {
        let legends = vec![
            legend(&[("#ffffff", None), ("#ff0000", Some("car")), ("#0000ff", None)]),
            legend(&[("#ffffff", None), ("#ff0000", Some("vehicle"))]),
        ];
        let catalog = CategoryColorMap::build(&legends, Rgb::WHITE).unwrap();
        let records = catalog.category_records();

        assert_eq!(records[0].name, "#0000ff");
        assert_eq!(records[1].name, "car");
        assert_eq!(records[1].color, Some(Rgb::new(255, 0, 0)));
    }

    #[test]
    fn custom_background_is_respected() {
        let legends = vec![legend(&[("#000000", None), ("#ffffff", None)])];
        let catalog = CategoryColorMap::build(&legends, Rgb::new(0, 0, 0)).unwrap();
        assert_eq!(catalog.category_of(Rgb::WHITE), Some(CategoryId(0)));
        assert_eq!(catalog.background(), Rgb::new(0, 0, 0));
    }
}
