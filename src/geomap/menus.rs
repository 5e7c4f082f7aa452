use std::collections::{BTreeMap, BTreeSet};

use super::model::RawGeomap;

/// Which geomaps each BCG menu and filter menu is used with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuIndex {
    pub bcg_menus: BTreeMap<String, BTreeSet<String>>,
    pub filter_menus: BTreeMap<String, BTreeSet<String>>,
}

impl MenuIndex {
    pub fn from_geomaps(geomaps: &[RawGeomap]) -> Self {
        let mut index = MenuIndex::default();
        for geomap in geomaps {
            let header = &geomap.header;
            insert(&mut index.bcg_menus, &header.bcg_menu_name, &header.geomap_id);
            insert(&mut index.filter_menus, &header.filter_menu_name, &header.geomap_id);
        }
        index
    }

    pub fn geomaps_for_bcg_menu(&self, menu_name: &str) -> Option<&BTreeSet<String>> {
        self.bcg_menus.get(menu_name)
    }

    pub fn geomaps_for_filter_menu(&self, menu_name: &str) -> Option<&BTreeSet<String>> {
        self.filter_menus.get(menu_name)
    }
}

fn insert(menus: &mut BTreeMap<String, BTreeSet<String>>, menu_name: &str, geomap_id: &str) {
    if menu_name.trim().is_empty() {
        return;
    }
    menus
        .entry(menu_name.to_string())
        .or_default()
        .insert(geomap_id.to_string());
}

#[cfg(test)]
mod tests {
    use crate::geomap::model::{GeomapHeader, RawGeomap};

    use super::MenuIndex;

    fn geomap(id: &str, bcg_menu: &str, filter_menu: &str) -> RawGeomap {
        RawGeomap {
            header: GeomapHeader {
                geomap_id: id.to_string(),
                bcg_menu_name: bcg_menu.to_string(),
                filter_menu_name: filter_menu.to_string(),
                label_line1: "LL1".to_string(),
                label_line2: "LL2".to_string(),
            },
            object_types: Vec::new(),
        }
    }

    #[test]
    fn test_menu_index() {
        let index = MenuIndex::from_geomaps(&[
            geomap("HIGH", "BCG_A", "FLT_A"),
            geomap("LOW", "BCG_A", "FLT_B"),
            geomap("LOW", "BCG_A", " "),
        ]);
        let high_and_low: Vec<&str> = index
            .geomaps_for_bcg_menu("BCG_A")
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(high_and_low, vec!["HIGH", "LOW"]);
        assert_eq!(index.filter_menus.len(), 2);
        assert!(index.geomaps_for_filter_menu(" ").is_none());
        assert!(index.geomaps_for_bcg_menu("MISSING").is_none());
    }
}
