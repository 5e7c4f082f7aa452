use std::{fs, io, path::Path, str::FromStr};

use roxmltree::Node;
use thiserror::Error;

use super::model::{
    GeomapHeader, LineAttributes, RawGeomap, RawLine, RawObjectType, RawSymbol, RawText,
    SymbolAttributes, TextAttributes,
};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("failed to read geomap file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse geomap XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("{parent} is missing required element {element}")]
    MissingElement {
        parent: &'static str,
        element: &'static str,
    },
}

pub(crate) fn child<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

pub(crate) fn children<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |n| n.has_tag_name(name))
}

/// Follow a chain of child element names, e.g. `["DefaultLineProperties", "BCGGroup"]`.
pub(crate) fn descend<'a, 'input>(
    node: Node<'a, 'input>,
    path: &[&str],
) -> Option<Node<'a, 'input>> {
    path.iter().try_fold(node, |current, name| child(current, name))
}

pub(crate) fn text_of(node: Node) -> String {
    node.text().unwrap_or_default().trim().to_string()
}

pub(crate) fn optional_text(node: Node, path: &[&str]) -> Option<String> {
    descend(node, path).map(text_of)
}

fn required_text(
    node: Node,
    parent: &'static str,
    element: &'static str,
) -> Result<String, IngestError> {
    optional_text(node, &[element]).ok_or(IngestError::MissingElement { parent, element })
}

/// Unparsable values count as absent.
pub(crate) fn parse_value<T: FromStr>(node: Node, path: &[&str]) -> Option<T> {
    optional_text(node, path).and_then(|text| text.parse().ok())
}

fn parse_bool(node: Node, path: &[&str]) -> Option<bool> {
    match optional_text(node, path)?.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_filters(node: Node, path: &[&str]) -> Vec<u32> {
    match descend(node, path) {
        Some(filters) => children(filters, "FilterGroup")
            .filter_map(|filter| text_of(filter).parse().ok())
            .collect(),
        None => Vec::new(),
    }
}

fn parse_line_attributes(node: Node, filters: &str) -> LineAttributes {
    LineAttributes {
        filters: parse_filters(node, &[filters]),
        bcg_group: parse_value(node, &["BCGGroup"]),
        style: optional_text(node, &["LineStyle"]),
        thickness: parse_value(node, &["Thickness"]),
    }
}

fn parse_symbol_attributes(node: Node, filters: &str) -> SymbolAttributes {
    SymbolAttributes {
        filters: parse_filters(node, &[filters]),
        bcg_group: parse_value(node, &["BCGGroup"]),
        style: optional_text(node, &["SymbolStyle"]),
        font_size: parse_value(node, &["FontSize"]),
    }
}

fn parse_text_attributes(node: Node, filters: &str) -> TextAttributes {
    TextAttributes {
        filters: parse_filters(node, &[filters]),
        bcg_group: parse_value(node, &["BCGGroup"]),
        font_size: parse_value(node, &["FontSize"]),
        underline: parse_bool(node, &["Underline"]),
        display: parse_bool(node, &["DisplaySetting"]),
        x_offset: parse_value(node, &["XPixelOffset"]),
        y_offset: parse_value(node, &["YPixelOffset"]),
    }
}

fn parse_line(node: Node) -> RawLine {
    RawLine {
        id: optional_text(node, &["LineObjectId"]),
        start_latitude: optional_text(node, &["StartLatitude"]),
        start_longitude: optional_text(node, &["StartLongitude"]),
        end_latitude: optional_text(node, &["EndLatitude"]),
        end_longitude: optional_text(node, &["EndLongitude"]),
        overrides: parse_line_attributes(node, "GeoLineFilters"),
    }
}

fn parse_text(node: Node) -> RawText {
    let lines = match descend(node, &["GeoTextStrings"]) {
        // Label text keeps its spacing.
        Some(strings) => children(strings, "TextLine")
            .map(|line| line.text().unwrap_or_default().to_string())
            .collect(),
        None => Vec::new(),
    };
    RawText {
        lines,
        overrides: parse_text_attributes(node, "GeoTextFilters"),
    }
}

fn parse_symbol(node: Node) -> RawSymbol {
    RawSymbol {
        id: optional_text(node, &["SymbolId"]),
        latitude: optional_text(node, &["Latitude"]),
        longitude: optional_text(node, &["Longitude"]),
        overrides: parse_symbol_attributes(node, "GeoSymbolFilters"),
        texts: children(node, "GeoMapText").map(parse_text).collect(),
    }
}

fn parse_object_type(node: Node) -> Result<RawObjectType, IngestError> {
    const PARENT: &str = "GeoMapObjectType";
    let line_defaults = child(node, "DefaultLineProperties")
        .map(|section| parse_line_attributes(section, "GeoLineFilters"))
        .unwrap_or_default();
    let symbol_defaults = child(node, "DefaultSymbolProperties")
        .map(|section| parse_symbol_attributes(section, "GeoSymbolFilters"))
        .unwrap_or_default();
    let text_defaults = child(node, "TextDefaultProperties")
        .map(|section| parse_text_attributes(section, "GeoTextFilters"))
        .unwrap_or_default();

    Ok(RawObjectType {
        map_object_type: required_text(node, PARENT, "MapObjectType")?,
        map_group_id: required_text(node, PARENT, "MapGroupId")?,
        line_defaults,
        symbol_defaults,
        text_defaults,
        lines: children(node, "GeoMapLine").map(parse_line).collect(),
        symbols: children(node, "GeoMapSymbol").map(parse_symbol).collect(),
    })
}

fn parse_geomap(node: Node) -> Result<RawGeomap, IngestError> {
    const PARENT: &str = "GeoMapRecord";
    let header = GeomapHeader {
        geomap_id: required_text(node, PARENT, "GeomapId")?,
        bcg_menu_name: required_text(node, PARENT, "BCGMenuName")?,
        filter_menu_name: required_text(node, PARENT, "FilterMenuName")?,
        label_line1: optional_text(node, &["LabelLine1"]).unwrap_or_else(|| "LL1".to_string()),
        label_line2: optional_text(node, &["LabelLine2"]).unwrap_or_else(|| "LL2".to_string()),
    };
    let object_types = children(node, "GeoMapObjectType")
        .map(parse_object_type)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RawGeomap {
        header,
        object_types,
    })
}

/// Parse every `GeoMapRecord` in the document, in document order.
pub fn parse_geomaps(xml: &str) -> Result<Vec<RawGeomap>, IngestError> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let document = roxmltree::Document::parse_with_options(xml, options)?;
    document
        .descendants()
        .filter(|n| n.has_tag_name("GeoMapRecord"))
        .map(parse_geomap)
        .collect()
}

pub fn read_geomaps_file(filepath: &Path) -> Result<Vec<RawGeomap>, IngestError> {
    let contents = fs::read_to_string(filepath)?;
    parse_geomaps(&contents)
}

#[cfg(test)]
mod tests {
    use super::{parse_geomaps, IngestError};

    const GEOMAPS_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ArrayOfGeoMapRecord>
  <GeoMapRecord>
    <GeomapId>CENTER</GeomapId>
    <BCGMenuName>AAA</BCGMenuName>
    <FilterMenuName>BBB</FilterMenuName>
    <LabelLine1>HIGH</LabelLine1>
    <GeoMapObjectType>
      <MapObjectType>AIRWAY</MapObjectType>
      <MapGroupId>4</MapGroupId>
      <DefaultLineProperties>
        <LineStyle>Solid</LineStyle>
        <BCGGroup>2</BCGGroup>
        <Thickness>1</Thickness>
        <GeoLineFilters>
          <FilterGroup>3</FilterGroup>
          <FilterGroup>x</FilterGroup>
          <FilterGroup>12</FilterGroup>
        </GeoLineFilters>
      </DefaultLineProperties>
      <TextDefaultProperties>
        <Underline>False</Underline>
        <DisplaySetting>true</DisplaySetting>
        <XPixelOffset>-4</XPixelOffset>
      </TextDefaultProperties>
      <GeoMapLine>
        <LineObjectId>J1</LineObjectId>
        <StartLatitude>421247.29N</StartLatitude>
        <StartLongitude>0831234.00W</StartLongitude>
        <EndLatitude>421300.00N</EndLatitude>
        <EndLongitude>0831234.00W</EndLongitude>
        <BCGGroup>5</BCGGroup>
      </GeoMapLine>
      <GeoMapLine>
        <LineObjectId>J2</LineObjectId>
        <StartLatitude>421300.00N</StartLatitude>
      </GeoMapLine>
      <GeoMapSymbol>
        <SymbolId>VOR1</SymbolId>
        <Latitude>421247N</Latitude>
        <Longitude>0831234W</Longitude>
        <FontSize>2</FontSize>
        <GeoSymbolFilters><FilterGroup>7</FilterGroup></GeoSymbolFilters>
        <GeoMapText>
          <GeoTextStrings>
            <TextLine>ABC</TextLine>
            <TextLine> 123 </TextLine>
          </GeoTextStrings>
          <DisplaySetting>false</DisplaySetting>
        </GeoMapText>
      </GeoMapSymbol>
    </GeoMapObjectType>
  </GeoMapRecord>
  <GeoMapRecord>
    <GeomapId>EMPTY</GeomapId>
    <BCGMenuName>AAA</BCGMenuName>
    <FilterMenuName>CCC</FilterMenuName>
  </GeoMapRecord>
</ArrayOfGeoMapRecord>"#;

    #[test]
    fn test_parse_geomaps() {
        let geomaps = parse_geomaps(GEOMAPS_XML).unwrap();
        assert_eq!(geomaps.len(), 2);

        let center = &geomaps[0];
        assert_eq!(center.header.geomap_id, "CENTER");
        assert_eq!(center.header.label_line1, "HIGH");
        assert_eq!(center.header.label_line2, "LL2");

        let object_type = &center.object_types[0];
        assert_eq!(object_type.map_object_type, "AIRWAY");
        assert_eq!(object_type.map_group_id, "4");
        assert_eq!(object_type.line_defaults.filters, vec![3, 12]);
        assert_eq!(object_type.line_defaults.style.as_deref(), Some("Solid"));
        assert_eq!(object_type.line_defaults.bcg_group, Some(2));
        assert_eq!(object_type.text_defaults.underline, Some(false));
        assert_eq!(object_type.text_defaults.display, Some(true));
        assert_eq!(object_type.text_defaults.x_offset, Some(-4));
        assert!(object_type.symbol_defaults.filters.is_empty());

        assert_eq!(object_type.lines.len(), 2);
        let line = &object_type.lines[0];
        assert_eq!(line.id.as_deref(), Some("J1"));
        assert_eq!(line.start_latitude.as_deref(), Some("421247.29N"));
        assert_eq!(line.overrides.bcg_group, Some(5));
        assert!(line.overrides.filters.is_empty());
        // Missing coordinates are left for the resolver to reject.
        assert_eq!(object_type.lines[1].end_latitude, None);

        let symbol = &object_type.symbols[0];
        assert_eq!(symbol.id.as_deref(), Some("VOR1"));
        assert_eq!(symbol.overrides.filters, vec![7]);
        assert_eq!(symbol.overrides.font_size, Some(2));
        assert_eq!(symbol.texts[0].lines, vec!["ABC", " 123 "]);
        assert_eq!(symbol.texts[0].overrides.display, Some(false));

        assert!(geomaps[1].object_types.is_empty());
    }

    #[test]
    fn test_missing_geomap_id() {
        let xml = "<Root><GeoMapRecord><BCGMenuName>A</BCGMenuName></GeoMapRecord></Root>";
        assert!(matches!(
            parse_geomaps(xml),
            Err(IngestError::MissingElement {
                parent: "GeoMapRecord",
                element: "GeomapId"
            })
        ));
    }

    #[test]
    fn test_malformed_xml() {
        assert!(matches!(
            parse_geomaps("<Root><GeoMapRecord></Root>"),
            Err(IngestError::Xml(_))
        ));
    }
}
