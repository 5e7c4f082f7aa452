use std::{fs, io, path::Path, str::FromStr};

use roxmltree::Node;
use thiserror::Error;

use crate::geomap::xml::{children, descend, optional_text, text_of};

use super::{BrightnessButton, BrightnessMenu, ConsoleCommandControl, FilterButton, FilterMenu};

#[derive(Error, Debug)]
pub enum ConsoleControlError {
    #[error("failed to read console command control file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse console command control XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("{element} has non-integer value '{value}'")]
    InvalidNumber {
        element: &'static str,
        value: String,
    },
}

/// Absent numbers read as the type's default; present ones must parse.
fn number<T: FromStr + Default>(
    node: Node,
    element: &'static str,
) -> Result<T, ConsoleControlError> {
    match optional_text(node, &[element]) {
        Some(value) => value
            .parse()
            .map_err(|_| ConsoleControlError::InvalidNumber { element, value }),
        None => Ok(T::default()),
    }
}

fn groups(
    node: Node,
    container: &'static str,
    element: &'static str,
) -> Result<Vec<i32>, ConsoleControlError> {
    let Some(container) = descend(node, &[container]) else {
        return Ok(Vec::new());
    };
    children(container, element)
        .map(|group| {
            let value = text_of(group);
            value
                .parse()
                .map_err(|_| ConsoleControlError::InvalidNumber { element, value })
        })
        .collect()
}

fn parse_brightness_menu(node: Node) -> Result<BrightnessMenu, ConsoleControlError> {
    let buttons = children(node, "MapBCGButton")
        .map(|button| -> Result<BrightnessButton, ConsoleControlError> {
            Ok(BrightnessButton {
                menu_position: number(button, "MenuPosition")?,
                label: optional_text(button, &["Label"]).unwrap_or_default(),
                groups: groups(button, "MapBCGGroups", "MapBCGGroup")?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(BrightnessMenu {
        name: optional_text(node, &["BCGMenuName"]).unwrap_or_default(),
        buttons,
    })
}

fn parse_filter_menu(node: Node) -> Result<FilterMenu, ConsoleControlError> {
    let buttons = children(node, "MapFilterButton")
        .map(|button| -> Result<FilterButton, ConsoleControlError> {
            Ok(FilterButton {
                menu_position: number(button, "MenuPosition")?,
                label_line1: optional_text(button, &["LabelLine1"]).unwrap_or_default(),
                label_line2: optional_text(button, &["LabelLine2"]),
                groups: groups(button, "MapFilterGroups", "MapFilterGroup")?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FilterMenu {
        name: optional_text(node, &["FilterMenuName"]).unwrap_or_default(),
        buttons,
    })
}

/// Read the brightness and filter menus of a console command control document. Other sections
/// (keypad, CPDLC and specialist keys) are ignored.
pub fn parse_console_control(xml: &str) -> Result<ConsoleCommandControl, ConsoleControlError> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let document = roxmltree::Document::parse_with_options(xml, options)?;
    let root = document.root_element();
    Ok(ConsoleCommandControl {
        brightness_menus: children(root, "MapBrightnessMenu")
            .map(parse_brightness_menu)
            .collect::<Result<_, _>>()?,
        filter_menus: children(root, "MapFilterMenu")
            .map(parse_filter_menu)
            .collect::<Result<_, _>>()?,
    })
}

pub fn read_console_control_file(
    path: &Path,
) -> Result<ConsoleCommandControl, ConsoleControlError> {
    let contents = fs::read_to_string(path)?;
    parse_console_control(&contents)
}
