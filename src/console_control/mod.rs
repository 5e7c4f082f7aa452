pub mod parse;
pub mod report;

pub use parse::{parse_console_control, read_console_control_file, ConsoleControlError};
pub use report::render_report;

/// One button of a brightness control menu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrightnessButton {
    pub menu_position: i32,
    pub label: String,
    pub groups: Vec<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrightnessMenu {
    pub name: String,
    pub buttons: Vec<BrightnessButton>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterButton {
    pub menu_position: i32,
    pub label_line1: String,
    pub label_line2: Option<String>,
    pub groups: Vec<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterMenu {
    pub name: String,
    pub buttons: Vec<FilterButton>,
}

/// Menus declared in the console command control file, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleCommandControl {
    pub brightness_menus: Vec<BrightnessMenu>,
    pub filter_menus: Vec<FilterMenu>,
}
