use std::collections::BTreeSet;

use crate::geomap::MenuIndex;

use super::ConsoleCommandControl;

const BANNER_RULE: &str = ":::::::::::::::::::::::::::::::::::";

fn push_line(report: &mut String, line: &str) {
    report.push_str(line);
    report.push('\n');
}

fn push_banner(report: &mut String, title: &str) {
    push_line(report, BANNER_RULE);
    push_line(report, title);
    push_line(report, BANNER_RULE);
    push_line(report, "");
}

fn push_used_with(report: &mut String, geomap_ids: Option<&BTreeSet<String>>) {
    let used_with = match geomap_ids {
        Some(ids) if !ids.is_empty() => ids.iter().cloned().collect::<Vec<_>>().join(", "),
        _ => "None".to_string(),
    };
    push_line(report, &format!("\n\tUsed with:\t{}\n", used_with));
}

fn join_groups(groups: &[i32]) -> String {
    groups
        .iter()
        .map(|group| group.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the plain-text menu overview: every brightness and filter menu with the geomaps using
/// it, followed by its buttons.
pub fn render_report(records: &ConsoleCommandControl, index: &MenuIndex) -> String {
    let mut report = String::new();

    push_banner(&mut report, "::   Brightness Control Groups   ::");
    for menu in &records.brightness_menus {
        push_line(&mut report, &format!("BCG Menu: {}", menu.name));
        push_used_with(&mut report, index.geomaps_for_bcg_menu(&menu.name));
        for button in &menu.buttons {
            push_line(&mut report, &format!("\tLabel:\t\t{}", button.label));
            push_line(&mut report, &format!("\tPosition:\t{}", button.menu_position));
            push_line(&mut report, &format!("\tGroup:\t\t{}\n", join_groups(&button.groups)));
        }
        push_line(&mut report, "");
    }

    push_banner(&mut report, "::        Filter Groups          ::");
    for menu in &records.filter_menus {
        push_line(&mut report, &format!("FilterMenu: {}", menu.name));
        push_used_with(&mut report, index.geomaps_for_filter_menu(&menu.name));
        for button in &menu.buttons {
            push_line(&mut report, &format!("\tLabel:\t\t{}", button.label_line1));
            if let Some(label_line2) = button
                .label_line2
                .as_deref()
                .filter(|line| !line.trim().is_empty())
            {
                push_line(&mut report, &format!("\t\t\t\t{}", label_line2));
            }
            push_line(&mut report, &format!("\tPosition:\t{}", button.menu_position));
            push_line(&mut report, &format!("\tGroup:\t\t{}\n", join_groups(&button.groups)));
        }
        push_line(&mut report, "");
    }

    report
}
